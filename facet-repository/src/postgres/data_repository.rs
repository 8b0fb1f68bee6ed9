use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::interfaces::DataRepository;
use crate::records::{DataRecord, ValueRow};

/// PostgreSQL implementation of the data repository.
///
/// Uses `QueryBuilder` bulk inserts for records and values and
/// `ON CONFLICT DO UPDATE` on `(data_id, attribute_code, position)` so
/// re-writing a record's values converges on the final state.
pub struct PostgresDataRepository {
    pool: sqlx::Pool<Postgres>,
}

impl PostgresDataRepository {
    pub fn new(pool: sqlx::Pool<Postgres>) -> Self {
        PostgresDataRepository { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;
        Ok(PostgresDataRepository { pool })
    }
}

#[async_trait]
impl DataRepository for PostgresDataRepository {
    fn pool(&self) -> &sqlx::Pool<Postgres> {
        &self.pool
    }

    #[instrument(skip_all, fields(record_count = records.len()))]
    async fn insert_data(
        &self,
        records: &[DataRecord],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut query_builder = QueryBuilder::new(
            "INSERT INTO data (id, family_code, kind, created_at, updated_at)",
        );
        query_builder.push_values(records, |mut b, record| {
            b.push_bind(record.id)
                .push_bind(record.family_code.clone())
                .push_bind(record.kind.clone())
                .push_bind(record.created_at)
                .push_bind(record.updated_at);
        });
        query_builder.build().execute(&mut **tx).await?;

        debug!(record_count = records.len(), "Inserted data records");
        Ok(())
    }

    #[instrument(skip_all, fields(value_count = values.len()))]
    async fn upsert_values(
        &self,
        values: &[ValueRow],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        if values.is_empty() {
            return Ok(());
        }

        let mut query_builder = QueryBuilder::new(
            "INSERT INTO data_values (id, data_id, attribute_code, position, \
             string_value, integer_value, decimal_value, boolean_value, datetime_value)",
        );
        query_builder.push_values(values, |mut b, value| {
            b.push_bind(value.id)
                .push_bind(value.data_id)
                .push_bind(value.attribute_code.clone())
                .push_bind(value.position)
                .push_bind(value.string_value.clone())
                .push_bind(value.integer_value)
                .push_bind(value.decimal_value)
                .push_bind(value.boolean_value)
                .push_bind(value.datetime_value);
        });
        query_builder.push(
            " ON CONFLICT (data_id, attribute_code, position) DO UPDATE SET \
             string_value = EXCLUDED.string_value, \
             integer_value = EXCLUDED.integer_value, \
             decimal_value = EXCLUDED.decimal_value, \
             boolean_value = EXCLUDED.boolean_value, \
             datetime_value = EXCLUDED.datetime_value",
        );
        query_builder.build().execute(&mut **tx).await?;

        debug!(value_count = values.len(), "Upserted value rows");
        Ok(())
    }

    #[instrument(skip_all, fields(value_count = value_ids.len()))]
    async fn delete_values(
        &self,
        value_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        if value_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM data_values WHERE id = ANY($1)")
            .bind(value_ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(record_count = data_ids.len()))]
    async fn delete_data(
        &self,
        data_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        if data_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM data WHERE id = ANY($1)")
            .bind(data_ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn get_data(&self, data_id: &Uuid) -> Result<DataRecord, RepositoryError> {
        let record = sqlx::query_as::<_, DataRecord>(
            "SELECT id, family_code, kind, created_at, updated_at FROM data WHERE id = $1",
        )
        .bind(data_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
