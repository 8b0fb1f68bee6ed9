//! This module defines the `DataRepository` trait, which provides an
//! interface for persisting data records and their values. All write
//! operations take an active transaction: the caller owns the boundary,
//! so a multi-row data+value write commits or rolls back as one unit.
use async_trait::async_trait;
use sqlx::Postgres;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::records::{DataRecord, ValueRow};

/// A trait that defines the interface for interacting with the data
/// repository.
///
/// Implementors provide bulk persistence for data records and their
/// typed values within caller-owned transactions.
#[async_trait]
pub trait DataRepository: Send + Sync {
    /// The underlying pool, used by callers to begin transactions.
    fn pool(&self) -> &sqlx::Pool<Postgres>;

    /// Inserts a batch of data records. Values attached to the records
    /// are not written here, pass them to [`Self::upsert_values`].
    async fn insert_data(
        &self,
        records: &[DataRecord],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError>;

    /// Inserts or updates value rows keyed by
    /// `(data_id, attribute_code, position)`.
    async fn upsert_values(
        &self,
        values: &[ValueRow],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError>;

    /// Deletes value rows by id.
    async fn delete_values(
        &self,
        value_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError>;

    /// Deletes data records by id; their values go with them through the
    /// schema's cascade.
    async fn delete_data(
        &self,
        data_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError>;

    /// Fetches one data record by id, without its values. Use the
    /// batched loader to attach values to a page of records.
    async fn get_data(&self, data_id: &Uuid) -> Result<DataRecord, RepositoryError>;
}
