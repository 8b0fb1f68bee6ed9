//! Batched value loading for a page of data records.
//!
//! Given an already-materialized page, a single round trip fetches every
//! value row for every record and attaches them in memory, so callers
//! never fall back to per-row lazy loading.
use std::collections::HashMap;

use sqlx::{Pool, Postgres};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::records::{DataRecord, ValueRow};

/// Attaches value rows to their owning data records in one query.
#[derive(Clone)]
pub struct ValueLoader {
    pool: Pool<Postgres>,
}

impl ValueLoader {
    pub fn new(pool: Pool<Postgres>) -> Self {
        ValueLoader { pool }
    }

    /// Loads the values of every record in the page with one query and
    /// replaces each record's attached set.
    ///
    /// Replacing rather than appending makes the call idempotent, and
    /// the input's ordering and count are never touched. Very large
    /// pages must be chunked by the caller, the loader never paginates
    /// internally.
    #[instrument(skip_all, fields(record_count = records.len()))]
    pub async fn attach(&self, records: &mut [DataRecord]) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let rows = sqlx::query_as::<_, ValueRow>(
            "SELECT id, data_id, attribute_code, position, \
             string_value, integer_value, decimal_value, boolean_value, datetime_value \
             FROM data_values WHERE data_id = ANY($1) \
             ORDER BY attribute_code, position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            record_count = records.len(),
            value_count = rows.len(),
            "Loaded value rows for page"
        );

        let mut by_data: HashMap<Uuid, Vec<ValueRow>> = HashMap::new();
        for row in rows {
            by_data.entry(row.data_id).or_default().push(row);
        }

        // The same id may appear more than once in the input, so the
        // grouped rows are cloned rather than drained.
        for record in records.iter_mut() {
            record.values = by_data.get(&record.id).cloned().unwrap_or_default();
        }

        Ok(())
    }
}
