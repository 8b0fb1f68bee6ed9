//! Paginating adapter over the data table.
//!
//! Slices one page of data records for a family, applying attribute
//! filters, then forwards the page through the batched value loader so
//! callers receive fully populated records.
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::errors::RepositoryError;
use crate::filter::AppliedFilter;
use crate::loader::ValueLoader;
use crate::records::DataRecord;

/// Pages through a family's data records with their values attached.
#[derive(Clone)]
pub struct DataPaginator {
    pool: Pool<Postgres>,
    loader: ValueLoader,
}

impl DataPaginator {
    pub fn new(pool: Pool<Postgres>) -> Self {
        let loader = ValueLoader::new(pool.clone());
        DataPaginator { pool, loader }
    }

    /// Fetches one page of records for a family.
    ///
    /// Each active filter constrains the page through its own `EXISTS`
    /// subquery over the value table, so several filters on different
    /// attributes combine without fighting over one join row. Empty
    /// filters are skipped. The page is ordered by creation time, then
    /// id for a stable tiebreak, and runs through the value loader
    /// before it is returned.
    #[instrument(skip(self, filters), fields(filter_count = filters.len()))]
    pub async fn fetch_page(
        &self,
        family_code: &str,
        filters: &[AppliedFilter],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DataRecord>, RepositoryError> {
        let mut query = QueryBuilder::new(
            "SELECT d.id, d.family_code, d.kind, d.created_at, d.updated_at \
             FROM data d WHERE d.family_code = ",
        );
        query.push_bind(family_code.to_owned());

        for filter in filters.iter().filter(|filter| !filter.is_noop()) {
            query.push(" AND EXISTS (SELECT 1 FROM data_values v WHERE v.data_id = d.id");
            filter.apply(&mut query, "v")?;
            query.push(")");
        }

        query
            .push(" ORDER BY d.created_at, d.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let mut records = query
            .build_query_as::<DataRecord>()
            .fetch_all(&self.pool)
            .await?;

        self.loader.attach(&mut records).await?;
        Ok(records)
    }
}
