//! # Facet Repository
//! This crate provides traits and implementations for persisting EAV
//! data records and their values in PostgreSQL. It includes definitions
//! for errors, interfaces, row types, a concrete PostgreSQL backend, the
//! batched value loader, the attribute query filter and the paginating
//! adapter that ties loader and filters together.
pub mod errors;
pub mod filter;
pub mod interfaces;
pub mod loader;
pub mod pagination;
pub mod postgres;
pub mod records;

pub use errors::{FilterError, RepositoryError};
pub use filter::{default_strategy, AppliedFilter, ExactMatch, FilterStrategy, PrefixMatch, RangeMatch};
pub use interfaces::DataRepository;
pub use loader::ValueLoader;
pub use pagination::DataPaginator;
pub use postgres::PostgresDataRepository;
pub use records::{DataRecord, ValueRow};
