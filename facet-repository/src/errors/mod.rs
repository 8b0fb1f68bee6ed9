//! Error types for the repository crate.
//! Consolidates database, schema and filter errors surfaced by
//! persistence operations.
use thiserror::Error;

use facet_schema::{SchemaError, ValueKind};

/// Represents errors that can occur within the data repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
}

/// Errors raised while turning user-supplied criteria into predicates.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("input \"{input}\" is not a valid {kind} for attribute \"{attribute}\"")]
    InvalidInput {
        attribute: String,
        kind: ValueKind,
        input: String,
    },

    #[error("{strategy} filtering is not supported on {kind} attribute \"{attribute}\"")]
    UnsupportedKind {
        strategy: &'static str,
        attribute: String,
        kind: ValueKind,
    },
}
