//! Error types for the schema crate.
//! Consolidates configuration, lookup and value errors raised while
//! building or querying a [`crate::registry::Schema`].
use thiserror::Error;

use crate::types::ValueKind;

/// Represents errors raised while building a schema from configuration or
/// resolving codes against its registries.
///
/// Lookup failures always carry the registry kind and the requested code so
/// a config/data mismatch is identifiable from the message alone.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no {kind} registered with code \"{code}\"")]
    MissingEntity { kind: &'static str, code: String },

    #[error("duplicate {kind} code \"{code}\"")]
    DuplicateCode { kind: &'static str, code: String },

    #[error("missing code in {kind} definition")]
    EmptyCode { kind: &'static str },

    #[error("family \"{family}\" references parent \"{parent}\" which is not defined before it")]
    UnknownParent { family: String, parent: String },

    #[error("{actual} value does not match attribute \"{attribute}\" declared as {expected}")]
    TypeMismatch {
        attribute: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("invalid family value: {0}")]
    InvalidValue(String),
}

/// Errors raised by the datetime parse utility.
#[derive(Debug, Error)]
pub enum DateParseError {
    #[error("zero timestamp rejected as likely-uninitialized input")]
    ZeroTimestamp,

    #[error("timestamp {0} is out of range")]
    OutOfRange(i64),

    #[error("unparseable date string \"{value}\": {source}")]
    Unparseable {
        value: String,
        source: chrono::ParseError,
    },

    #[error("missing date value")]
    MissingValue,
}
