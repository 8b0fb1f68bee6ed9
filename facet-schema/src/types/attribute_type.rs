use std::fmt;

use serde::Deserialize;

use crate::errors::SchemaError;

// Kind codes - must match the `storage` field accepted in configuration
pub const KIND_STRING: &str = "string";
pub const KIND_INTEGER: &str = "integer";
pub const KIND_DECIMAL: &str = "decimal";
pub const KIND_BOOLEAN: &str = "boolean";
pub const KIND_DATETIME: &str = "datetime";

// Storage column names - must match the data_values table in the db
pub const COLUMN_STRING: &str = "string_value";
pub const COLUMN_INTEGER: &str = "integer_value";
pub const COLUMN_DECIMAL: &str = "decimal_value";
pub const COLUMN_BOOLEAN: &str = "boolean_value";
pub const COLUMN_DATETIME: &str = "datetime_value";

// All valid kind codes
pub const VALID_KIND_CODES: &[&str] = &[
    KIND_STRING,
    KIND_INTEGER,
    KIND_DECIMAL,
    KIND_BOOLEAN,
    KIND_DATETIME,
];

/// Type-safe representation of the physical storage kinds.
///
/// Every attribute type maps onto exactly one kind, and every kind owns
/// one column of the `data_values` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
}

impl ValueKind {
    /// Returns the `data_values` column holding values of this kind.
    pub fn storage_column(&self) -> &'static str {
        match self {
            ValueKind::String => COLUMN_STRING,
            ValueKind::Integer => COLUMN_INTEGER,
            ValueKind::Decimal => COLUMN_DECIMAL,
            ValueKind::Boolean => COLUMN_BOOLEAN,
            ValueKind::DateTime => COLUMN_DATETIME,
        }
    }

    /// Validates if a string is a valid kind code.
    pub fn is_valid_code(value: &str) -> bool {
        VALID_KIND_CODES.contains(&value)
    }

    /// Returns all kind variants in declaration order.
    pub fn all_variants() -> Vec<ValueKind> {
        vec![
            ValueKind::String,
            ValueKind::Integer,
            ValueKind::Decimal,
            ValueKind::Boolean,
            ValueKind::DateTime,
        ]
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "{}", KIND_STRING),
            ValueKind::Integer => write!(f, "{}", KIND_INTEGER),
            ValueKind::Decimal => write!(f, "{}", KIND_DECIMAL),
            ValueKind::Boolean => write!(f, "{}", KIND_BOOLEAN),
            ValueKind::DateTime => write!(f, "{}", KIND_DATETIME),
        }
    }
}

impl AsRef<str> for ValueKind {
    fn as_ref(&self) -> &str {
        match self {
            ValueKind::String => KIND_STRING,
            ValueKind::Integer => KIND_INTEGER,
            ValueKind::Decimal => KIND_DECIMAL,
            ValueKind::Boolean => KIND_BOOLEAN,
            ValueKind::DateTime => KIND_DATETIME,
        }
    }
}

impl std::convert::TryFrom<&str> for ValueKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            KIND_STRING => Ok(ValueKind::String),
            KIND_INTEGER => Ok(ValueKind::Integer),
            KIND_DECIMAL => Ok(ValueKind::Decimal),
            KIND_BOOLEAN => Ok(ValueKind::Boolean),
            KIND_DATETIME => Ok(ValueKind::DateTime),
            _ => Err(format!(
                "Unknown value kind: {} (expected one of: {})",
                value,
                VALID_KIND_CODES.join(", ")
            )),
        }
    }
}

/// A registered storage-kind descriptor.
///
/// Several type codes may share one kind, e.g. an `html` type stored in
/// the string column. Immutable once registered.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeType {
    code: String,
    kind: ValueKind,
}

impl AttributeType {
    pub fn new(code: impl Into<String>, kind: ValueKind) -> Result<Self, SchemaError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SchemaError::EmptyCode {
                kind: "attribute type",
            });
        }
        Ok(AttributeType { code, kind })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Shorthand for the storage column of this type's kind.
    pub fn storage_column(&self) -> &'static str {
        self.kind.storage_column()
    }

    /// The built-in types registered in every schema, one per kind.
    pub fn builtins() -> Vec<AttributeType> {
        ValueKind::all_variants()
            .into_iter()
            .map(|kind| AttributeType {
                code: kind.as_ref().to_owned(),
                kind,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_columns_cover_every_kind() {
        let columns: Vec<&str> = ValueKind::all_variants()
            .iter()
            .map(|kind| kind.storage_column())
            .collect();
        assert_eq!(
            columns,
            vec![
                "string_value",
                "integer_value",
                "decimal_value",
                "boolean_value",
                "datetime_value",
            ]
        );
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in ValueKind::all_variants() {
            assert!(ValueKind::is_valid_code(kind.as_ref()));
            assert_eq!(ValueKind::try_from(kind.as_ref()), Ok(kind));
        }
        assert!(!ValueKind::is_valid_code("point"));
        let err = ValueKind::try_from("point").unwrap_err();
        assert!(err.contains("string, integer, decimal, boolean, datetime"));
    }

    #[test]
    fn empty_type_code_is_rejected() {
        assert!(matches!(
            AttributeType::new("  ", ValueKind::String),
            Err(SchemaError::EmptyCode { .. })
        ));
    }

    #[test]
    fn builtins_expose_one_type_per_kind() {
        let builtins = AttributeType::builtins();
        assert_eq!(builtins.len(), ValueKind::all_variants().len());
        assert_eq!(builtins[0].code(), "string");
        assert_eq!(builtins[0].storage_column(), "string_value");
    }
}
