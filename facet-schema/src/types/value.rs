use chrono::{DateTime, Utc};

use crate::types::attribute_type::ValueKind;

/// A typed attribute cell, one variant per [`ValueKind`].
///
/// This is the only way a value reaches storage: the persisted row
/// populates exactly the column owned by the variant's kind, which is
/// what keeps the one-populated-column invariant structural.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::Integer(_) => ValueKind::Integer,
            AttributeValue::Decimal(_) => ValueKind::Decimal,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::DateTime(_) => ValueKind::DateTime,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Decimal(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::DateTime(value)
    }
}
