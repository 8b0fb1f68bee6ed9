//! Persisted row types: the generic data record and its typed values.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use facet_schema::{Attribute, AttributeValue, Family, HasFamilyCode, SchemaError, ValueKind};

/// A persisted record instantiated against exactly one family.
///
/// The family is stored by code and set once at creation; it determines
/// which attributes are valid for the record. `kind` is the
/// single-table-inheritance discriminator.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct DataRecord {
    pub id: Uuid,
    pub family_code: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Not a column; attached by the batched value loader.
    #[sqlx(skip)]
    pub values: Vec<ValueRow>,
}

impl DataRecord {
    pub fn new(family: &Family, kind: impl Into<String>) -> Self {
        let now = Utc::now();
        DataRecord {
            id: Uuid::new_v4(),
            family_code: family.code().to_owned(),
            kind: kind.into(),
            created_at: now,
            updated_at: now,
            values: Vec::new(),
        }
    }

    /// Builds and attaches a value for one of the record's attributes.
    ///
    /// Fails when the value's kind does not match the attribute's
    /// declared type.
    pub fn set_value(
        &mut self,
        attribute: &Attribute,
        position: i32,
        value: AttributeValue,
    ) -> Result<(), SchemaError> {
        let row = ValueRow::new(self.id, attribute, position, value)?;
        self.values.push(row);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The attached values for one attribute, in position order as
    /// loaded.
    pub fn values_of<'a>(&'a self, attribute_code: &'a str) -> impl Iterator<Item = &'a ValueRow> {
        self.values
            .iter()
            .filter(move |value| value.attribute_code == attribute_code)
    }
}

impl HasFamilyCode for DataRecord {
    fn family_code(&self) -> &str {
        &self.family_code
    }
}

/// One stored (data, attribute, position) cell.
///
/// Exactly one storage column is populated, chosen by the attribute's
/// type; construction through [`ValueRow::new`] is what upholds that.
/// Multi-valued attributes order their rows by `position`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ValueRow {
    pub id: Uuid,
    pub data_id: Uuid,
    pub attribute_code: String,
    pub position: i32,
    pub string_value: Option<String>,
    pub integer_value: Option<i64>,
    pub decimal_value: Option<f64>,
    pub boolean_value: Option<bool>,
    pub datetime_value: Option<DateTime<Utc>>,
}

impl ValueRow {
    pub fn new(
        data_id: Uuid,
        attribute: &Attribute,
        position: i32,
        value: AttributeValue,
    ) -> Result<Self, SchemaError> {
        let expected = attribute.attribute_type().kind();
        if value.kind() != expected {
            return Err(SchemaError::TypeMismatch {
                attribute: attribute.code().to_owned(),
                expected,
                actual: value.kind(),
            });
        }

        let mut row = ValueRow {
            id: Uuid::new_v4(),
            data_id,
            attribute_code: attribute.code().to_owned(),
            position,
            string_value: None,
            integer_value: None,
            decimal_value: None,
            boolean_value: None,
            datetime_value: None,
        };
        match value {
            AttributeValue::String(v) => row.string_value = Some(v),
            AttributeValue::Integer(v) => row.integer_value = Some(v),
            AttributeValue::Decimal(v) => row.decimal_value = Some(v),
            AttributeValue::Boolean(v) => row.boolean_value = Some(v),
            AttributeValue::DateTime(v) => row.datetime_value = Some(v),
        }
        Ok(row)
    }

    /// The kind of the single populated column, if any.
    pub fn populated_kind(&self) -> Option<ValueKind> {
        if self.string_value.is_some() {
            Some(ValueKind::String)
        } else if self.integer_value.is_some() {
            Some(ValueKind::Integer)
        } else if self.decimal_value.is_some() {
            Some(ValueKind::Decimal)
        } else if self.boolean_value.is_some() {
            Some(ValueKind::Boolean)
        } else if self.datetime_value.is_some() {
            Some(ValueKind::DateTime)
        } else {
            None
        }
    }

    /// How many storage columns are populated; at most one by invariant.
    pub fn populated_columns(&self) -> usize {
        [
            self.string_value.is_some(),
            self.integer_value.is_some(),
            self.decimal_value.is_some(),
            self.boolean_value.is_some(),
            self.datetime_value.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }
}
