use std::sync::Arc;

use crate::errors::SchemaError;
use crate::types::attribute_type::AttributeType;

/// A field definition: a code unique within its families, a reference to
/// a registered [`AttributeType`], and the flags describing how the field
/// behaves.
///
/// Attributes are owned by the attribute registry and shared by the
/// families that reference them.
#[derive(Clone, Debug)]
pub struct Attribute {
    code: String,
    attribute_type: Arc<AttributeType>,
    multiple: bool,
    required: bool,
    searchable: bool,
}

impl Attribute {
    pub fn new(
        code: impl Into<String>,
        attribute_type: Arc<AttributeType>,
    ) -> Result<Self, SchemaError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SchemaError::EmptyCode { kind: "attribute" });
        }
        Ok(Attribute {
            code,
            attribute_type,
            multiple: false,
            required: false,
            searchable: false,
        })
    }

    pub fn with_flags(mut self, multiple: bool, required: bool, searchable: bool) -> Self {
        self.multiple = multiple;
        self.required = required;
        self.searchable = searchable;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn attribute_type(&self) -> &Arc<AttributeType> {
        &self.attribute_type
    }

    /// Whether this attribute stores an ordered list of values rather
    /// than a single one.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }
}
