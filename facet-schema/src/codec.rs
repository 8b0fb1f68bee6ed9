//! Conversion between a family object and its stored code string.
//!
//! The codec owns an `Arc<Schema>` handed to it at construction, so the
//! decode path resolves codes against the live registry without any
//! process-wide indirection.
use std::sync::Arc;

use crate::errors::SchemaError;
use crate::registry::Schema;
use crate::types::{Family, HasFamilyCode};

/// Encodes a family to its code for a family-typed column and decodes a
/// stored code back to the registered [`Family`].
#[derive(Clone)]
pub struct FamilyCodec {
    schema: Arc<Schema>,
}

impl FamilyCodec {
    pub fn new(schema: Arc<Schema>) -> Self {
        FamilyCodec { schema }
    }

    /// Emits the code of anything carrying the family capability.
    ///
    /// An empty code is rejected as an invalid value, the write must not
    /// proceed with it.
    pub fn encode(&self, value: &dyn HasFamilyCode) -> Result<String, SchemaError> {
        let code = value.family_code();
        if code.trim().is_empty() {
            return Err(SchemaError::InvalidValue(
                "family code is empty".to_owned(),
            ));
        }
        Ok(code.to_owned())
    }

    /// Resolves a stored code through the family registry.
    ///
    /// An unknown code fails with a missing-entity error, never a silent
    /// `None`.
    pub fn decode(&self, code: &str) -> Result<Arc<Family>, SchemaError> {
        self.schema.families().get(code).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeDef, SchemaConfig, FamilyDef};

    fn schema() -> Arc<Schema> {
        let config = SchemaConfig {
            attribute_types: vec![],
            attributes: vec![AttributeDef {
                code: "title".to_owned(),
                type_code: "string".to_owned(),
                multiple: false,
                required: false,
                searchable: true,
            }],
            families: vec![FamilyDef {
                code: "product".to_owned(),
                parent: None,
                attributes: vec!["title".to_owned()],
            }],
        };
        Arc::new(Schema::from_config(config).unwrap())
    }

    #[test]
    fn encode_then_decode_round_trips_registered_families() {
        let schema = schema();
        let codec = FamilyCodec::new(Arc::clone(&schema));
        let family = schema.families().get("product").unwrap();

        let stored = codec.encode(family).unwrap();
        assert_eq!(stored, "product");

        let decoded = codec.decode(&stored).unwrap();
        assert_eq!(decoded.code(), family.code());
    }

    #[test]
    fn decode_of_unknown_code_fails_with_missing_entity() {
        let codec = FamilyCodec::new(schema());
        assert!(matches!(
            codec.decode("cd"),
            Err(SchemaError::MissingEntity { kind: "family", code }) if code == "cd"
        ));
    }

    #[test]
    fn encode_rejects_an_empty_code() {
        struct Detached;
        impl HasFamilyCode for Detached {
            fn family_code(&self) -> &str {
                ""
            }
        }

        let codec = FamilyCodec::new(schema());
        assert!(matches!(
            codec.encode(&Detached),
            Err(SchemaError::InvalidValue(_))
        ));
    }
}
