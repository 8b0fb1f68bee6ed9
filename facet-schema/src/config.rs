//! Declarative configuration records for schema population.
//!
//! External configuration supplies ordered lists of attribute type,
//! attribute and family definitions at startup; [`crate::Schema`]
//! validates and freezes them. The records deserialize from any serde
//! format, missing required fields fail deserialization.
use serde::Deserialize;

use crate::types::ValueKind;

/// Declares an extra attribute type mapping a code onto a storage kind.
#[derive(Clone, Debug, Deserialize)]
pub struct AttributeTypeDef {
    pub code: String,
    pub storage: ValueKind,
}

/// Declares an attribute and the type it stores as.
#[derive(Clone, Debug, Deserialize)]
pub struct AttributeDef {
    pub code: String,
    #[serde(rename = "type")]
    pub type_code: String,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub searchable: bool,
}

/// Declares a family, its optional parent and its attribute codes.
#[derive(Clone, Debug, Deserialize)]
pub struct FamilyDef {
    pub code: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// The full set of definitions a schema is built from.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub attribute_types: Vec<AttributeTypeDef>,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    #[serde(default)]
    pub families: Vec<FamilyDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_from_json() {
        let config: SchemaConfig = serde_json::from_str(
            r#"{
                "attribute_types": [{"code": "html", "storage": "string"}],
                "attributes": [
                    {"code": "title", "type": "string", "required": true},
                    {"code": "pages", "type": "integer"}
                ],
                "families": [
                    {"code": "product", "attributes": ["title"]},
                    {"code": "book", "parent": "product", "attributes": ["pages"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.attribute_types[0].storage, ValueKind::String);
        assert!(config.attributes[0].required);
        assert!(!config.attributes[1].required);
        assert_eq!(config.families[1].parent.as_deref(), Some("product"));
    }

    #[test]
    fn family_without_code_fails_deserialization() {
        let result: Result<FamilyDef, _> =
            serde_json::from_str(r#"{"attributes": ["title"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_storage_kind_fails_deserialization() {
        let result: Result<AttributeTypeDef, _> =
            serde_json::from_str(r#"{"code": "geo", "storage": "point"}"#);
        assert!(result.is_err());
    }
}
