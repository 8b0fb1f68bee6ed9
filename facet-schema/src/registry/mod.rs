//! Code-keyed registries for attribute types, attributes and families,
//! and the [`Schema`] aggregate that builds and freezes all three from
//! configuration records.
//!
//! Registries are populated exactly once during [`Schema::from_config`]
//! and expose only read access afterwards. Duplicate code registration
//! is rejected so a misconfigured schema fails at startup rather than
//! silently shadowing an earlier definition.
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::SchemaConfig;
use crate::errors::SchemaError;
use crate::types::{Attribute, AttributeType, Family};

/// Maps attribute type codes to their storage descriptors.
#[derive(Debug, Default)]
pub struct AttributeTypeRegistry {
    by_code: HashMap<String, Arc<AttributeType>>,
    ordered: Vec<Arc<AttributeType>>,
}

impl AttributeTypeRegistry {
    fn add(&mut self, attribute_type: AttributeType) -> Result<(), SchemaError> {
        if self.by_code.contains_key(attribute_type.code()) {
            return Err(SchemaError::DuplicateCode {
                kind: "attribute type",
                code: attribute_type.code().to_owned(),
            });
        }
        let attribute_type = Arc::new(attribute_type);
        self.by_code
            .insert(attribute_type.code().to_owned(), Arc::clone(&attribute_type));
        self.ordered.push(attribute_type);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<&Arc<AttributeType>, SchemaError> {
        self.by_code.get(code).ok_or_else(|| SchemaError::MissingEntity {
            kind: "attribute type",
            code: code.to_owned(),
        })
    }

    /// Registered types in insertion order, built-ins first.
    pub fn all(&self) -> &[Arc<AttributeType>] {
        &self.ordered
    }
}

/// Maps attribute codes to their definitions.
#[derive(Debug, Default)]
pub struct AttributeRegistry {
    by_code: HashMap<String, Arc<Attribute>>,
    ordered: Vec<Arc<Attribute>>,
}

impl AttributeRegistry {
    fn add(&mut self, attribute: Attribute) -> Result<(), SchemaError> {
        if self.by_code.contains_key(attribute.code()) {
            return Err(SchemaError::DuplicateCode {
                kind: "attribute",
                code: attribute.code().to_owned(),
            });
        }
        let attribute = Arc::new(attribute);
        self.by_code
            .insert(attribute.code().to_owned(), Arc::clone(&attribute));
        self.ordered.push(attribute);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<&Arc<Attribute>, SchemaError> {
        self.by_code.get(code).ok_or_else(|| SchemaError::MissingEntity {
            kind: "attribute",
            code: code.to_owned(),
        })
    }

    pub fn all(&self) -> &[Arc<Attribute>] {
        &self.ordered
    }
}

/// Maps family codes to family definitions and tracks the root subset.
#[derive(Debug, Default)]
pub struct FamilyRegistry {
    by_code: HashMap<String, Arc<Family>>,
    ordered: Vec<Arc<Family>>,
}

impl FamilyRegistry {
    fn add(&mut self, family: Family) -> Result<(), SchemaError> {
        if self.by_code.contains_key(family.code()) {
            return Err(SchemaError::DuplicateCode {
                kind: "family",
                code: family.code().to_owned(),
            });
        }
        let family = Arc::new(family);
        self.by_code
            .insert(family.code().to_owned(), Arc::clone(&family));
        self.ordered.push(family);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<&Arc<Family>, SchemaError> {
        self.by_code.get(code).ok_or_else(|| SchemaError::MissingEntity {
            kind: "family",
            code: code.to_owned(),
        })
    }

    /// All registered families in insertion order.
    pub fn families(&self) -> &[Arc<Family>] {
        &self.ordered
    }

    /// The families with no parent, in insertion order.
    pub fn root_families(&self) -> Vec<&Arc<Family>> {
        self.ordered.iter().filter(|family| family.is_root()).collect()
    }
}

/// The frozen aggregate of all three registries.
///
/// Built once at startup and shared as `Arc<Schema>`; reads need no
/// synchronization because nothing mutates after the build.
#[derive(Debug)]
pub struct Schema {
    attribute_types: AttributeTypeRegistry,
    attributes: AttributeRegistry,
    families: FamilyRegistry,
}

impl Schema {
    /// Builds a schema from declarative configuration records.
    ///
    /// Built-in attribute types are registered first, then configured
    /// types, attributes and families in declaration order. A family's
    /// parent must be declared before the family itself, which also
    /// rules out parent cycles. Any empty code, duplicate code or
    /// dangling reference aborts the build.
    pub fn from_config(config: SchemaConfig) -> Result<Self, SchemaError> {
        let mut attribute_types = AttributeTypeRegistry::default();
        for builtin in AttributeType::builtins() {
            attribute_types.add(builtin)?;
        }
        for def in config.attribute_types {
            attribute_types.add(AttributeType::new(def.code, def.storage)?)?;
        }

        let mut attributes = AttributeRegistry::default();
        for def in config.attributes {
            let attribute_type = Arc::clone(attribute_types.get(&def.type_code)?);
            let attribute = Attribute::new(def.code, attribute_type)?
                .with_flags(def.multiple, def.required, def.searchable);
            attributes.add(attribute)?;
        }

        let mut families = FamilyRegistry::default();
        for def in config.families {
            let mut resolved: Vec<Arc<Attribute>> = Vec::new();
            if let Some(parent_code) = &def.parent {
                let parent = families.get(parent_code).map_err(|_| {
                    SchemaError::UnknownParent {
                        family: def.code.clone(),
                        parent: parent_code.clone(),
                    }
                })?;
                resolved.extend(parent.attributes().iter().cloned());
            }
            for attribute_code in &def.attributes {
                resolved.push(Arc::clone(attributes.get(attribute_code)?));
            }
            families.add(Family::new(def.code, def.parent, resolved)?)?;
        }

        debug!(
            attribute_types = attribute_types.all().len(),
            attributes = attributes.all().len(),
            families = families.families().len(),
            "Compiled schema registries"
        );

        Ok(Schema {
            attribute_types,
            attributes,
            families,
        })
    }

    pub fn attribute_types(&self) -> &AttributeTypeRegistry {
        &self.attribute_types
    }

    pub fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    pub fn families(&self) -> &FamilyRegistry {
        &self.families
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeDef, AttributeTypeDef, FamilyDef};
    use crate::types::ValueKind;

    fn attribute_def(code: &str, type_code: &str) -> AttributeDef {
        AttributeDef {
            code: code.to_owned(),
            type_code: type_code.to_owned(),
            multiple: false,
            required: false,
            searchable: false,
        }
    }

    fn base_config() -> SchemaConfig {
        SchemaConfig {
            attribute_types: vec![AttributeTypeDef {
                code: "html".to_owned(),
                storage: ValueKind::String,
            }],
            attributes: vec![
                attribute_def("title", "string"),
                attribute_def("description", "html"),
                attribute_def("stock", "integer"),
            ],
            families: vec![
                FamilyDef {
                    code: "product".to_owned(),
                    parent: None,
                    attributes: vec!["title".to_owned(), "description".to_owned()],
                },
                FamilyDef {
                    code: "book".to_owned(),
                    parent: Some("product".to_owned()),
                    attributes: vec!["stock".to_owned()],
                },
            ],
        }
    }

    #[test]
    fn lookup_returns_the_registered_object() {
        let schema = Schema::from_config(base_config()).unwrap();
        let family = schema.families().get("product").unwrap();
        assert_eq!(family.code(), "product");
        let attribute = schema.attributes().get("description").unwrap();
        assert_eq!(attribute.attribute_type().code(), "html");
        assert_eq!(attribute.attribute_type().storage_column(), "string_value");
    }

    #[test]
    fn unknown_codes_fail_with_missing_entity() {
        let schema = Schema::from_config(base_config()).unwrap();
        assert!(matches!(
            schema.families().get("cd"),
            Err(SchemaError::MissingEntity { kind: "family", .. })
        ));
        assert!(matches!(
            schema.attributes().get("price"),
            Err(SchemaError::MissingEntity { kind: "attribute", .. })
        ));
        assert!(matches!(
            schema.attribute_types().get("point"),
            Err(SchemaError::MissingEntity { kind: "attribute type", .. })
        ));
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let mut config = base_config();
        config.attributes.push(attribute_def("title", "string"));
        assert!(matches!(
            Schema::from_config(config),
            Err(SchemaError::DuplicateCode { kind: "attribute", code }) if code == "title"
        ));
    }

    #[test]
    fn duplicate_builtin_type_code_is_rejected() {
        let mut config = base_config();
        config.attribute_types.push(AttributeTypeDef {
            code: "string".to_owned(),
            storage: ValueKind::String,
        });
        assert!(matches!(
            Schema::from_config(config),
            Err(SchemaError::DuplicateCode { kind: "attribute type", .. })
        ));
    }

    #[test]
    fn child_family_inherits_parent_attributes_in_order() {
        let schema = Schema::from_config(base_config()).unwrap();
        let book = schema.families().get("book").unwrap();
        let codes: Vec<&str> = book.attributes().iter().map(|a| a.code()).collect();
        assert_eq!(codes, vec!["title", "description", "stock"]);
        assert!(!book.is_root());
    }

    #[test]
    fn root_families_exclude_children() {
        let schema = Schema::from_config(base_config()).unwrap();
        assert_eq!(schema.families().families().len(), 2);
        let roots: Vec<&str> = schema
            .families()
            .root_families()
            .iter()
            .map(|f| f.code())
            .collect();
        assert_eq!(roots, vec!["product"]);
    }

    #[test]
    fn parent_must_be_declared_before_child() {
        let mut config = base_config();
        config.families.swap(0, 1);
        assert!(matches!(
            Schema::from_config(config),
            Err(SchemaError::UnknownParent { family, parent })
                if family == "book" && parent == "product"
        ));
    }

    #[test]
    fn unknown_attribute_type_reference_aborts_build() {
        let mut config = base_config();
        config.attributes.push(attribute_def("published_at", "date"));
        assert!(matches!(
            Schema::from_config(config),
            Err(SchemaError::MissingEntity { kind: "attribute type", code }) if code == "date"
        ));
    }
}
