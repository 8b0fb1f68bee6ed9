use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::SchemaError;
use crate::types::attribute::Attribute;

/// Capability of anything carrying a family code, used by the family
/// code codec. Implemented by [`Family`] itself and by persisted records
/// that store their family by code.
pub trait HasFamilyCode {
    fn family_code(&self) -> &str;
}

/// An entity type definition: a unique code and the ordered set of
/// attributes legal for records of this family.
///
/// A family may name a parent family, in which case it inherits the
/// parent's attributes ahead of its own (duplicate codes collapse onto
/// the first occurrence). Families with no parent are root families.
/// Immutable after schema build.
#[derive(Clone, Debug)]
pub struct Family {
    code: String,
    parent: Option<String>,
    attributes: Vec<Arc<Attribute>>,
    index: HashMap<String, usize>,
}

impl Family {
    pub fn new(
        code: impl Into<String>,
        parent: Option<String>,
        attributes: Vec<Arc<Attribute>>,
    ) -> Result<Self, SchemaError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SchemaError::EmptyCode { kind: "family" });
        }

        let mut deduped: Vec<Arc<Attribute>> = Vec::with_capacity(attributes.len());
        let mut index = HashMap::with_capacity(attributes.len());
        for attribute in attributes {
            if index.contains_key(attribute.code()) {
                continue;
            }
            index.insert(attribute.code().to_owned(), deduped.len());
            deduped.push(attribute);
        }

        Ok(Family {
            code,
            parent,
            attributes: deduped,
            index,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn parent_code(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// A family with no parent is a root family.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The attributes legal for this family, parent's first, in
    /// declaration order.
    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }

    pub fn has_attribute(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Looks up one of this family's attributes by code.
    pub fn attribute(&self, code: &str) -> Result<&Arc<Attribute>, SchemaError> {
        self.index
            .get(code)
            .map(|position| &self.attributes[*position])
            .ok_or_else(|| SchemaError::MissingEntity {
                kind: "attribute",
                code: code.to_owned(),
            })
    }
}

impl HasFamilyCode for Family {
    fn family_code(&self) -> &str {
        &self.code
    }
}

impl HasFamilyCode for Arc<Family> {
    fn family_code(&self) -> &str {
        &self.code
    }
}
