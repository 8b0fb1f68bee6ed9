//! # Facet Schema
//! This crate provides the logical EAV model: attribute types, attributes,
//! families and their registries, plus the family code codec and the
//! datetime parse utility. Registries are populated once from declarative
//! configuration records and are read-only afterwards.
pub mod codec;
pub mod config;
pub mod datetime;
pub mod errors;
pub mod registry;
pub mod types;

pub use codec::FamilyCodec;
pub use config::{AttributeDef, AttributeTypeDef, FamilyDef, SchemaConfig};
pub use datetime::{parse_datetime, DateInput};
pub use errors::{DateParseError, SchemaError};
pub use registry::{AttributeRegistry, AttributeTypeRegistry, FamilyRegistry, Schema};
pub use types::{Attribute, AttributeType, AttributeValue, Family, HasFamilyCode, ValueKind};
