//! Logical model types: storage kinds, attribute types, attributes,
//! families and typed attribute values.
mod attribute;
mod attribute_type;
mod family;
mod value;

pub use attribute::Attribute;
pub use attribute_type::{AttributeType, ValueKind, VALID_KIND_CODES};
pub use family::{Family, HasFamilyCode};
pub use value::AttributeValue;
