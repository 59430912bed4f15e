//! Data model types for EDM values.
//!
//! This module contains the value types handled by the serializer:
//! - GUIDs (16 raw bytes)
//! - Typed values and their composite parts (dates, decimals, complex types)
//! - The catalogue of EDM kinds

pub mod guid;
pub mod value;

pub use guid::{format_guid, new_guid, parse_guid, Guid, NIL_GUID};
pub use value::{ComplexType, Date, DateTimeOffset, Decimal, EdmType, TypedValue};
