//! Canonical text codec for EDM values.

pub mod primitives;
pub mod value;

pub use value::{decode_value, encode_value};
