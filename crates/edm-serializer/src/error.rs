//! Error types for EDM values, trees, JSON encoding and marshalling.
//!
//! Every layer has its own error enum so callers can tell which layer a
//! failure came from. [`ErrorKind`] folds them back into the coarse result
//! classes shared across the serializer.

use std::fmt;

use thiserror::Error;

use crate::model::EdmType;

/// Coarse result classes shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, or data failing an EDM grammar/range check.
    InvalidArg,
    /// Unexpected internal condition, including a rejected sink write.
    Error,
    /// EDM kind recognized but not supported.
    NotImplemented,
}

/// Errors from constructing, encoding or decoding a [`TypedValue`](crate::TypedValue).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u8, minute: u8, second: u8 },

    #[error("fractional second {value} exceeds {max}")]
    FractionalSecondOutOfRange { value: u64, max: u64 },

    #[error("time zone offset {hour}:{minute:02} out of range")]
    TimeZoneOutOfRange { hour: i8, minute: u8 },

    #[error("invalid decimal literal {text:?}")]
    InvalidDecimal { text: String },

    #[error("binary buffer is present but empty")]
    EmptyBinaryBuffer,

    #[error("non-ASCII byte 0x{byte:02X} at offset {offset}")]
    NonAsciiString { byte: u8, offset: usize },

    #[error("complex type has no fields")]
    EmptyComplexType,

    #[error("complex type field name is empty")]
    EmptyFieldName,

    #[error("duplicate complex type field {name:?}")]
    DuplicateFieldName { name: String },

    #[error("{names} field names given for {values} values")]
    MemberCountMismatch { names: usize, values: usize },

    #[error("malformed {edm_type:?} text: {reason}")]
    Malformed { edm_type: EdmType, reason: &'static str },

    #[error("{edm_type:?} value out of range")]
    OutOfRange { edm_type: EdmType },

    #[error("value of kind {edm_type:?} is not a complex type")]
    NotComplexType { edm_type: EdmType },

    #[error("field index {index} out of bounds (field count {count})")]
    FieldIndexOutOfBounds { index: usize, count: usize },

    #[error("{edm_type:?} is not implemented")]
    NotImplemented { edm_type: EdmType },

    #[error("complex type tree: {0}")]
    Tree(#[from] TreeError),

    #[error("complex type encoding: {0}")]
    Json(#[from] EncodeError),

    #[error("output sink rejected write")]
    Write,
}

impl ValueError {
    /// Returns the result class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValueError::NotImplemented { .. } => ErrorKind::NotImplemented,
            ValueError::Tree(_) | ValueError::Json(_) | ValueError::Write => ErrorKind::Error,
            _ => ErrorKind::InvalidArg,
        }
    }
}

impl From<fmt::Error> for ValueError {
    fn from(_: fmt::Error) -> Self {
        ValueError::Write
    }
}

/// Errors from [`MultiTree`](crate::MultiTree) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("child name is empty")]
    EmptyChildName,

    #[error("node {name:?} already has a value")]
    AlreadyHasAValue { name: String },

    #[error("child {name:?} not found")]
    ChildNotFound { name: String },

    #[error("node has no value")]
    EmptyValue,

    #[error("child index {index} out of bounds (child count {count})")]
    IndexOutOfBounds { index: usize, count: usize },
}

impl TreeError {
    /// Returns the result class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::EmptyValue => ErrorKind::Error,
            _ => ErrorKind::InvalidArg,
        }
    }
}

/// Errors from the JSON tree encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("tree access failed: {0}")]
    MultiTree(#[from] TreeError),

    #[error("stringifier failed for {name:?}: {reason}")]
    ToStringFunction { name: String, reason: String },

    #[error("output sink rejected write")]
    Write,
}

impl EncodeError {
    /// Returns the result class of this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Error
    }
}

impl From<fmt::Error> for EncodeError {
    fn from(_: fmt::Error) -> Self {
        EncodeError::Write
    }
}

/// Errors from the data marshaller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("no values to marshal")]
    InvalidArg,

    #[error("value {index} has an empty property path")]
    InvalidModelProperty { index: usize },

    #[error("building payload tree: {0}")]
    MultiTree(#[from] TreeError),

    #[error("encoding payload: {0}")]
    JsonEncoder(#[from] EncodeError),

    #[error("{reason}")]
    Error { reason: String },
}

impl MarshalError {
    /// Returns the result class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarshalError::InvalidArg | MarshalError::InvalidModelProperty { .. } => {
                ErrorKind::InvalidArg
            }
            _ => ErrorKind::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_error_kinds() {
        assert_eq!(ValueError::EmptyBinaryBuffer.kind(), ErrorKind::InvalidArg);
        assert_eq!(
            ValueError::NotImplemented { edm_type: EdmType::Duration }.kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(ValueError::Write.kind(), ErrorKind::Error);
        assert_eq!(ValueError::from(TreeError::EmptyValue).kind(), ErrorKind::Error);
    }

    #[test]
    fn test_marshal_error_kinds() {
        assert_eq!(MarshalError::InvalidArg.kind(), ErrorKind::InvalidArg);
        assert_eq!(
            MarshalError::InvalidModelProperty { index: 2 }.kind(),
            ErrorKind::InvalidArg
        );
        assert_eq!(MarshalError::from(EncodeError::Write).kind(), ErrorKind::Error);
    }

    #[test]
    fn test_display_carries_context() {
        let err = ValueError::InvalidDate { year: 2013, month: 2, day: 31 };
        assert_eq!(err.to_string(), "invalid date 2013-02-31");

        let err = ValueError::NonAsciiString { byte: 0xC3, offset: 4 };
        assert_eq!(err.to_string(), "non-ASCII byte 0xC3 at offset 4");
    }
}
