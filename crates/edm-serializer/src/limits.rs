//! Range limits and wire constants for EDM values and JSON payloads.
//!
//! These values are part of the canonical text format and must not change
//! without breaking existing payload consumers.

/// Smallest representable year (exclusive bound is -10000).
pub const MIN_YEAR: i16 = -9999;

/// Largest representable year (exclusive bound is 10000).
pub const MAX_YEAR: i16 = 9999;

/// Largest fractional second value (12 decimal digits).
pub const MAX_FRACTIONAL_SECOND: u64 = 999_999_999_999;

/// Number of digits a fractional second is rendered with.
pub const FRACTIONAL_SECOND_DIGITS: usize = 12;

/// Time-zone hour bound, applied as `-MAX_TZ_HOUR..=MAX_TZ_HOUR`.
pub const MAX_TZ_HOUR: i8 = 23;

/// Largest time-zone minute.
pub const MAX_TZ_MINUTE: u8 = 59;

/// Digits after the decimal point for `Edm.Single` (FLT_DIG).
pub const SINGLE_DIGITS: usize = 6;

/// Digits after the decimal point for `Edm.Double` (DBL_DIG).
pub const DOUBLE_DIGITS: usize = 15;

/// Length of a quoted GUID: 32 hex digits, 4 hyphens, 2 quotes.
pub const GUID_TEXT_LEN: usize = 38;

/// Quoted sentinel for a NaN float.
pub const NAN_TEXT: &str = "\"NaN\"";

/// Quoted sentinel for positive infinity.
pub const INF_TEXT: &str = "\"INF\"";

/// Quoted sentinel for negative infinity.
pub const NEG_INF_TEXT: &str = "\"-INF\"";

/// Separator between tree path segments.
pub const PATH_DELIMITER: char = '/';

/// Separator between sibling members of a JSON object.
pub const MEMBER_SEPARATOR: &str = ", ";

/// Indentation used for pretty-printed reported properties.
pub const REPORTED_PROPERTIES_INDENT: &[u8] = b"    ";
