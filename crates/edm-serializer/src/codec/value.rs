//! Canonical text encoding/decoding for EDM values.
//!
//! Encoding appends the canonical form of a [`TypedValue`] to any
//! [`fmt::Write`] sink. Decoding is strict: the whole input must match the
//! grammar of the requested kind.

use std::fmt;

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use tracing::warn;

use crate::codec::primitives::{unquote, Scanner};
use crate::error::ValueError;
use crate::json::encode_tree;
use crate::limits::{
    DOUBLE_DIGITS, FRACTIONAL_SECOND_DIGITS, GUID_TEXT_LEN, INF_TEXT, NAN_TEXT, NEG_INF_TEXT,
    SINGLE_DIGITS,
};
use crate::model::{
    format_guid, parse_guid, ComplexType, Date, DateTimeOffset, Decimal, EdmType, TypedValue,
};
use crate::tree::MultiTree;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

// =============================================================================
// ENCODING
// =============================================================================

/// Appends the canonical text of `value` to `dest`.
///
/// Nothing is written when the value is rejected (non-ASCII strings).
pub fn encode_value<W: fmt::Write + ?Sized>(
    dest: &mut W,
    value: &TypedValue,
) -> Result<(), ValueError> {
    match value {
        TypedValue::Null => dest.write_str("null")?,
        TypedValue::Boolean(v) => dest.write_str(if *v { "true" } else { "false" })?,
        TypedValue::Byte(v) => write!(dest, "{v}")?,
        TypedValue::SByte(v) => write!(dest, "{v}")?,
        TypedValue::Int16(v) => write!(dest, "{v}")?,
        TypedValue::Int32(v) => write!(dest, "{v}")?,
        TypedValue::Int64(v) => write!(dest, "{v}")?,
        TypedValue::Single(v) => encode_float(dest, f64::from(*v), SINGLE_DIGITS)?,
        TypedValue::Double(v) => encode_float(dest, *v, DOUBLE_DIGITS)?,
        TypedValue::Decimal(v) => dest.write_str(v.as_str())?,
        TypedValue::Date(date) => {
            dest.write_char('"')?;
            write_date(dest, date)?;
            dest.write_char('"')?;
        }
        TypedValue::DateTimeOffset(dto) => encode_date_time_offset(dest, dto)?,
        TypedValue::Guid(guid) => write!(dest, "\"{}\"", format_guid(guid))?,
        TypedValue::Binary(bytes) => {
            dest.write_char('"')?;
            if !bytes.is_empty() {
                dest.write_str(&URL_SAFE.encode(bytes))?;
            }
            dest.write_char('"')?;
        }
        TypedValue::String(text) => encode_string(dest, text)?,
        TypedValue::StringNoQuotes(text) => dest.write_str(text)?,
        TypedValue::ComplexType(complex) => encode_complex(dest, complex)?,
    }
    Ok(())
}

fn encode_float<W: fmt::Write + ?Sized>(dest: &mut W, value: f64, digits: usize) -> fmt::Result {
    if value.is_nan() {
        dest.write_str(NAN_TEXT)
    } else if value == f64::INFINITY {
        dest.write_str(INF_TEXT)
    } else if value == f64::NEG_INFINITY {
        dest.write_str(NEG_INF_TEXT)
    } else {
        write!(dest, "{value:.digits$}")
    }
}

fn write_date<W: fmt::Write + ?Sized>(dest: &mut W, date: &Date) -> fmt::Result {
    let sign = if date.year() < 0 { "-" } else { "" };
    write!(
        dest,
        "{sign}{:04}-{:02}-{:02}",
        date.year().unsigned_abs(),
        date.month(),
        date.day()
    )
}

fn encode_date_time_offset<W: fmt::Write + ?Sized>(
    dest: &mut W,
    dto: &DateTimeOffset,
) -> fmt::Result {
    dest.write_char('"')?;
    write_date(dest, &dto.date())?;
    write!(dest, "T{:02}:{:02}:{:02}", dto.hour(), dto.minute(), dto.second())?;
    if let Some(fraction) = dto.fractional_second() {
        write!(dest, ".{fraction:0width$}", width = FRACTIONAL_SECOND_DIGITS)?;
    }
    match dto.time_zone() {
        None => dest.write_char('Z')?,
        Some((hour, minute)) => {
            let sign = if hour < 0 { '-' } else { '+' };
            write!(dest, "{sign}{:02}:{minute:02}", hour.unsigned_abs())?;
        }
    }
    dest.write_char('"')
}

fn encode_string<W: fmt::Write + ?Sized>(dest: &mut W, text: &str) -> Result<(), ValueError> {
    if let Some((offset, &byte)) = text.as_bytes().iter().enumerate().find(|(_, b)| !b.is_ascii()) {
        warn!(offset, byte, "rejected non-ASCII Edm.String");
        return Err(ValueError::NonAsciiString { byte, offset });
    }

    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for byte in text.bytes() {
        match byte {
            b'"' | b'\\' | b'/' => {
                escaped.push('\\');
                escaped.push(char::from(byte));
            }
            0x00..=0x1F => {
                escaped.push_str("\\u00");
                escaped.push(char::from(HEX_UPPER[usize::from(byte >> 4)]));
                escaped.push(char::from(HEX_UPPER[usize::from(byte & 0x0F)]));
            }
            _ => escaped.push(char::from(byte)),
        }
    }
    escaped.push('"');
    dest.write_str(&escaped)?;
    Ok(())
}

/// Renders the fields as a JSON object through a temporary tree.
fn encode_complex<W: fmt::Write + ?Sized>(
    dest: &mut W,
    complex: &ComplexType,
) -> Result<(), ValueError> {
    let mut tree = MultiTree::new();
    for (name, value) in complex.fields() {
        tree.add_leaf(name, value)?;
    }

    let mut rendered = String::new();
    encode_tree(&tree, &mut rendered, |out: &mut String, value: &&TypedValue| {
        encode_value(out, value)
    })?;
    dest.write_str(&rendered)?;
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Parses the canonical text of a value of kind `edm_type`.
pub fn decode_value(text: &str, edm_type: EdmType) -> Result<TypedValue, ValueError> {
    let result = match edm_type {
        EdmType::Null => decode_keyword(text, edm_type, "null", TypedValue::Null),
        EdmType::Boolean => match text {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            _ => Err(ValueError::Malformed { edm_type, reason: "expected true or false" }),
        },
        EdmType::Byte => decode_integer(text, edm_type).map(TypedValue::Byte),
        EdmType::SByte => decode_integer(text, edm_type).map(TypedValue::SByte),
        EdmType::Int16 => decode_integer(text, edm_type).map(TypedValue::Int16),
        EdmType::Int32 => decode_integer(text, edm_type).map(TypedValue::Int32),
        EdmType::Int64 => decode_integer(text, edm_type).map(TypedValue::Int64),
        EdmType::Single => decode_single(text),
        EdmType::Double => decode_double(text),
        EdmType::Decimal => decode_decimal(text),
        EdmType::Date => decode_date(text),
        EdmType::DateTimeOffset => decode_date_time_offset(text),
        EdmType::Guid => decode_guid(text),
        EdmType::Binary => decode_binary(text),
        EdmType::String => decode_string(text),
        EdmType::StringNoQuotes => Ok(TypedValue::StringNoQuotes(text.to_string())),
        _ => Err(ValueError::NotImplemented { edm_type }),
    };
    result.inspect_err(|err| warn!(%edm_type, error = %err, "rejected canonical text"))
}

fn decode_keyword(
    text: &str,
    edm_type: EdmType,
    keyword: &str,
    value: TypedValue,
) -> Result<TypedValue, ValueError> {
    if text == keyword {
        Ok(value)
    } else {
        Err(ValueError::Malformed { edm_type, reason: "unexpected keyword" })
    }
}

/// Checks `[sign] 1*DIGIT` and narrows to the target width.
fn decode_integer<T: TryFrom<i64>>(text: &str, edm_type: EdmType) -> Result<T, ValueError> {
    let mut scanner = Scanner::new(text, edm_type);
    if !scanner.eat(b'-') {
        scanner.eat(b'+');
    }
    if scanner.skip_digits() == 0 {
        return Err(scanner.error("expected digits"));
    }
    scanner.finish()?;

    let wide: i64 = text.parse().map_err(|_| ValueError::OutOfRange { edm_type })?;
    T::try_from(wide).map_err(|_| ValueError::OutOfRange { edm_type })
}

enum FloatText<'a> {
    Nan,
    Infinity,
    NegInfinity,
    Finite(&'a str),
}

/// Recognizes the sentinels or checks
/// `[sign] 1*DIGIT ["." 1*DIGIT] [("e" / "E") [sign] 1*DIGIT]`.
fn scan_float(text: &str, edm_type: EdmType) -> Result<FloatText<'_>, ValueError> {
    match text {
        NAN_TEXT => return Ok(FloatText::Nan),
        INF_TEXT => return Ok(FloatText::Infinity),
        NEG_INF_TEXT => return Ok(FloatText::NegInfinity),
        _ => {}
    }

    let mut scanner = Scanner::new(text, edm_type);
    if !scanner.eat(b'-') {
        scanner.eat(b'+');
    }
    if scanner.skip_digits() == 0 {
        return Err(scanner.error("expected digits"));
    }
    if scanner.eat(b'.') && scanner.skip_digits() == 0 {
        return Err(scanner.error("expected fraction digits"));
    }
    if scanner.eat(b'e') || scanner.eat(b'E') {
        if !scanner.eat(b'-') {
            scanner.eat(b'+');
        }
        if scanner.skip_digits() == 0 {
            return Err(scanner.error("expected exponent digits"));
        }
    }
    scanner.finish()?;
    Ok(FloatText::Finite(text))
}

fn decode_single(text: &str) -> Result<TypedValue, ValueError> {
    let edm_type = EdmType::Single;
    let value = match scan_float(text, edm_type)? {
        FloatText::Nan => f32::NAN,
        FloatText::Infinity => f32::INFINITY,
        FloatText::NegInfinity => f32::NEG_INFINITY,
        FloatText::Finite(digits) => {
            let value: f32 = digits.parse().map_err(|_| ValueError::OutOfRange { edm_type })?;
            if value.is_infinite() {
                return Err(ValueError::OutOfRange { edm_type });
            }
            value
        }
    };
    Ok(TypedValue::Single(value))
}

fn decode_double(text: &str) -> Result<TypedValue, ValueError> {
    let edm_type = EdmType::Double;
    let value = match scan_float(text, edm_type)? {
        FloatText::Nan => f64::NAN,
        FloatText::Infinity => f64::INFINITY,
        FloatText::NegInfinity => f64::NEG_INFINITY,
        FloatText::Finite(digits) => {
            let value: f64 = digits.parse().map_err(|_| ValueError::OutOfRange { edm_type })?;
            if value.is_infinite() {
                return Err(ValueError::OutOfRange { edm_type });
            }
            value
        }
    };
    Ok(TypedValue::Double(value))
}

/// Accepts the bare form (as encoded) and the quoted form.
fn decode_decimal(text: &str) -> Result<TypedValue, ValueError> {
    let digits = unquote(text).unwrap_or(text);
    Decimal::parse(digits).map(TypedValue::Decimal)
}

/// Reads `[-] 4DIGIT "-" 2DIGIT "-" 2DIGIT` and validates the calendar date.
fn scan_date(scanner: &mut Scanner<'_>) -> Result<Date, ValueError> {
    let negative = scanner.eat(b'-');
    let year = scanner.read_fixed_digits(4, "year must have four digits")? as i16;
    scanner.expect(b'-', "expected '-' after year")?;
    let month = scanner.read_fixed_digits(2, "month must have two digits")? as u8;
    scanner.expect(b'-', "expected '-' after month")?;
    let day = scanner.read_fixed_digits(2, "day must have two digits")? as u8;

    Date::new(if negative { -year } else { year }, month, day)
}

fn decode_date(text: &str) -> Result<TypedValue, ValueError> {
    let mut scanner = Scanner::new(text, EdmType::Date);
    scanner.expect(b'"', "missing opening quote")?;
    let date = scan_date(&mut scanner)?;
    scanner.expect(b'"', "missing closing quote")?;
    scanner.finish()?;
    Ok(TypedValue::Date(date))
}

fn decode_date_time_offset(text: &str) -> Result<TypedValue, ValueError> {
    let mut scanner = Scanner::new(text, EdmType::DateTimeOffset);
    scanner.expect(b'"', "missing opening quote")?;
    let date = scan_date(&mut scanner)?;
    scanner.expect(b'T', "expected 'T' between date and time")?;
    let hour = scanner.read_fixed_digits(2, "hour must have two digits")? as u8;
    scanner.expect(b':', "expected ':' after hour")?;
    let minute = scanner.read_fixed_digits(2, "minute must have two digits")? as u8;

    let mut second = 0;
    let mut fraction = None;
    if scanner.eat(b':') {
        second = scanner.read_fixed_digits(2, "second must have two digits")? as u8;
        if scanner.eat(b'.') {
            // The digits are an integer count, not a decimal fraction: ".5" is 5.
            let digits = scanner
                .read_digit_run(FRACTIONAL_SECOND_DIGITS, "fraction must have 1 to 12 digits")?;
            let value: u64 = digits.parse().map_err(|_| scanner.error("invalid fraction"))?;
            fraction = Some(value);
        }
    }

    let time_zone = match scanner.read_byte("missing time zone")? {
        b'Z' => None,
        sign @ (b'+' | b'-') => {
            let tz_hour = scanner.read_fixed_digits(2, "zone hour must have two digits")? as i8;
            scanner.expect(b':', "expected ':' in zone offset")?;
            let tz_minute = scanner.read_fixed_digits(2, "zone minute must have two digits")? as u8;
            Some((if sign == b'-' { -tz_hour } else { tz_hour }, tz_minute))
        }
        _ => return Err(scanner.error("zone must be 'Z' or a signed offset")),
    };
    scanner.expect(b'"', "missing closing quote")?;
    scanner.finish()?;

    let mut dto = DateTimeOffset::new(date, hour, minute, second)?;
    if let Some(fraction) = fraction {
        dto = dto.with_fractional_second(fraction)?;
    }
    if let Some((tz_hour, tz_minute)) = time_zone {
        dto = dto.with_time_zone(tz_hour, tz_minute)?;
    }
    Ok(TypedValue::DateTimeOffset(dto))
}

fn decode_guid(text: &str) -> Result<TypedValue, ValueError> {
    let malformed = ValueError::Malformed {
        edm_type: EdmType::Guid,
        reason: "expected quoted uppercase 8-4-4-4-12 hex",
    };
    if text.len() != GUID_TEXT_LEN {
        return Err(malformed);
    }
    unquote(text).and_then(parse_guid).map(TypedValue::Guid).ok_or(malformed)
}

fn decode_binary(text: &str) -> Result<TypedValue, ValueError> {
    let encoded = unquote(text).ok_or(ValueError::Malformed {
        edm_type: EdmType::Binary,
        reason: "missing quotes",
    })?;
    if encoded.is_empty() {
        return Ok(TypedValue::Binary(Vec::new()));
    }

    // Padding is optional, but when present it must be exactly "==" after a
    // b8 tail or "=" after a b16 tail.
    let unpadded = encoded.trim_end_matches('=');
    let padding = encoded.len() - unpadded.len();
    let expected_padding = match unpadded.len() % 4 {
        2 => 2,
        3 => 1,
        _ => 0,
    };
    if padding != 0 && padding != expected_padding {
        return Err(ValueError::Malformed { edm_type: EdmType::Binary, reason: "invalid padding" });
    }
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .map(TypedValue::Binary)
        .map_err(|_| ValueError::Malformed { edm_type: EdmType::Binary, reason: "invalid base64" })
}

fn decode_string(text: &str) -> Result<TypedValue, ValueError> {
    let inner = unquote(text).ok_or(ValueError::Malformed {
        edm_type: EdmType::String,
        reason: "missing quotes",
    })?;

    let mut scanner = Scanner::new(inner, EdmType::String);
    let mut out = String::with_capacity(inner.len());
    while !scanner.is_at_end() {
        match scanner.read_byte("unexpected end")? {
            b'\\' => {
                let c = match scanner.read_byte("dangling escape")? {
                    b'"' => '"',
                    b'\\' => '\\',
                    b'/' => '/',
                    b'b' => '\u{8}',
                    b'f' => '\u{c}',
                    b'n' => '\n',
                    b'r' => '\r',
                    b't' => '\t',
                    b'u' => read_unicode_escape(&mut scanner)?,
                    _ => return Err(scanner.error("unknown escape")),
                };
                out.push(c);
            }
            b'"' => return Err(scanner.error("unescaped quote")),
            byte if byte < 0x20 || !byte.is_ascii() => {
                return Err(scanner.error("raw control or non-ASCII character"));
            }
            byte => out.push(char::from(byte)),
        }
    }
    Ok(TypedValue::String(out))
}

/// Reads the four hex digits of a `\u` escape; only ASCII code points.
fn read_unicode_escape(scanner: &mut Scanner<'_>) -> Result<char, ValueError> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = char::from(scanner.read_byte("short unicode escape")?)
            .to_digit(16)
            .ok_or_else(|| scanner.error("invalid unicode escape"))?;
        code = (code << 4) | digit;
    }
    u8::try_from(code)
        .ok()
        .filter(u8::is_ascii)
        .map(char::from)
        .ok_or_else(|| scanner.error("unicode escape outside ASCII"))
}

impl TypedValue {
    /// Renders the canonical text of this value into a new string.
    pub fn to_canonical_string(&self) -> Result<String, ValueError> {
        let mut out = String::new();
        encode_value(&mut out, self)?;
        Ok(out)
    }

    /// Parses canonical text as a value of kind `edm_type`.
    pub fn from_canonical_str(text: &str, edm_type: EdmType) -> Result<TypedValue, ValueError> {
        decode_value(text, edm_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn encode(value: &TypedValue) -> String {
        value.to_canonical_string().unwrap()
    }

    fn dto(parts: (i16, u8, u8, u8, u8, u8)) -> DateTimeOffset {
        let (year, month, day, hour, minute, second) = parts;
        DateTimeOffset::new(Date::new(year, month, day).unwrap(), hour, minute, second).unwrap()
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&TypedValue::Null), "null");
        assert_eq!(encode(&TypedValue::Boolean(true)), "true");
        assert_eq!(encode(&TypedValue::Boolean(false)), "false");
        assert_eq!(encode(&TypedValue::Byte(255)), "255");
        assert_eq!(encode(&TypedValue::SByte(-128)), "-128");
        assert_eq!(encode(&TypedValue::Int32(-42)), "-42");
        assert_eq!(encode(&TypedValue::Int64(i64::MIN)), "-9223372036854775808");
        assert_eq!(encode(&TypedValue::decimal("-0012.50").unwrap()), "-0012.50");
    }

    #[test]
    fn test_encode_floats_fixed_digits() {
        assert_eq!(encode(&TypedValue::Single(1.5)), "1.500000");
        assert_eq!(encode(&TypedValue::Single(0.1)), "0.100000");
        assert_eq!(encode(&TypedValue::Double(3.14)), "3.140000000000000");
        assert_eq!(encode(&TypedValue::Double(-0.1)), "-0.100000000000000");
        assert_eq!(encode(&TypedValue::Double(f64::NAN)), "\"NaN\"");
        assert_eq!(encode(&TypedValue::Double(f64::INFINITY)), "\"INF\"");
        assert_eq!(encode(&TypedValue::Single(f32::NEG_INFINITY)), "\"-INF\"");
    }

    #[test]
    fn test_encode_dates() {
        assert_eq!(encode(&TypedValue::date(2024, 6, 1).unwrap()), "\"2024-06-01\"");
        assert_eq!(encode(&TypedValue::date(5, 1, 1).unwrap()), "\"0005-01-01\"");
        assert_eq!(encode(&TypedValue::date(-44, 3, 15).unwrap()), "\"-0044-03-15\"");
    }

    #[test]
    fn test_encode_date_time_offset() {
        let plain = dto((2024, 6, 1, 12, 30, 45));
        assert_eq!(encode(&plain.into()), "\"2024-06-01T12:30:45Z\"");

        let full = plain.with_fractional_second(5).unwrap().with_time_zone(-5, 30).unwrap();
        assert_eq!(encode(&full.into()), "\"2024-06-01T12:30:45.000000000005-05:30\"");

        let fraction_utc = plain.with_fractional_second(123_456_789_012).unwrap();
        assert_eq!(encode(&fraction_utc.into()), "\"2024-06-01T12:30:45.123456789012Z\"");

        let utc_offset = plain.with_time_zone(0, 0).unwrap();
        assert_eq!(encode(&utc_offset.into()), "\"2024-06-01T12:30:45+00:00\"");
    }

    #[test]
    fn test_encode_guid() {
        let guid = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB,
            0xCD, 0xEF,
        ];
        assert_eq!(encode(&TypedValue::Guid(guid)), "\"01234567-89AB-CDEF-0123-456789ABCDEF\"");
    }

    #[test]
    fn test_encode_binary_boundaries() {
        assert_eq!(encode(&TypedValue::binary(None).unwrap()), "\"\"");
        // 1 byte: two characters, b8 tail, "=="
        assert_eq!(encode(&TypedValue::Binary(vec![0xFF])), "\"_w==\"");
        // 2 bytes: three characters, b16 tail, "="
        assert_eq!(encode(&TypedValue::Binary(vec![0xFF, 0xFF])), "\"__8=\"");
        // 3 bytes: four characters, no padding
        assert_eq!(encode(&TypedValue::Binary(b"abc".to_vec())), "\"YWJj\"");
        assert_eq!(encode(&TypedValue::Binary(vec![0xFB, 0xFF, 0xBF])), "\"-_-_\"");
    }

    #[test]
    fn test_encode_string_escapes() {
        assert_eq!(
            encode(&TypedValue::string("a\"b\\c/d\n")),
            r#""a\"b\\c\/d\u000A""#
        );
        assert_eq!(encode(&TypedValue::string("\u{1f}")), r#""\u001F""#);
        assert_eq!(encode(&TypedValue::string_no_quotes("{\"raw\":1}")), "{\"raw\":1}");
    }

    #[test]
    fn test_encode_string_rejects_non_ascii() {
        let mut out = String::new();
        let result = encode_value(&mut out, &TypedValue::string("h\u{e9}llo"));
        assert!(matches!(result, Err(ValueError::NonAsciiString { byte: 0xC3, offset: 1 })));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArg);
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_complex() {
        let value = TypedValue::complex(vec![
            ("x".into(), TypedValue::Int32(1)),
            ("y".into(), TypedValue::string("two")),
        ])
        .unwrap();
        assert_eq!(encode(&value), r#"{"x":1, "y":"two"}"#);

        let nested = TypedValue::complex(vec![
            ("n".into(), TypedValue::complex(vec![("a".into(), true.into())]).unwrap()),
            ("m".into(), TypedValue::Null),
        ])
        .unwrap();
        assert_eq!(encode(&nested), r#"{"n":{"a":true}, "m":null}"#);
    }

    #[test]
    fn test_encode_complex_propagates_as_error() {
        let value = TypedValue::complex(vec![("s".into(), TypedValue::string("\u{e9}"))]).unwrap();
        let err = value.to_canonical_string().unwrap_err();
        assert!(matches!(err, ValueError::Json(_)));
        assert_eq!(err.kind(), ErrorKind::Error);
    }

    #[test]
    fn test_decode_keywords_and_integers() {
        assert_eq!(decode_value("null", EdmType::Null).unwrap(), TypedValue::Null);
        assert_eq!(decode_value("true", EdmType::Boolean).unwrap(), TypedValue::Boolean(true));
        assert!(decode_value(" true", EdmType::Boolean).is_err());
        assert!(decode_value("truex", EdmType::Boolean).is_err());

        assert_eq!(decode_value("+12", EdmType::Int16).unwrap(), TypedValue::Int16(12));
        assert_eq!(decode_value("-128", EdmType::SByte).unwrap(), TypedValue::SByte(-128));
        assert!(matches!(
            decode_value("256", EdmType::Byte),
            Err(ValueError::OutOfRange { edm_type: EdmType::Byte })
        ));
        assert!(decode_value("-1", EdmType::Byte).is_err());
        assert!(decode_value("9223372036854775808", EdmType::Int64).is_err());
        assert!(matches!(
            decode_value("1.0", EdmType::Int32),
            Err(ValueError::Malformed { .. })
        ));
        assert!(decode_value("", EdmType::Int32).is_err());
        assert!(decode_value("-", EdmType::Int32).is_err());
    }

    #[test]
    fn test_decode_floats() {
        assert_eq!(decode_value("1.500000", EdmType::Single).unwrap(), TypedValue::Single(1.5));
        assert_eq!(
            decode_value("3.140000000000000", EdmType::Double).unwrap(),
            TypedValue::Double(3.14)
        );
        assert_eq!(decode_value("2.5e2", EdmType::Double).unwrap(), TypedValue::Double(250.0));
        assert_eq!(
            decode_value("\"INF\"", EdmType::Double).unwrap(),
            TypedValue::Double(f64::INFINITY)
        );
        assert_eq!(decode_value("\"NaN\"", EdmType::Single).unwrap(), TypedValue::Single(f32::NAN));
        assert!(decode_value("INF", EdmType::Double).is_err());
        assert!(decode_value("1.", EdmType::Double).is_err());
        assert!(decode_value(".5", EdmType::Double).is_err());
        assert!(matches!(
            decode_value("1e400", EdmType::Double),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(decode_value("1e39", EdmType::Single).is_err());
    }

    #[test]
    fn test_decode_decimal_forms() {
        let expected = TypedValue::decimal("12.5").unwrap();
        assert_eq!(decode_value("12.5", EdmType::Decimal).unwrap(), expected);
        assert_eq!(decode_value("\"12.5\"", EdmType::Decimal).unwrap(), expected);
        assert!(decode_value("\"12.5", EdmType::Decimal).is_err());
        assert!(decode_value("12.5 ", EdmType::Decimal).is_err());
    }

    #[test]
    fn test_decode_dates() {
        assert_eq!(
            decode_value("\"2000-02-29\"", EdmType::Date).unwrap(),
            TypedValue::date(2000, 2, 29).unwrap()
        );
        assert_eq!(
            decode_value("\"-0044-03-15\"", EdmType::Date).unwrap(),
            TypedValue::date(-44, 3, 15).unwrap()
        );
        assert!(matches!(
            decode_value("\"1900-02-29\"", EdmType::Date),
            Err(ValueError::InvalidDate { .. })
        ));
        assert!(decode_value("\"2000-2-29\"", EdmType::Date).is_err());
        assert!(decode_value("2000-02-29", EdmType::Date).is_err());
        assert!(decode_value("\"2000-02-29\"x", EdmType::Date).is_err());
    }

    #[test]
    fn test_decode_date_time_offset() {
        let decoded = decode_value("\"2024-06-01T12:30Z\"", EdmType::DateTimeOffset).unwrap();
        assert_eq!(decoded, TypedValue::from(dto((2024, 6, 1, 12, 30, 0))));

        let decoded =
            decode_value("\"2024-06-01T12:30:45.5+01:00\"", EdmType::DateTimeOffset).unwrap();
        let expected = dto((2024, 6, 1, 12, 30, 45))
            .with_fractional_second(5)
            .unwrap()
            .with_time_zone(1, 0)
            .unwrap();
        assert_eq!(decoded, TypedValue::from(expected));

        // Short fractions keep their integer value and re-encode zero-padded.
        let short = decode_value("\"2024-06-01T12:30:45.5Z\"", EdmType::DateTimeOffset).unwrap();
        assert_eq!(encode(&short), "\"2024-06-01T12:30:45.000000000005Z\"");

        for bad in [
            "\"2024-06-01T12:30:45.1234567890123Z\"",
            "\"2024-06-01T12:30:45\"",
            "\"2024-06-01 12:30:45Z\"",
            "\"2024-06-01T12:30.5Z\"",
            "\"2024-06-01T12:30:45+0100\"",
        ] {
            assert!(
                matches!(
                    decode_value(bad, EdmType::DateTimeOffset),
                    Err(ValueError::Malformed { .. })
                ),
                "{bad}"
            );
        }
        assert!(matches!(
            decode_value("\"2024-06-01T24:00:00Z\"", EdmType::DateTimeOffset),
            Err(ValueError::InvalidTime { .. })
        ));
        assert!(matches!(
            decode_value("\"2024-06-01T10:00:00+24:00\"", EdmType::DateTimeOffset),
            Err(ValueError::TimeZoneOutOfRange { .. })
        ));
    }

    #[test]
    fn test_decode_guid() {
        let text = "\"01234567-89AB-CDEF-0123-456789ABCDEF\"";
        let decoded = decode_value(text, EdmType::Guid).unwrap();
        assert_eq!(encode(&decoded), text);
        assert!(decode_value("\"01234567-89ab-cdef-0123-456789abcdef\"", EdmType::Guid).is_err());
        assert!(decode_value("01234567-89AB-CDEF-0123-456789ABCDEF", EdmType::Guid).is_err());
    }

    #[test]
    fn test_decode_binary() {
        assert_eq!(decode_value("\"\"", EdmType::Binary).unwrap(), TypedValue::Binary(Vec::new()));
        let one_byte = TypedValue::Binary(vec![0xFF]);
        assert_eq!(decode_value("\"_w==\"", EdmType::Binary).unwrap(), one_byte);
        assert_eq!(decode_value("\"_w\"", EdmType::Binary).unwrap(), one_byte);
        let two_bytes = TypedValue::Binary(vec![0xFF, 0xFF]);
        assert_eq!(decode_value("\"__8=\"", EdmType::Binary).unwrap(), two_bytes);
        assert_eq!(decode_value("\"__8\"", EdmType::Binary).unwrap(), two_bytes);
        // Padding of the wrong length
        for bad in ["\"_w=\"", "\"_w===\"", "\"__8==\"", "\"YWJj=\"", "\"=\""] {
            assert!(
                matches!(decode_value(bad, EdmType::Binary), Err(ValueError::Malformed { .. })),
                "{bad}"
            );
        }
        // Non-canonical tail bits
        assert!(decode_value("\"_x==\"", EdmType::Binary).is_err());
        // Standard alphabet
        assert!(decode_value("\"+w==\"", EdmType::Binary).is_err());
        assert!(decode_value("_w==", EdmType::Binary).is_err());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(
            decode_value(r#""a\"b\\c\/d\u000A""#, EdmType::String).unwrap(),
            TypedValue::string("a\"b\\c/d\n")
        );
        assert_eq!(decode_value(r#""A""#, EdmType::String).unwrap(), TypedValue::string("A"));
        assert!(decode_value(r#""é""#, EdmType::String).is_err());
        assert!(decode_value("\"tab\there\"", EdmType::String).is_err());
        assert!(decode_value("\"a\"b\"", EdmType::String).is_err());
        assert!(decode_value("\"a\\\"", EdmType::String).is_err());
        assert!(decode_value("abc", EdmType::String).is_err());

        assert_eq!(
            decode_value("{anything}", EdmType::StringNoQuotes).unwrap(),
            TypedValue::string_no_quotes("{anything}")
        );
    }

    #[test]
    fn test_decode_unsupported_kinds() {
        for edm_type in [
            EdmType::ComplexType,
            EdmType::Duration,
            EdmType::Stream,
            EdmType::TimeOfDay,
            EdmType::GeographyPoint,
            EdmType::GeometryPolygon,
        ] {
            let err = decode_value("null", edm_type).unwrap_err();
            assert_eq!(err, ValueError::NotImplemented { edm_type });
            assert_eq!(err.kind(), ErrorKind::NotImplemented);
        }
    }
}
