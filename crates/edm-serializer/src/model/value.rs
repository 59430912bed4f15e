//! Typed EDM values.
//!
//! A [`TypedValue`] is one value of the supported subset of the OData Entity
//! Data Model. Composite parts (decimal text, dates, date-time offsets,
//! complex types) are newtypes with private fields whose constructors
//! validate, so an invalid value cannot be built.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::warn;
use uuid::Uuid;

use crate::error::ValueError;
use crate::model::Guid;
use crate::validate::{
    validate_date, validate_decimal, validate_fractional_second, validate_time,
    validate_time_zone,
};

/// EDM kinds known to the type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EdmType {
    NoType = 0,
    Binary = 1,
    Boolean = 2,
    Byte = 3,
    Date = 4,
    DateTimeOffset = 5,
    Decimal = 6,
    Double = 7,
    Duration = 8,
    Guid = 9,
    Int16 = 10,
    Int32 = 11,
    Int64 = 12,
    SByte = 13,
    Single = 14,
    Stream = 15,
    String = 16,
    TimeOfDay = 17,
    Geography = 18,
    GeographyPoint = 19,
    GeographyLineString = 20,
    GeographyPolygon = 21,
    GeographyMultiPoint = 22,
    GeographyMultiLineString = 23,
    GeographyMultiPolygon = 24,
    GeographyCollection = 25,
    Geometry = 26,
    GeometryPoint = 27,
    GeometryLineString = 28,
    GeometryPolygon = 29,
    GeometryMultiPoint = 30,
    GeometryMultiLineString = 31,
    GeometryMultiPolygon = 32,
    GeometryCollection = 33,
    ComplexType = 34,
    Null = 35,
    EntityType = 36,
    StringNoQuotes = 37,
}

impl EdmType {
    /// Creates an EdmType from its numeric representation.
    pub fn from_u8(v: u8) -> Option<EdmType> {
        const ALL: [EdmType; 38] = [
            EdmType::NoType,
            EdmType::Binary,
            EdmType::Boolean,
            EdmType::Byte,
            EdmType::Date,
            EdmType::DateTimeOffset,
            EdmType::Decimal,
            EdmType::Double,
            EdmType::Duration,
            EdmType::Guid,
            EdmType::Int16,
            EdmType::Int32,
            EdmType::Int64,
            EdmType::SByte,
            EdmType::Single,
            EdmType::Stream,
            EdmType::String,
            EdmType::TimeOfDay,
            EdmType::Geography,
            EdmType::GeographyPoint,
            EdmType::GeographyLineString,
            EdmType::GeographyPolygon,
            EdmType::GeographyMultiPoint,
            EdmType::GeographyMultiLineString,
            EdmType::GeographyMultiPolygon,
            EdmType::GeographyCollection,
            EdmType::Geometry,
            EdmType::GeometryPoint,
            EdmType::GeometryLineString,
            EdmType::GeometryPolygon,
            EdmType::GeometryMultiPoint,
            EdmType::GeometryMultiLineString,
            EdmType::GeometryMultiPolygon,
            EdmType::GeometryCollection,
            EdmType::ComplexType,
            EdmType::Null,
            EdmType::EntityType,
            EdmType::StringNoQuotes,
        ];
        ALL.get(usize::from(v)).copied()
    }

    /// Returns true if values of this kind can be built, encoded and decoded.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            EdmType::NoType
                | EdmType::Duration
                | EdmType::Stream
                | EdmType::TimeOfDay
                | EdmType::EntityType
        ) && !self.is_spatial()
    }

    /// Returns true for the geography and geometry families.
    pub fn is_spatial(self) -> bool {
        (EdmType::Geography as u8..=EdmType::GeometryCollection as u8).contains(&(self as u8))
    }

    /// OData name of the kind, e.g. `Edm.Int32`.
    pub fn name(self) -> &'static str {
        match self {
            EdmType::NoType => "Edm.NoType",
            EdmType::Binary => "Edm.Binary",
            EdmType::Boolean => "Edm.Boolean",
            EdmType::Byte => "Edm.Byte",
            EdmType::Date => "Edm.Date",
            EdmType::DateTimeOffset => "Edm.DateTimeOffset",
            EdmType::Decimal => "Edm.Decimal",
            EdmType::Double => "Edm.Double",
            EdmType::Duration => "Edm.Duration",
            EdmType::Guid => "Edm.Guid",
            EdmType::Int16 => "Edm.Int16",
            EdmType::Int32 => "Edm.Int32",
            EdmType::Int64 => "Edm.Int64",
            EdmType::SByte => "Edm.SByte",
            EdmType::Single => "Edm.Single",
            EdmType::Stream => "Edm.Stream",
            EdmType::String => "Edm.String",
            EdmType::TimeOfDay => "Edm.TimeOfDay",
            EdmType::Geography => "Edm.Geography",
            EdmType::GeographyPoint => "Edm.GeographyPoint",
            EdmType::GeographyLineString => "Edm.GeographyLineString",
            EdmType::GeographyPolygon => "Edm.GeographyPolygon",
            EdmType::GeographyMultiPoint => "Edm.GeographyMultiPoint",
            EdmType::GeographyMultiLineString => "Edm.GeographyMultiLineString",
            EdmType::GeographyMultiPolygon => "Edm.GeographyMultiPolygon",
            EdmType::GeographyCollection => "Edm.GeographyCollection",
            EdmType::Geometry => "Edm.Geometry",
            EdmType::GeometryPoint => "Edm.GeometryPoint",
            EdmType::GeometryLineString => "Edm.GeometryLineString",
            EdmType::GeometryPolygon => "Edm.GeometryPolygon",
            EdmType::GeometryMultiPoint => "Edm.GeometryMultiPoint",
            EdmType::GeometryMultiLineString => "Edm.GeometryMultiLineString",
            EdmType::GeometryMultiPolygon => "Edm.GeometryMultiPolygon",
            EdmType::GeometryCollection => "Edm.GeometryCollection",
            EdmType::ComplexType => "Edm.ComplexType",
            EdmType::Null => "Edm.Null",
            EdmType::EntityType => "Edm.EntityType",
            EdmType::StringNoQuotes => "Edm.StringNoQuotes",
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// COMPOSITE PARTS
// =============================================================================

/// Arbitrary-precision decimal kept as validated text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Parses `[sign] 1*DIGIT ["." 1*DIGIT]`.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        validate_decimal(text)?;
        Ok(Decimal(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Decimal {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::parse(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date in the proleptic Gregorian calendar, years -9999..=9999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: i16,
    month: u8,
    day: u8,
}

impl Date {
    pub fn new(year: i16, month: u8, day: u8) -> Result<Self, ValueError> {
        validate_date(i32::from(year), month, day)?;
        Ok(Date { year, month, day })
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

/// A date and wall-clock time with optional fractional second and time zone.
///
/// The fractional second is an integer of up to 12 digits, interpreted as
/// the digits following the decimal point when padded to 12 places. A value
/// without a time zone is rendered in UTC (`Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTimeOffset {
    date: Date,
    hour: u8,
    minute: u8,
    second: u8,
    fractional_second: Option<u64>,
    time_zone: Option<(i8, u8)>,
}

impl DateTimeOffset {
    pub fn new(date: Date, hour: u8, minute: u8, second: u8) -> Result<Self, ValueError> {
        validate_time(hour, minute, second)?;
        Ok(DateTimeOffset {
            date,
            hour,
            minute,
            second,
            fractional_second: None,
            time_zone: None,
        })
    }

    /// Attaches a fractional second (at most 999 999 999 999).
    pub fn with_fractional_second(mut self, fractional_second: u64) -> Result<Self, ValueError> {
        validate_fractional_second(fractional_second)?;
        self.fractional_second = Some(fractional_second);
        Ok(self)
    }

    /// Attaches a time-zone offset (hour -23..=23, minute 0..=59).
    pub fn with_time_zone(mut self, hour: i8, minute: u8) -> Result<Self, ValueError> {
        validate_time_zone(hour, minute)?;
        self.time_zone = Some((hour, minute));
        Ok(self)
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn fractional_second(&self) -> Option<u64> {
        self.fractional_second
    }

    /// Time-zone offset as `(hour, minute)`.
    pub fn time_zone(&self) -> Option<(i8, u8)> {
        self.time_zone
    }
}

/// An ordered set of uniquely named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexType {
    fields: Vec<(String, TypedValue)>,
}

impl ComplexType {
    /// Builds a complex type from `(name, value)` pairs, preserving order.
    ///
    /// At least one field is required; names must be non-empty and unique.
    pub fn new(fields: Vec<(String, TypedValue)>) -> Result<Self, ValueError> {
        if fields.is_empty() {
            return Err(ValueError::EmptyComplexType);
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for (name, _) in &fields {
            if name.is_empty() {
                return Err(ValueError::EmptyFieldName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ValueError::DuplicateFieldName { name: name.clone() });
            }
        }
        Ok(ComplexType { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the field at `index`.
    pub fn field(&self, index: usize) -> Result<(&str, &TypedValue), ValueError> {
        self.fields
            .get(index)
            .map(|(name, value)| (name.as_str(), value))
            .ok_or(ValueError::FieldIndexOutOfBounds { index, count: self.fields.len() })
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }
}

// =============================================================================
// TYPED VALUE
// =============================================================================

/// One EDM-typed value.
#[derive(Debug, Clone)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Date(Date),
    DateTimeOffset(DateTimeOffset),
    Guid(Guid),
    /// Raw bytes; an empty vector owns no buffer.
    Binary(Vec<u8>),
    /// Text rendered quoted and escaped.
    String(String),
    /// Text rendered verbatim.
    StringNoQuotes(String),
    ComplexType(ComplexType),
}

impl TypedValue {
    /// Returns the EDM kind of this value.
    pub fn edm_type(&self) -> EdmType {
        match self {
            TypedValue::Null => EdmType::Null,
            TypedValue::Boolean(_) => EdmType::Boolean,
            TypedValue::Byte(_) => EdmType::Byte,
            TypedValue::SByte(_) => EdmType::SByte,
            TypedValue::Int16(_) => EdmType::Int16,
            TypedValue::Int32(_) => EdmType::Int32,
            TypedValue::Int64(_) => EdmType::Int64,
            TypedValue::Single(_) => EdmType::Single,
            TypedValue::Double(_) => EdmType::Double,
            TypedValue::Decimal(_) => EdmType::Decimal,
            TypedValue::Date(_) => EdmType::Date,
            TypedValue::DateTimeOffset(_) => EdmType::DateTimeOffset,
            TypedValue::Guid(_) => EdmType::Guid,
            TypedValue::Binary(_) => EdmType::Binary,
            TypedValue::String(_) => EdmType::String,
            TypedValue::StringNoQuotes(_) => EdmType::StringNoQuotes,
            TypedValue::ComplexType(_) => EdmType::ComplexType,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, TypedValue::ComplexType(_))
    }

    pub fn string(text: impl Into<String>) -> Self {
        TypedValue::String(text.into())
    }

    pub fn string_no_quotes(text: impl Into<String>) -> Self {
        TypedValue::StringNoQuotes(text.into())
    }

    pub fn decimal(text: &str) -> Result<Self, ValueError> {
        Decimal::parse(text)
            .map(TypedValue::Decimal)
            .inspect_err(|err| warn!(error = %err, "rejected Edm.Decimal"))
    }

    pub fn date(year: i16, month: u8, day: u8) -> Result<Self, ValueError> {
        Date::new(year, month, day)
            .map(TypedValue::Date)
            .inspect_err(|err| warn!(error = %err, "rejected Edm.Date"))
    }

    pub fn date_time_offset(value: DateTimeOffset) -> Self {
        TypedValue::DateTimeOffset(value)
    }

    pub fn guid(guid: Guid) -> Self {
        TypedValue::Guid(guid)
    }

    /// Copies a binary buffer.
    ///
    /// `None` is the empty binary. A present but zero-length buffer is
    /// rejected.
    pub fn binary(data: Option<&[u8]>) -> Result<Self, ValueError> {
        match data {
            None => Ok(TypedValue::Binary(Vec::new())),
            Some([]) => {
                warn!("rejected Edm.Binary with present but empty buffer");
                Err(ValueError::EmptyBinaryBuffer)
            }
            Some(bytes) => Ok(TypedValue::Binary(bytes.to_vec())),
        }
    }

    /// Builds a complex type from owned `(name, value)` pairs.
    pub fn complex(fields: Vec<(String, TypedValue)>) -> Result<Self, ValueError> {
        ComplexType::new(fields)
            .map(TypedValue::ComplexType)
            .inspect_err(|err| warn!(error = %err, "rejected Edm.ComplexType"))
    }

    /// Builds a complex type from parallel name and value slices.
    pub fn complex_from_members(names: &[&str], values: &[TypedValue]) -> Result<Self, ValueError> {
        Self::complex_from_member_refs(names, &values.iter().collect::<Vec<_>>())
    }

    /// Builds a complex type from names and borrowed values, cloning each value.
    pub fn complex_from_member_refs(
        names: &[&str],
        values: &[&TypedValue],
    ) -> Result<Self, ValueError> {
        if names.len() != values.len() {
            return Err(ValueError::MemberCountMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        let fields = names
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), (*value).clone()))
            .collect();
        Self::complex(fields)
    }

    /// Returns the complex-type field at `index`.
    pub fn complex_field(&self, index: usize) -> Result<(&str, &TypedValue), ValueError> {
        match self {
            TypedValue::ComplexType(complex) => complex.field(index),
            other => Err(ValueError::NotComplexType { edm_type: other.edm_type() }),
        }
    }
}

/// Floats compare equal to themselves when NaN, matching the sentinel
/// round trip.
impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedValue::Null, TypedValue::Null) => true,
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => a == b,
            (TypedValue::Byte(a), TypedValue::Byte(b)) => a == b,
            (TypedValue::SByte(a), TypedValue::SByte(b)) => a == b,
            (TypedValue::Int16(a), TypedValue::Int16(b)) => a == b,
            (TypedValue::Int32(a), TypedValue::Int32(b)) => a == b,
            (TypedValue::Int64(a), TypedValue::Int64(b)) => a == b,
            (TypedValue::Single(a), TypedValue::Single(b)) => a == b || (a.is_nan() && b.is_nan()),
            (TypedValue::Double(a), TypedValue::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (TypedValue::Decimal(a), TypedValue::Decimal(b)) => a == b,
            (TypedValue::Date(a), TypedValue::Date(b)) => a == b,
            (TypedValue::DateTimeOffset(a), TypedValue::DateTimeOffset(b)) => a == b,
            (TypedValue::Guid(a), TypedValue::Guid(b)) => a == b,
            (TypedValue::Binary(a), TypedValue::Binary(b)) => a == b,
            (TypedValue::String(a), TypedValue::String(b)) => a == b,
            (TypedValue::StringNoQuotes(a), TypedValue::StringNoQuotes(b)) => a == b,
            (TypedValue::ComplexType(a), TypedValue::ComplexType(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::Boolean(v)
    }
}

impl From<u8> for TypedValue {
    fn from(v: u8) -> Self {
        TypedValue::Byte(v)
    }
}

impl From<i8> for TypedValue {
    fn from(v: i8) -> Self {
        TypedValue::SByte(v)
    }
}

impl From<i16> for TypedValue {
    fn from(v: i16) -> Self {
        TypedValue::Int16(v)
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Int32(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Int64(v)
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        TypedValue::Single(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Double(v)
    }
}

impl From<Date> for TypedValue {
    fn from(v: Date) -> Self {
        TypedValue::Date(v)
    }
}

impl From<DateTimeOffset> for TypedValue {
    fn from(v: DateTimeOffset) -> Self {
        TypedValue::DateTimeOffset(v)
    }
}

impl From<Decimal> for TypedValue {
    fn from(v: Decimal) -> Self {
        TypedValue::Decimal(v)
    }
}

impl From<Uuid> for TypedValue {
    fn from(v: Uuid) -> Self {
        TypedValue::Guid(v.into_bytes())
    }
}

impl From<ComplexType> for TypedValue {
    fn from(v: ComplexType) -> Self {
        TypedValue::ComplexType(v)
    }
}
