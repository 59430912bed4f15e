//! Assembles named values into a JSON payload.
//!
//! The marshaller validates its input, builds a [`MultiTree`] of borrowed
//! values, encodes it with the canonical value encoder and hands back an
//! owned byte buffer for the transport.
//!
//! Path handling:
//! - With `include_property_path`, every value is a member at its path.
//! - Without it, a single complex value is flattened: its fields become
//!   root members and the outer name is dropped.
//! - Several values where any is complex always keep their full paths,
//!   since flattened fields could not be told apart from their siblings.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::codec::encode_value;
use crate::error::MarshalError;
use crate::json::encode_tree;
use crate::limits::{PATH_DELIMITER, REPORTED_PROPERTIES_INDENT};
use crate::model::TypedValue;
use crate::tree::MultiTree;

/// A value to marshal and the property path it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct MarshalValue<'a> {
    pub property_path: &'a str,
    pub value: &'a TypedValue,
}

impl<'a> MarshalValue<'a> {
    pub fn new(property_path: &'a str, value: &'a TypedValue) -> Self {
        Self { property_path, value }
    }
}

/// Builds JSON payloads from typed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataMarshaller {
    include_property_path: bool,
}

impl DataMarshaller {
    pub fn new(include_property_path: bool) -> Self {
        Self { include_property_path }
    }

    pub fn include_property_path(&self) -> bool {
        self.include_property_path
    }

    /// Encodes `values` as one JSON object.
    pub fn send_data(&self, values: &[MarshalValue<'_>]) -> Result<Vec<u8>, MarshalError> {
        send_data(values, self.include_property_path)
    }

    /// Encodes `values` as a pretty-printed reported-properties document.
    ///
    /// Paths always nest (`a/b` becomes `{"a": {"b": ...}}`), whatever
    /// `include_property_path` says.
    pub fn send_reported_properties(
        &self,
        values: &[MarshalValue<'_>],
    ) -> Result<Vec<u8>, MarshalError> {
        send_reported_properties(values)
    }
}

fn validate(values: &[MarshalValue<'_>]) -> Result<(), MarshalError> {
    if values.is_empty() {
        return Err(MarshalError::InvalidArg);
    }
    if let Some(index) = values.iter().position(|v| v.property_path.is_empty()) {
        return Err(MarshalError::InvalidModelProperty { index });
    }
    Ok(())
}

/// Encodes `values` as one JSON object.
pub fn send_data(
    values: &[MarshalValue<'_>],
    include_property_path: bool,
) -> Result<Vec<u8>, MarshalError> {
    let result = build_payload(values, include_property_path);
    if let Err(err) = &result {
        warn!(values = values.len(), error = %err, "send_data failed");
    }
    result
}

fn build_payload(
    values: &[MarshalValue<'_>],
    include_property_path: bool,
) -> Result<Vec<u8>, MarshalError> {
    validate(values)?;

    let keep_paths =
        include_property_path || (values.len() > 1 && values.iter().any(|v| v.value.is_complex()));

    let mut tree = MultiTree::new();
    for entry in values {
        match entry.value {
            TypedValue::ComplexType(complex) if !keep_paths => {
                for (name, field) in complex.fields() {
                    tree.add_leaf(name, field)?;
                }
            }
            value => tree.add_leaf(entry.property_path, value)?,
        }
    }

    let mut payload = String::new();
    encode_tree(&tree, &mut payload, |out: &mut String, value: &&TypedValue| {
        encode_value(out, value)
    })?;

    debug!(values = values.len(), bytes = payload.len(), keep_paths, "marshalled payload");
    Ok(payload.into_bytes())
}

/// Encodes `values` as a pretty-printed reported-properties document.
pub fn send_reported_properties(values: &[MarshalValue<'_>]) -> Result<Vec<u8>, MarshalError> {
    let result = build_reported_properties(values);
    if let Err(err) = &result {
        warn!(values = values.len(), error = %err, "send_reported_properties failed");
    }
    result
}

fn build_reported_properties(values: &[MarshalValue<'_>]) -> Result<Vec<u8>, MarshalError> {
    validate(values)?;

    let mut document = Map::new();
    for entry in values {
        let text = entry.value.to_canonical_string().map_err(|err| MarshalError::Error {
            reason: format!("encoding {:?}: {err}", entry.property_path),
        })?;
        let json: Value = serde_json::from_str(&text).map_err(|err| MarshalError::Error {
            reason: format!("{:?} is not valid JSON: {err}", entry.property_path),
        })?;
        dot_set(&mut document, entry.property_path, json)?;
    }

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(REPORTED_PROPERTIES_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    Value::Object(document)
        .serialize(&mut serializer)
        .map_err(|err| MarshalError::Error { reason: err.to_string() })?;

    debug!(values = values.len(), bytes = out.len(), "serialized reported properties");
    Ok(out)
}

/// Sets `value` at a `/`-separated path, creating intermediate objects.
///
/// An existing member at the final segment is replaced.
fn dot_set(
    document: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<(), MarshalError> {
    let path = path.strip_prefix(PATH_DELIMITER).unwrap_or(path);
    let dotted = path.replace(PATH_DELIMITER, ".");
    let conflict = |reason: &str| MarshalError::Error { reason: format!("{reason} at {dotted:?}") };

    let (parents, name) = match dotted.rsplit_once('.') {
        Some((parents, name)) => (Some(parents), name),
        None => (None, dotted.as_str()),
    };
    if name.is_empty() {
        return Err(conflict("empty member name"));
    }

    let mut object = document;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        if segment.is_empty() {
            return Err(conflict("empty member name"));
        }
        let slot = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        object = match slot {
            Value::Object(inner) => inner,
            _ => return Err(conflict("member is not an object")),
        };
    }
    object.insert(name.to_string(), value);
    Ok(())
}
