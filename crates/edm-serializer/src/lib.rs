//! EDM typed values and JSON telemetry payloads.
//!
//! This crate turns strongly typed, OData-flavoured values into the JSON
//! documents an IoT device sends as telemetry, and parses those values back
//! from their canonical text.
//!
//! - [`TypedValue`] models one value of the supported EDM subset.
//! - [`codec`] holds the canonical text encode/decode rules.
//! - [`MultiTree`] is the named, ordered tree payloads are assembled in.
//! - [`json::encode_tree`] renders a tree with a pluggable leaf stringifier.
//! - [`DataMarshaller`] ties it together and returns the payload bytes.
//!
//! # Example
//!
//! ```
//! use edm_serializer::{DataMarshaller, MarshalValue, TypedValue};
//!
//! let temperature = TypedValue::Double(21.5);
//! let device = TypedValue::string("thermostat-7");
//!
//! let payload = DataMarshaller::new(false)
//!     .send_data(&[
//!         MarshalValue::new("DeviceId", &device),
//!         MarshalValue::new("Temperature", &temperature),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(payload).unwrap(),
//!     r#"{"DeviceId":"thermostat-7", "Temperature":21.500000000000000}"#
//! );
//! ```

pub mod codec;
pub mod error;
pub mod json;
pub mod limits;
pub mod marshal;
pub mod model;
pub mod tree;
pub mod validate;

pub use codec::{decode_value, encode_value};
pub use error::{EncodeError, ErrorKind, MarshalError, TreeError, ValueError};
pub use marshal::{send_data, send_reported_properties, DataMarshaller, MarshalValue};
pub use model::{ComplexType, Date, DateTimeOffset, Decimal, EdmType, Guid, TypedValue};
pub use tree::MultiTree;
