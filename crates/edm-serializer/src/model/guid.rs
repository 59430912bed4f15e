//! 16-byte GUIDs and their canonical text form.
//!
//! GUIDs are rendered as uppercase hex grouped 8-4-4-4-12, bytes in storage
//! order, high nibble first.

use uuid::Uuid;

/// A 16-byte GUID.
pub type Guid = [u8; 16];

/// The nil GUID.
pub const NIL_GUID: Guid = [0u8; 16];

/// Length of the unquoted hyphenated form.
pub const GUID_HYPHENATED_LEN: usize = 36;

/// Formats a GUID as uppercase `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`.
pub fn format_guid(guid: &Guid) -> String {
    let mut buf = Uuid::encode_buffer();
    Uuid::from_bytes(*guid).hyphenated().encode_upper(&mut buf).to_string()
}

/// Parses the unquoted uppercase hyphenated form.
///
/// Lowercase hex, missing hyphens and braces are all rejected.
pub fn parse_guid(s: &str) -> Option<Guid> {
    let bytes = s.as_bytes();
    if bytes.len() != GUID_HYPHENATED_LEN {
        return None;
    }

    let mut guid = [0u8; 16];
    let mut out = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        if matches!(pos, 8 | 13 | 18 | 23) {
            if bytes[pos] != b'-' {
                return None;
            }
            pos += 1;
            continue;
        }
        let high = upper_hex_value(bytes[pos])?;
        let low = upper_hex_value(bytes[pos + 1])?;
        guid[out] = (high << 4) | low;
        out += 1;
        pos += 2;
    }
    Some(guid)
}

fn upper_hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Generates a random (v4) GUID.
pub fn new_guid() -> Guid {
    *Uuid::new_v4().as_bytes()
}
