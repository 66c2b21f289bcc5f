//! Form payload decoding.
//!
//! # Responsibilities
//! - Decode `application/x-www-form-urlencoded` bodies into field maps
//! - Reject malformed pairs without producing a partial map
//!
//! # Design Decisions
//! - Decoding is a pure function; timestamping happens in `store`
//! - A segment must contain exactly one `=`; anything else is malformed
//! - Duplicate keys keep their first position, last value wins
//! - Invalid escape sequences (`%zz`) pass through literally; only
//!   bytes that fail UTF-8 after decoding are an error

use percent_encoding::percent_decode;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for payload decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload cannot be decoded into key/value pairs.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },
}

/// Decoded key/value representation of a submission body.
///
/// Keys are unique and keep their first-seen position; inserting an
/// existing key overwrites its value in place. Serializes to a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, String)>);

impl FieldMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a field, overwriting the value if the key already exists.
    pub fn insert(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = FieldMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Decode a form-urlencoded payload into a [`FieldMap`].
///
/// The payload must be UTF-8 text. `+` and `%XX` escapes are resolved
/// first, then the text splits into `&`-separated segments, each of
/// which must contain exactly one `=`. Escapes resolve before the
/// split, so an encoded delimiter acts as a delimiter.
///
/// # Errors
///
/// Returns [`CodecError::MalformedPayload`] if the payload or any
/// decoded escape is not valid UTF-8, or if a segment has zero or more
/// than one `=`. No partial map is produced.
pub fn decode(payload: &[u8]) -> Result<FieldMap, CodecError> {
    let raw = std::str::from_utf8(payload).map_err(|_| CodecError::MalformedPayload {
        reason: "payload is not valid UTF-8".into(),
    })?;
    let text = unescape(raw)?;

    let mut fields = FieldMap::new();
    for segment in text.split('&') {
        let (key, value) = match segment.split_once('=') {
            Some((k, v)) if !v.contains('=') => (k, v),
            _ => {
                return Err(CodecError::MalformedPayload {
                    reason: format!("segment {segment:?} must contain exactly one '='"),
                })
            }
        };
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

/// Resolve `+` and `%XX` escapes.
fn unescape(raw: &str) -> Result<String, CodecError> {
    let folded = raw.replace('+', " ");
    percent_decode(folded.as_bytes())
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| CodecError::MalformedPayload {
            reason: format!("{raw:?} does not percent-decode to valid UTF-8"),
        })
}
