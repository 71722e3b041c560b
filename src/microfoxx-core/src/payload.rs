//! Opaque JSON payloads handed back to callers.
//!
//! Records are captured as raw JSON text straight from the response body, so
//! key order, nesting and numeric precision survive untouched until the
//! caller decodes them into its own types.

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::fmt;

/// Serialized JSON, decodable into any target type
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    /// Capture a single raw JSON value
    pub fn from_raw(raw: &RawValue) -> Self {
        Self(raw.get().to_string())
    }

    /// Re-encode a sequence of raw records as one JSON array.
    ///
    /// Each element is written back verbatim, in the order received.
    pub fn from_records(records: &[Box<RawValue>]) -> Result<Self, serde_json::Error> {
        serde_json::to_string(records).map(Self)
    }

    /// Encode any serializable value
    pub fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(Self)
    }

    /// Decode into an application-specific type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Byte stream over the payload, for `serde_json::from_reader` and friends
    pub fn reader(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.0).finish()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
