//! Response classification.
//!
//! Turns a non-2xx status and the service's error envelope into a message
//! plus [`ErrorKind`]. The envelope carries the message under `exception` or
//! `errorMessage`; the first non-empty one wins, in that order.

use serde::Deserialize;

use crate::error::ErrorKind;

/// Message and kind extracted from a failed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Empty when the envelope carried neither field
    pub message: String,
    /// `None` only when a 2xx status was passed in
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    exception: Option<String>,
    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
}

impl ErrorEnvelope {
    fn message(self) -> String {
        self.exception
            .filter(|m| !m.is_empty())
            .or(self.error_message.filter(|m| !m.is_empty()))
            .unwrap_or_default()
    }
}

/// Classify a raw response body.
///
/// A body that isn't a JSON object fails with the decode error, which the
/// caller surfaces as the fault for the whole call.
pub fn classify(status: u16, body: &[u8]) -> Result<Classification, serde_json::Error> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body)?;
    Ok(Classification {
        message: envelope.message(),
        kind: ErrorKind::from_status(status),
    })
}

/// Classify a body that has already been decoded into a JSON value.
///
/// Non-string message fields are ignored rather than treated as decode errors.
pub fn classify_value(status: u16, body: &serde_json::Value) -> Classification {
    let field = |name: &str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    };

    Classification {
        message: field("exception")
            .or_else(|| field("errorMessage"))
            .unwrap_or_default(),
        kind: ErrorKind::from_status(status),
    }
}
