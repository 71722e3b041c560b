//! Microfoxx Core Library
//!
//! Transport-independent building blocks for the microfoxx client:
//! - Connection configuration
//! - Request models (cursor queries, modifying queries, graphs, indexes)
//! - Opaque JSON payloads and the uniform operation result
//! - Fault taxonomy and response classification

pub mod classify;
pub mod config;
pub mod error;
pub mod models;
pub mod payload;
pub mod results;

// Re-export commonly used types
pub use classify::{classify, classify_value, Classification};
pub use config::ConnectionParams;
pub use error::{BoxError, ErrorKind, Fault};
pub use models::*;
pub use payload::Payload;
pub use results::*;
