//! Microfoxx Client Library
//!
//! HTTP client for a microfoxx document service mounted in an ArangoDB
//! database: session login, cursor-paged queries, and document, collection,
//! graph, index and modifying-query operations.

mod client;
mod collections;
pub mod cursor;
pub mod dispatcher;
mod documents;
mod graphs;
mod indexes;
mod queries;
pub mod session;
pub mod transport;

pub use client::Client;
pub use cursor::{CursorEngine, CursorPager};
pub use microfoxx_core::*;
pub use session::AuthError;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported scheme in endpoint {endpoint}, expected http or https")]
    UnsupportedScheme { endpoint: String },

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session could not be established: {0}")]
    Auth(#[from] AuthError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
