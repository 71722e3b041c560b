use microfoxx_core::{Creation, CreationResult};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::transport::Method;

const COLLECTION_PATH: &str = "/collection";

#[derive(Serialize)]
struct NewCollection<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreatedResponse {
    #[serde(default, rename = "_id")]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode `{_id?, message?}` returned by the creation endpoints
pub(crate) fn decode_creation(body: &[u8]) -> Result<Creation, serde_json::Error> {
    let response: CreatedResponse = serde_json::from_slice(body)?;
    Ok(Creation {
        created_ids: response.id.into_iter().collect(),
        message: response.message,
    })
}

/// Surface the server's success message on the result itself
pub(crate) fn with_creation_message(result: CreationResult) -> CreationResult {
    match result.payload.as_ref().map(|c| c.message.clone()) {
        Some(message) => result.with_message(message),
        None => result,
    }
}

impl Client {
    /// Create a collection. Creating one that already exists is a `BadRequest`.
    pub async fn create_collection(&self, name: &str) -> CreationResult {
        let result = self
            .dispatcher()
            .round_trip_json(
                Method::POST,
                COLLECTION_PATH,
                &NewCollection { name },
                &[200, 201],
                decode_creation,
            )
            .await;
        with_creation_message(result)
    }
}
