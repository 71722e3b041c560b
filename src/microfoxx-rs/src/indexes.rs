use microfoxx_core::{Index, IndexListResult, IndexOpResult, IndexParams};
use serde::Deserialize;

use crate::client::Client;
use crate::transport::Method;

const INDEX_PATH: &str = "/index";

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

impl Client {
    /// List the indexes of a collection
    pub async fn list_indexes(&self, collection: &str) -> IndexListResult {
        let path = format!("{}/{}", INDEX_PATH, collection);
        self.dispatcher()
            .round_trip(Method::GET, &path, &[], None, &[200], |body| {
                serde_json::from_slice::<Vec<Index>>(body)
            })
            .await
    }

    /// Remove an index by its `<collection>/<key>` handle
    pub async fn remove_index(&self, handle: &str) -> IndexOpResult {
        let path = format!("{}/{}", INDEX_PATH, handle);
        let mut message = None;
        let result = self
            .dispatcher()
            .round_trip(Method::DELETE, &path, &[], None, &[200], |body| {
                let response: MessageResponse = serde_json::from_slice(body)?;
                message = response.message;
                Ok(())
            })
            .await;

        if result.is_success() {
            result.with_message(message)
        } else {
            result
        }
    }

    /// Create an index; only a 201 counts as success
    pub async fn create_index(&self, params: &IndexParams) -> IndexOpResult {
        self.dispatcher()
            .round_trip_json(Method::POST, INDEX_PATH, params, &[201], |_| Ok(()))
            .await
    }
}
