use microfoxx_core::{DocumentChanges, DocumentsOpResult, ModifyingQuery, Payload};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::client::Client;
use crate::transport::Method;

#[derive(Deserialize)]
struct ChangesResponse {
    #[serde(default)]
    docs: Option<Vec<Box<RawValue>>>,
    #[serde(default)]
    events: Option<Vec<Box<RawValue>>>,
}

fn decode_changes(body: &[u8]) -> Result<DocumentChanges, serde_json::Error> {
    let response: ChangesResponse = serde_json::from_slice(body)?;
    Ok(DocumentChanges {
        documents: Payload::from_records(response.docs.as_deref().unwrap_or_default())?,
        events: Payload::from_records(response.events.as_deref().unwrap_or_default())?,
    })
}

impl Client {
    /// Run an insert query; returns the inserted documents and one event per insert
    pub async fn insert_query(&self, query: &ModifyingQuery) -> DocumentsOpResult {
        self.modifying_query("/insert", query).await
    }

    /// Run an update query against existing documents
    pub async fn update_query(&self, query: &ModifyingQuery) -> DocumentsOpResult {
        self.modifying_query("/update", query).await
    }

    /// Run a removal query; returns the removed documents and their events
    pub async fn remove_query(&self, query: &ModifyingQuery) -> DocumentsOpResult {
        self.modifying_query("/remove", query).await
    }

    async fn modifying_query(&self, path: &str, query: &ModifyingQuery) -> DocumentsOpResult {
        tracing::debug!(
            path,
            write_collection = %query.write_collection,
            "Running modifying query"
        );
        self.dispatcher()
            .round_trip_json(Method::POST, path, query, &[200, 201], decode_changes)
            .await
    }
}
