use microfoxx_core::{
    classify_value, DocumentChange, DocumentCountResult, DocumentFilter, DocumentOpResult,
    DocumentResult, DocumentsResult, Fault, OpResult, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::client::Client;
use crate::transport::Method;

#[derive(Deserialize)]
struct ChangeResponse {
    #[serde(default)]
    doc: Option<Box<RawValue>>,
    #[serde(default)]
    event: Option<Box<RawValue>>,
}

/// Missing or null members come back as a `null` payload
fn raw_or_null(raw: Option<Box<RawValue>>) -> Payload {
    match raw {
        Some(raw) => Payload::from_raw(&raw),
        None => Payload::from_raw(RawValue::NULL),
    }
}

fn decode_change(body: &[u8]) -> Result<DocumentChange, serde_json::Error> {
    let response: ChangeResponse = serde_json::from_slice(body)?;
    Ok(DocumentChange {
        document: raw_or_null(response.doc),
        event: raw_or_null(response.event),
    })
}

impl Client {
    /// Create a document; returns the stored document and its creation event
    pub async fn create_doc<D: Serialize + ?Sized>(
        &self,
        collection: &str,
        doc: &D,
    ) -> DocumentOpResult {
        let path = format!("/{}", collection);
        self.dispatcher()
            .round_trip_json(Method::POST, &path, doc, &[200, 201], decode_change)
            .await
    }

    /// Replace the fields of an existing document
    pub async fn update_doc<D: Serialize + ?Sized>(
        &self,
        collection: &str,
        key: &str,
        doc: &D,
    ) -> DocumentOpResult {
        let path = format!("/{}/{}", collection, key);
        self.dispatcher()
            .round_trip_json(Method::PUT, &path, doc, &[200], decode_change)
            .await
    }

    pub async fn remove_doc(&self, collection: &str, key: &str) -> DocumentOpResult {
        let path = format!("/{}/{}", collection, key);
        self.dispatcher()
            .round_trip(Method::DELETE, &path, &[], None, &[200], decode_change)
            .await
    }

    /// Fetch one document by key
    pub async fn get_doc(&self, collection: &str, key: &str) -> DocumentResult {
        let path = format!("/{}/{}", collection, key);
        self.dispatcher()
            .round_trip(Method::GET, &path, &[], None, &[200], |body| {
                let raw: Box<RawValue> = serde_json::from_slice(body)?;
                Ok(Payload::from_raw(&raw))
            })
            .await
    }

    /// List documents matching the filter's fields, sort and limit
    pub async fn get_docs(&self, collection: &str, filter: &DocumentFilter) -> DocumentsResult {
        let path = format!("/{}", collection);
        self.dispatcher()
            .round_trip(
                Method::GET,
                &path,
                &filter.query_pairs(),
                None,
                &[200],
                |body| {
                    let records: Vec<Box<RawValue>> = serde_json::from_slice(body)?;
                    Payload::from_records(&records)
                },
            )
            .await
    }

    /// Count documents, optionally narrowed by the filter's fields.
    ///
    /// Sort and limit are ignored for counts.
    pub async fn get_doc_count(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> DocumentCountResult {
        let dispatcher = self.dispatcher();
        let path = format!("/{}/count", collection);
        let request = dispatcher.prepare(Method::GET, &path, &filter.field_pairs(), None);

        let response = match dispatcher.dispatch(request).await {
            Ok(response) => response,
            Err(e) => return OpResult::fault(Fault::Transport(e)),
        };

        let body: serde_json::Value = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(e) => return OpResult::fault_with_status(response.status, e),
        };

        if response.status == 200 {
            return match body.get("count").and_then(serde_json::Value::as_u64) {
                Some(count) => OpResult::success(response.status, count),
                None => OpResult::fault_with_status(response.status, Fault::General),
            };
        }

        OpResult::classified(response.status, classify_value(response.status, &body))
    }
}
