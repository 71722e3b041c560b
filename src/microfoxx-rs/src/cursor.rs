//! Cursor protocol.
//!
//! A query is submitted with `POST /cursor`. When the result set is larger
//! than the requested batch size the server keeps a cursor and returns its
//! handle; each `PUT /cursor/<handle>` then yields the next batch until
//! `hasMore` is false, at which point the server drops the cursor.
//!
//! The engine keeps no state between calls. The handle lives with the caller
//! and the server alone decides whether it is still valid, so a next-batch
//! call on an exhausted handle is sent as-is and fails with `NotFound`.

use microfoxx_core::{
    CursorBatch, CursorQueryResult, CursorState, Fault, Payload, QuerySpec,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::dispatcher::Dispatcher;
use crate::transport::Method;

pub const CURSOR_PATH: &str = "/cursor";

const SUCCESS: &[u16] = &[200, 201];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CursorResponse {
    #[serde(default)]
    results: Option<Vec<Box<RawValue>>>,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    count: Option<u64>,
}

impl CursorResponse {
    fn documents(&self) -> Result<Payload, serde_json::Error> {
        Payload::from_records(self.results.as_deref().unwrap_or_default())
    }
}

/// Stateless driver for the cursor endpoints
#[derive(Clone, Copy)]
pub struct CursorEngine<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CursorEngine<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Submit a query and return its first (possibly only) batch.
    ///
    /// A returned handle means the cursor is active, whatever `hasMore` says;
    /// no handle means the whole result set is in this batch.
    #[tracing::instrument(skip(self, spec), fields(batch_size = ?spec.batch_size, count = spec.count))]
    pub async fn start_query(&self, spec: &QuerySpec) -> CursorQueryResult {
        let result = self
            .dispatcher
            .round_trip_json(Method::POST, CURSOR_PATH, spec, SUCCESS, |body| {
                let response: CursorResponse = serde_json::from_slice(body)?;
                let documents = response.documents()?;
                let cursor = response.cursor.filter(|c| !c.is_empty());
                let state = if cursor.is_some() {
                    CursorState::Active
                } else {
                    CursorState::Completed
                };

                Ok(CursorBatch {
                    documents,
                    cursor,
                    has_more: response.has_more,
                    count: response.count,
                    state,
                })
            })
            .await;

        if let Some(batch) = &result.payload {
            if batch.state == CursorState::Active && !batch.has_more {
                tracing::warn!(
                    cursor = ?batch.cursor,
                    "Server returned a cursor handle with hasMore=false"
                );
            }
            tracing::debug!(state = ?batch.state, cursor = ?batch.cursor, "Query started");
        }
        result
    }

    /// Fetch the next batch for `handle`.
    ///
    /// `hasMore = false` marks the cursor as closed server-side.
    #[tracing::instrument(skip(self))]
    pub async fn next_batch(&self, handle: &str) -> CursorQueryResult {
        let path = format!("{}/{}", CURSOR_PATH, handle);
        let result = self
            .dispatcher
            .round_trip(Method::PUT, &path, &[], None, SUCCESS, |body| {
                let response: CursorResponse = serde_json::from_slice(body)?;
                let state = if response.has_more {
                    CursorState::Active
                } else {
                    CursorState::Exhausted
                };

                Ok(CursorBatch {
                    documents: response.documents()?,
                    cursor: Some(handle.to_string()),
                    has_more: response.has_more,
                    count: response.count,
                    state,
                })
            })
            .await;

        if let Some(batch) = &result.payload {
            tracing::debug!(state = ?batch.state, "Batch fetched");
        }
        result
    }
}

enum Phase {
    Unstarted,
    Active(String),
    Done,
}

/// Walks one query from submission to exhaustion.
///
/// Yields one result per round trip and stops after a terminal batch or the
/// first fault.
pub struct CursorPager<'a> {
    engine: CursorEngine<'a>,
    spec: QuerySpec,
    phase: Phase,
}

impl<'a> CursorPager<'a> {
    pub fn new(engine: CursorEngine<'a>, spec: QuerySpec) -> Self {
        Self {
            engine,
            spec,
            phase: Phase::Unstarted,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Handle of the open cursor, if any
    pub fn cursor(&self) -> Option<&str> {
        match &self.phase {
            Phase::Active(handle) => Some(handle),
            _ => None,
        }
    }

    /// Next round trip, or `None` once the query is finished
    pub async fn next_page(&mut self) -> Option<CursorQueryResult> {
        let result = match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::Done => return None,
            Phase::Unstarted => self.engine.start_query(&self.spec).await,
            Phase::Active(handle) => self.engine.next_batch(&handle).await,
        };

        // A handle with `hasMore == false` is already closed server-side
        if let Some(batch) = &result.payload {
            if batch.state == CursorState::Active && batch.has_more {
                if let Some(handle) = &batch.cursor {
                    self.phase = Phase::Active(handle.clone());
                }
            }
        }

        Some(result)
    }

    /// Drain every remaining batch and decode all records in order
    pub async fn records<T: DeserializeOwned>(mut self) -> Result<Vec<T>, Fault> {
        let mut records = Vec::new();
        while let Some(result) = self.next_page().await {
            let batch = result.into_result()?;
            records.extend(batch.records::<T>()?);
        }
        Ok(records)
    }
}
