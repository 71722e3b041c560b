use crate::classify::Classification;
use crate::error::{ErrorKind, Fault};
use crate::models::Index;
use crate::payload::Payload;

/// Uniform outcome of every operation.
///
/// Faults travel inside the result instead of as an `Err`, so a failed call
/// still reports the status code and the server's message when one arrived.
#[derive(Debug)]
pub struct OpResult<T> {
    /// HTTP status, 0 when the call failed before a response was received
    pub status: u16,
    /// Server-provided message, mostly set on failures
    pub message: Option<String>,
    pub payload: Option<T>,
    pub fault: Option<Fault>,
}

impl<T> OpResult<T> {
    pub fn success(status: u16, payload: T) -> Self {
        Self {
            status,
            message: None,
            payload: Some(payload),
            fault: None,
        }
    }

    /// Fault raised before any response was received
    pub fn fault(fault: impl Into<Fault>) -> Self {
        Self {
            status: 0,
            message: None,
            payload: None,
            fault: Some(fault.into()),
        }
    }

    /// Fault raised while reading a response with the given status
    pub fn fault_with_status(status: u16, fault: impl Into<Fault>) -> Self {
        Self {
            status,
            ..Self::fault(fault)
        }
    }

    /// Failed response as seen by the classifier.
    ///
    /// A status the endpoint did not accept is always a fault, even a 2xx
    /// the classifier leaves unclassified; that case becomes `General`.
    pub fn classified(status: u16, classification: Classification) -> Self {
        let message = Some(classification.message).filter(|m| !m.is_empty());
        let fault = classification.kind.map(Fault::from).unwrap_or(Fault::General);
        Self {
            status,
            message,
            payload: None,
            fault: Some(fault),
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|m| !m.is_empty());
        self
    }

    pub fn is_success(&self) -> bool {
        self.fault.is_none() && self.payload.is_some()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.fault.as_ref().and_then(Fault::kind)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Collapse into a plain `Result` for `?`-style callers
    pub fn into_result(self) -> Result<T, Fault> {
        match (self.fault, self.payload) {
            (Some(fault), _) => Err(fault),
            (None, Some(payload)) => Ok(payload),
            (None, None) => Err(Fault::General),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OpResult<U> {
        OpResult {
            status: self.status,
            message: self.message,
            payload: self.payload.map(f),
            fault: self.fault,
        }
    }
}

/// Where a cursor stands after a round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Whole result set came back in one response, no cursor was created
    Completed,
    /// Server holds a cursor with more batches pending
    Active,
    /// Last batch delivered; the server has closed the cursor
    Exhausted,
}

impl CursorState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CursorState::Active)
    }
}

/// One batch of query results
#[derive(Debug, Clone)]
pub struct CursorBatch {
    /// JSON array of the records in this batch, in server order
    pub documents: Payload,
    /// Cursor handle to pass to the next-batch call
    pub cursor: Option<String>,
    /// Server's literal `hasMore` flag
    pub has_more: bool,
    /// Total result count, when requested
    pub count: Option<u64>,
    pub state: CursorState,
}

impl CursorBatch {
    /// Decode this batch's records
    pub fn records<T: serde::de::DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.documents.decode()
    }
}

/// Document plus the change event emitted for a single-document mutation
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub document: Payload,
    pub event: Payload,
}

/// Documents plus change events produced by a modifying query
#[derive(Debug, Clone)]
pub struct DocumentChanges {
    /// JSON array of affected documents
    pub documents: Payload,
    /// JSON array of change events, one per affected document
    pub events: Payload,
}

/// Outcome of creating a collection, graph or relation
#[derive(Debug, Clone, Default)]
pub struct Creation {
    pub created_ids: Vec<String>,
    pub message: Option<String>,
}

pub type CursorQueryResult = OpResult<CursorBatch>;
pub type DocumentOpResult = OpResult<DocumentChange>;
pub type DocumentsOpResult = OpResult<DocumentChanges>;
pub type DocumentsResult = OpResult<Payload>;
pub type DocumentResult = OpResult<Payload>;
pub type DocumentCountResult = OpResult<u64>;
pub type CreationResult = OpResult<Creation>;
pub type IndexListResult = OpResult<Vec<Index>>;
pub type IndexOpResult = OpResult<()>;
