/// Boxed transport-level error, kept opaque so any HTTP stack can be plugged in
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a non-2xx response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 400
    BadRequest,
    /// HTTP 404
    NotFound,
    /// Any other non-2xx status
    General,
}

impl ErrorKind {
    /// Kind for a response status; `None` for 2xx
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(ErrorKind::BadRequest),
            404 => Some(ErrorKind::NotFound),
            _ => Some(ErrorKind::General),
        }
    }
}

/// Everything that can go wrong with a single operation
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("the body of the request didn't meet the expected requirements")]
    BadRequest,

    #[error("no results were found for the provided query")]
    NotFound,

    #[error("something went wrong in the process of the request")]
    General,
}

impl Fault {
    /// Status-derived kind, `None` for transport and decode faults
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Fault::BadRequest => Some(ErrorKind::BadRequest),
            Fault::NotFound => Some(ErrorKind::NotFound),
            Fault::General => Some(ErrorKind::General),
            Fault::Transport(_) | Fault::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Fault::NotFound)
    }
}

impl From<ErrorKind> for Fault {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::BadRequest => Fault::BadRequest,
            ErrorKind::NotFound => Fault::NotFound,
            ErrorKind::General => Fault::General,
        }
    }
}
