use std::sync::Arc;

use microfoxx_core::{classify, BoxError, Fault, OpResult, Session};
use serde::Serialize;
use url::Url;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Header carrying the session identifier on every authenticated request
pub const SESSION_HEADER: &str = "X-Session-Id";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Builds requests against the service endpoint and attaches the session.
///
/// The session is never checked before dispatch: a request made before login
/// goes out with an empty session header and the server rejects it.
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
    session: Option<Session>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
            session: None,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace the held session; used after login or refresh
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Build an authenticated request for `path` under the endpoint
    pub fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let sid = self
            .session
            .as_ref()
            .map(|s| s.sid.clone())
            .unwrap_or_default();

        let mut request = self.prepare_anonymous(method, path, query, body);
        request.headers.push((SESSION_HEADER.to_string(), sid));
        request
    }

    /// Build a request without session credentials (login only)
    pub fn prepare_anonymous(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let mut url = self.endpoint.clone();
        // Client::new only admits http(s) endpoints, which always have a path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k, v)));
        }

        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Send a request through the injected transport
    pub async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        tracing::debug!(method = %request.method, url = %request.url, "Dispatching request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "Received response");
        Ok(response)
    }

    /// One authenticated round trip with the shared success/failure branching.
    ///
    /// Statuses listed in `accept` go to `decode`; every other status goes
    /// through the classifier.
    pub(crate) async fn round_trip<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
        accept: &[u16],
        decode: impl FnOnce(&[u8]) -> Result<T, serde_json::Error>,
    ) -> OpResult<T> {
        let request = self.prepare(method, path, query, body);
        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(path, "Transport failure: {}", e);
                return OpResult::fault(Fault::Transport(e));
            }
        };

        if accept.contains(&response.status) {
            return match decode(&response.body) {
                Ok(payload) => OpResult::success(response.status, payload),
                Err(e) => OpResult::fault_with_status(response.status, e),
            };
        }

        failure(response)
    }

    /// Round trip with a JSON-encoded body
    pub(crate) async fn round_trip_json<B: Serialize + ?Sized, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        accept: &[u16],
        decode: impl FnOnce(&[u8]) -> Result<T, serde_json::Error>,
    ) -> OpResult<T> {
        let body = match serde_json::to_vec(body) {
            Ok(body) => body,
            Err(e) => return OpResult::fault(e),
        };
        self.round_trip(method, path, &[], Some(body), accept, decode)
            .await
    }
}

/// Classify a failed response into an `OpResult`
pub(crate) fn failure<T>(response: HttpResponse) -> OpResult<T> {
    match classify(response.status, &response.body) {
        Ok(classification) => {
            tracing::warn!(
                status = response.status,
                kind = ?classification.kind,
                "Request failed: {}",
                classification.message
            );
            OpResult::classified(response.status, classification)
        }
        Err(e) => OpResult::fault_with_status(response.status, e),
    }
}
