use std::sync::Arc;
use std::time::Duration;

use microfoxx_core::{ConnectionParams, CursorQueryResult, QuerySpec, Session};
use url::Url;

use crate::cursor::{CursorEngine, CursorPager};
use crate::dispatcher::Dispatcher;
use crate::session::{AuthError, SessionManager};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::{ClientError, Result};

/// Microfoxx REST API Client
///
/// Meant for one logical caller at a time. Operations borrow the client
/// immutably; only [`Client::refresh`] needs `&mut`, which keeps session
/// replacement a single assignment point.
pub struct Client {
    dispatcher: Dispatcher,
    sessions: SessionManager,
}

impl Client {
    /// Build a client over `transport` without logging in
    pub fn new(params: &ConnectionParams, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let endpoint = params.endpoint();
        let url = Url::parse(&endpoint).map_err(|source| ClientError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme { endpoint });
        }

        Ok(Self {
            dispatcher: Dispatcher::new(transport, url),
            sessions: SessionManager::new(params.credentials()),
        })
    }

    /// Connect over the default reqwest transport and log in
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(params.timeout_secs))?;
        Self::connect_with(params, Arc::new(transport)).await
    }

    /// Connect over an injected transport and log in
    pub async fn connect_with(
        params: &ConnectionParams,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let mut client = Self::new(params, transport)?;
        client
            .sessions
            .establish(&mut client.dispatcher)
            .await?;
        Ok(client)
    }

    /// Log in again and replace the current session
    pub async fn refresh(&mut self) -> std::result::Result<Session, AuthError> {
        self.sessions.refresh(&mut self.dispatcher).await
    }

    pub fn session(&self) -> Option<&Session> {
        self.dispatcher.session()
    }

    pub fn endpoint(&self) -> &Url {
        self.dispatcher.endpoint()
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Cursor protocol operations
    pub fn cursors(&self) -> CursorEngine<'_> {
        CursorEngine::new(&self.dispatcher)
    }

    /// Submit a query and fetch its first batch
    pub async fn start_query(&self, spec: &QuerySpec) -> CursorQueryResult {
        self.cursors().start_query(spec).await
    }

    /// Fetch the next batch for a cursor handle
    pub async fn next_batch(&self, handle: &str) -> CursorQueryResult {
        self.cursors().next_batch(handle).await
    }

    /// Walk a query batch by batch
    pub fn pager(&self, spec: QuerySpec) -> CursorPager<'_> {
        CursorPager::new(self.cursors(), spec)
    }
}
