use microfoxx_core::{classify, BoxError, Credentials, Session};

use crate::dispatcher::Dispatcher;
use crate::transport::Method;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("failed to encode credentials: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode session: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("login rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Logs in and installs the resulting session on the dispatcher.
///
/// Sessions expire server-side after 5 minutes idle. Nothing here renews them
/// automatically; callers refresh when a request is rejected.
pub struct SessionManager {
    credentials: Credentials,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Log in and make the new session current
    #[tracing::instrument(skip(self, dispatcher), fields(username = %self.credentials.username))]
    pub async fn establish(&self, dispatcher: &mut Dispatcher) -> Result<Session, AuthError> {
        let session = self.login(dispatcher).await?;
        dispatcher.set_session(session.clone());
        tracing::info!(uid = %session.uid, "Session established");
        Ok(session)
    }

    /// Replace the current session with a fresh one
    #[tracing::instrument(skip(self, dispatcher), fields(username = %self.credentials.username))]
    pub async fn refresh(&self, dispatcher: &mut Dispatcher) -> Result<Session, AuthError> {
        let session = self.login(dispatcher).await?;
        dispatcher.set_session(session.clone());
        tracing::info!(uid = %session.uid, "Session refreshed");
        Ok(session)
    }

    async fn login(&self, dispatcher: &Dispatcher) -> Result<Session, AuthError> {
        let body = serde_json::to_vec(&self.credentials).map_err(AuthError::Encode)?;
        let request = dispatcher.prepare_anonymous(Method::POST, LOGIN_PATH, &[], Some(body));
        let response = dispatcher
            .dispatch(request)
            .await
            .map_err(AuthError::Transport)?;

        if !response.is_success() {
            let classification =
                classify(response.status, &response.body).map_err(AuthError::Decode)?;
            return Err(AuthError::Rejected {
                status: response.status,
                message: classification.message,
            });
        }

        serde_json::from_slice(&response.body).map_err(AuthError::Decode)
    }
}
