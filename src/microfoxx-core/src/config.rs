use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Connection settings for a microfoxx service mounted in a database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name, rendered as the `/_db/<database>` segment. No default.
    #[serde(default)]
    pub database: String,
    /// Mount point of the service inside the database
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Connect + response deadline handed to the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_mount_path() -> String {
    "/microfoxx".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl ConnectionParams {
    /// Parameters for `database` with every other field defaulted
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let params: ConnectionParams = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(params)
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_mount_path(mut self, mount_path: impl Into<String>) -> Self {
        self.mount_path = mount_path.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL every request path is appended to:
    /// `<scheme>://<host>:<port>/_db/<database><mount>`
    pub fn endpoint(&self) -> String {
        format!(
            "{}://{}:{}/_db/{}{}",
            self.scheme, self.host, self.port, self.database, self.mount_path
        )
    }

    pub fn credentials(&self) -> crate::models::Credentials {
        crate::models::Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            database: String::new(),
            mount_path: default_mount_path(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
