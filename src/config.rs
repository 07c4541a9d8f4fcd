//! Client configuration
//!
//! [`ClientConfig`] is the credential context of a [`Client`](crate::http::Client):
//! the API host, the bearer token and the identifying user agent. It can be
//! built in code, loaded from YAML, or overridden from the environment.
//!
//! ```yaml
//! host: school.instructure.com
//! token: "1~abcdef..."
//! user_agent: my-integration/1.0   # optional
//! timeout_ms: 30000               # optional
//! ```

use crate::error::{Error, Result};
use crate::types::Scheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API host
pub const ENV_HOST: &str = "CANVAS_API_HOST";
/// Environment variable holding the bearer token
pub const ENV_TOKEN: &str = "CANVAS_API_TOKEN";
/// Environment variable overriding the user agent
pub const ENV_USER_AGENT: &str = "CANVAS_API_USER_AGENT";

/// Connection identity for one API host
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host name, optionally with a port (`school.instructure.com`, `localhost:8080`)
    #[serde(default)]
    pub host: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: String,

    /// Value of the `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL scheme, `https` unless talking to a local test server
    #[serde(default)]
    pub scheme: Scheme,

    /// Overall request timeout in milliseconds; none when absent
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_user_agent() -> String {
    format!("canvas-api/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            user_agent: default_user_agent(),
            scheme: Scheme::default(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Create a config for `host` authenticated with `token`
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the URL scheme
    #[must_use]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the request timeout, kept to millisecond resolution
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build a config from the `CANVAS_API_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_vars(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the `CANVAS_API_*` environment variables that are set
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(host) = set(ENV_HOST) {
            self.host = host;
        }
        if let Some(token) = set(ENV_TOKEN) {
            self.token = token;
        }
        if let Some(agent) = set(ENV_USER_AGENT) {
            self.user_agent = agent;
        }
    }

    /// Check that the config can address and authenticate against a host
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::missing_field("host"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::missing_field("token"));
        }
        if self.host.contains("://") {
            return Err(Error::invalid_value(
                "host",
                "expected a bare host name without a scheme",
            ));
        }
        if self.host.contains(['/', '?', '#']) {
            return Err(Error::invalid_value(
                "host",
                "expected a bare host name without a path",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::missing_field("user_agent"));
        }
        if self.timeout_ms == Some(0) {
            return Err(Error::invalid_value(
                "timeout_ms",
                "a zero timeout fails every request; omit it for no timeout",
            ));
        }
        Ok(())
    }

    /// The request timeout, if one is configured
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("scheme", &self.scheme)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
