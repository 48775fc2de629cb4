//! Configuration for the Gremlin client

use crate::client::Client;
use crate::error::Result;
use crate::expand::ExpandBindings;
use crate::http::{parse_endpoint, HttpTransport};
use crate::transport::{chain, Interceptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Configuration for the Gremlin client
///
/// ```
/// use tinkerline_client::ClientConfig;
///
/// let config = ClientConfig::from_toml_str(r#"
///     endpoint = "http://localhost:8182/gremlin"
///     disable_expansion = true
/// "#).unwrap();
/// assert!(config.disable_expansion);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server endpoint; `http` or `https`
    pub endpoint: String,
    /// Skip installing the binding expansion interceptor
    pub disable_expansion: bool,
    /// Maximum number of idle connections per host
    pub max_idle_per_host: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8182/gremlin".to_string(),
            disable_expansion: false,
            max_idle_per_host: None,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build a client posting to the configured endpoint.
    ///
    /// `interceptors` wrap the transport with the first outermost. Binding
    /// expansion, unless disabled, is installed innermost.
    pub fn build(&self, interceptors: Vec<Interceptor>) -> Result<Client> {
        let url = parse_endpoint(&self.endpoint)?;
        let mut http = reqwest::Client::builder();
        if let Some(max) = self.max_idle_per_host {
            http = http.pool_max_idle_per_host(max);
        }
        let transport = Arc::new(HttpTransport::with_client(http.build()?, url));

        let mut interceptors = interceptors;
        if !self.disable_expansion {
            interceptors.push(ExpandBindings::interceptor());
        }
        debug!(
            endpoint = %self.endpoint,
            interceptors = interceptors.len(),
            "building gremlin client"
        );
        Ok(Client::new(chain(&interceptors, transport)))
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    disable_expansion: Option<bool>,
    max_idle_per_host: Option<usize>,
}

impl ClientConfigBuilder {
    /// Set the server endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Disable binding expansion
    pub fn disable_expansion(mut self, disable: bool) -> Self {
        self.disable_expansion = Some(disable);
        self
    }

    /// Set the maximum number of idle connections per host
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = Some(max);
        self
    }

    /// Build the client configuration
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            disable_expansion: self.disable_expansion.unwrap_or(defaults.disable_expansion),
            max_idle_per_host: self.max_idle_per_host.or(defaults.max_idle_per_host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GremlinError;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::builder().build();
        assert_eq!(config, ClientConfig::default());
        assert!(!config.disable_expansion);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::builder()
            .endpoint("https://db.example.com/gremlin")
            .disable_expansion(true)
            .max_idle_per_host(4)
            .build();

        assert_eq!(config.endpoint, "https://db.example.com/gremlin");
        assert!(config.disable_expansion);
        assert_eq!(config.max_idle_per_host, Some(4));
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = ClientConfig::from_toml_str("max_idle_per_host = 2").unwrap();
        assert_eq!(config.endpoint, "http://localhost:8182/gremlin");
        assert_eq!(config.max_idle_per_host, Some(2));
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = ClientConfig::from_toml_str("disable_expansion = \"yes\"").unwrap_err();
        assert!(matches!(err, GremlinError::Config(_)));
    }

    #[test]
    fn test_build_rejects_bad_scheme() {
        let config = ClientConfig::builder()
            .endpoint("ws://localhost:8182/gremlin")
            .build();
        assert!(matches!(
            config.build(Vec::new()),
            Err(GremlinError::InvalidEndpoint { .. })
        ));
    }
}
