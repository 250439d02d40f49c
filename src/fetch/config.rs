//! # Fetch Configuration Module
//!
//! Configuration for the single request pagemeta issues per page. It replaces
//! any process-wide client or header state: every [`Client`](super::Client) is
//! built from an explicit `FetchConfig`.
//!
//! ## Key Components
//!
//! - `FetchConfig`: Request headers, timeout, redirect and compression settings
//! - `FetchConfigBuilder`: Builder pattern implementation for easier configuration

use std::time::Duration;

/// User agent sent by default; some sites serve reduced markup to unknown agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/111.0";

/// Configuration for fetching a page
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Headers sent with every request, in order
    pub headers: Vec<(String, String)>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to negotiate and transparently decode gzip bodies
    pub gzip: bool,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            headers: vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
            ],
            timeout_secs: 30,
            gzip: true,
            max_redirects: 10,
        }
    }
}

/// Builder for FetchConfig
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
        }
    }

    /// Set a header, replacing any existing value with the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .config
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.config.headers.push((name, value)),
        }
        self
    }

    /// Set the user agent
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.header("User-Agent", user_agent)
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set whether gzip transport encoding is negotiated
    pub fn gzip(mut self, gzip: bool) -> Self {
        self.config.gzip = gzip;
        self
    }

    /// Set the maximum number of redirects to follow
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Build the configuration
    pub fn build(self) -> FetchConfig {
        self.config
    }
}

impl FetchConfig {
    /// Create a new builder
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }

    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let config = FetchConfig::default();
        assert_eq!(
            config.headers,
            vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
            ]
        );
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_replaces_headers_case_insensitively() {
        let config = FetchConfig::builder()
            .user_agent("pagemeta-test")
            .header("accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en")
            .timeout_secs(5)
            .gzip(false)
            .build();

        assert_eq!(config.headers.len(), 3);
        assert_eq!(config.headers[0].1, "text/html,application/xhtml+xml");
        assert_eq!(config.headers[1].1, "pagemeta-test");
        assert_eq!(config.headers[2], ("Accept-Language".to_string(), "en".to_string()));
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.gzip);
    }
}
