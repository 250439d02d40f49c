//! HTTP transport for pagemeta
//!
//! Issues the single GET request for a page and streams the response body into
//! [`extract`](crate::extract). Redirects are followed and gzip bodies decoded by
//! reqwest; the final URL after redirects is used as the resolution base.

mod config;

pub use config::{DEFAULT_USER_AGENT, FetchConfig, FetchConfigBuilder};

use reqwest::blocking::Client as ReqwestClient;
use reqwest::redirect::Policy;
use tracing::{debug, error, instrument};

use crate::error::{Error, Result};
use crate::page::Page;

/// HTTP client for fetching pages
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Headers attached to every request
    headers: Vec<(String, String)>,
}

impl Client {
    /// Create a new client from `config`
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout())
            .gzip(config.gzip)
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            headers: config.headers,
        })
    }

    /// Fetch `url` and extract its head metadata
    #[instrument(skip(self), level = "debug")]
    pub fn fetch(&self, url: &str) -> Result<Page> {
        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!("Sending GET request to {}", url);
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            error!("Unexpected status {} for {}", status, url);
            return Err(Error::Status {
                status_code: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        if final_url != url {
            debug!("Redirected to {}", final_url);
        }
        crate::extract(response, &final_url)
    }
}
