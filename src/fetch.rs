//! HTTP access used by favicon discovery.
//!
//! Discovery only needs "GET this URL, give me the body". The [`Fetcher`]
//! trait keeps that seam swappable so tests can count or fake requests.

use crate::{Config, Error, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Something that can GET a URL and return the raw response body
pub trait Fetcher {
    /// Fetch `url` and return the body bytes.
    ///
    /// Non-success status codes are not errors: the body is returned as-is
    /// and it is up to the caller to make sense of it.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking `reqwest` fetcher
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.clone())
            .send()
            .map_err(|e| Error::NetworkError(format!("HTTP GET {} failed: {}", url, e)))?;

        log::debug!("GET {} -> {}", url, res.status());

        let body = res
            .bytes()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;
        Ok(body.to_vec())
    }
}
