//! Single-shot HTTP GET probe

use crate::error::{AppError, Result};
use reqwest::Client;
use url::Url;

/// Status and body of a probe response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// Issues one GET request and reads the whole body.
///
/// The body is returned for any status code; only transport and body read
/// failures are errors.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET `url` and return its status and body text
    pub async fn fetch(&self, url: &str) -> Result<ProbeResponse> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::parse(format!("Invalid URL '{}': {}", url, e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| AppError::http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::http(format!("Failed to read body from {}: {}", url, e)))?;

        Ok(ProbeResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
