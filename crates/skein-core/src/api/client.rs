//! HTTP client for the companion thread service.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::{ApiError, ApiErrorKind, ThreadSource};
use crate::config::Config;
use crate::thread::document::ThreadDocument;

/// Error body shape the service uses for failures.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
}

/// Client for the thread endpoint of the companion service.
pub struct ServiceClient {
    base_url: String,
    http: reqwest::Client,
}

impl ServiceClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    /// Returns an error when the base URL is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).with_context(|| format!("Invalid service base URL: {trimmed}"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: trimmed.to_string(),
            http,
        })
    }

    /// Creates a client from the `[service]` section of the config.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.service.base_url, config.service.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ThreadSource for ServiceClient {
    async fn fetch_thread(&self, uri: &str) -> Result<ThreadDocument, ApiError> {
        let url = format!("{}/api/thread", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("uri", uri)])
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ApiError::new(
                        ApiErrorKind::Timeout,
                        "Request to the thread service timed out.",
                    )
                } else {
                    ApiError::new(
                        ApiErrorKind::Network,
                        "Network error contacting the thread service.",
                    )
                    .with_details(error.to_string())
                }
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            ApiError::new(ApiErrorKind::Network, "Failed to read service response.")
                .with_details(error.to_string())
        })?;

        if !status.is_success() {
            let service_message = serde_json::from_slice::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .filter(|message| !message.is_empty());
            return Err(match service_message {
                Some(message) => ApiError::new(ApiErrorKind::Service, message)
                    .with_details(format!("HTTP {}", status.as_u16())),
                None => ApiError::new(
                    ApiErrorKind::HttpStatus,
                    format!("HTTP {}", status.as_u16()),
                ),
            });
        }

        serde_json::from_slice(&body).map_err(|error| {
            ApiError::new(
                ApiErrorKind::Parse,
                "Malformed thread document from service.",
            )
            .with_details(error.to_string())
        })
    }
}
