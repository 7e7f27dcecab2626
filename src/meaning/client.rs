//! `MeaningSource` trait and the HTTP `MeaningClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BackendConfig;

// ---------------------------------------------------------------------------
// Meaning
// ---------------------------------------------------------------------------

/// Dictionary entry returned by `/api/meaning`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(default)]
    pub text: String,
    pub meaning: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub word_type: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
}

// ---------------------------------------------------------------------------
// MeaningFetchError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum MeaningFetchError {
    /// Blank text is never sent to the backend.
    #[error("text cannot be empty")]
    EmptyText,

    #[error("meaning backend returned HTTP {0}")]
    Status(u16),

    #[error("meaning request failed: {0}")]
    Request(String),

    #[error("meaning request timed out")]
    Timeout,

    #[error("failed to parse meaning response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MeaningFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MeaningFetchError::Timeout
        } else {
            MeaningFetchError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// MeaningSource trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MeaningSource: Send + Sync {
    async fn fetch_meaning(&self, text: &str) -> Result<Meaning, MeaningFetchError>;
}

// ---------------------------------------------------------------------------
// MeaningClient
// ---------------------------------------------------------------------------

/// Calls the backend's `/api/meaning` endpoint.
pub struct MeaningClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MeaningClient {
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!("{}/api/meaning", config.base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl MeaningSource for MeaningClient {
    async fn fetch_meaning(&self, text: &str) -> Result<Meaning, MeaningFetchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MeaningFetchError::EmptyText);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MeaningFetchError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| MeaningFetchError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
