//! `PhoneticsSource` trait and the HTTP `PhoneticsClient`.
//!
//! `PhoneticsClient` issues exactly one `POST {base_url}/api/phonetics` per
//! call.  There is no caching and no retry at this layer; failures propagate
//! to the caller unchanged.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::phonetics::model::PhoneticBreakdown;

// ---------------------------------------------------------------------------
// PhoneticsFetchError
// ---------------------------------------------------------------------------

/// Errors that can occur while fetching a phonetic breakdown.
#[derive(Debug, Clone, Error)]
pub enum PhoneticsFetchError {
    /// The backend answered with a non-2xx status.
    #[error("phonetics backend returned HTTP {0}")]
    Status(u16),

    /// HTTP transport or connection error.
    #[error("phonetics request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("phonetics request timed out")]
    Timeout,

    /// The response body was not the expected JSON.
    #[error("failed to parse phonetics response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PhoneticsFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PhoneticsFetchError::Timeout
        } else if e.is_decode() {
            PhoneticsFetchError::Parse(e.to_string())
        } else {
            PhoneticsFetchError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// PhoneticsSource trait
// ---------------------------------------------------------------------------

/// Async source of phonetic breakdowns.
///
/// The caller guarantees `text` is non-empty after trimming.
#[async_trait]
pub trait PhoneticsSource: Send + Sync {
    async fn fetch_phonetics(&self, text: &str) -> Result<PhoneticBreakdown, PhoneticsFetchError>;
}

// ---------------------------------------------------------------------------
// PhoneticsClient
// ---------------------------------------------------------------------------

/// Calls the backend's `/api/phonetics` endpoint.
pub struct PhoneticsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PhoneticsClient {
    /// Build a client from backend config.
    ///
    /// The per-request timeout comes from `config.timeout_secs`; a default
    /// client is used if the builder fails.
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!("{}/api/phonetics", config.base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PhoneticsSource for PhoneticsClient {
    async fn fetch_phonetics(&self, text: &str) -> Result<PhoneticBreakdown, PhoneticsFetchError> {
        let body = serde_json::json!({
            "text":              text,
            "include_ipa":       true,
            "include_syllables": true
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhoneticsFetchError::Status(status.as_u16()));
        }

        let breakdown: PhoneticBreakdown = response
            .json()
            .await
            .map_err(|e| PhoneticsFetchError::Parse(e.to_string()))?;

        log::debug!(
            "phonetics: got {} words (reported {})",
            breakdown.words.len(),
            breakdown.word_count
        );

        Ok(breakdown)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
