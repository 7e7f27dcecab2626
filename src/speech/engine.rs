//! Core speech engine trait and shared types.
//!
//! # Overview
//!
//! [`SpeechEngine`] models an exclusive, cancelable, single-utterance host
//! text-to-speech facility.  [`SpeechEngine::speak`] issues an utterance
//! synchronously and hands back an [`UtteranceHandle`] that resolves when the
//! engine reports the utterance finished, failed or was interrupted.
//!
//! `MockSpeechEngine` (available under `#[cfg(test)]`) records every
//! utterance and lets tests finish or fail them on demand.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors reported by a speech engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpeechError {
    /// The utterance was cut short by a cancellation.
    #[error("utterance interrupted")]
    Interrupted,

    /// The host has no usable speech synthesis capability.
    #[error("speech synthesis unavailable")]
    Unavailable,

    /// The engine failed to synthesise the utterance.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

// ---------------------------------------------------------------------------
// VoiceSettings / Utterance
// ---------------------------------------------------------------------------

/// Language, rate and pitch applied to every utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// BCP-47 tag, e.g. `"en-US"`.
    pub language: String,
    /// `1.0` = engine default speed.
    pub rate: f32,
    /// `1.0` = engine default pitch.
    pub pitch: f32,
}

impl VoiceSettings {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            rate: config.rate,
            pitch: config.pitch,
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::from_config(&SpeechConfig::default())
    }
}

/// One speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceSettings,
}

// ---------------------------------------------------------------------------
// UtteranceHandle
// ---------------------------------------------------------------------------

/// Completion side of an issued utterance.
///
/// An engine that drops the sending half without reporting is treated as
/// having interrupted the utterance.
#[derive(Debug)]
pub struct UtteranceHandle {
    done_rx: oneshot::Receiver<Result<(), SpeechError>>,
}

impl UtteranceHandle {
    /// Create a handle together with the sender the engine reports on.
    pub fn channel() -> (oneshot::Sender<Result<(), SpeechError>>, Self) {
        let (done_tx, done_rx) = oneshot::channel();
        (done_tx, Self { done_rx })
    }

    /// Wait until the engine reports the utterance's end.
    pub async fn finished(self) -> Result<(), SpeechError> {
        self.done_rx.await.unwrap_or(Err(SpeechError::Interrupted))
    }
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe interface for a host speech engine.
///
/// # Contract
///
/// - The engine speaks at most one utterance at a time.
/// - `speak` issues the utterance before returning; a previously active
///   utterance that was not cancelled is interrupted.
/// - `cancel` returns only once the active utterance (if any) has stopped,
///   and that utterance's handle resolves with [`SpeechError::Interrupted`].
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether the host actually provides the capability.
    fn is_available(&self) -> bool {
        true
    }

    /// Issue `utterance` and return its completion handle.
    fn speak(&self, utterance: Utterance) -> Result<UtteranceHandle, SpeechError>;

    /// Stop the active utterance and wait for it to wind down.
    async fn cancel(&self);
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// MockSpeechEngine  (test only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockSpeechEngine;


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
