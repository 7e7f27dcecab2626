//! Word pronunciation.
//!
//! # Architecture
//!
//! ```text
//! PhoneticView::on_word_button_activated(word)
//!        │
//!        ▼
//! PlaybackCoordinator::pronounce(word)     ← only caller of the engine
//!        │  cancel()  (when preempting)
//!        │  speak()   → UtteranceHandle
//!        ▼
//! SpeechEngine (trait)  ── EspeakEngine (espeak-ng child process)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use phonetic_panel::config::AppConfig;
//! use phonetic_panel::speech::{PlaybackCoordinator, PlaybackOutcome};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let playback = PlaybackCoordinator::from_config(&config.speech);
//!
//!     match playback.pronounce("hello").await {
//!         PlaybackOutcome::Unavailable => println!("no speech engine"),
//!         outcome => println!("{outcome:?}"),
//!     }
//! }
//! ```

pub mod coordinator;
pub mod engine;
pub mod espeak;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use coordinator::{PlaybackCoordinator, PlaybackOutcome, PlaybackState};
pub use engine::{SpeechEngine, SpeechError, Utterance, UtteranceHandle, VoiceSettings};
pub use espeak::EspeakEngine;

// test-only re-export so the view tests can import MockSpeechEngine
// without `use crate::speech::engine::MockSpeechEngine`.
#[cfg(test)]
pub use engine::MockSpeechEngine;
