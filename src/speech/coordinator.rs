//! Playback coordinator — sole owner of the speech engine.
//!
//! # State machine
//!
//! ```text
//! Idle ──pronounce(w)──▶ Speaking(w)
//! Speaking(a) ──pronounce(b)──▶ Cancelling(Some(b)) ──cancel done──▶ Speaking(b)
//! Speaking(w) ──finished──▶ Idle
//! Speaking(w) ──interrupted──▶ (wait retry_delay) ──▶ Speaking(w)   once
//! any ──stop()──▶ Cancelling(None) ──cancel done──▶ Idle
//! ```
//!
//! Every request takes a fresh generation number.  A request only issues
//! its utterance, retries, or settles the state back to `Idle` while its
//! generation is still the newest, so the most recent request always wins
//! and at most one utterance is active.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::{SpeechConfig, SpeechEngineKind};
use crate::speech::engine::{SpeechEngine, SpeechError, Utterance, VoiceSettings};
use crate::speech::espeak::EspeakEngine;

// ---------------------------------------------------------------------------
// PlaybackState / PlaybackOutcome
// ---------------------------------------------------------------------------

/// What the coordinator is doing with the engine right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking(String),
    /// An active utterance is being cancelled; holds the request that will
    /// speak next, if any.
    Cancelling(Option<String>),
}

/// How a single `pronounce` request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    /// The engine finished speaking the word.
    Completed {
        /// `true` when the first attempt was interrupted and the retry
        /// succeeded.
        retried: bool,
    },
    /// No speech engine on this host; nothing was issued.
    Unavailable,
    /// A newer request took over before this one finished.
    Preempted,
    /// Terminal failure for this word.
    Failed(SpeechError),
}

// ---------------------------------------------------------------------------
// PlaybackCoordinator
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Slot {
    state: PlaybackState,
    generation: u64,
}

/// Serialises pronunciation requests onto one exclusive [`SpeechEngine`].
///
/// Cheap to clone; clones share the same engine and state.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    engine: Option<Arc<dyn SpeechEngine>>,
    voice: VoiceSettings,
    retry_delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl PlaybackCoordinator {
    /// Create a coordinator around `engine`; `None` means the host has no
    /// speech capability.
    pub fn new(
        engine: Option<Arc<dyn SpeechEngine>>,
        voice: VoiceSettings,
        retry_delay: Duration,
    ) -> Self {
        Self {
            engine,
            voice,
            retry_delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Build the engine selected in `config`.
    ///
    /// Checking for the espeak engine blocks; call this before starting the
    /// tokio runtime.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let engine: Option<Arc<dyn SpeechEngine>> = if !config.enabled {
            None
        } else {
            match config.engine {
                SpeechEngineKind::Espeak => Some(Arc::new(EspeakEngine::detect())),
                SpeechEngineKind::Disabled => None,
            }
        };

        Self::new(
            engine,
            VoiceSettings::from_config(config),
            config.retry_delay(),
        )
    }

    /// Whether pronunciation can be attempted at all.
    pub fn is_available(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.is_available())
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state.clone()
    }

    /// Speak `word`, preempting whatever is currently being spoken.
    ///
    /// Resolves when this request is finished with: spoken, preempted by a
    /// newer request, or failed.  An interruption not caused by a newer
    /// request is retried exactly once after `retry_delay`.
    pub async fn pronounce(&self, word: &str) -> PlaybackOutcome {
        let engine = match &self.engine {
            Some(engine) if engine.is_available() => Arc::clone(engine),
            _ => {
                log::warn!("playback: speech synthesis not supported, skipping {word:?}");
                return PlaybackOutcome::Unavailable;
            }
        };

        let (generation, preempting) = {
            let mut slot = self.lock();
            slot.generation += 1;
            let preempting = slot.state != PlaybackState::Idle;
            slot.state = if preempting {
                PlaybackState::Cancelling(Some(word.to_string()))
            } else {
                PlaybackState::Speaking(word.to_string())
            };
            (slot.generation, preempting)
        };

        if preempting {
            log::debug!("playback: preempting current utterance for {word:?}");
            engine.cancel().await;
        }

        let mut retried = false;
        loop {
            let handle = {
                let mut slot = self.lock();
                if slot.generation != generation {
                    return PlaybackOutcome::Preempted;
                }
                slot.state = PlaybackState::Speaking(word.to_string());
                match engine.speak(self.utterance(word)) {
                    Ok(handle) => handle,
                    Err(e) => {
                        slot.state = PlaybackState::Idle;
                        log::warn!("playback: could not speak {word:?}: {e}");
                        return PlaybackOutcome::Failed(e);
                    }
                }
            };
            log::debug!("playback: speaking {word:?}");

            match handle.finished().await {
                Ok(()) => {
                    self.settle(generation);
                    return PlaybackOutcome::Completed { retried };
                }
                Err(SpeechError::Interrupted) if self.is_superseded(generation) => {
                    return PlaybackOutcome::Preempted;
                }
                Err(SpeechError::Interrupted) if !retried => {
                    log::debug!("playback: {word:?} interrupted, retrying once");
                    retried = true;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    self.settle(generation);
                    log::warn!("playback: giving up on {word:?}: {e}");
                    return PlaybackOutcome::Failed(e);
                }
            }
        }
    }

    /// Cancel whatever is being spoken and return to `Idle`.
    pub async fn stop(&self) {
        let Some(engine) = self.engine.clone() else {
            return;
        };

        let generation = {
            let mut slot = self.lock();
            if slot.state == PlaybackState::Idle {
                return;
            }
            slot.generation += 1;
            slot.state = PlaybackState::Cancelling(None);
            slot.generation
        };

        engine.cancel().await;
        self.settle(generation);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn utterance(&self, word: &str) -> Utterance {
        Utterance {
            text: word.to_string(),
            voice: self.voice.clone(),
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.lock().generation != generation
    }

    fn settle(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.generation == generation {
            slot.state = PlaybackState::Idle;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
