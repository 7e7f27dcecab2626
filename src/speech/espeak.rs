//! `espeak-ng` backed [`SpeechEngine`].
//!
//! Each utterance runs as its own `espeak-ng` child process.  A watcher task
//! waits for the child to exit or for a kill request from
//! [`cancel`](SpeechEngine::cancel), then reports on the utterance handle.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::speech::engine::{SpeechEngine, SpeechError, Utterance, UtteranceHandle, VoiceSettings};

const DEFAULT_PROGRAM: &str = "espeak-ng";

/// espeak-ng's own default speed in words per minute.
const BASE_WPM: f32 = 175.0;

struct ActiveUtterance {
    id: u64,
    kill_tx: oneshot::Sender<()>,
    exited_rx: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Slot {
    next_id: u64,
    active: Option<ActiveUtterance>,
}

/// Speech engine that shells out to `espeak-ng`.
pub struct EspeakEngine {
    program: String,
    available: bool,
    slot: Arc<Mutex<Slot>>,
    cancel_gate: tokio::sync::Mutex<()>,
}

impl EspeakEngine {
    /// Look for `espeak-ng` on `PATH`.
    pub fn detect() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use `program` as the synthesizer binary; availability is checked once
    /// by running `program --version`.
    ///
    /// The check blocks the calling thread, so build the engine before
    /// entering an async runtime.  No runtime is needed until `speak`.
    pub fn with_program(program: &str) -> Self {
        let available = std::process::Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if available {
            log::info!("speech: using {program}");
        } else {
            log::warn!("speech: {program} not found; pronunciation unavailable");
        }

        Self {
            program: program.to_string(),
            available,
            slot: Arc::new(Mutex::new(Slot::default())),
            cancel_gate: tokio::sync::Mutex::new(()),
        }
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Command-line arguments for one utterance.
fn espeak_args(utterance: &Utterance) -> Vec<String> {
    let VoiceSettings {
        language,
        rate,
        pitch,
    } = &utterance.voice;

    let (rate, pitch): (f32, f32) = (*rate, *pitch);
    let wpm = (BASE_WPM * rate).round().clamp(80.0, 450.0) as u32;
    let pitch = (50.0 * pitch).round().clamp(0.0, 99.0) as u32;

    vec![
        "-v".into(),
        language.to_lowercase(),
        "-s".into(),
        wpm.to_string(),
        "-p".into(),
        pitch.to_string(),
        "--".into(),
        utterance.text.clone(),
    ]
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&self, utterance: Utterance) -> Result<UtteranceHandle, SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable);
        }

        let mut child = Command::new(&self.program)
            .args(espeak_args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        let (done_tx, handle) = UtteranceHandle::channel();
        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let (exited_tx, exited_rx) = oneshot::channel::<()>();

        let id = {
            let mut slot = self.lock_slot();
            slot.next_id += 1;
            let id = slot.next_id;
            // Replacing an uncancelled utterance drops its kill sender, which
            // stops that child.
            slot.active = Some(ActiveUtterance {
                id,
                kill_tx,
                exited_rx,
            });
            id
        };

        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status),
                _ = kill_rx => None,
            };

            let result = match exited {
                Some(Ok(s)) if s.success() => Ok(()),
                Some(Ok(s)) => Err(SpeechError::Synthesis(format!("espeak-ng exited with {s}"))),
                Some(Err(e)) => Err(SpeechError::Synthesis(e.to_string())),
                None => {
                    let _ = child.kill().await;
                    Err(SpeechError::Interrupted)
                }
            };

            {
                let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
                if slot.active.as_ref().is_some_and(|a| a.id == id) {
                    slot.active = None;
                }
            }

            let _ = exited_tx.send(());
            let _ = done_tx.send(result);
        });

        Ok(handle)
    }

    async fn cancel(&self) {
        let _gate = self.cancel_gate.lock().await;

        let active = self.lock_slot().active.take();
        if let Some(active) = active {
            let _ = active.kill_tx.send(());
            let _ = active.exited_rx.await;
            log::debug!("speech: utterance {} cancelled", active.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(text: &str, rate: f32, pitch: f32) -> Utterance {
        Utterance {
            text: text.into(),
            voice: VoiceSettings {
                language: "en-US".into(),
                rate,
                pitch,
            },
        }
    }

    #[test]
    fn args_map_voice_settings() {
        let args = espeak_args(&utterance("hello", 0.8, 1.0));
        assert_eq!(
            args,
            vec!["-v", "en-us", "-s", "140", "-p", "50", "--", "hello"]
        );
    }

    #[test]
    fn args_clamp_extremes() {
        let args = espeak_args(&utterance("hi", 10.0, 5.0));
        assert_eq!(args[3], "450");
        assert_eq!(args[5], "99");

        let args = espeak_args(&utterance("hi", 0.0, 0.0));
        assert_eq!(args[3], "80");
        assert_eq!(args[5], "0");
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let engine = EspeakEngine::with_program("definitely-not-a-real-synth-binary");
        assert!(!engine.is_available());
        let err = engine.speak(utterance("hello", 1.0, 1.0)).unwrap_err();
        assert_eq!(err, SpeechError::Unavailable);

        // Cancelling with nothing active returns immediately.
        engine.cancel().await;
    }

    #[cfg(unix)]
    #[test]
    fn availability_check_needs_no_runtime() {
        assert!(tokio::runtime::Handle::try_current().is_err());
        assert!(EspeakEngine::with_program("true").is_available());
        assert!(!EspeakEngine::with_program("definitely-not-a-real-synth-binary").is_available());
    }

    /// `true` accepts `--version` and ignores espeak arguments, so it stands
    /// in for a synthesizer that finishes instantly.
    #[cfg(unix)]
    #[tokio::test]
    async fn successful_exit_finishes_utterance() {
        let engine = EspeakEngine::with_program("true");
        assert!(engine.is_available());

        let handle = engine.speak(utterance("hello", 1.0, 1.0)).unwrap();
        assert_eq!(handle.finished().await, Ok(()));
    }
}
