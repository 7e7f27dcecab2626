//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Connection settings for the phonetics / meaning backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend; endpoint paths (`/api/phonetics`,
    /// `/api/meaning`) are appended to it.
    pub base_url: String,
    /// Maximum seconds to wait for a backend response.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechEngineKind
// ---------------------------------------------------------------------------

/// Selects which host speech engine backs word pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeechEngineKind {
    /// `espeak-ng` driven as a child process.
    Espeak,
    /// No speech engine; every pronunciation reports "unavailable".
    Disabled,
}

impl Default for SpeechEngineKind {
    fn default() -> Self {
        Self::Espeak
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for word pronunciation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether pronunciation is active at all.
    pub enabled: bool,
    /// Which engine to use.
    pub engine: SpeechEngineKind,
    /// BCP-47 language tag of the voice (e.g. `"en-US"`).
    pub language: String,
    /// Speaking rate, `1.0` being the engine's normal speed.
    pub rate: f32,
    /// Voice pitch, `1.0` being the engine's normal pitch.
    pub pitch: f32,
    /// Delay before the single retry of an interrupted utterance.
    pub retry_delay_ms: u64,
}

impl SpeechConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: SpeechEngineKind::default(),
            language: "en-US".into(),
            rate: 0.8,
            pitch: 1.0,
            retry_delay_ms: 200,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Panel appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Initial state of the IPA toggle.
    pub show_ipa: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_ipa: true }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use phonetic_panel::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Remember a UI choice for the next start
/// let mut config = config;
/// let path = phonetic_panel::config::AppPaths::new().settings_file;
/// config.persist_show_ipa(false, &path).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Pronunciation settings.
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Panel settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario).
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Record the IPA visibility choice and write it to `path` if it
    /// changed.  Returns whether the file was written.
    pub fn persist_show_ipa(&mut self, visible: bool, path: &std::path::Path) -> Result<bool> {
        if self.ui.show_ipa == visible {
            return Ok(false);
        }
        self.ui.show_ipa = visible;
        self.save_to(path)?;
        Ok(true)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
