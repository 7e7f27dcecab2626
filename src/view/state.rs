//! Display and initialisation states of the phonetic view.
//!
//! ```text
//! Empty ──load(text)──▶ Loading ──fetch ok──▶ Ready(breakdown)
//!                               ──fetch err─▶ Error(message)
//! any ──load("")/clear()──▶ Empty
//! ```

use crate::phonetics::PhoneticBreakdown;

/// Message shown when a fetch fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load phonetics";

/// Placeholder shown while nothing is selected.
pub const EMPTY_MESSAGE: &str = "Select text to see phonetic breakdown";

/// Placeholder shown while a fetch is outstanding.
pub const LOADING_MESSAGE: &str = "Loading phonetics...";

/// The mutually exclusive content of the phonetic panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    #[default]
    Empty,
    Loading,
    Ready(PhoneticBreakdown),
    Error(String),
}

impl DisplayState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DisplayState::Ready(_))
    }

    /// Short label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayState::Empty => "Empty",
            DisplayState::Loading => "Loading",
            DisplayState::Ready(_) => "Ready",
            DisplayState::Error(_) => "Error",
        }
    }
}

/// Whether the view has bound its display surfaces yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitState {
    #[default]
    Uninitialized,
    Ready,
    /// The last attempt found surfaces missing; the next operation tries
    /// again.
    Failed,
}
