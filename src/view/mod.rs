//! Phonetic view: display state machine, word rendering and surfaces.
//!
//! # Architecture
//!
//! ```text
//! PanelController ──on_text_selected / on_text_changed──▶ PhoneticView
//!                                                           │
//!        PhoneticsSource::fetch_phonetics ◀─────────────────┤ load_phonetics
//!        render_words → WordsContainer::replace ◀───────────┤
//!        WordsContainer::set_ipa_hidden ◀───────────────────┤ toggle_ipa
//!        PlaybackCoordinator::pronounce ◀───────────────────┘ on_word_button_activated
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use phonetic_panel::config::AppConfig;
//! use phonetic_panel::phonetics::PhoneticsClient;
//! use phonetic_panel::speech::PlaybackCoordinator;
//! use phonetic_panel::view::{MemorySurface, PhoneticView};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let surface = Arc::new(MemorySurface::new());
//!     let view = PhoneticView::new(
//!         surface.clone(),
//!         Arc::new(PhoneticsClient::from_config(&config.backend)),
//!         PlaybackCoordinator::from_config(&config.speech),
//!         config.ui.show_ipa,
//!     );
//!
//!     view.load_phonetics("hello world").await;
//!     println!("{:?}", view.display_state());
//! }
//! ```

pub mod controller;
pub mod render;
pub mod state;
pub mod surface;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{PhoneticView, ViewError};
pub use render::{render_words, WordButton, WordList};
pub use state::{DisplayState, InitState, EMPTY_MESSAGE, LOADING_MESSAGE, LOAD_FAILED_MESSAGE};
pub use surface::{
    ContainerContent, DisplaySurface, IpaToggle, MemoryContainer, MemorySurface, MemoryToggle,
    PlaceholderKind, WordsContainer,
};
