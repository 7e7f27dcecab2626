//! Phonetic panel — select text, see its IPA breakdown, hear each word.
//!
//! * [`phonetics`] — client for the `/api/phonetics` backend.
//! * [`speech`] — exclusive speech engine access through the
//!   [`PlaybackCoordinator`](speech::PlaybackCoordinator).
//! * [`view`] — the phonetic view state machine and its display surfaces.
//! * [`meaning`] — client for the `/api/meaning` backend.
//! * [`panel`] — panel chrome and trigger routing.
//! * [`config`] — TOML settings.

pub mod config;
pub mod meaning;
pub mod panel;
pub mod phonetics;
pub mod speech;
pub mod view;
