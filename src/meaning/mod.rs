//! Dictionary meaning lookups (`POST /api/meaning`).
//!
//! * [`MeaningSource`] — async trait, object-safe.
//! * [`MeaningClient`] — `reqwest` implementation.
//! * [`Meaning`] — meaning, synonyms and examples for a piece of text.

pub mod client;

pub use client::{Meaning, MeaningClient, MeaningFetchError, MeaningSource};
