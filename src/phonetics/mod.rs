//! Phonetics backend client.
//!
//! * [`PhoneticsSource`] — async trait implemented by anything that can
//!   produce a [`PhoneticBreakdown`] for a piece of text.
//! * [`PhoneticsClient`] — `POST /api/phonetics` over `reqwest`.
//! * [`PhoneticWord`] / [`PhoneticBreakdown`] — decoded response.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use phonetic_panel::config::AppConfig;
//! use phonetic_panel::phonetics::{PhoneticsClient, PhoneticsSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = PhoneticsClient::from_config(&config.backend);
//!
//!     let breakdown = client.fetch_phonetics("hello world").await.unwrap();
//!     for w in &breakdown.words {
//!         println!("{} /{}/", w.word, w.ipa().unwrap_or("?"));
//!     }
//! }
//! ```

pub mod client;
pub mod model;

pub use client::{PhoneticsClient, PhoneticsFetchError, PhoneticsSource};
pub use model::{PhoneticBreakdown, PhoneticWord};
