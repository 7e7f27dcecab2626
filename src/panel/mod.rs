//! Panel chrome and trigger routing.
//!
//! [`PanelController`] is the explicit owner of the [`PhoneticView`] and the
//! meaning lookup; the host forwards selection, input and key events to it.
//!
//! [`PhoneticView`]: crate::view::PhoneticView

pub mod controller;

pub use controller::{PanelController, PanelError};
