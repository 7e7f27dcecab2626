//! Panel controller — owns the views and the panel's open/closed chrome.
//!
//! Text selection and manual input arrive here and are forwarded to the
//! [`PhoneticView`]; the meaning lookup runs on explicit request.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::meaning::{Meaning, MeaningFetchError, MeaningSource};
use crate::view::PhoneticView;

// ---------------------------------------------------------------------------
// PanelError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum PanelError {
    /// A meaning was requested before any text was selected or typed.
    #[error("Please select or enter text first")]
    NoSelection,

    #[error(transparent)]
    Meaning(#[from] MeaningFetchError),
}

// ---------------------------------------------------------------------------
// PanelController
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct PanelState {
    active: bool,
    selected_text: String,
}

/// Owner of the phonetic view and the meaning lookup.
pub struct PanelController {
    phonetics: PhoneticView,
    meaning: Arc<dyn MeaningSource>,
    state: Mutex<PanelState>,
}

impl PanelController {
    pub fn new(phonetics: PhoneticView, meaning: Arc<dyn MeaningSource>) -> Self {
        Self {
            phonetics,
            meaning,
            state: Mutex::new(PanelState::default()),
        }
    }

    pub fn phonetics(&self) -> &PhoneticView {
        &self.phonetics
    }

    /// Text was selected on the page.
    ///
    /// A blank selection is ignored; otherwise the panel opens and the
    /// phonetic breakdown is loaded.
    pub async fn on_text_selected(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        {
            let mut state = self.lock();
            state.selected_text = text.to_string();
            state.active = true;
        }
        log::debug!("panel: selection {text:?}");

        self.phonetics.load_phonetics(text).await;
    }

    /// The user edited the input box.
    pub async fn on_text_changed(&self, text: &str) {
        self.lock().selected_text = text.to_string();
        self.phonetics.load_phonetics(text).await;
    }

    /// Look up the meaning of the current selection.
    pub async fn request_meaning(&self) -> Result<Meaning, PanelError> {
        let text = self.selected_text();
        if text.trim().is_empty() {
            return Err(PanelError::NoSelection);
        }

        log::info!("panel: requesting meaning for {text:?}");
        let meaning = self.meaning.fetch_meaning(&text).await.map_err(|e| {
            log::error!("panel: meaning lookup failed: {e}");
            e
        })?;
        Ok(meaning)
    }

    /// Flip the panel open/closed; returns the new state.
    pub fn toggle(&self) -> bool {
        let mut state = self.lock();
        state.active = !state.active;
        state.active
    }

    pub fn close(&self) {
        self.lock().active = false;
    }

    /// Escape closes an open panel; returns whether it did.
    pub fn on_escape(&self) -> bool {
        let mut state = self.lock();
        let was_active = state.active;
        state.active = false;
        was_active
    }

    /// A pointer press anywhere on the page.
    ///
    /// Presses on the panel or its toggle button (`inside_panel`) are left
    /// alone; any other press closes an open panel.  Returns whether it did.
    pub fn on_click_outside(&self, inside_panel: bool) -> bool {
        if inside_panel {
            return false;
        }
        self.on_escape()
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn selected_text(&self) -> String {
        self.lock().selected_text.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
