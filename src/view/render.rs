//! Word button rendering.
//!
//! [`render_words`] is a pure function: the same breakdown and visibility
//! flag always produce an equal [`WordList`].  IPA text is always present on
//! the buttons; visibility is a single list-level flag so toggling it never
//! requires rebuilding the buttons.

use crate::phonetics::{PhoneticBreakdown, PhoneticWord};

/// One interactive word element.
#[derive(Debug, Clone, PartialEq)]
pub struct WordButton {
    /// Identifier passed back on activation; the word as sent by the backend.
    pub word: String,
    pub ipa: Option<String>,
    pub title: String,
}

impl WordButton {
    pub fn from_word(word: &PhoneticWord) -> Self {
        Self {
            word: word.word.clone(),
            ipa: word.ipa().map(str::to_string),
            title: format!("Click to hear: {}", word.word),
        }
    }

    /// `word /ipa/`, or just the word when IPA is hidden or absent.
    pub fn label(&self, ipa_hidden: bool) -> String {
        match (&self.ipa, ipa_hidden) {
            (Some(ipa), false) => format!("{} /{}/", self.word, ipa),
            _ => self.word.clone(),
        }
    }
}

/// The rendered buttons plus the list-level IPA visibility flag.
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    pub buttons: Vec<WordButton>,
    pub ipa_hidden: bool,
}

impl WordList {
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// Turn a breakdown into word buttons.
///
/// An empty breakdown yields an empty list; substituting the empty-state
/// placeholder is up to the caller.
pub fn render_words(breakdown: &PhoneticBreakdown, ipa_visible: bool) -> WordList {
    WordList {
        buttons: breakdown.words.iter().map(WordButton::from_word).collect(),
        ipa_hidden: !ipa_visible,
    }
}
