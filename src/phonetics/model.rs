//! Word-level phonetic data decoded from the backend.

use serde::{Deserialize, Serialize};

/// One word of a phonetic breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneticWord {
    pub word: String,

    /// IPA transcription.  The backend sends `""` when it could not produce
    /// one; use [`PhoneticWord::ipa`] which folds that into `None`.
    #[serde(default, rename = "ipa")]
    pub raw_ipa: Option<String>,

    #[serde(default)]
    pub syllables: Vec<String>,

    #[serde(default)]
    pub stress_pattern: Option<String>,
}

impl PhoneticWord {
    pub fn new(word: impl Into<String>, ipa: Option<&str>) -> Self {
        Self {
            word: word.into(),
            raw_ipa: ipa.map(str::to_string),
            syllables: Vec::new(),
            stress_pattern: None,
        }
    }

    /// The IPA transcription, if the backend supplied a non-empty one.
    pub fn ipa(&self) -> Option<&str> {
        self.raw_ipa.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One backend response: the ordered words plus the reported count.
///
/// `words` is optional on the wire; an absent array decodes as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhoneticBreakdown {
    /// The text the backend analysed (after its own trimming).
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub words: Vec<PhoneticWord>,

    #[serde(default)]
    pub word_count: usize,
}

impl PhoneticBreakdown {
    pub fn new(words: Vec<PhoneticWord>) -> Self {
        let word_count = words.len();
        Self {
            text: words
                .iter()
                .map(|w| w.word.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            words,
            word_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
