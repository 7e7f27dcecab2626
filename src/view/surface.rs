//! Display surfaces the phonetic view binds to.
//!
//! The host (a terminal, a webview bridge, a test) provides a
//! [`DisplaySurface`] that hands out the two surfaces the view needs: the
//! words container and the IPA toggle.  Either may be missing until the host
//! has built its UI, which is why binding is lazy.
//!
//! [`MemorySurface`] keeps everything in memory; it backs headless use and
//! the tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::view::render::WordList;

// ---------------------------------------------------------------------------
// Container content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Empty,
    Loading,
    Error,
}

/// Everything the words container can show.  Each `replace` swaps the
/// whole content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    Placeholder { kind: PlaceholderKind, text: String },
    Words(WordList),
}

// ---------------------------------------------------------------------------
// Surface traits
// ---------------------------------------------------------------------------

/// Element holding the word buttons (or a placeholder message).
pub trait WordsContainer: Send + Sync {
    /// Replace the container's content.
    fn replace(&self, content: ContainerContent);

    /// Show or hide the IPA text of every button without rebuilding them.
    fn set_ipa_hidden(&self, hidden: bool);

    /// Highlight the button for `word` while it is being pronounced.
    fn set_playing(&self, word: &str, playing: bool);
}

/// Checkbox-like control for IPA visibility.
pub trait IpaToggle: Send + Sync {
    fn set_checked(&self, checked: bool);
}

/// Provider of the surfaces; returns `None` for any surface that does not
/// exist yet.
pub trait DisplaySurface: Send + Sync {
    fn words_container(&self) -> Option<Arc<dyn WordsContainer>>;
    fn ipa_toggle(&self) -> Option<Arc<dyn IpaToggle>>;
}

// ---------------------------------------------------------------------------
// MemorySurface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct ContainerRecord {
    content: ContainerContent,
    ipa_hidden: bool,
    playing: BTreeSet<String>,
    replacements: usize,
    ipa_flag_writes: usize,
}

/// In-memory [`WordsContainer`].
#[derive(Debug)]
pub struct MemoryContainer {
    record: Mutex<ContainerRecord>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(ContainerRecord {
                content: ContainerContent::Placeholder {
                    kind: PlaceholderKind::Empty,
                    text: String::new(),
                },
                ipa_hidden: false,
                playing: BTreeSet::new(),
                replacements: 0,
                ipa_flag_writes: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ContainerRecord> {
        self.record.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn content(&self) -> ContainerContent {
        self.lock().content.clone()
    }

    pub fn ipa_hidden(&self) -> bool {
        self.lock().ipa_hidden
    }

    pub fn playing(&self) -> Vec<String> {
        self.lock().playing.iter().cloned().collect()
    }

    /// How many times the content was replaced.
    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }

    /// How many times the IPA flag was written.
    pub fn ipa_flag_writes(&self) -> usize {
        self.lock().ipa_flag_writes
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordsContainer for MemoryContainer {
    fn replace(&self, content: ContainerContent) {
        let mut record = self.lock();
        record.content = content;
        record.playing.clear();
        record.replacements += 1;
    }

    fn set_ipa_hidden(&self, hidden: bool) {
        let mut record = self.lock();
        record.ipa_hidden = hidden;
        record.ipa_flag_writes += 1;
    }

    fn set_playing(&self, word: &str, playing: bool) {
        let mut record = self.lock();
        if playing {
            record.playing.insert(word.to_string());
        } else {
            record.playing.remove(word);
        }
    }
}

/// In-memory [`IpaToggle`].
#[derive(Debug, Default)]
pub struct MemoryToggle {
    checked: Mutex<bool>,
}

impl MemoryToggle {
    pub fn is_checked(&self) -> bool {
        *self.checked.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IpaToggle for MemoryToggle {
    fn set_checked(&self, checked: bool) {
        *self.checked.lock().unwrap_or_else(|e| e.into_inner()) = checked;
    }
}

/// In-memory [`DisplaySurface`] whose surfaces can be attached late.
#[derive(Default)]
pub struct MemorySurface {
    container: Mutex<Option<Arc<MemoryContainer>>>,
    toggle: Mutex<Option<Arc<MemoryToggle>>>,
}

impl MemorySurface {
    /// A surface with both elements present.
    pub fn new() -> Self {
        let surface = Self::detached();
        surface.attach();
        surface
    }

    /// A surface with no elements yet.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Create both elements (if missing).
    pub fn attach(&self) {
        self.container
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_or_insert_with(|| Arc::new(MemoryContainer::new()));
        self.toggle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_or_insert_with(|| Arc::new(MemoryToggle::default()));
    }

    pub fn container(&self) -> Option<Arc<MemoryContainer>> {
        self.container
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn toggle(&self) -> Option<Arc<MemoryToggle>> {
        self.toggle.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DisplaySurface for MemorySurface {
    fn words_container(&self) -> Option<Arc<dyn WordsContainer>> {
        self.container()
            .map(|c| c as Arc<dyn WordsContainer>)
    }

    fn ipa_toggle(&self) -> Option<Arc<dyn IpaToggle>> {
        self.toggle().map(|t| t as Arc<dyn IpaToggle>)
    }
}
