//! Phonetic view controller — drives the [`DisplayState`] machine.
//!
//! # Flow
//!
//! ```text
//! load_phonetics(text)
//!   ├─ not bound & cannot bind   → warn, no-op
//!   ├─ blank text                → Empty            (no fetch)
//!   └─ Loading → PhoneticsSource::fetch_phonetics
//!                  ├─ newer request issued meanwhile → discard
//!                  ├─ Ok(words)                      → Ready
//!                  ├─ Ok(no words)                   → Empty
//!                  └─ Err                            → Error
//! ```
//!
//! Every load and clear takes a fresh request number; a fetch result is
//! applied only if its number is still the latest, so a slow stale response
//! can never overwrite a newer result.  State is kept behind a mutex that is
//! never held across `.await`, and every state change re-renders the
//! container inside the same critical section.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::phonetics::PhoneticsSource;
use crate::speech::{PlaybackCoordinator, PlaybackOutcome};
use crate::view::render::render_words;
use crate::view::state::{
    DisplayState, InitState, EMPTY_MESSAGE, LOADING_MESSAGE, LOAD_FAILED_MESSAGE,
};
use crate::view::surface::{
    ContainerContent, DisplaySurface, IpaToggle, PlaceholderKind, WordsContainer,
};

// ---------------------------------------------------------------------------
// ViewError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// The words container or the IPA toggle is not available yet.
    #[error("phonetic view surfaces not available")]
    NotReady,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Bindings {
    container: Arc<dyn WordsContainer>,
    toggle: Arc<dyn IpaToggle>,
}

struct ViewInner {
    init: InitState,
    bindings: Option<Bindings>,
    display: DisplayState,
    ipa_visible: bool,
    latest_request: u64,
    /// Unresolved pronunciation requests per word.
    pending_playback: HashMap<String, usize>,
}

impl ViewInner {
    /// Set the display state and render it.
    fn transition(&mut self, display: DisplayState) {
        log::debug!(
            "phonetic view: {} → {}",
            self.display.label(),
            display.label()
        );
        self.display = display;
        self.render();
    }

    fn render(&self) {
        let Some(bindings) = &self.bindings else {
            return;
        };

        let content = match &self.display {
            DisplayState::Empty => placeholder(PlaceholderKind::Empty, EMPTY_MESSAGE),
            DisplayState::Loading => placeholder(PlaceholderKind::Loading, LOADING_MESSAGE),
            DisplayState::Error(message) => placeholder(PlaceholderKind::Error, message),
            DisplayState::Ready(breakdown) => {
                bindings.container.set_ipa_hidden(!self.ipa_visible);
                ContainerContent::Words(render_words(breakdown, self.ipa_visible))
            }
        };
        bindings.container.replace(content);
    }
}

fn placeholder(kind: PlaceholderKind, text: &str) -> ContainerContent {
    ContainerContent::Placeholder {
        kind,
        text: text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// PhoneticView
// ---------------------------------------------------------------------------

/// Controller for the phonetic panel.
///
/// Cheap to clone; clones share state, so overlapping loads issued from
/// different tasks are ordered against each other.
#[derive(Clone)]
pub struct PhoneticView {
    inner: Arc<Mutex<ViewInner>>,
    surface: Arc<dyn DisplaySurface>,
    source: Arc<dyn PhoneticsSource>,
    playback: PlaybackCoordinator,
}

impl PhoneticView {
    /// Create an unbound view.  `ipa_visible` is the initial toggle state.
    pub fn new(
        surface: Arc<dyn DisplaySurface>,
        source: Arc<dyn PhoneticsSource>,
        playback: PlaybackCoordinator,
        ipa_visible: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewInner {
                init: InitState::Uninitialized,
                bindings: None,
                display: DisplayState::Empty,
                ipa_visible,
                latest_request: 0,
                pending_playback: HashMap::new(),
            })),
            surface,
            source,
            playback,
        }
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    /// Bind to the words container and IPA toggle.
    ///
    /// Idempotent once it has succeeded.  On success the current state is
    /// rendered and the toggle is synced to the IPA visibility.
    pub fn initialize(&self) -> Result<(), ViewError> {
        let mut inner = self.lock();
        if inner.init == InitState::Ready {
            return Ok(());
        }

        let (Some(container), Some(toggle)) =
            (self.surface.words_container(), self.surface.ipa_toggle())
        else {
            inner.init = InitState::Failed;
            log::warn!("phonetic view: display surfaces not found");
            return Err(ViewError::NotReady);
        };

        toggle.set_checked(inner.ipa_visible);
        container.set_ipa_hidden(!inner.ipa_visible);
        inner.bindings = Some(Bindings { container, toggle });
        inner.init = InitState::Ready;
        inner.render();

        log::info!("phonetic view initialised");
        Ok(())
    }

    /// Bind lazily; `false` means the caller should skip its operation.
    fn ensure_initialized(&self, operation: &str) -> bool {
        if self.lock().init == InitState::Ready {
            return true;
        }
        match self.initialize() {
            Ok(()) => true,
            Err(_) => {
                log::warn!("phonetic view not ready, skipping {operation}");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Fetch and display the phonetic breakdown of `text`.
    ///
    /// Supersedes any load still in flight.
    pub async fn load_phonetics(&self, text: &str) {
        if !self.ensure_initialized("phonetics load") {
            return;
        }

        let text = text.trim();
        let request = {
            let mut inner = self.lock();
            inner.latest_request += 1;
            if text.is_empty() {
                inner.transition(DisplayState::Empty);
                return;
            }
            inner.transition(DisplayState::Loading);
            inner.latest_request
        };

        log::info!("loading phonetics for {text:?}");
        let result = self.source.fetch_phonetics(text).await;

        let mut inner = self.lock();
        if inner.latest_request != request {
            log::debug!("phonetic view: discarding stale response for {text:?}");
            return;
        }

        match result {
            Ok(breakdown) if breakdown.is_empty() => {
                log::info!("phonetics: no words in {text:?}");
                inner.transition(DisplayState::Empty);
            }
            Ok(breakdown) => {
                log::info!("phonetics ready: {} words", breakdown.words.len());
                inner.transition(DisplayState::Ready(breakdown));
            }
            Err(e) => {
                log::error!("error loading phonetics: {e}");
                inner.transition(DisplayState::Error(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Show or hide IPA text.
    ///
    /// Applied in place when `Ready`; otherwise only recorded for the next
    /// successful load.
    pub fn toggle_ipa(&self, visible: bool) {
        // Recorded even when the surfaces are missing.
        let bound = self.ensure_initialized("IPA toggle");

        let mut inner = self.lock();
        if inner.ipa_visible == visible {
            return;
        }
        inner.ipa_visible = visible;

        if !bound {
            return;
        }
        if let Some(bindings) = &inner.bindings {
            bindings.toggle.set_checked(visible);
            if inner.display.is_ready() {
                bindings.container.set_ipa_hidden(!visible);
            }
        }
    }

    /// Pronounce the word behind an activated word button.
    ///
    /// The button is marked as playing until the last pending request for
    /// that word resolves.  An unbound view issues nothing and reports
    /// [`PlaybackOutcome::Unavailable`].
    pub async fn on_word_button_activated(&self, word: &str) -> PlaybackOutcome {
        if !self.ensure_initialized("pronunciation") {
            return PlaybackOutcome::Unavailable;
        }

        {
            let mut inner = self.lock();
            *inner.pending_playback.entry(word.to_string()).or_default() += 1;
            if let Some(bindings) = &inner.bindings {
                bindings.container.set_playing(word, true);
            }
        }

        let outcome = self.playback.pronounce(word).await;

        {
            let mut inner = self.lock();
            let remaining = match inner.pending_playback.get_mut(word) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    *count
                }
                None => 0,
            };
            if remaining == 0 {
                inner.pending_playback.remove(word);
                if let Some(bindings) = &inner.bindings {
                    bindings.container.set_playing(word, false);
                }
            }
        }

        log::debug!("pronounce {word:?}: {outcome:?}");
        outcome
    }

    /// Drop the current breakdown and show the empty state.
    ///
    /// Also invalidates any load still in flight.
    pub fn clear(&self) {
        if !self.ensure_initialized("clear") {
            return;
        }
        let mut inner = self.lock();
        inner.latest_request += 1;
        inner.transition(DisplayState::Empty);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn display_state(&self) -> DisplayState {
        self.lock().display.clone()
    }

    pub fn ipa_visible(&self) -> bool {
        self.lock().ipa_visible
    }

    pub fn init_state(&self) -> InitState {
        self.lock().init
    }

    pub fn playback(&self) -> &PlaybackCoordinator {
        &self.playback
    }

    fn lock(&self) -> MutexGuard<'_, ViewInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::phonetics::{PhoneticBreakdown, PhoneticWord, PhoneticsFetchError};
    use crate::speech::{MockSpeechEngine, SpeechEngine, VoiceSettings};
    use crate::view::surface::MemorySurface;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    type FetchResult = Result<PhoneticBreakdown, PhoneticsFetchError>;

    /// Source whose responses are released by the test, per text.
    /// Texts without a gate resolve immediately with `fallback`.
    struct GatedSource {
        gates: Mutex<HashMap<String, oneshot::Receiver<FetchResult>>>,
        fallback: FetchResult,
        calls: AtomicUsize,
    }

    impl GatedSource {
        fn answering(fallback: FetchResult) -> Self {
            Self {
                gates: Mutex::new(HashMap::new()),
                fallback,
                calls: AtomicUsize::new(0),
            }
        }

        fn gate(&self, text: &str) -> oneshot::Sender<FetchResult> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(text.to_string(), rx);
            tx
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PhoneticsSource for GatedSource {
        async fn fetch_phonetics(&self, text: &str) -> FetchResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().remove(text);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or(Err(PhoneticsFetchError::Request("gate dropped".into()))),
                None => self.fallback.clone(),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn hello_world() -> PhoneticBreakdown {
        PhoneticBreakdown::new(vec![
            PhoneticWord::new("hello", Some("həˈloʊ")),
            PhoneticWord::new("world", Some("wɝːld")),
        ])
    }

    fn single(word: &str) -> PhoneticBreakdown {
        PhoneticBreakdown::new(vec![PhoneticWord::new(word, None)])
    }

    struct Fixture {
        view: PhoneticView,
        surface: Arc<MemorySurface>,
        source: Arc<GatedSource>,
        engine: Arc<MockSpeechEngine>,
    }

    fn fixture_with(surface: MemorySurface, fallback: FetchResult) -> Fixture {
        let surface = Arc::new(surface);
        let source = Arc::new(GatedSource::answering(fallback));
        let engine = Arc::new(MockSpeechEngine::new());
        let playback = PlaybackCoordinator::new(
            Some(Arc::clone(&engine) as Arc<dyn SpeechEngine>),
            VoiceSettings::default(),
            Duration::from_millis(5),
        );
        let view = PhoneticView::new(
            Arc::clone(&surface) as Arc<dyn DisplaySurface>,
            Arc::clone(&source) as Arc<dyn PhoneticsSource>,
            playback,
            true,
        );
        Fixture {
            view,
            surface,
            source,
            engine,
        }
    }

    fn fixture(fallback: FetchResult) -> Fixture {
        fixture_with(MemorySurface::new(), fallback)
    }

    /// Poll `cond` until it holds, failing the test after ~1 s.
    async fn wait_for(cond: impl Fn() -> bool) {
        for _ in 0..1_000 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition not reached");
    }

    fn words_of(f: &Fixture) -> Vec<String> {
        match f.surface.container().unwrap().content() {
            ContainerContent::Words(list) => list.buttons.into_iter().map(|b| b.word).collect(),
            other => panic!("expected words, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    #[test]
    fn initialize_fails_without_surfaces() {
        let f = fixture_with(MemorySurface::detached(), Ok(hello_world()));
        assert_eq!(f.view.initialize(), Err(ViewError::NotReady));
        assert_eq!(f.view.init_state(), InitState::Failed);
    }

    #[test]
    fn initialize_renders_empty_and_syncs_toggle() {
        let f = fixture(Ok(hello_world()));
        f.view.initialize().unwrap();

        assert_eq!(f.view.init_state(), InitState::Ready);
        assert!(f.surface.toggle().unwrap().is_checked());
        assert_eq!(
            f.surface.container().unwrap().content(),
            ContainerContent::Placeholder {
                kind: PlaceholderKind::Empty,
                text: EMPTY_MESSAGE.into(),
            }
        );

        // Second call is a no-op.
        f.view.initialize().unwrap();
        assert_eq!(f.surface.container().unwrap().replacements(), 1);
    }

    #[tokio::test]
    async fn operations_before_surfaces_exist_are_skipped() {
        let f = fixture_with(MemorySurface::detached(), Ok(hello_world()));

        f.view.load_phonetics("hello world").await;
        assert_eq!(f.source.calls(), 0);
        assert_eq!(f.view.display_state(), DisplayState::Empty);
        assert_eq!(f.view.init_state(), InitState::Failed);
    }

    #[tokio::test]
    async fn lazily_binds_once_surfaces_appear() {
        let f = fixture_with(MemorySurface::detached(), Ok(hello_world()));
        f.view.load_phonetics("hello").await;
        assert_eq!(f.source.calls(), 0);

        f.surface.attach();
        f.view.load_phonetics("hello world").await;

        assert_eq!(f.view.init_state(), InitState::Ready);
        assert_eq!(words_of(&f), vec!["hello", "world"]);
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn hello_world_renders_two_buttons_with_visible_ipa() {
        let f = fixture(Ok(hello_world()));

        f.view.load_phonetics("hello world").await;

        assert_eq!(f.view.display_state(), DisplayState::Ready(hello_world()));
        let container = f.surface.container().unwrap();
        match container.content() {
            ContainerContent::Words(list) => {
                assert_eq!(list.buttons.len(), 2);
                assert_eq!(list.buttons[0].ipa.as_deref(), Some("həˈloʊ"));
                assert_eq!(list.buttons[1].ipa.as_deref(), Some("wɝːld"));
                assert!(!list.ipa_hidden);
            }
            other => panic!("expected words, got {other:?}"),
        }
        assert!(!container.ipa_hidden());
    }

    #[tokio::test]
    async fn blank_text_goes_empty_without_fetching() {
        let f = fixture(Ok(hello_world()));

        for text in ["", "   ", "\n\t"] {
            f.view.load_phonetics(text).await;
            assert_eq!(f.view.display_state(), DisplayState::Empty);
        }
        assert_eq!(f.source.calls(), 0);
    }

    #[tokio::test]
    async fn text_is_trimmed_before_fetching() {
        // Only the trimmed text has a gate; anything else would fail.
        let f = fixture(Err(PhoneticsFetchError::Status(404)));
        let gate = f.source.gate("hello world");

        let view = f.view.clone();
        let load = tokio::spawn(async move { view.load_phonetics("  hello world \n").await });

        tokio::task::yield_now().await;
        gate.send(Ok(hello_world())).unwrap();
        load.await.unwrap();

        assert!(f.view.display_state().is_ready());
    }

    #[tokio::test]
    async fn shows_loading_while_fetch_is_outstanding() {
        let f = fixture(Ok(hello_world()));
        let gate = f.source.gate("hello");

        let view = f.view.clone();
        let load = tokio::spawn(async move { view.load_phonetics("hello").await });

        for _ in 0..100 {
            if f.source.calls() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(f.view.display_state(), DisplayState::Loading);
        assert_eq!(
            f.surface.container().unwrap().content(),
            ContainerContent::Placeholder {
                kind: PlaceholderKind::Loading,
                text: LOADING_MESSAGE.into(),
            }
        );

        gate.send(Ok(single("hello"))).unwrap();
        load.await.unwrap();
        assert_eq!(f.view.display_state(), DisplayState::Ready(single("hello")));
    }

    #[tokio::test]
    async fn server_error_shows_failure_message() {
        let f = fixture(Err(PhoneticsFetchError::Status(500)));

        f.view.load_phonetics("hello").await;

        assert_eq!(
            f.view.display_state(),
            DisplayState::Error("Failed to load phonetics".into())
        );
        assert_eq!(
            f.surface.container().unwrap().content(),
            ContainerContent::Placeholder {
                kind: PlaceholderKind::Error,
                text: "Failed to load phonetics".into(),
            }
        );
    }

    #[tokio::test]
    async fn error_state_recovers_on_next_load() {
        let f = fixture(Err(PhoneticsFetchError::Timeout));
        f.view.load_phonetics("hello").await;
        assert_eq!(f.view.display_state().label(), "Error");

        let gate = f.source.gate("world");
        let (_, ()) = tokio::join!(
            async {
                tokio::task::yield_now().await;
                gate.send(Ok(single("world"))).unwrap();
            },
            f.view.load_phonetics("world")
        );
        assert_eq!(f.view.display_state(), DisplayState::Ready(single("world")));
    }

    #[tokio::test]
    async fn empty_breakdown_shows_empty_state() {
        let f = fixture(Ok(PhoneticBreakdown::default()));

        f.view.load_phonetics("...").await;

        assert_eq!(f.view.display_state(), DisplayState::Empty);
        assert_eq!(
            f.surface.container().unwrap().content(),
            ContainerContent::Placeholder {
                kind: PlaceholderKind::Empty,
                text: EMPTY_MESSAGE.into(),
            }
        );
    }

    #[tokio::test]
    async fn stale_response_never_overwrites_newer_result() {
        let f = fixture(Ok(hello_world()));
        let gate_a = f.source.gate("a");
        let gate_b = f.source.gate("b");

        tokio::join!(f.view.load_phonetics("a"), f.view.load_phonetics("b"), async {
            // "b" resolves first, then the slower "a".
            gate_b.send(Ok(single("b"))).unwrap();
            tokio::task::yield_now().await;
            gate_a.send(Ok(single("a"))).unwrap();
        });

        assert_eq!(f.view.display_state(), DisplayState::Ready(single("b")));
        assert_eq!(words_of(&f), vec!["b"]);
    }

    #[tokio::test]
    async fn stale_error_is_discarded_too() {
        let f = fixture(Ok(hello_world()));
        let gate_a = f.source.gate("a");
        let gate_b = f.source.gate("b");

        tokio::join!(f.view.load_phonetics("a"), f.view.load_phonetics("b"), async {
            gate_b.send(Ok(single("b"))).unwrap();
            tokio::task::yield_now().await;
            gate_a.send(Err(PhoneticsFetchError::Status(502))).unwrap();
        });

        assert_eq!(f.view.display_state(), DisplayState::Ready(single("b")));
    }

    #[tokio::test]
    async fn clear_discards_in_flight_load() {
        let f = fixture(Ok(hello_world()));
        let gate = f.source.gate("hello");

        tokio::join!(f.view.load_phonetics("hello"), async {
            tokio::task::yield_now().await;
            f.view.clear();
            gate.send(Ok(single("hello"))).unwrap();
        });

        assert_eq!(f.view.display_state(), DisplayState::Empty);
    }

    #[tokio::test]
    async fn clear_returns_to_empty() {
        let f = fixture(Ok(hello_world()));
        f.view.load_phonetics("hello world").await;

        f.view.clear();

        assert_eq!(f.view.display_state(), DisplayState::Empty);
        assert_eq!(
            f.surface.container().unwrap().content(),
            ContainerContent::Placeholder {
                kind: PlaceholderKind::Empty,
                text: EMPTY_MESSAGE.into(),
            }
        );
    }

    // -----------------------------------------------------------------------
    // IPA toggle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn hiding_ipa_while_ready_does_not_refetch_or_rerender() {
        let f = fixture(Ok(hello_world()));
        f.view.load_phonetics("hello world").await;
        let container = f.surface.container().unwrap();
        let replacements = container.replacements();

        f.view.toggle_ipa(false);

        assert!(container.ipa_hidden());
        assert!(!f.surface.toggle().unwrap().is_checked());
        assert_eq!(container.replacements(), replacements);
        assert_eq!(f.source.calls(), 1);
        assert_eq!(words_of(&f), vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn toggling_twice_equals_toggling_once() {
        let f = fixture(Ok(hello_world()));
        f.view.load_phonetics("hello world").await;
        f.view.toggle_ipa(false);
        let container = f.surface.container().unwrap();
        let writes = container.ipa_flag_writes();

        f.view.toggle_ipa(true);
        let after_one = (container.ipa_hidden(), container.ipa_flag_writes());
        f.view.toggle_ipa(true);
        let after_two = (container.ipa_hidden(), container.ipa_flag_writes());

        assert_eq!(after_one, (false, writes + 1));
        assert_eq!(after_one, after_two);
        assert!(f.view.ipa_visible());
    }

    #[tokio::test]
    async fn toggle_outside_ready_applies_to_next_load() {
        let f = fixture(Ok(hello_world()));
        f.view.initialize().unwrap();
        let container = f.surface.container().unwrap();

        f.view.toggle_ipa(false);
        assert!(!f.view.ipa_visible());
        // Not Ready: the container flag is left for the next render.
        assert!(!container.ipa_hidden());

        f.view.load_phonetics("hello world").await;
        assert!(container.ipa_hidden());
        match container.content() {
            ContainerContent::Words(list) => {
                assert!(list.ipa_hidden);
                assert_eq!(list.buttons[0].ipa.as_deref(), Some("həˈloʊ"));
            }
            other => panic!("expected words, got {other:?}"),
        }
    }

    #[test]
    fn toggle_is_recorded_even_when_unbound() {
        let f = fixture_with(MemorySurface::detached(), Ok(hello_world()));
        f.view.toggle_ipa(false);
        assert!(!f.view.ipa_visible());
    }

    // -----------------------------------------------------------------------
    // Word buttons
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn activating_a_button_pronounces_the_word() {
        let f = fixture(Ok(hello_world()));
        f.view.load_phonetics("hello world").await;

        let view = f.view.clone();
        let task = tokio::spawn(async move { view.on_word_button_activated("world").await });

        wait_for(|| f.engine.active_word().is_some()).await;
        assert_eq!(f.engine.active_word().as_deref(), Some("world"));
        assert_eq!(f.surface.container().unwrap().playing(), vec!["world"]);

        f.engine.finish();
        assert_eq!(
            task.await.unwrap(),
            PlaybackOutcome::Completed { retried: false }
        );
        assert!(f.surface.container().unwrap().playing().is_empty());
        // Pronouncing never touches the display state.
        assert!(f.view.display_state().is_ready());
    }

    #[tokio::test]
    async fn pronounce_without_speech_engine_is_unavailable() {
        let surface = Arc::new(MemorySurface::new());
        let view = PhoneticView::new(
            Arc::clone(&surface) as Arc<dyn DisplaySurface>,
            Arc::new(GatedSource::answering(Ok(hello_world()))),
            PlaybackCoordinator::new(None, VoiceSettings::default(), Duration::ZERO),
            true,
        );
        view.initialize().unwrap();

        assert_eq!(
            view.on_word_button_activated("test").await,
            PlaybackOutcome::Unavailable
        );
        assert!(surface.container().unwrap().playing().is_empty());
    }

    #[tokio::test]
    async fn repeated_word_stays_marked_until_last_request_resolves() {
        let f = fixture(Ok(single("cat")));
        f.view.load_phonetics("cat").await;
        let container = f.surface.container().unwrap();

        let view = f.view.clone();
        let first = tokio::spawn(async move { view.on_word_button_activated("cat").await });
        wait_for(|| f.engine.active_word().is_some()).await;

        let view = f.view.clone();
        let second = tokio::spawn(async move { view.on_word_button_activated("cat").await });

        assert_eq!(first.await.unwrap(), PlaybackOutcome::Preempted);
        wait_for(|| f.engine.spoken().len() == 2 && f.engine.active_word().is_some()).await;
        assert_eq!(f.engine.active_word().as_deref(), Some("cat"));
        assert_eq!(container.playing(), vec!["cat"]);

        f.engine.finish();
        assert_eq!(
            second.await.unwrap(),
            PlaybackOutcome::Completed { retried: false }
        );
        assert!(container.playing().is_empty());
    }

    #[tokio::test]
    async fn activation_before_surfaces_exist_is_skipped() {
        let f = fixture_with(MemorySurface::detached(), Ok(hello_world()));

        assert_eq!(
            f.view.on_word_button_activated("cat").await,
            PlaybackOutcome::Unavailable
        );
        assert!(f.engine.spoken().is_empty());
        assert_eq!(f.view.init_state(), InitState::Failed);

        // Once the surfaces appear the same activation speaks.
        f.surface.attach();
        f.engine.script(Ok(()));
        assert_eq!(
            f.view.on_word_button_activated("cat").await,
            PlaybackOutcome::Completed { retried: false }
        );
        assert_eq!(f.engine.spoken(), vec!["cat"]);
    }
}
