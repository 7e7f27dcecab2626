//! Application entry point — terminal phonetic panel.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the playback coordinator (checks for `espeak-ng`, blocking).
//! 4. Create a single-threaded [`tokio`] runtime and the backend clients.
//! 5. Wire a [`PanelController`] around a console-backed display surface.
//! 6. Read stdin line by line: plain text is treated as a selection, lines
//!    starting with `:` are panel commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};

use phonetic_panel::{
    config::{AppConfig, AppPaths},
    meaning::MeaningClient,
    panel::PanelController,
    phonetics::PhoneticsClient,
    speech::{PlaybackCoordinator, PlaybackOutcome},
    view::{ContainerContent, DisplaySurface, IpaToggle, PhoneticView, WordList, WordsContainer},
};

// ---------------------------------------------------------------------------
// Console surface
// ---------------------------------------------------------------------------

/// Words container that prints to stdout.
#[derive(Default)]
struct ConsoleContainer {
    words: Mutex<Option<WordList>>,
}

impl ConsoleContainer {
    fn print_words(list: &WordList) {
        let line = list
            .buttons
            .iter()
            .map(|b| format!("[{}]", b.label(list.ipa_hidden)))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
}

impl WordsContainer for ConsoleContainer {
    fn replace(&self, content: ContainerContent) {
        let mut words = self.words.lock().unwrap_or_else(|e| e.into_inner());
        match content {
            ContainerContent::Placeholder { text, .. } => {
                *words = None;
                println!("  {text}");
            }
            ContainerContent::Words(list) => {
                Self::print_words(&list);
                *words = Some(list);
            }
        }
    }

    fn set_ipa_hidden(&self, hidden: bool) {
        let mut words = self.words.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(list) = words.as_mut() {
            if list.ipa_hidden != hidden {
                list.ipa_hidden = hidden;
                Self::print_words(list);
            }
        }
    }

    fn set_playing(&self, word: &str, playing: bool) {
        if playing {
            println!("  ▶ {word}");
        }
    }
}

struct ConsoleToggle;

impl IpaToggle for ConsoleToggle {
    fn set_checked(&self, checked: bool) {
        println!("  [IPA {}]", if checked { "on" } else { "off" });
    }
}

struct ConsoleSurface {
    container: Arc<ConsoleContainer>,
}

impl DisplaySurface for ConsoleSurface {
    fn words_container(&self) -> Option<Arc<dyn WordsContainer>> {
        Some(Arc::clone(&self.container) as Arc<dyn WordsContainer>)
    }

    fn ipa_toggle(&self) -> Option<Arc<dyn IpaToggle>> {
        Some(Arc::new(ConsoleToggle))
    }
}

// ---------------------------------------------------------------------------
// Command loop
// ---------------------------------------------------------------------------

const HELP: &str = "\
  <text>          show the phonetic breakdown of <text>
  :say <word>     pronounce a word
  :ipa on|off     show / hide IPA
  :meaning        look up the meaning of the current text
  :clear          clear the phonetic view
  :toggle         open / close the panel
  :quit           exit";

async fn run_panel(
    panel: Arc<PanelController>,
    mut config: AppConfig,
    settings_file: PathBuf,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.strip_prefix(':') {
            Some(rest) => rest
                .split_once(char::is_whitespace)
                .map(|(c, a)| (c, a.trim()))
                .unwrap_or((rest, "")),
            None => ("", line),
        };

        match command {
            "" if arg.is_empty() => {}
            "" => {
                // Spawned so a newer line can supersede a slow lookup.
                let panel = Arc::clone(&panel);
                let text = arg.to_string();
                tokio::spawn(async move { panel.on_text_selected(&text).await });
            }
            "say" => {
                let view = panel.phonetics().clone();
                let word = arg.to_string();
                tokio::spawn(async move {
                    match view.on_word_button_activated(&word).await {
                        PlaybackOutcome::Unavailable => println!("  (speech synthesis not available)"),
                        PlaybackOutcome::Failed(e) => println!("  could not pronounce {word}: {e}"),
                        _ => {}
                    }
                });
            }
            "ipa" => {
                let visible = match arg {
                    "on" => true,
                    "off" => false,
                    _ => {
                        println!("  usage: :ipa on|off");
                        prompt();
                        continue;
                    }
                };
                panel.phonetics().toggle_ipa(visible);
                if let Err(e) = config.persist_show_ipa(visible, &settings_file) {
                    log::warn!("Failed to save IPA preference: {e}");
                }
            }
            "meaning" => match panel.request_meaning().await {
                Ok(m) => {
                    println!("  {}", m.meaning);
                    if !m.synonyms.is_empty() {
                        println!("  synonyms: {}", m.synonyms.join(", "));
                    }
                    for example in &m.examples {
                        println!("  • {example}");
                    }
                }
                Err(e) => println!("  ⚠ {e}"),
            },
            "clear" => panel.phonetics().clear(),
            "toggle" => {
                let open = panel.toggle();
                println!("  panel {}", if open { "open" } else { "closed" });
            }
            "quit" | "q" => break,
            "help" => println!("{HELP}"),
            other => println!("  unknown command :{other} (try :help)"),
        }
        prompt();
    }

    panel.phonetics().playback().stop().await;
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("phonetic panel starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Playback (the engine check blocks, so it runs before the runtime)
    let playback = PlaybackCoordinator::from_config(&config.speech);
    if !playback.is_available() {
        log::warn!("pronunciation disabled: no speech engine available");
    }

    // 4. Tokio runtime (single-threaded; all suspension is I/O or speech)
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let phonetics = Arc::new(PhoneticsClient::from_config(&config.backend));
        let meaning = Arc::new(MeaningClient::from_config(&config.backend));

        // 5. Panel
        let surface = Arc::new(ConsoleSurface {
            container: Arc::new(ConsoleContainer::default()),
        });
        let view = PhoneticView::new(surface, phonetics, playback, config.ui.show_ipa);
        if let Err(e) = view.initialize() {
            log::warn!("phonetic view: {e}");
        }
        let panel = Arc::new(PanelController::new(view, meaning));

        println!("Phonetic panel — backend {}", config.backend.base_url);
        println!("{HELP}");

        // 6. Command loop
        run_panel(panel, config, AppPaths::new().settings_file).await
    })
}
