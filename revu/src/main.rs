//! revu — terminal client for a remote code-review service.
//!
//! Entry point for the `revu` binary. Wires together the terminal lifecycle
//! (`tui`), unified event bus (`event`), network worker (`net`), rendering
//! (`ui`), theme system (`theme`), and the session state (`app` /
//! `revu-core`).
//!
//! # Startup sequence (order matters)
//!
//! 1. Load config from XDG — read-only, safe before terminal init.
//! 2. Initialise file logging — the TUI owns the terminal, so log output
//!    goes to `.revu/revu.log`.
//! 3. `install_panic_hook()` — installed before the terminal is touched so
//!    it restores the terminal before the panic message prints.
//! 4. `register_sigterm()` — returns `Arc<AtomicBool>` polled in the loop.
//! 5. `init_tui()` — enters alternate screen and enables raw mode.
//! 6. Spawn the event task and the network worker, then issue the initial
//!    rules and dashboard fetches so both panels populate without user
//!    action. Their failures degrade silently to loading placeholders.
//!
//! # Safety
//!
//! `restore_tui()` is called after the event loop exits (normal quit,
//! SIGTERM, or channel close). The loop exits only via `break`, never `?`,
//! so the restore call is always reached; the panic hook covers panics.

mod app;
mod event;
mod highlight;
mod net;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;

use revu_client::{ReviewClient, DEFAULT_BASE_URL};
use tracing::info;

use crate::net::types::ApiRequest;
use crate::ui::keybindings::{handle_key, KeyAction};

/// Returns the path to the revu config file.
///
/// Prefers `$XDG_CONFIG_HOME/revu/config.toml`; falls back to
/// `~/.config/revu/config.toml` when the env var is absent.
fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".config"));
    base.join("revu").join("config.toml")
}

/// Loads `(base_url, theme_name)` from the config file.
///
/// Missing file, parse errors, and absent keys are all soft failures that
/// fall back to the defaults — config problems never prevent startup.
fn load_config() -> (String, String) {
    let defaults = (DEFAULT_BASE_URL.to_owned(), "dark".to_owned());
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return defaults,
    };
    let table: toml::Table = match toml::from_str(&raw) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("revu: config parse error in {:?}: {}", path, e);
            return defaults;
        }
    };
    let base_url = table
        .get("base_url")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_owned();
    let theme = table
        .get("theme")
        .and_then(|v| v.as_str())
        .unwrap_or("dark")
        .to_owned();
    (base_url, theme)
}

/// Initialises tracing with a file writer under `.revu/`.
///
/// ANSI is disabled because the log is a plain file; the level can be
/// raised with the usual `RUST_LOG` filter syntax.
fn init_logging() -> anyhow::Result<()> {
    std::fs::create_dir_all(".revu")?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(".revu/revu.log")?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Arc::new(log_file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 0: config and logging — read-only / file-only, safe before TUI.
    let (base_url, theme_name) = load_config();
    init_logging()?;
    info!("starting revu against {base_url}");

    let theme = theme::Theme::from_name(&theme_name);
    let client = ReviewClient::new(&base_url)?;
    let mut state = app::AppState::new(client.clone());

    // Step 1: panic hook installed before the terminal is touched.
    tui::install_panic_hook();

    // Step 2: SIGTERM flag — polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 3: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 4: event channel and background tasks.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let (api_tx, api_rx) = tokio::sync::mpsc::unbounded_channel();
    net::worker::spawn_api_worker(client, api_rx, handler.tx.clone());
    state.api_tx = Some(api_tx.clone());

    // Step 5: initial fetches. Failures degrade to loading placeholders.
    let _ = api_tx.send(ApiRequest::FetchRules);
    let _ = api_tx.send(ApiRequest::FetchDashboard);

    // Event loop — exits only via `break`, never via `?`, so `restore_tui()`
    // is always reached. Draw errors propagate out of the loop via the
    // stored result.
    let mut draw_error: Option<std::io::Error> = None;
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no crossterm/tick/render events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        if let Err(e) =
                            terminal.draw(|frame| ui::render(frame, &mut state, &theme))
                        {
                            draw_error = Some(e);
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Api(response)) => {
                        state.apply_api(*response);
                    }
                    Some(event::AppEvent::Tick) => {
                        state.on_tick();
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled automatically by ratatui on the next
                        // Render: frame.area() returns the new size.
                    }
                    Some(event::AppEvent::Mouse(_)) => {}
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                // Check SIGTERM after every event too, not just on the
                // heartbeat, so quit latency is at most one event cycle.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Restore the terminal at the single exit point of the loop — covers
    // normal quit, SIGTERM, draw failure, and channel close. The panic hook
    // handles the panic path separately.
    tui::restore_tui()?;
    if let Some(e) = draw_error {
        return Err(e.into());
    }
    Ok(())
}
