//! Keybinding dispatcher for revu.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns
//! a `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so that HelpOverlay, ConfirmQuit,
//! Prompt, Insert, and Normal all have isolated handler functions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

use revu_client::ReportFormat;

use crate::app::{AppState, Mode, PanelFocus, PromptKind};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Mutates `state` in place; the event loop redraws on the next render tick
/// regardless of the return value (except on `Quit`).
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Prompt(kind) => handle_prompt(key, kind, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Scroll keys are tried first, then rules-panel keys, then the remaining
/// global bindings.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_rules_key(key, state) {
        return action;
    }

    match key.code {
        // Panel focus
        KeyCode::Char('H') | KeyCode::BackTab => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('L') | KeyCode::Tab => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }

        // Editing — only meaningful with the editor focused.
        KeyCode::Char('i') if state.focus == PanelFocus::Editor => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }

        // Analyze pipeline
        KeyCode::Char('a') => {
            state.submit_analyze();
            KeyAction::Continue
        }
        KeyCode::Char('u') => {
            enter_prompt(PromptKind::UploadPath, state);
            KeyAction::Continue
        }
        KeyCode::Char('f') => {
            enter_prompt(PromptKind::Filename, state);
            KeyAction::Continue
        }

        // Rules save
        KeyCode::Char('s') => {
            state.save_rules();
            KeyAction::Continue
        }

        // Report export and dashboard refresh
        KeyCode::Char('x') => {
            state.export_report(ReportFormat::Html);
            KeyAction::Continue
        }
        KeyCode::Char('X') => {
            state.export_report(ReportFormat::Txt);
            KeyAction::Continue
        }
        KeyCode::Char('R') => {
            state.refresh_dashboard();
            KeyAction::Continue
        }

        // Help overlay
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        // Quit / confirm-quit
        KeyCode::Char('q') | KeyCode::Esc => {
            if state.has_unsaved_rules() {
                state.mode = Mode::ConfirmQuit;
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }

        _ => KeyAction::Continue,
    }
}

/// Handles rules-panel keys in Normal mode: Space and Enter toggle.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when it
/// should fall through to the rest of the Normal handler.
fn handle_rules_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    if state.focus != PanelFocus::Rules {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.toggle_selected_rule();
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

/// Handles scroll-related keys in Normal mode: j / k / g / G and Ctrl combos.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_down(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_up(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('g') => {
            state.scroll_top();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('G') => {
            state.scroll_bottom();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('d') if ctrl => {
            state.half_page_down();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('u') if ctrl => {
            state.half_page_up();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('f') if ctrl => {
            state.full_page_down();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('b') if ctrl => {
            state.full_page_up();
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Handles a key event while editing the cursor line.
///
/// Only single-line mutation is possible: typing never splits or joins
/// lines, so Enter simply returns to Normal mode like Esc.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.mode = Mode::Normal,
        KeyCode::Left => state.cursor_left(),
        KeyCode::Right => state.cursor_right(),
        KeyCode::Up => state.cursor_up(1),
        KeyCode::Down => state.cursor_down(1),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Prompt mode
// ---------------------------------------------------------------------------

/// Puts the application into a prompt, prefilled where that makes sense.
fn enter_prompt(kind: PromptKind, state: &mut AppState) {
    state.prompt_input = match kind {
        PromptKind::Filename => state.session.filename().to_owned(),
        PromptKind::UploadPath => String::new(),
    };
    state.mode = Mode::Prompt(kind);
}

/// Handles a key event while a prompt is open.
fn handle_prompt(key: KeyEvent, kind: PromptKind, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.prompt_input.clear();
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => commit_prompt(kind, state),
        KeyCode::Backspace => {
            state.prompt_input.pop();
        }
        KeyCode::Char(c) => state.prompt_input.push(c),
        _ => {}
    }
    KeyAction::Continue
}

/// Commits the prompt input.
///
/// An empty upload path is a silent no-op — no selection means no request
/// and no error. An empty filename leaves the tracked name unchanged.
fn commit_prompt(kind: PromptKind, state: &mut AppState) {
    let input = state.prompt_input.trim().to_owned();
    state.prompt_input.clear();
    state.mode = Mode::Normal;
    if input.is_empty() {
        return;
    }
    match kind {
        PromptKind::UploadPath => state.submit_upload(PathBuf::from(input)),
        PromptKind::Filename => {
            state.session.set_filename(&input);
            state.refresh_highlight();
        }
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is shown.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Handles the quit-confirmation dialog.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}
