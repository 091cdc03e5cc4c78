//! Central application state for revu.
//!
//! This module owns all mutable UI state: the current mode, which panel has
//! focus, per-panel scroll offsets and viewport heights, the prompt input,
//! and, through [`ReviewSession`] and [`RuleStore`], every piece of review
//! state. No ratatui rendering logic lives here; `app.rs` is pure state read
//! by the render module and mutated by the keybinding dispatcher and the
//! network settlements.

use std::path::PathBuf;

use ratatui::text::Line;
use ratatui::widgets::ListState;
use revu_client::{ReportFormat, ReviewClient};
use revu_core::rules::RuleStore;
use revu_core::session::ReviewSession;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::highlight::{file_ext, highlight_buffer};
use crate::net::types::{ApiRequest, ApiResponse};

/// Editor mode controlling which keybinding set is active.
///
/// The default mode is `Normal`. Transitions are driven by the keybinding
/// dispatcher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Vim-style navigation mode (default).
    #[default]
    Normal,
    /// Character insertion into the cursor line of the editor.
    Insert,
    /// Single-line text prompt (upload path or filename).
    Prompt(PromptKind),
    /// Full-screen help overlay shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown when unsaved rule edits exist.
    ConfirmQuit,
}

/// What the active prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path of a local file to upload for analysis.
    UploadPath,
    /// Filename accompanying analyze-text submissions.
    Filename,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles Rules → Editor → Issues → Rules via `next()` and in
/// reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing the analysis rules.
    Rules,
    /// Centre panel holding the editable source buffer.
    #[default]
    Editor,
    /// Right panel listing the current result's issues.
    Issues,
}

impl PanelFocus {
    /// Returns the panel that precedes `self` in the cycle (wraps around).
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Rules => PanelFocus::Issues,
            PanelFocus::Editor => PanelFocus::Rules,
            PanelFocus::Issues => PanelFocus::Editor,
        }
    }

    /// Returns the panel that follows `self` in the cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Rules => PanelFocus::Editor,
            PanelFocus::Editor => PanelFocus::Issues,
            PanelFocus::Issues => PanelFocus::Rules,
        }
    }
}

/// Number of 250 ms logic ticks a transient status message stays visible.
const STATUS_MESSAGE_TICKS: u8 = 24;

/// All mutable UI state passed through every render cycle.
///
/// Bundled so the render function receives a single reference and the
/// keybinding dispatcher a single mutable reference.
pub struct AppState {
    /// Current mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives keyboard navigation events.
    pub focus: PanelFocus,

    /// The review-session controller, sole owner of buffer/result/dashboard.
    pub session: ReviewSession,
    /// The optimistic rule store.
    pub rules: RuleStore,
    /// HTTP client, kept for pure URL derivation (report export).
    pub client: ReviewClient,
    /// Send half of the request channel to the network worker.
    pub api_tx: Option<UnboundedSender<ApiRequest>>,

    /// Cursor line in the editor (0-based buffer index).
    pub cursor_line: usize,
    /// Cursor column in the editor (character index within the line).
    pub cursor_col: usize,
    /// First visible buffer line in the editor viewport.
    pub editor_scroll: usize,
    /// Syntax-highlighted buffer lines, recomputed on buffer mutation only.
    pub editor_lines: Vec<Line<'static>>,

    /// Vertical scroll offset for the issues `Paragraph` (right panel).
    pub issues_scroll: u16,
    /// Stateful list widget backing the rules panel (left).
    pub rules_state: ListState,

    /// Inner height of the editor panel after borders, cached after each render.
    pub editor_viewport_height: u16,
    /// Inner height of the issues panel after borders, cached after each render.
    pub issues_viewport_height: u16,
    /// Inner height of the rules panel after borders, cached after each render.
    pub rules_viewport_height: u16,

    /// Live input of the active prompt (valid while `mode` is `Prompt`).
    pub prompt_input: String,
    /// Transient status-bar message (export URL, etc.).
    pub status_message: Option<String>,
    status_message_ticks: u8,
    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,
}

impl AppState {
    /// Constructs the initial state around a configured HTTP client.
    ///
    /// The session starts with the placeholder document; its highlight cache
    /// is computed immediately so the first frame renders real content.
    pub fn new(client: ReviewClient) -> Self {
        let session = ReviewSession::new();
        let editor_lines =
            highlight_buffer(session.buffer().lines(), file_ext(session.filename()));
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            session,
            rules: RuleStore::new(),
            client,
            api_tx: None,
            cursor_line: 0,
            cursor_col: 0,
            editor_scroll: 0,
            editor_lines,
            issues_scroll: 0,
            rules_state: ListState::default(),
            editor_viewport_height: 0,
            issues_viewport_height: 0,
            rules_viewport_height: 0,
            prompt_input: String::new(),
            status_message: None,
            status_message_ticks: 0,
            help_scroll: 0,
        }
    }

    fn request(&self, request: ApiRequest) {
        if let Some(tx) = &self.api_tx {
            let _ = tx.send(request);
        }
    }

    // --- network settlement -------------------------------------------------

    /// Applies one worker settlement to the session/store state.
    ///
    /// This is the only place the dashboard refresh that follows a successful
    /// analysis is issued, and it is issued strictly after the settlement has
    /// been applied; a stale (discarded) settlement triggers nothing.
    pub fn apply_api(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::AnalyzeOk { seq, result } => {
                if self.session.settle_analyze_ok(seq, result) {
                    self.request(ApiRequest::FetchDashboard);
                }
            }
            ApiResponse::UploadOk {
                seq,
                result,
                filename,
                contents,
            } => {
                if self
                    .session
                    .settle_upload_ok(seq, result, &filename, &contents)
                {
                    self.clamp_cursor();
                    self.refresh_highlight();
                    self.request(ApiRequest::FetchDashboard);
                }
            }
            ApiResponse::AnalyzeFailed { seq, message } => {
                self.session.settle_analyze_err(seq, &message);
            }
            ApiResponse::Dashboard(summary) => self.session.apply_dashboard(summary),
            ApiResponse::Rules(rules) => {
                self.rules.load_complete(rules);
                if self.rules_state.selected().is_none() && !self.rules.rules().is_empty() {
                    self.rules_state.select(Some(0));
                }
            }
            ApiResponse::RulesSaved => self.rules.save_succeeded(),
            // No rollback and no user-visible error: the dirty marker in the
            // rules panel is the only surface for a failed save.
            ApiResponse::RulesSaveFailed => self.rules.save_failed(),
        }
    }

    // --- user operations ----------------------------------------------------

    /// Submits the buffer for analysis if the session grants a ticket.
    pub fn submit_analyze(&mut self) {
        if let Some(ticket) = self.session.begin_analyze_text() {
            self.request(ApiRequest::AnalyzeText {
                seq: ticket.seq,
                code: ticket.code,
                filename: ticket.filename,
            });
        }
    }

    /// Submits a local file for upload analysis.
    pub fn submit_upload(&mut self, path: PathBuf) {
        if let Some(seq) = self.session.begin_analyze_file() {
            self.request(ApiRequest::AnalyzeUpload { seq, path });
        }
    }

    /// Toggles the rule currently selected in the rules panel.
    pub fn toggle_selected_rule(&mut self) {
        let Some(selected) = self.rules_state.selected() else {
            return;
        };
        let Some(name) = self.rules.rules().keys().nth(selected).cloned() else {
            return;
        };
        // NotLoaded cannot happen once a selection exists; ignore regardless.
        let _ = self.rules.toggle(&name);
    }

    /// Starts a rules save unless one is already in flight.
    pub fn save_rules(&mut self) {
        if let Ok(payload) = self.rules.begin_save() {
            self.request(ApiRequest::SaveRules(payload));
        }
    }

    /// Manually refreshes the dashboard snapshot.
    pub fn refresh_dashboard(&self) {
        self.request(ApiRequest::FetchDashboard);
    }

    /// Derives and surfaces the report-export locator for the current result.
    ///
    /// A no-op when no analysis exists yet. The URL is only derived and
    /// shown, never fetched.
    pub fn export_report(&mut self, format: ReportFormat) {
        let Some(analysis) = self.session.analysis() else {
            return;
        };
        let url = self.client.export_report_url(analysis.review_id, format);
        info!("report export: {url}");
        self.set_status_message(format!("Report: {url}"));
    }

    // --- editor -------------------------------------------------------------

    /// Recomputes the syntax-highlight cache from the session buffer.
    ///
    /// Called after every buffer mutation and filename change, never per
    /// frame.
    pub fn refresh_highlight(&mut self) {
        self.editor_lines = highlight_buffer(
            self.session.buffer().lines(),
            file_ext(self.session.filename()),
        );
    }

    /// Keeps the cursor inside the buffer after wholesale replacement.
    pub fn clamp_cursor(&mut self) {
        let last = self.session.buffer().line_count().saturating_sub(1);
        self.cursor_line = self.cursor_line.min(last);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
        self.editor_scroll = self.editor_scroll.min(last);
        self.ensure_cursor_visible();
    }

    fn current_line_len(&self) -> usize {
        self.session
            .buffer()
            .line(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Scrolls the editor viewport so the cursor line is visible.
    pub fn ensure_cursor_visible(&mut self) {
        let viewport = self.editor_viewport_height.max(1) as usize;
        if self.cursor_line < self.editor_scroll {
            self.editor_scroll = self.cursor_line;
        } else if self.cursor_line >= self.editor_scroll + viewport {
            self.editor_scroll = self.cursor_line + 1 - viewport;
        }
    }

    /// Moves the editor cursor up `lines` rows, clamping the column.
    pub fn cursor_up(&mut self, lines: usize) {
        self.cursor_line = self.cursor_line.saturating_sub(lines);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
        self.ensure_cursor_visible();
    }

    /// Moves the editor cursor down `lines` rows, clamping the column.
    pub fn cursor_down(&mut self, lines: usize) {
        let last = self.session.buffer().line_count().saturating_sub(1);
        self.cursor_line = (self.cursor_line + lines).min(last);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
        self.ensure_cursor_visible();
    }

    /// Moves the editor cursor one character left.
    pub fn cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    /// Moves the editor cursor one character right (clamped to line end).
    pub fn cursor_right(&mut self) {
        self.cursor_col = (self.cursor_col + 1).min(self.current_line_len());
    }

    /// Inserts a character at the cursor within the current line.
    ///
    /// Single-line mutation only: the line count never changes from typing.
    pub fn insert_char(&mut self, c: char) {
        let Some(line) = self.session.buffer().line(self.cursor_line) else {
            return;
        };
        let mut edited = line.to_owned();
        let at = byte_offset(&edited, self.cursor_col);
        edited.insert(at, c);
        self.session.set_line(self.cursor_line, &edited);
        self.cursor_col += 1;
        self.refresh_highlight();
    }

    /// Removes the character before the cursor within the current line.
    pub fn backspace(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        let Some(line) = self.session.buffer().line(self.cursor_line) else {
            return;
        };
        let mut edited = line.to_owned();
        let start = byte_offset(&edited, self.cursor_col - 1);
        let end = byte_offset(&edited, self.cursor_col);
        edited.replace_range(start..end, "");
        self.session.set_line(self.cursor_line, &edited);
        self.cursor_col -= 1;
        self.refresh_highlight();
    }

    // --- panel scrolling ----------------------------------------------------

    /// Scrolls the focused panel down by `lines` rows.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Rules => self.rules_state.scroll_down_by(lines),
            PanelFocus::Editor => self.cursor_down(lines as usize),
            PanelFocus::Issues => {
                self.issues_scroll = self.issues_scroll.saturating_add(lines);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Rules => self.rules_state.scroll_up_by(lines),
            PanelFocus::Editor => self.cursor_up(lines as usize),
            PanelFocus::Issues => {
                self.issues_scroll = self.issues_scroll.saturating_sub(lines);
            }
        }
    }

    /// Scrolls the focused panel to the very top.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Rules => self.rules_state.select_first(),
            PanelFocus::Editor => {
                self.cursor_line = 0;
                self.cursor_col = 0;
                self.ensure_cursor_visible();
            }
            PanelFocus::Issues => self.issues_scroll = 0,
        }
    }

    /// Scrolls the focused panel to the very bottom.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Rules => self.rules_state.select_last(),
            PanelFocus::Editor => {
                self.cursor_line = self.session.buffer().line_count().saturating_sub(1);
                self.cursor_col = self.cursor_col.min(self.current_line_len());
                self.ensure_cursor_visible();
            }
            PanelFocus::Issues => self.issues_scroll = u16::MAX,
        }
    }

    /// Scrolls the focused panel down by half its visible height.
    ///
    /// Uses the viewport height cached from the previous render; scrolls by
    /// one on the first frame when no height is cached yet.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel up by half its visible height.
    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel down by its full visible height.
    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport_height().max(1));
    }

    /// Scrolls the focused panel up by its full visible height.
    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport_height().max(1));
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Rules => self.rules_viewport_height,
            PanelFocus::Editor => self.editor_viewport_height,
            PanelFocus::Issues => self.issues_viewport_height,
        }
    }

    // --- transient status message -------------------------------------------

    /// Shows a transient message in the status bar for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_ticks = STATUS_MESSAGE_TICKS;
    }

    /// Advances tick-driven state (message expiry). Called at 4 Hz.
    pub fn on_tick(&mut self) {
        if self.status_message.is_some() {
            self.status_message_ticks = self.status_message_ticks.saturating_sub(1);
            if self.status_message_ticks == 0 {
                self.status_message = None;
            }
        }
    }

    /// True when quitting should ask for confirmation first.
    pub fn has_unsaved_rules(&self) -> bool {
        self.rules.status() != revu_core::rules::RuleStatus::Clean
    }
}

/// Byte offset of the `col`-th character in `line` (end of line if past it).
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}
