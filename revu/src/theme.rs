//! Color theme system for revu.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface revu renders. Two built-in themes are provided:
//!
//! - `dark` — ANSI 16 colors only, so it works on any terminal including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin-mocha` — Catppuccin Mocha palette in RGB; needs truecolor.

use ratatui::style::Color;

/// All color values used across revu's UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field`
/// directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Editor
    /// Line-number gutter text.
    pub gutter: Color,
    /// Background for lines carrying an ERROR issue.
    pub line_error_bg: Color,
    /// Background for lines carrying a SECURITY issue (and no error).
    pub line_security_bg: Color,
    /// Background for lines carrying any other issue.
    pub line_warning_bg: Color,
    /// Cursor-line foreground accent in Insert mode.
    pub cursor_line: Color,

    // Issues panel
    /// Issue category tag (`[ERROR]`, `[SECURITY]`, …).
    pub issue_category: Color,
    /// Suggestion text under an issue.
    pub issue_suggestion: Color,

    // Severity badges
    /// Badge color for HIGH severity.
    pub badge_high: Color,
    /// Badge color for MEDIUM severity.
    pub badge_medium: Color,
    /// Badge color for LOW severity.
    pub badge_low: Color,

    // Rules panel
    /// Checkbox mark for an enabled rule.
    pub rule_enabled: Color,
    /// Checkbox mark for a disabled rule.
    pub rule_disabled: Color,

    // Dashboard
    /// Counter values in the dashboard strip.
    pub dashboard_value: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,
    /// Analyze error message text.
    pub status_error: Color,
    /// "Analyzing..." / "Saving..." progress text.
    pub status_busy: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is
    /// unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            gutter: Color::DarkGray,
            line_error_bg: Color::Red,
            line_security_bg: Color::Magenta,
            line_warning_bg: Color::Yellow,
            cursor_line: Color::Cyan,

            issue_category: Color::Cyan,
            issue_suggestion: Color::Green,

            badge_high: Color::Red,
            badge_medium: Color::Yellow,
            badge_low: Color::Blue,

            rule_enabled: Color::Green,
            rule_disabled: Color::DarkGray,

            dashboard_value: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_error: Color::Red,
            status_busy: Color::Yellow,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Colors degrade to the nearest ANSI 256-color approximation on
    /// non-truecolor terminals, with reduced fidelity. Use `dark()` on SSH
    /// or 256-color terminals.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        // Catppuccin Mocha palette (selected subset)
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let maroon = Color::Rgb(235, 160, 172); // #eba0ac

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            gutter: overlay1,
            line_error_bg: Color::Rgb(88, 42, 58),
            line_security_bg: Color::Rgb(70, 45, 82),
            line_warning_bg: Color::Rgb(84, 74, 46),
            cursor_line: teal,

            issue_category: teal,
            issue_suggestion: green,

            badge_high: red,
            badge_medium: peach,
            badge_low: blue,

            rule_enabled: green,
            rule_disabled: overlay1,

            dashboard_value: text,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_error: maroon,
            status_busy: yellow,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never
    /// prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("revu: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}
