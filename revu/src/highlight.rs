//! Syntax highlighting for the editor panel.
//!
//! Converts the session buffer into pre-styled ratatui lines with syntect.
//! Highlighting runs once per buffer mutation (edit, upload, filename
//! change), never per frame; the render path only clones the cached lines.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlights every buffer line for the syntax matching `extension`.
///
/// One `HighlightLines` instance walks the whole buffer so multi-line
/// constructs (block comments, string continuations) keep their state.
/// Falls back to unstyled lines when the theme set is empty.
pub fn highlight_buffer(lines: &[String], extension: &str) -> Vec<Line<'static>> {
    let theme = TS
        .themes
        .get("base16-ocean.dark")
        .or_else(|| TS.themes.values().next());
    let syntax = PS
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| PS.find_syntax_plain_text());

    let Some(theme) = theme else {
        return lines.iter().map(|l| Line::raw(l.clone())).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    lines
        .iter()
        .map(|line| Line::from(build_syntect_spans(line, &mut highlighter, &PS)))
        .collect()
}

/// Extracts the extension from a filename, defaulting to "java".
///
/// The default matters: pasted code is tracked under the configured filename,
/// and an extension-less name should still highlight as Java source.
pub fn file_ext(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "java",
    }
}

/// Builds syntect-highlighted spans for a single line of code.
///
/// Returns owned `Vec<Span<'static>>`. Falls back to a plain unstyled span
/// on highlighter error.
fn build_syntect_spans(
    code: &str,
    highlighter: &mut HighlightLines,
    ps: &SyntaxSet,
) -> Vec<Span<'static>> {
    let ranges = highlighter.highlight_line(code, ps).unwrap_or_default();
    let spans: Vec<Span<'static>> = ranges
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text))
        .collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Rebuilds color and modifier fields by hand — syntect's style types do not
/// map directly onto ratatui's, and the background is dropped so the
/// diagnostic line classes can supply their own.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::Color as SC;
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 {
            Some(Color::Rgb(c.r, c.g, c.b))
        } else {
            None
        }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style
        .font_style
        .contains(syntect::highlighting::FontStyle::UNDERLINE)
    {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ext_defaults_to_java() {
        assert_eq!(file_ext("MyClass.java"), "java");
        assert_eq!(file_ext("notes.txt"), "txt");
        assert_eq!(file_ext("Makefile"), "java");
        assert_eq!(file_ext("weird."), "java");
    }

    #[test]
    fn highlight_preserves_line_count_and_text() {
        let lines = vec![
            "public class A {".to_owned(),
            "    int x = 1;".to_owned(),
            "}".to_owned(),
        ];
        let highlighted = highlight_buffer(&lines, "java");
        assert_eq!(highlighted.len(), lines.len());
        for (line, source) in highlighted.iter().zip(&lines) {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            assert_eq!(&text, source);
        }
    }
}
