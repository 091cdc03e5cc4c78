//! Per-line diagnostic classification.
//!
//! A `DiagnosticIndex` is derived from the issue list of one analysis result
//! and answers "how should line N be rendered" in O(1). It is rebuilt from
//! scratch whenever a new result arrives and never merged across analyses;
//! it carries no state of its own beyond the derived map.

use std::collections::HashMap;

use crate::types::{Issue, IssueCategory};

/// The render class applied to one editor line.
///
/// Variant order is the precedence order: when several issues share a line,
/// the highest-ranking class wins. `Error` outranks `Security`, which
/// outranks any other category (rendered as `Warning`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LineClass {
    /// No issue on this line.
    #[default]
    None,
    /// At least one issue, none of category ERROR or SECURITY.
    Warning,
    /// At least one SECURITY issue and no ERROR issue.
    Security,
    /// At least one ERROR issue.
    Error,
}

/// O(1) line-number → render-class lookup, built in one pass over the issues.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticIndex {
    classes: HashMap<u32, LineClass>,
}

impl DiagnosticIndex {
    /// Builds the index from an issue list in a single O(issues) pass.
    ///
    /// Issues without a line number never affect any line's class.
    pub fn build(issues: &[Issue]) -> Self {
        let mut classes: HashMap<u32, LineClass> = HashMap::new();
        for issue in issues {
            let Some(line) = issue.line_number else {
                continue;
            };
            let class = match issue.category {
                IssueCategory::Error => LineClass::Error,
                IssueCategory::Security => LineClass::Security,
                _ => LineClass::Warning,
            };
            let entry = classes.entry(line).or_default();
            if class > *entry {
                *entry = class;
            }
        }
        Self { classes }
    }

    /// Returns the render class for a 1-based line number.
    pub fn classify(&self, line_number: u32) -> LineClass {
        self.classes
            .get(&line_number)
            .copied()
            .unwrap_or(LineClass::None)
    }
}
