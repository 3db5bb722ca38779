//! Rule forbidding word repetition along a namespace path.
//!
//! # Rationale
//!
//! `kmx::gis::gis_data` says "gis" twice; fully qualified names built
//! from such paths read like stutters and usually mean a segment is
//! doing double duty as both module and topic. Each word may appear in
//! only one segment of a path.
//!
//! Runs project-wide: paths are collected from every checked file and
//! each distinct path is judged once, anchored at the earliest location
//! where it is opened.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(namespace-word-repetition)` comment on the
//!   anchoring line

use cxxstyle_core::{Diagnostic, ProjectContext, ProjectRule, Severity};
use std::collections::{HashMap, HashSet};

/// Rule code for namespace-word-repetition.
pub const CODE: &str = "CS202";

/// Rule name for namespace-word-repetition.
pub const NAME: &str = "namespace-word-repetition";

/// Flags namespace paths in which two segments share a word.
#[derive(Debug, Clone)]
pub struct NamespaceRepetition {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NamespaceRepetition {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceRepetition {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl ProjectRule for NamespaceRepetition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids repeating a word across segments of one namespace path"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (path, location) in ctx.namespaces.iter() {
            let Some((word, first, second)) = first_repeated_word(path) else {
                continue;
            };

            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                self.severity,
                location.clone(),
                format!(
                    "Namespace `{}` repeats the word `{}` (segments `{}` and `{}`)",
                    path.join("::"),
                    word,
                    path[first],
                    path[second],
                ),
            ));
        }

        diagnostics
    }
}

/// Finds the first word shared by two different segments, comparing
/// case-insensitively on underscore-split words. Returns the word and
/// the two segment indices.
fn first_repeated_word(path: &[String]) -> Option<(String, usize, usize)> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (index, segment) in path.iter().enumerate() {
        let mut segment_words: HashSet<String> = HashSet::new();
        for word in segment.split('_') {
            if word.is_empty() {
                continue;
            }
            let word = word.to_lowercase();
            // A word twice within one segment is not cross-segment
            // repetition.
            if !segment_words.insert(word.clone()) {
                continue;
            }
            if let Some(&first) = first_seen.get(&word) {
                return Some((word, first, index));
            }
            first_seen.insert(word, index);
        }
    }

    None
}
