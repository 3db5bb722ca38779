//! Deduplication and ordering of diagnostics.

use crate::types::Diagnostic;

/// Collects diagnostics from every rule and file, then produces the
/// final report order.
///
/// Two diagnostics are duplicates only when they are exact repeats:
/// same `(code, file, line, column, message)`. Distinct findings that
/// happen to share a position, such as several missing documentation
/// tags on one declaration, all survive. Output is sorted by `(file,
/// line, column, code)` with the message as a final tiebreaker, so a
/// report is stable across runs and across thread scheduling.
#[derive(Debug, Default)]
pub struct DiagnosticAggregator {
    items: Vec<Diagnostic>,
}

impl DiagnosticAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Adds every diagnostic from `batch`.
    pub fn add_all(&mut self, batch: Vec<Diagnostic>) {
        self.items.extend(batch);
    }

    /// Number of diagnostics collected so far, before deduplication.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorts, deduplicates, and returns the final diagnostic list.
    #[must_use]
    pub fn finish(self) -> Vec<Diagnostic> {
        let mut items = self.items;
        items.sort_by(|a, b| {
            (
                &a.location.file,
                a.location.line,
                a.location.column,
                &a.code,
                &a.message,
            )
                .cmp(&(
                    &b.location.file,
                    b.location.line,
                    b.location.column,
                    &b.code,
                    &b.message,
                ))
        });
        items.dedup_by(|a, b| {
            a.code == b.code
                && a.location.file == b.location.file
                && a.location.line == b.location.line
                && a.location.column == b.location.column
                && a.message == b.message
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use std::path::PathBuf;

    fn diag(code: &str, file: &str, line: usize, column: usize, message: &str) -> Diagnostic {
        Diagnostic::new(
            code,
            "test-rule",
            Severity::Error,
            Location::new(PathBuf::from(file), line, column),
            message,
        )
    }

    #[test]
    fn sorts_by_file_line_column_code() {
        let mut agg = DiagnosticAggregator::new();
        agg.add(diag("CS102", "b.cpp", 1, 1, "second file"));
        agg.add(diag("CS101", "a.cpp", 9, 1, "later line"));
        agg.add(diag("CS102", "a.cpp", 2, 5, "same pos, higher code"));
        agg.add(diag("CS101", "a.cpp", 2, 5, "same pos, lower code"));

        let out = agg.finish();
        let keys: Vec<_> = out
            .iter()
            .map(|d| (d.location.file.clone(), d.location.line, d.code.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (PathBuf::from("a.cpp"), 2, "CS101".to_string()),
                (PathBuf::from("a.cpp"), 2, "CS102".to_string()),
                (PathBuf::from("a.cpp"), 9, "CS101".to_string()),
                (PathBuf::from("b.cpp"), 1, "CS102".to_string()),
            ]
        );
    }

    #[test]
    fn exact_repeats_collapse() {
        let mut agg = DiagnosticAggregator::new();
        agg.add(diag("CS101", "a.cpp", 3, 7, "not lower_snake_case"));
        agg.add(diag("CS101", "a.cpp", 3, 7, "not lower_snake_case"));

        let out = agg.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "not lower_snake_case");
    }

    #[test]
    fn distinct_findings_at_one_position_survive() {
        let mut agg = DiagnosticAggregator::new();
        agg.add(diag("CS501", "a.cpp", 3, 7, "Missing `@brief` documentation"));
        agg.add(diag("CS501", "a.cpp", 3, 7, "Missing `@return` documentation"));

        let out = agg.finish();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn same_position_different_codes_both_survive() {
        let mut agg = DiagnosticAggregator::new();
        agg.add(diag("CS101", "a.cpp", 3, 7, "case"));
        agg.add(diag("CS103", "a.cpp", 3, 7, "underscore"));

        assert_eq!(agg.finish().len(), 2);
    }

    #[test]
    fn finish_is_deterministic_across_insertion_orders() {
        let batch = vec![
            diag("CS101", "a.cpp", 1, 1, "x"),
            diag("CS201", "b.cpp", 4, 2, "y"),
            diag("CS102", "a.cpp", 8, 1, "z"),
        ];

        let mut forward = DiagnosticAggregator::new();
        forward.add_all(batch.clone());
        let mut backward = DiagnosticAggregator::new();
        backward.add_all(batch.into_iter().rev().collect());

        let keys = |items: Vec<Diagnostic>| -> Vec<(String, PathBuf, usize, usize)> {
            items
                .into_iter()
                .map(|d| (d.code, d.location.file, d.location.line, d.location.column))
                .collect()
        };
        assert_eq!(keys(forward.finish()), keys(backward.finish()));
    }
}
