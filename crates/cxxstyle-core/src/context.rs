//! Context types for rule execution.

use crate::config::AllowList;
use crate::token::SourcePos;
use crate::types::Location;
use std::collections::{btree_map, BTreeMap};
use std::path::Path;

/// Context provided to per-file rules.
///
/// Bundles the source text with the checker-wide identifier allow-list
/// so rules can build diagnostics and honor exemptions without carrying
/// configuration themselves.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file, as given to the checker.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Identifier allow-list compiled from configuration.
    pub allowlist: &'a AllowList,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, allowlist: &'a AllowList) -> Self {
        Self {
            path,
            content,
            allowlist,
        }
    }

    /// Builds a [`Location`] in this file from a source position.
    #[must_use]
    pub fn location(&self, pos: SourcePos, length: usize) -> Location {
        Location::new(self.path.to_path_buf(), pos.line, pos.column).with_span(pos.offset, length)
    }

    /// Whether `identifier` is exempt from naming rules.
    #[must_use]
    pub fn is_identifier_allowed(&self, identifier: &str) -> bool {
        self.allowlist.matches(identifier)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.lines().enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        offset
    }
}

/// Namespace paths observed across a project, with the location each
/// path was first opened at.
///
/// "First" means smallest `(file, line, column)`, so merge order does
/// not affect the result.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTable {
    paths: BTreeMap<Vec<String>, Location>,
}

impl NamespaceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a namespace path, keeping the earliest location seen.
    pub fn record(&mut self, path: Vec<String>, location: Location) {
        match self.paths.entry(path) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(location);
            }
            btree_map::Entry::Occupied(mut entry) => {
                let current = entry.get();
                let incoming = (&location.file, location.line, location.column);
                if incoming < (&current.file, current.line, current.column) {
                    entry.insert(location);
                }
            }
        }
    }

    /// Merges another table into this one.
    pub fn merge(&mut self, other: NamespaceTable) {
        for (path, location) in other.paths {
            self.record(path, location);
        }
    }

    /// Iterates over recorded paths in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &Location)> {
        self.paths.iter().map(|(path, loc)| (path.as_slice(), loc))
    }

    /// Number of distinct paths recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Context provided to project-wide rules.
///
/// Aggregated from every file the checker visited in a run.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    /// All namespace paths opened anywhere in the project.
    pub namespaces: NamespaceTable,
}

impl ProjectContext {
    /// Creates a project context from an aggregated namespace table.
    #[must_use]
    pub fn new(namespaces: NamespaceTable) -> Self {
        Self { namespaces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn loc(file: &str, line: usize, column: usize) -> Location {
        Location::new(PathBuf::from(file), line, column)
    }

    #[test]
    fn test_offset_calculation() {
        let allowlist = AllowList::default();
        let content = "line1\nline2\nline3";
        let ctx = FileContext::new(Path::new("test.cpp"), content, &allowlist);

        assert_eq!(ctx.offset_for(1, 1), 0); // Start of line 1
        assert_eq!(ctx.offset_for(2, 1), 6); // Start of line 2
        assert_eq!(ctx.offset_for(2, 3), 8); // "ne" in line2
    }

    #[test]
    fn test_location_from_pos() {
        let allowlist = AllowList::default();
        let ctx = FileContext::new(Path::new("test.cpp"), "int x;\n", &allowlist);
        let pos = SourcePos {
            line: 1,
            column: 5,
            offset: 4,
        };

        let location = ctx.location(pos, 1);
        assert_eq!(location.file, PathBuf::from("test.cpp"));
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 5);
        assert_eq!(location.offset, 4);
        assert_eq!(location.length, 1);
    }

    #[test]
    fn namespace_table_keeps_earliest_location() {
        let path = vec!["kmx".to_string(), "gis".to_string()];
        let mut table = NamespaceTable::new();
        table.record(path.clone(), loc("b.cpp", 10, 1));
        table.record(path.clone(), loc("a.cpp", 20, 1));
        table.record(path.clone(), loc("a.cpp", 5, 3));

        assert_eq!(table.len(), 1);
        let (_, location) = table.iter().next().expect("one entry");
        assert_eq!(location.file, PathBuf::from("a.cpp"));
        assert_eq!(location.line, 5);
    }

    #[test]
    fn namespace_table_merge_is_order_independent() {
        let path = vec!["app".to_string()];

        let mut left = NamespaceTable::new();
        left.record(path.clone(), loc("z.cpp", 1, 1));
        let mut right = NamespaceTable::new();
        right.record(path.clone(), loc("a.cpp", 9, 9));

        let mut forward = left.clone();
        forward.merge(right.clone());
        let mut backward = right;
        backward.merge(left);

        let fwd = forward.iter().next().expect("entry").1.clone();
        let bwd = backward.iter().next().expect("entry").1.clone();
        assert_eq!(fwd.file, bwd.file);
        assert_eq!(fwd.file, PathBuf::from("a.cpp"));
    }
}
