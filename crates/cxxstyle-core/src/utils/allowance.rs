//! Comment-based suppression directives.
//!
//! Supports directives like:
//! ```text
//! // cxxstyle: allow(identifier-case) reason="external ABI"
//! ```
//!
//! A directive suppresses matching diagnostics on its own line and on
//! the line directly below, so it works both as a standalone comment
//! above the flagged code and as a trailing comment on the flagged
//! line itself.

use std::collections::HashSet;

/// State of suppression for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowState {
    /// Rule is not suppressed (default).
    Denied,
    /// Rule is explicitly suppressed.
    Allowed,
}

impl AllowState {
    /// Returns true if suppressed.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// Result of checking for a suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not suppressed.
    Denied,
    /// Rule is suppressed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if suppressed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if suppressed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed suppression directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names or codes that are suppressed.
    pub rules: HashSet<String>,
    /// Optional reason for the suppression.
    pub reason: Option<String>,
}

/// Checks source code for suppression comments.
///
/// Looks for comments in the format:
/// ```text
/// // cxxstyle: allow(rule1, rule2) reason="explanation"
/// ```
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule` - Name or code of the rule to check for
///
/// # Returns
///
/// `AllowState::Allowed` if a suppression directive is found for the rule.
#[must_use]
pub fn check_allow_comment(content: &str, line: usize, rule: &str) -> AllowState {
    match check_allow_with_reason(content, line, rule) {
        AllowCheck::Allowed { .. } => AllowState::Allowed,
        AllowCheck::Denied => AllowState::Denied,
    }
}

/// Checks source code for suppression comments with reason.
///
/// Looks for comments in the format:
/// ```text
/// // cxxstyle: allow(rule1, rule2) reason="explanation"
/// ```
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule` - Name or code of the rule to check for
///
/// # Returns
///
/// `AllowCheck::Allowed` with optional reason if a suppression
/// directive is found.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule: &str) -> AllowCheck {
    // Check the line itself and the line before
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        let line_content = lines[check_line - 1];
        if let Some(directive) = parse_allow_directive(line_content) {
            if directive.rules.contains(rule) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses a suppression directive from a source line.
///
/// The comment may start anywhere in the line, so directives work as
/// trailing comments after code.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    for (idx, _) in line.match_indices("//") {
        let comment_content = line[idx + 2..].trim_start_matches('/').trim();

        // Check for cxxstyle: allow(...) directive
        let Some(directive) = comment_content.strip_prefix("cxxstyle:") else {
            continue;
        };
        let Some(allow_content) = directive.trim().strip_prefix("allow(") else {
            continue;
        };
        let allow_content = allow_content.trim();

        // Find closing paren
        let Some(paren_end) = allow_content.find(')') else {
            continue;
        };
        let rules_str = &allow_content[..paren_end];

        // Parse rules
        let rules: HashSet<String> = rules_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if rules.is_empty() {
            continue;
        }

        // Parse optional reason
        let rest = allow_content[paren_end + 1..].trim();
        let reason = if let Some(reason_part) = rest.strip_prefix("reason=") {
            let reason_part = reason_part.trim();
            if reason_part.starts_with('"') && reason_part.len() > 1 {
                let end = reason_part[1..].find('"').map(|i| i + 1)?;
                Some(reason_part[1..end].to_string())
            } else {
                None
            }
        } else {
            None
        };

        return Some(AllowDirective { rules, reason });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// cxxstyle: allow(identifier-case)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("identifier-case"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("// cxxstyle: allow(missing-noexcept) reason=\"may throw\"");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("missing-noexcept"));
        assert_eq!(directive.reason, Some("may throw".to_string()));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("// cxxstyle: allow(rule1, rule2, rule3)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("rule1"));
        assert!(directive.rules.contains("rule2"));
        assert!(directive.rules.contains("rule3"));
    }

    #[test]
    fn test_parse_trailing_comment() {
        let directive =
            parse_allow_directive("int LegacyName; // cxxstyle: allow(identifier-case)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("identifier-case"));
    }

    #[test]
    fn test_parse_rule_codes() {
        let directive = parse_allow_directive("// cxxstyle: allow(CS101, CS103)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("CS101"));
        assert!(directive.rules.contains("CS103"));
    }

    #[test]
    fn test_plain_comment_is_not_a_directive() {
        assert!(parse_allow_directive("// allow(identifier-case)").is_none());
        assert!(parse_allow_directive("int x; // ordinary comment").is_none());
        assert!(parse_allow_directive("int x = a / b; // half").is_none());
    }

    #[test]
    fn test_check_allow_comment_line_above() {
        let content = r#"void foo() {
    // cxxstyle: allow(identifier-case)
    int BadName = 0;
}"#;

        assert_eq!(
            check_allow_comment(content, 3, "identifier-case"),
            AllowState::Allowed
        );
        assert_eq!(
            check_allow_comment(content, 3, "other-rule"),
            AllowState::Denied
        );
    }

    #[test]
    fn test_check_allow_comment_same_line() {
        let content = "int BadName = 0; // cxxstyle: allow(identifier-case)\n";

        assert_eq!(
            check_allow_comment(content, 1, "identifier-case"),
            AllowState::Allowed
        );
    }

    #[test]
    fn test_check_allow_all() {
        let content = "int BadName = 0; // cxxstyle: allow(all)\n";

        assert_eq!(
            check_allow_comment(content, 1, "identifier-case"),
            AllowState::Allowed
        );
        assert_eq!(
            check_allow_comment(content, 1, "member-underscore"),
            AllowState::Allowed
        );
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content = r#"void foo() {
    // cxxstyle: allow(missing-const) reason="mutated through alias"
    int counter = 0;
}"#;

        let result = check_allow_with_reason(content, 3, "missing-const");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("mutated through alias"));
    }

    #[test]
    fn test_check_allow_denied() {
        let content = r#"void foo() {
    int counter = 0;
}"#;

        let result = check_allow_with_reason(content, 2, "missing-const");
        assert!(!result.is_allowed());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_directive_does_not_reach_two_lines_down() {
        let content = r#"// cxxstyle: allow(identifier-case)

int BadName = 0;
"#;

        assert_eq!(
            check_allow_comment(content, 3, "identifier-case"),
            AllowState::Denied
        );
    }
}
