//! Rule presets for common configurations.

use crate::{
    AnonymousNamespace, BracePlacement, IdentifierCase, MemberUnderscore, MissingConst,
    MissingNoexcept, NamespaceRepetition, RequiredDocTags, SingleStatementBraces, TabIndentation,
    TemplateParameterCase, TypeAliasSuffix,
};
use cxxstyle_core::{ProjectRuleBox, RuleBox, Severity};

/// Preset configurations for cxxstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Strict rules for maximum conformance.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the per-file rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Returns the project-wide rules for this preset.
    #[must_use]
    pub fn project_rules(self) -> Vec<ProjectRuleBox> {
        match self {
            Self::Recommended | Self::Strict => project_rules(),
            Self::Minimal => Vec::new(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Every rule except `missing-const` (CS301), whose heuristic nature
/// makes it better opted into explicitly.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IdentifierCase::new()),
        Box::new(TypeAliasSuffix::new()),
        Box::new(MemberUnderscore::new()),
        Box::new(TemplateParameterCase::new()),
        Box::new(AnonymousNamespace::new()),
        Box::new(MissingNoexcept::new()),
        Box::new(BracePlacement::new()),
        Box::new(SingleStatementBraces::new()),
        Box::new(TabIndentation::new()),
        Box::new(RequiredDocTags::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules plus `missing-const` (CS301),
/// promoted from its default warning severity to an error.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IdentifierCase::new()),
        Box::new(TypeAliasSuffix::new()),
        Box::new(MemberUnderscore::new()),
        Box::new(TemplateParameterCase::new()),
        Box::new(AnonymousNamespace::new()),
        Box::new(MissingNoexcept::new()),
        Box::new(BracePlacement::new()),
        Box::new(SingleStatementBraces::new()),
        Box::new(TabIndentation::new()),
        Box::new(RequiredDocTags::new()),
        Box::new(MissingConst::new().severity(Severity::Error)),
    ]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only the naming family:
/// - `identifier-case` (CS101)
/// - `type-alias-suffix` (CS102)
/// - `member-underscore` (CS103)
/// - `template-parameter-case` (CS104)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IdentifierCase::new()),
        Box::new(TypeAliasSuffix::new()),
        Box::new(MemberUnderscore::new()),
        Box::new(TemplateParameterCase::new()),
    ]
}

/// Returns all available rules, `missing-const` at its default
/// warning severity.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IdentifierCase::new()),
        Box::new(TypeAliasSuffix::new()),
        Box::new(MemberUnderscore::new()),
        Box::new(TemplateParameterCase::new()),
        Box::new(AnonymousNamespace::new()),
        Box::new(MissingNoexcept::new()),
        Box::new(BracePlacement::new()),
        Box::new(SingleStatementBraces::new()),
        Box::new(TabIndentation::new()),
        Box::new(RequiredDocTags::new()),
        Box::new(MissingConst::new()),
    ]
}

/// Returns the project-wide rules. The namespace table they consume is
/// built no matter which preset runs; `Minimal` simply registers no
/// consumer.
#[must_use]
pub fn project_rules() -> Vec<ProjectRuleBox> {
    vec![Box::new(NamespaceRepetition::new())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Minimal.rules().len(), 4);
        assert_eq!(Preset::Recommended.rules().len(), 10);
        assert_eq!(Preset::Strict.rules().len(), 11);
        assert_eq!(all_rules().len(), 11);
    }

    #[test]
    fn test_missing_const_only_in_strict() {
        let has = |rules: &[RuleBox]| rules.iter().any(|r| r.name() == "missing-const");
        assert!(!has(&Preset::Recommended.rules()));
        assert!(!has(&Preset::Minimal.rules()));
        assert!(has(&Preset::Strict.rules()));
    }

    #[test]
    fn test_rule_codes_are_unique() {
        let rules = all_rules();
        let mut codes: Vec<_> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
    }

    #[test]
    fn test_project_rules_gated_by_preset() {
        assert!(Preset::Minimal.project_rules().is_empty());
        assert_eq!(Preset::Recommended.project_rules().len(), 1);
        assert_eq!(Preset::Strict.project_rules().len(), 1);
    }
}
