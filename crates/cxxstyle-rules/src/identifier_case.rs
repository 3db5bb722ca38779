//! Rule requiring `lower_snake_case` identifiers.
//!
//! # Rationale
//!
//! The style guide names every namespace, type, function, variable,
//! and type alias in `lower_snake_case`. Uniform casing makes grep
//! predictable and removes case-convention arguments from review.
//!
//! Template parameters are the one exception; they are `PascalCase`
//! and checked by `template-parameter-case` instead.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(identifier-case)` comment
//! - `ignore_patterns` config globs (e.g. `BOOST_*`) for identifiers
//!   imposed by external code

use cxxstyle_core::utils::{is_lower_snake, to_lower_snake};
use cxxstyle_core::{
    DeclKind, Declaration, Diagnostic, FileContext, Replacement, Rule, Severity, Suggestion,
    TranslationUnit,
};

/// Rule code for identifier-case.
pub const CODE: &str = "CS101";

/// Rule name for identifier-case.
pub const NAME: &str = "identifier-case";

/// Requires `lower_snake_case` for all ordinary identifiers.
#[derive(Debug, Clone)]
pub struct IdentifierCase {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for IdentifierCase {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierCase {
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

    fn flag(&self, ctx: &FileContext<'_>, decl: &Declaration) -> Option<Diagnostic> {
        let name = decl.name.as_str();
        if name.is_empty() || is_lower_snake(name) || ctx.is_identifier_allowed(name) {
            return None;
        }

        let location = ctx.location(decl.pos, name.len());
        let snake = to_lower_snake(name);
        let mut diagnostic = Diagnostic::new(
            CODE,
            NAME,
            self.severity,
            location.clone(),
            format!("{} `{}` is not lower_snake_case", kind_label(decl), name),
        );
        if !snake.is_empty() && snake != name {
            diagnostic = diagnostic.with_suggestion(Suggestion::with_fix(
                format!("Rename to `{snake}`"),
                Replacement::new(location, snake),
            ));
        }
        Some(diagnostic)
    }
}

impl Rule for IdentifierCase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires lower_snake_case for namespaces, types, functions, and variables"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            match decl.kind() {
                DeclKind::Namespace
                | DeclKind::Record
                | DeclKind::Variable
                | DeclKind::TypeAlias => {
                    diagnostics.extend(self.flag(ctx, decl));
                }
                DeclKind::Function => {
                    let Some(info) = decl.as_function() else {
                        return;
                    };
                    // Constructors and destructors mirror the class name,
                    // operator names are not identifiers.
                    if !info.is_operator && !info.is_constructor && !info.is_destructor {
                        diagnostics.extend(self.flag(ctx, decl));
                    }
                    for param in &info.params {
                        let Some(name) = param.name.as_deref() else {
                            continue;
                        };
                        if is_lower_snake(name) || ctx.is_identifier_allowed(name) {
                            continue;
                        }
                        let location = ctx.location(param.pos, name.len());
                        let snake = to_lower_snake(name);
                        let mut diagnostic = Diagnostic::new(
                            CODE,
                            NAME,
                            self.severity,
                            location.clone(),
                            format!("Parameter `{name}` is not lower_snake_case"),
                        );
                        if !snake.is_empty() && snake != name {
                            diagnostic = diagnostic.with_suggestion(Suggestion::with_fix(
                                format!("Rename to `{snake}`"),
                                Replacement::new(location, snake),
                            ));
                        }
                        diagnostics.push(diagnostic);
                    }
                }
                DeclKind::TemplateParameter | DeclKind::Opaque => {}
            }
        });

        diagnostics
    }
}

/// Kind word used at the start of messages.
fn kind_label(decl: &Declaration) -> &'static str {
    match decl.kind() {
        DeclKind::Namespace => "Namespace",
        DeclKind::Record => "Type",
        DeclKind::Function => "Function",
        DeclKind::Variable => "Variable",
        DeclKind::TypeAlias => "Type alias",
        DeclKind::TemplateParameter => "Template parameter",
        DeclKind::Opaque => "Region",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxstyle_core::{AllowList, Config};
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        let unit = TranslationUnit::parse(code);
        let allowlist = AllowList::default();
        let ctx = FileContext::new(Path::new("test.cpp"), code, &allowlist);
        IdentifierCase::new().check(&ctx, &unit)
    }

    #[test]
    fn test_conforming_identifiers() {
        let diagnostics = check_code(
            r"
namespace kmx::gis {
class coordinate {
public:
    double lat_long(int zone_id) noexcept;
};
using meters_t = double;
double origin = 0.0;
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_detects_bad_function_name() {
        let diagnostics = check_code("void GetValue();\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert!(diagnostics[0].message.contains("`GetValue`"));
        let suggestion = diagnostics[0].suggestion.as_ref().expect("has suggestion");
        assert!(suggestion.message.contains("get_value"));
    }

    #[test]
    fn test_detects_bad_type_and_variable() {
        let diagnostics = check_code("class Widget {};\nint BadCount;\n");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_camel_case_variable() {
        let diagnostics = check_code("int zoneId = 5;\n");
        assert_eq!(diagnostics.len(), 1);
        let suggestion = diagnostics[0].suggestion.as_ref().expect("has suggestion");
        assert_eq!(
            suggestion.replacement.as_ref().map(|r| r.new_text.as_str()),
            Some("zone_id")
        );
    }

    #[test]
    fn test_checks_parameters() {
        let diagnostics = check_code("void store(int zoneId, double lat);\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Parameter `zoneId`"));
    }

    #[test]
    fn test_skips_special_member_names() {
        let diagnostics = check_code(
            r"
class widget {
public:
    widget();
    ~widget();
    bool operator==(const widget& other) const noexcept;
};
",
        );
        // `other` and the class name conform; special members are not
        // reported against their own names.
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_template_parameters_not_flagged_here() {
        let diagnostics = check_code("template <typename ValueType> class holder {};\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_namespace_alias_is_checked() {
        let diagnostics = check_code("namespace IO = boost::asio;\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Namespace `IO`"));
    }

    #[test]
    fn test_allowlist_exempts_identifier() {
        let code = "int BOOST_FOREACH;\nint BadName;\n";
        let mut config = Config::default();
        config.ignore_patterns.insert("BOOST_*".to_string());
        let allowlist = AllowList::compile(&config).expect("valid patterns");

        let unit = TranslationUnit::parse(code);
        let ctx = FileContext::new(Path::new("test.cpp"), code, &allowlist);
        let diagnostics = IdentifierCase::new().check(&ctx, &unit);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`BadName`"));
    }
}
