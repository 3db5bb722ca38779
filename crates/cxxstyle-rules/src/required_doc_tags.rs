//! Rule requiring documentation tags on public declarations.
//!
//! # Rationale
//!
//! Every declaration reachable through public visibility is part of
//! the interface and carries a doc block: a `brief` always, a `param`
//! per named parameter, a `tparam` per template parameter, a `return`
//! when a value is returned, and a `throws` when the function is
//! declared `noexcept(false)`. Each missing tag is reported on its
//! own, so a fix list maps one-to-one onto diagnostics.
//!
//! Deleted and defaulted functions, forward declarations, namespaces,
//! and everything inside an anonymous namespace are exempt.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(required-doc-tags)` comment

use cxxstyle_core::{
    DeclDetail, Declaration, Diagnostic, DocBlock, ExceptionSpec, FileContext, RecordKeyword,
    Rule, Severity, TranslationUnit, Visibility,
};

/// Rule code for required-doc-tags.
pub const CODE: &str = "CS501";

/// Rule name for required-doc-tags.
pub const NAME: &str = "required-doc-tags";

/// Flags effectively-public declarations with incomplete doc blocks.
#[derive(Debug, Clone)]
pub struct RequiredDocTags {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RequiredDocTags {
    fn default() -> Self {
        Self::new()
    }
}

impl RequiredDocTags {
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

impl Rule for RequiredDocTags {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires brief/param/tparam/return/throws tags on public declarations"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for decl in &unit.tree.decls {
            visit(ctx, unit, decl, self.severity, &mut diagnostics);
        }
        diagnostics
    }
}

/// Descends through the public part of the tree and checks each
/// documentable declaration.
fn visit(
    ctx: &FileContext<'_>,
    unit: &TranslationUnit,
    decl: &Declaration,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    if decl.visibility != Visibility::Public {
        return;
    }

    match &decl.detail {
        DeclDetail::Namespace { anonymous, .. } => {
            // Namespaces need no doc block of their own; anonymous ones
            // hide their contents from the interface entirely.
            if !*anonymous {
                for child in &decl.children {
                    visit(ctx, unit, child, severity, out);
                }
            }
        }
        DeclDetail::Record { keyword, defined } => {
            if !*defined {
                return;
            }
            check_decl(ctx, unit, decl, severity, out);
            // Enumerators are covered by the enum's own doc block.
            if *keyword != RecordKeyword::Enum {
                for child in &decl.children {
                    visit(ctx, unit, child, severity, out);
                }
            }
        }
        DeclDetail::Function(info) => {
            if !info.is_deleted && !info.is_defaulted {
                check_decl(ctx, unit, decl, severity, out);
            }
        }
        DeclDetail::Variable(_) | DeclDetail::TypeAlias => {
            check_decl(ctx, unit, decl, severity, out);
        }
        DeclDetail::TemplateParameter { .. } | DeclDetail::Opaque => {}
    }
}

/// Emits one diagnostic per required tag absent from `decl`'s doc
/// block.
fn check_decl(
    ctx: &FileContext<'_>,
    unit: &TranslationUnit,
    decl: &Declaration,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    let name = decl.name.as_str();
    if name.is_empty() {
        return;
    }
    let doc = unit.docs.get(decl.id);
    let has = |tag: &str| doc.map_or(false, |block| block.has_tag(tag));
    let mut report = |pos, len, message: String| {
        out.push(Diagnostic::new(
            CODE,
            NAME,
            severity,
            ctx.location(pos, len),
            message,
        ));
    };

    if !has("brief") {
        report(
            decl.pos,
            name.len(),
            format!("Missing `@brief` documentation for `{name}`"),
        );
    }

    let tparam_names = documented(doc, "tparam");
    for tp in decl.template_params() {
        if tp.name.is_empty() || tparam_names.iter().any(|n| *n == tp.name) {
            continue;
        }
        report(
            tp.pos,
            tp.name.len(),
            format!(
                "Missing `@tparam` documentation for template parameter `{}` of `{name}`",
                tp.name
            ),
        );
    }

    let Some(info) = decl.as_function() else {
        return;
    };

    let param_names = documented(doc, "param");
    for param in &info.params {
        let Some(param_name) = param.name.as_deref() else {
            continue;
        };
        if param_names.iter().any(|n| *n == param_name) {
            continue;
        }
        report(
            param.pos,
            param_name.len(),
            format!("Missing `@param` documentation for parameter `{param_name}` of `{name}`"),
        );
    }

    if info.returns_value && !has("return") && !has("returns") {
        report(
            decl.pos,
            name.len(),
            format!("Missing `@return` documentation for `{name}`"),
        );
    }

    if info.exception == Some(ExceptionSpec::NoexceptFalse)
        && !has("throws")
        && !has("throw")
        && !has("exception")
    {
        report(
            decl.pos,
            name.len(),
            format!("Missing `@throws` documentation for `{name}`"),
        );
    }
}

/// Names documented by the given tag, owned so the borrow on the doc
/// block does not tie up the caller.
fn documented(doc: Option<&DocBlock>, tag: &str) -> Vec<String> {
    doc.map(|block| {
        block
            .documented_names(tag)
            .into_iter()
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxstyle_core::AllowList;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        let unit = TranslationUnit::parse(code);
        let allowlist = AllowList::default();
        let ctx = FileContext::new(Path::new("test.cpp"), code, &allowlist);
        RequiredDocTags::new().check(&ctx, &unit)
    }

    #[test]
    fn test_brief_only_misses_params_and_return() {
        let diagnostics = check_code("/// @brief Adds.\nint add(int lhs, int rhs) noexcept;\n");
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.code == CODE));
        assert!(diagnostics[0].message.contains("`lhs`"));
        assert!(diagnostics[1].message.contains("`rhs`"));
        assert!(diagnostics[2].message.contains("`@return`"));
    }

    #[test]
    fn test_complete_doc_block_passes() {
        let code = "/// @brief Adds two values.\n/// @param lhs Left value.\n/// @param rhs Right value.\n/// @return The sum.\nint add(int lhs, int rhs) noexcept;\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_undocumented_function_needs_brief() {
        let diagnostics = check_code("void reset() noexcept;\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`@brief`"));
    }

    #[test]
    fn test_returns_synonym_accepted() {
        let code = "/// @brief Counts.\n/// @returns How many.\nint count() noexcept;\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_throws_required_for_noexcept_false() {
        let code = "/// @brief Parses.\n/// @param text Input.\n/// @return Value.\nint parse(int text) noexcept(false);\n";
        let diagnostics = check_code(code);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`@throws`"));
    }

    #[test]
    fn test_template_parameter_needs_tparam() {
        let code = "/// @brief Wraps.\n/// @param value Input.\n/// @return Wrapped.\ntemplate <typename T>\nT wrap(T value) noexcept;\n";
        let diagnostics = check_code(code);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`T`"));
    }

    #[test]
    fn test_private_members_exempt() {
        let code = "/// @brief A widget.\nclass widget\n{\n    int secret_() noexcept;\n};\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_public_member_checked() {
        let code = "/// @brief A widget.\nclass widget\n{\npublic:\n    int id;\n};\n";
        let diagnostics = check_code(code);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`id`"));
    }

    #[test]
    fn test_anonymous_namespace_exempt() {
        let code = "namespace\n{\nvoid helper() noexcept;\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_forward_declaration_exempt() {
        let diagnostics = check_code("class widget;\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_defaulted_and_deleted_exempt() {
        let code = "/// @brief A widget.\nclass widget\n{\npublic:\n    widget() = default;\n    widget(const widget&) = delete;\n};\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_enumerators_not_individually_checked() {
        let code = "/// @brief Run modes.\nenum class mode\n{\n    fast,\n    safe\n};\n";
        assert!(check_code(code).is_empty());
    }
}
