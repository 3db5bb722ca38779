//! Identifier case classification and conversion.
//!
//! All checks are ASCII-only. Identifiers containing non-ASCII
//! characters never classify as conforming.

/// Whether `name` is `lower_snake_case`.
///
/// The name must start with a lowercase letter and contain only
/// lowercase letters, digits, and single underscores. A trailing
/// underscore is accepted, so member names like `count_` pass.
#[must_use]
pub fn is_lower_snake(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() {
        return false;
    }

    let mut prev_underscore = false;
    for c in name.chars() {
        if c == '_' {
            if prev_underscore {
                return false;
            }
            prev_underscore = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_underscore = false;
        } else {
            return false;
        }
    }
    true
}

/// Whether `name` is `PascalCase`: an uppercase letter followed by
/// letters and digits, with no underscores.
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Converts a name to `lower_snake_case` for fix suggestions.
///
/// Case boundaries become underscores, runs of uppercase stay together
/// (`GetHTTPValue` becomes `get_http_value`), and existing underscore
/// runs collapse to one.
#[must_use]
pub fn to_lower_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => {
                    next.map_or(false, |n| n.is_ascii_lowercase())
                }
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }

    out.trim_start_matches('_').to_string()
}

/// Converts a name to `PascalCase` for fix suggestions.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_snake_accepts_conforming_names() {
        assert!(is_lower_snake("value"));
        assert!(is_lower_snake("gis_data"));
        assert!(is_lower_snake("point2d"));
        assert!(is_lower_snake("count_"));
    }

    #[test]
    fn lower_snake_rejects_other_cases() {
        assert!(!is_lower_snake(""));
        assert!(!is_lower_snake("Value"));
        assert!(!is_lower_snake("getValue"));
        assert!(!is_lower_snake("MAX_SIZE"));
        assert!(!is_lower_snake("_leading"));
        assert!(!is_lower_snake("double__under"));
        assert!(!is_lower_snake("2start"));
        assert!(!is_lower_snake("größe"));
    }

    #[test]
    fn pascal_case_classification() {
        assert!(is_pascal_case("T"));
        assert!(is_pascal_case("Point"));
        assert!(is_pascal_case("Http2Server"));
        assert!(!is_pascal_case(""));
        assert!(!is_pascal_case("point"));
        assert!(!is_pascal_case("Point_2"));
        assert!(!is_pascal_case("tValue"));
    }

    #[test]
    fn snake_conversion() {
        assert_eq!(to_lower_snake("GetValue"), "get_value");
        assert_eq!(to_lower_snake("getValue"), "get_value");
        assert_eq!(to_lower_snake("GetHTTPValue"), "get_http_value");
        assert_eq!(to_lower_snake("parseJSON"), "parse_json");
        assert_eq!(to_lower_snake("already_snake"), "already_snake");
        assert_eq!(to_lower_snake("Mixed_Case"), "mixed_case");
        assert_eq!(to_lower_snake("__reserved"), "reserved");
    }

    #[test]
    fn pascal_conversion() {
        assert_eq!(to_pascal_case("t"), "T");
        assert_eq!(to_pascal_case("value_type"), "ValueType");
        assert_eq!(to_pascal_case("VALUE"), "Value");
        assert_eq!(to_pascal_case("my_http_server"), "MyHttpServer");
    }
}
