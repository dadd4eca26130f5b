//! # Naming Utilities
//!
//! Pure string transforms for property names and component schema names.

use heck::ToSnakeCase;
use regex::Regex;
use std::sync::OnceLock;

/// Default property name for a field identifier: `IsTrue` -> `is_true`.
///
/// Idempotent: already snake-cased identifiers are returned unchanged.
pub fn property_name(ident: &str) -> String {
    ident.strip_prefix("r#").unwrap_or(ident).to_snake_case()
}

/// Wrapper name for a root sequence of `name`: `Person` -> `Persons`.
pub fn pluralize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('y') {
        // policy -> policies, but day -> days
        let before_y = stem.chars().last();
        if before_y.is_some_and(|c| !"aeiouAEIOU".contains(c)) {
            return format!("{}ies", stem);
        }
        return format!("{}s", name);
    }
    if name.ends_with('s')
        || name.ends_with('x')
        || name.ends_with('z')
        || name.ends_with("sh")
        || name.ends_with("ch")
    {
        return format!("{}es", name);
    }
    format!("{}s", name)
}

/// Makes a type display name usable as a component key.
///
/// Runs of characters outside `[A-Za-z0-9._-]` collapse into one `_`, and
/// trailing separators are dropped: `Page<User>` -> `Page_User`.
pub fn sanitize_schema_name(raw: &str) -> String {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    let separator_re =
        SEPARATOR_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid regex"));

    separator_re
        .split(raw)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name() {
        assert_eq!(property_name("MyList"), "my_list");
        assert_eq!(property_name("IsTrue"), "is_true");
        assert_eq!(property_name("ID"), "id");
        assert_eq!(property_name("user_id"), "user_id");
        assert_eq!(property_name("r#type"), "type");
        assert_eq!(property_name(&property_name("HTTPServer")), "http_server");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Person"), "Persons");
        assert_eq!(pluralize("Policy"), "Policies");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Batch"), "Batches");
    }

    #[test]
    fn test_sanitize_schema_name() {
        assert_eq!(sanitize_schema_name("Person"), "Person");
        assert_eq!(sanitize_schema_name("Page<User>"), "Page_User");
        assert_eq!(
            sanitize_schema_name("Pair<Vec<A>, HashMap<String, B>>"),
            "Pair_Vec_A_HashMap_String_B"
        );
    }
}
