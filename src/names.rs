//! Name resolution helpers shared by the registry and the binder.
//!
//! All lookups in gavel are case-insensitive exact matches on effective names.

/// Conventional suffix stripped from command-group type names.
pub const DEFAULT_GROUP_SUFFIX: &str = "Commands";

/// Case-insensitive equality without allocating.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Normalized key used for case-insensitive maps. Folds per char, the same
/// way `eq_ignore_case` compares.
pub fn fold_key(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

/// Alias if one was declared, otherwise the canonical name.
pub fn effective_name<'a>(alias: Option<&'a str>, canonical: &'a str) -> &'a str {
    alias.unwrap_or(canonical)
}

/// Strip `suffix` from the end of a group type name.
///
/// The match is case-sensitive. A name that is nothing but the suffix is
/// returned unchanged so a group never ends up with an empty name.
pub fn strip_group_suffix<'a>(type_name: &'a str, suffix: &str) -> &'a str {
    match type_name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !suffix.is_empty() => stem,
        _ => type_name,
    }
}

/// Find the first item whose name matches `wanted`, ignoring case.
pub fn find_by_name<'a, T, F>(items: &'a [T], wanted: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items.iter().find(|item| eq_ignore_case(name_of(item), wanted))
}
