//! Discovery and normalization of `CYPRESS_`-prefixed environment variables.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

fn prefix_expr() -> &'static Regex {
    static EXPR: OnceLock<Regex> = OnceLock::new();
    EXPR.get_or_init(|| Regex::new(r"(?i)^cypress_(.+)").expect("static expression"))
}

/// Environment entries carrying the reserved prefix, with the prefix stripped
/// and the remainder's case preserved verbatim.
///
/// The prefix match is case-insensitive; entries are returned sorted by the
/// original variable name so that folding them into a map is deterministic.
pub fn prefixed_entries(env: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut entries: Vec<_> = env.iter().collect();
    entries.sort_by_key(|(name, _)| name.as_str());

    entries
        .into_iter()
        .filter_map(|(name, value)| {
            prefix_expr()
                .captures(name)
                .map(|captures| (captures[1].to_owned(), value.clone()))
        })
        .collect()
}

/// Prefixed entries normalized for configuration-key lookup: remainders
/// containing an underscore are converted from snake_case to camelCase.
///
/// A remainder without underscores passes through unchanged, so
/// `CYPRESS_specpattern` yields `specpattern` and will not match the
/// `specPattern` key.
pub fn normalized_entries(env: &HashMap<String, String>) -> Vec<(String, String)> {
    prefixed_entries(env)
        .into_iter()
        .map(|(name, value)| {
            let name = if name.contains('_') {
                to_camel_case(&name)
            } else {
                name
            };
            (name, value)
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Convert a snake_case name to camelCase: first segment lowercased,
/// subsequent segments capitalized on their first letter only.
pub fn to_camel_case(value: &str) -> String {
    value
        .split('_')
        .enumerate()
        .map(|(index, word)| {
            if index == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}
