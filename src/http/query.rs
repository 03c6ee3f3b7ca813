//! Query string lookup.
//!
//! Nothing is cached: every lookup walks the raw query string again. No
//! percent-decoding happens at this layer.

use std::collections::HashMap;

/// Splits a raw query string into `(name, value)` pairs.
///
/// Tokens are separated by `&` and split on their first `=`. A token without
/// `=` yields an empty value. An absent query yields no pairs.
pub fn pairs(query: Option<&str>) -> impl Iterator<Item = (&str, &str)> {
    query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .map(|token| token.split_once('=').unwrap_or((token, "")))
}

/// Collapses the query into a map; later occurrences of a name overwrite
/// earlier ones.
pub fn to_map(query: Option<&str>) -> HashMap<&str, &str> {
    let mut map = HashMap::new();
    for (name, value) in pairs(query) {
        map.insert(name, value);
    }
    map
}

/// Value of `name` in `query`, or `""` when the name (or the whole query)
/// is absent.
pub fn value<'a>(query: Option<&'a str>, name: &str) -> &'a str {
    pairs(query)
        .filter(|(k, _)| *k == name)
        .last()
        .map(|(_, v)| v)
        .unwrap_or("")
}
