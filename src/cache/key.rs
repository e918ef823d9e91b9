//! Cache Key Codec
//!
//! Derives a canonical string key from a request path and its query
//! parameters. Parameter order in the original request never affects the
//! key: pairs are sorted before concatenation.

// == Encode From Pairs ==
/// Builds the canonical cache key for a path and a set of query parameters.
///
/// Pairs are sorted by `(name, value)` and joined as `path?k1=v1&k2=v2`.
/// Values are used raw, exactly as they appeared on the wire. With no
/// parameters the bare path is returned.
pub fn cache_key(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_unstable();

    let query = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, query)
}

// == Encode From Raw Query ==
/// Builds the canonical cache key from a path and the raw query string of an
/// inbound request (everything after `?`, still percent-encoded).
///
/// Splits on `&` and on the first `=` of each pair; a pair without `=` is
/// treated as a name with an empty value.
pub fn cache_key_from_query(path: &str, raw_query: &str) -> String {
    let params: Vec<(&str, &str)> = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();

    cache_key(path, &params)
}
