//! Separating the route path from query parameters.
//!
//! A front controller sees URLs rewritten as `index?abc/def&k1=v1`, so the
//! route and the query parameters arrive in one `&`-joined string with no
//! leading `?`.
//!
//! ```text
//! URL                              raw query               route
//! localhost                        ''                      ''
//! localhost?k1=v1&k2=v2            'k1=v1&k2=v2'           ''
//! localhost/abc                    'abc'                   'abc'
//! localhost/abc?k1=v1&k2=v2        'abc&k1=v1&k2=v2'       'abc'
//! localhost/abc/def?k1=v1          'abc/def&k1=v1'         'abc/def'
//! ```

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Extract the route path from a raw front-controller query string.
///
/// The first `&`-separated segment is the path unless it contains `=`, in
/// which case the request only carried query parameters and targets the root.
pub fn normalize_query(raw: &str) -> &str {
    let first = raw.split('&').next().unwrap_or_default();
    if first.contains('=') {
        ""
    } else {
        first
    }
}

/// Rebuild the raw query string a rewriting front controller would see.
///
/// The leading `/` of the path is dropped and the query, if any, is appended
/// after `&`.
pub fn rewrite_uri(path: &str, query: Option<&str>) -> String {
    let route = path.trim_start_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(q) if route.is_empty() => q.to_string(),
        Some(q) => format!("{route}&{q}"),
        None => route.to_string(),
    }
}

/// Percent-decode a request path before it is rewritten. Invalid UTF-8
/// sequences are replaced rather than rejected.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}
