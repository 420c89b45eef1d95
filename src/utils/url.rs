//! URL utilities for consistent endpoint construction
//!
//! Base URLs come from config, environment, or the command line and may or
//! may not carry a trailing slash or a path prefix such as `/api`. These
//! helpers normalize them and append path segments with proper encoding so a
//! literal task identifier typed by the user can never escape its segment.

use reqwest::Url;

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use termdesk::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000/api"), "http://localhost:5000/api");
/// assert_eq!(normalize_base_url("http://localhost:5000/api/"), "http://localhost:5000/api");
/// assert_eq!(normalize_base_url("http://localhost:5000/api///"), "http://localhost:5000/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build an endpoint URL from a base URL and a list of path segments.
///
/// Each segment is percent-encoded individually, so `"by-name"` followed by
/// `"my session"` yields `.../by-name/my%20session`.
pub fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, String> {
    let normalized = normalize_base_url(base_url);
    let mut url =
        Url::parse(&normalized).map_err(|e| format!("Invalid base URL '{base_url}': {e}"))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| format!("Base URL '{base_url}' cannot carry a path"))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// Append query pairs to an endpoint URL, preserving their order.
///
/// Repeated keys are kept as separate pairs, which is how array-valued
/// filters are transmitted.
pub fn with_query<'a, I>(mut url: Url, pairs: I) -> Url
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut pairs = pairs.into_iter().peekable();
    if pairs.peek().is_none() {
        return url;
    }
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, &value);
        }
    }
    url
}
