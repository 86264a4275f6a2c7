//! Joins API paths onto the configured base URL.
//!
//! # Design
//! - Literal concatenation: the base path always survives, unlike RFC 3986
//!   reference resolution which drops the last base segment.
//! - Query and fragment come from the request path, never from the base.

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Append `path` to the path of `base` with exactly one separating slash.
///
/// # Errors
///
/// Returns [`ClientError::MalformedPath`] when `path` contains control
/// characters, broken percent-escapes, or looks like an absolute URL.
pub fn join_paths(base: &Url, path: &str) -> ClientResult<Url> {
    validate_relative(path)?;

    let (rest, fragment) = match path.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (path, None),
    };
    let (relative, query) = match rest.split_once('?') {
        Some((relative, query)) => (relative, Some(query)),
        None => (rest, None),
    };

    let base_path = base.path();
    let mut joined = String::with_capacity(base_path.len() + relative.len() + 1);
    joined.push_str(base_path);
    if !joined.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(relative.trim_start_matches('/'));

    let mut url = base.clone();
    url.set_path(&joined);
    url.set_query(query);
    url.set_fragment(fragment);
    Ok(url)
}

fn validate_relative(path: &str) -> ClientResult<()> {
    let malformed = |reason: &'static str| ClientError::MalformedPath {
        path: path.to_string(),
        reason,
    };

    if path.chars().any(|ch| ch.is_ascii_control()) {
        return Err(malformed("contains control characters"));
    }

    // The query is forwarded verbatim; only path and fragment must be well-escaped.
    let (rest, fragment) = path.split_once('#').unwrap_or((path, ""));
    let path_only = rest.split('?').next().unwrap_or_default();
    if !has_valid_escapes(path_only) || !has_valid_escapes(fragment) {
        return Err(malformed("invalid percent-escape"));
    }

    let first_segment = path
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if first_segment.contains(':') {
        return Err(malformed("first path segment cannot contain a colon"));
    }

    Ok(())
}

fn has_valid_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(index, byte)| {
        *byte != b'%'
            || bytes
                .get(index + 1..index + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit))
    })
}
