//! Remote reference-content lookup.
//!
//! A [`LookupSource`] answers `fetch(resource_type, index)` with JSON. The
//! [`HttpLookupSource`] talks to a REST API laid out as
//! `{base_url}/{resource_type}/{index}`; [`LookupCache`] wraps any source in
//! an explicitly owned, expiring LRU cache.

mod cache;
mod http;

pub use cache::{CacheConfig, LookupCache};
pub use http::HttpLookupSource;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid lookup key {0:?}")]
    InvalidKey(String),

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },
}

pub trait LookupSource {
    fn fetch(&self, resource_type: &str, index: &str) -> Result<Value, LookupError>;
}

impl<S: LookupSource + ?Sized> LookupSource for &S {
    fn fetch(&self, resource_type: &str, index: &str) -> Result<Value, LookupError> {
        (**self).fetch(resource_type, index)
    }
}

/// Reject path segments that would escape the `{resource}/{index}` layout.
pub(crate) fn check_segment(segment: &str) -> Result<&str, LookupError> {
    let trimmed = segment.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(trimmed)
    } else {
        Err(LookupError::InvalidKey(segment.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_must_be_plain_slugs() {
        assert_eq!(check_segment(" classes ").unwrap(), "classes");
        assert!(check_segment("../etc").is_err());
        assert!(check_segment("").is_err());
        assert!(check_segment("a/b").is_err());
    }
}
