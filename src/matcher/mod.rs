//! Compilation of wildcard header patterns into header matchers.
//!
//! A pattern uses `*` only at its boundaries:
//!
//! | Pattern   | Matcher            |
//! |-----------|--------------------|
//! | `*`       | present            |
//! | `*foo*`   | contains `foo`     |
//! | `*foo`    | suffix `foo`       |
//! | `foo*`    | prefix `foo`       |
//! | `foo`     | exact `foo`        |
//!
//! # Examples
//!
//! ```rust
//! use xfcc_authz::matcher::{header_matcher, HeaderMatchSpecifier};
//!
//! let m = header_matcher("x-forwarded-client-cert", "*URI=com.example.nfType:smf*");
//! assert_eq!(m.name(), "x-forwarded-client-cert");
//! assert_eq!(
//!     m.specifier(),
//!     &HeaderMatchSpecifier::Contains("URI=com.example.nfType:smf".to_string())
//! );
//! ```

use serde::{Deserialize, Serialize};

const WILDCARD: char = '*';

/// How a header value is matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatchSpecifier {
    /// The header value equals the string.
    Exact(String),
    /// The header value starts with the string.
    Prefix(String),
    /// The header value ends with the string.
    Suffix(String),
    /// The header value contains the string.
    Contains(String),
    /// The header is present (`true`) or absent (`false`), whatever its value.
    Present(bool),
}

/// A header-match predicate: a header name plus a [`HeaderMatchSpecifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderMatcher {
    name: String,
    #[serde(flatten)]
    specifier: HeaderMatchSpecifier,
}

impl HeaderMatcher {
    /// Creates a matcher for the header `name`.
    pub fn new(name: impl Into<String>, specifier: HeaderMatchSpecifier) -> Self {
        Self {
            name: name.into(),
            specifier,
        }
    }

    /// Returns the header name, as supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the match specifier.
    pub fn specifier(&self) -> &HeaderMatchSpecifier {
        &self.specifier
    }

    /// Returns `true` if the matcher carries an empty string value.
    ///
    /// Empty exact values are legitimate, but empty prefix, suffix and contains
    /// values are rejected by proxies.
    pub fn has_empty_value(&self) -> bool {
        match &self.specifier {
            HeaderMatchSpecifier::Prefix(v)
            | HeaderMatchSpecifier::Suffix(v)
            | HeaderMatchSpecifier::Contains(v) => v.is_empty(),
            HeaderMatchSpecifier::Exact(_) | HeaderMatchSpecifier::Present(_) => false,
        }
    }
}

/// Compiles a wildcard `pattern` for header `key` into a [`HeaderMatcher`].
///
/// The checks run in a fixed order and the first one that applies wins. A bare
/// `*` is checked first: it also starts and ends with `*`, and would otherwise
/// turn into a matcher with an empty value.
///
/// `**` compiles to `Contains("")`; see [`HeaderMatcher::has_empty_value`].
pub fn header_matcher(key: &str, pattern: &str) -> HeaderMatcher {
    let specifier = if pattern == "*" {
        HeaderMatchSpecifier::Present(true)
    } else if pattern.len() >= 2 && pattern.starts_with(WILDCARD) && pattern.ends_with(WILDCARD) {
        HeaderMatchSpecifier::Contains(pattern[1..pattern.len() - 1].to_string())
    } else if let Some(suffix) = pattern.strip_prefix(WILDCARD) {
        HeaderMatchSpecifier::Suffix(suffix.to_string())
    } else if let Some(prefix) = pattern.strip_suffix(WILDCARD) {
        HeaderMatchSpecifier::Prefix(prefix.to_string())
    } else {
        HeaderMatchSpecifier::Exact(pattern.to_string())
    };

    HeaderMatcher::new(key, specifier)
}

/// Builds an exact-value matcher; `*` has no special meaning here.
pub fn exact_header_matcher(key: &str, value: &str) -> HeaderMatcher {
    HeaderMatcher::new(key, HeaderMatchSpecifier::Exact(value.to_string()))
}
