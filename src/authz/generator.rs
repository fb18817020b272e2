//! Principal generators for request header conditions.

use crate::authz::rbac::{Permission, Principal};
use crate::constants::{ATTR_REQUEST_HEADER, XFCC_ANNOTATION, XFCC_HEADER};
use crate::error::{AnnotationParseError, Error, Result};
use crate::features::parse_bool;
use crate::matcher;
use crate::observability::log_debug;
use crate::serviceaccount::Annotations;

/// Generator used for one condition, fixed when the rule is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    /// Header values are matched exactly.
    #[default]
    Default,
    /// Header values are wildcard patterns (contains, prefix, suffix, presence).
    Xfcc,
}

impl GeneratorKind {
    /// Selects the generator for a header condition.
    ///
    /// Wildcard matching is only used for the XFCC header, and only when the
    /// workload opted in.
    pub fn select(use_xfcc: bool, header: &str) -> Self {
        if use_xfcc && header.eq_ignore_ascii_case(XFCC_HEADER) {
            Self::Xfcc
        } else {
            Self::Default
        }
    }

    /// Generates the "from" clause matching header attribute `key` against `value`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedProtocol`] if `for_tcp` is set: TCP has no headers.
    /// - [`Error::MalformedKey`] if `key` is not `request.headers[<name>]`.
    pub fn principal(self, key: &str, value: &str, for_tcp: bool) -> Result<Principal> {
        if for_tcp {
            return Err(Error::UnsupportedProtocol {
                key: key.to_string(),
            });
        }

        let header = header_name(key)?;
        let m = match self {
            Self::Default => matcher::exact_header_matcher(header, value),
            Self::Xfcc => matcher::header_matcher(header, value),
        };
        Ok(Principal::Header(m))
    }

    /// Header conditions never produce a "to" clause.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unimplemented`].
    pub fn permission(self, _key: &str, _value: &str, _for_tcp: bool) -> Result<Permission> {
        Err(Error::Unimplemented)
    }
}

/// Extracts the header name from `request.headers[<name>]`.
///
/// Double quotes around the name are dropped, so `request.headers["X-Foo"]`
/// yields `X-Foo`. The name keeps its case.
///
/// # Errors
///
/// Returns [`Error::MalformedKey`] if the brackets are missing, unbalanced or
/// empty.
pub fn header_name(key: &str) -> Result<&str> {
    let rest = key.strip_prefix(ATTR_REQUEST_HEADER).unwrap_or(key);
    let name = extract_name_in_brackets(rest)?;
    let name = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .unwrap_or(name);

    if name.is_empty() {
        return Err(Error::MalformedKey(rest.to_string()));
    }
    Ok(name)
}

fn extract_name_in_brackets(s: &str) -> Result<&str> {
    let inner = s
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| Error::MalformedKey(s.to_string()))?;

    if inner.contains(['[', ']']) {
        return Err(Error::MalformedKey(s.to_string()));
    }
    Ok(inner)
}

/// Reads the XFCC opt-in annotation.
///
/// # Errors
///
/// Returns an [`AnnotationParseError`] if the annotation is present but not a
/// boolean. A missing annotation is `Ok(false)`.
pub fn parse_xfcc_annotation(
    annotations: &Annotations,
) -> std::result::Result<bool, AnnotationParseError> {
    match annotations.get(XFCC_ANNOTATION) {
        None => Ok(false),
        Some(value) => parse_bool(value).ok_or_else(|| AnnotationParseError {
            key: XFCC_ANNOTATION.to_string(),
            value: value.clone(),
        }),
    }
}

/// Returns `true` if the workload opted in to XFCC wildcard matching.
///
/// A missing or unparsable annotation means `false`.
pub fn use_xfcc_header(annotations: &Annotations) -> bool {
    parse_xfcc_annotation(annotations).unwrap_or_else(|e| {
        log_debug!("ignoring XFCC annotation: {e}");
        false
    })
}
