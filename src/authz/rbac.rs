//! Access-control structures handed to the proxy configuration compiler.
//!
//! The shapes follow the Envoy RBAC filter: a policy matches when any of its
//! permissions and any of its principals match.

use crate::matcher::HeaderMatcher;
use serde::Serialize;
use std::collections::BTreeMap;

/// Identity or request predicate of a rule's "from" side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// Matches every request.
    Any(bool),
    /// Matches a request header.
    Header(HeaderMatcher),
    /// Matches when all inner principals match.
    AndIds(Vec<Principal>),
    /// Matches when any inner principal matches.
    OrIds(Vec<Principal>),
    /// Matches when the inner principal does not.
    NotId(Box<Principal>),
}

impl Principal {
    /// Returns the header matcher when this is a header principal.
    pub fn as_header(&self) -> Option<&HeaderMatcher> {
        match self {
            Self::Header(m) => Some(m),
            _ => None,
        }
    }
}

/// Target predicate of a rule's "to" side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Matches every request.
    Any(bool),
    /// Matches a request header.
    Header(HeaderMatcher),
}

/// One compiled rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Policy {
    /// Permissions, or-ed.
    pub permissions: Vec<Permission>,
    /// Principals, or-ed.
    pub principals: Vec<Principal>,
}

/// What happens to a request matched by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Matched requests are allowed.
    #[default]
    Allow,
    /// Matched requests are denied.
    Deny,
}

/// A named set of compiled policies sharing one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Rbac {
    /// Action applied to matched requests.
    pub action: Action,
    /// Policies keyed by name.
    pub policies: BTreeMap<String, Policy>,
}
