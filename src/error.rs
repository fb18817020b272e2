//! Error types for policy compilation and certificate identity helpers.

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `xfcc-authz`.
///
/// Errors from policy generation are scoped to a single rule: callers are
/// expected to drop that rule and keep compiling the rest.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A header condition was used in a TCP (non-HTTP) filter chain.
    #[error("{key:?} is HTTP only")]
    UnsupportedProtocol {
        /// Attribute key of the offending condition.
        key: String,
    },

    /// The attribute key is not of the form `request.headers[<name>]`.
    #[error("expecting format [<NAME>], but found {0}")]
    MalformedKey(String),

    /// The attribute is not handled by header generators.
    #[error("unsupported attribute: {0}")]
    UnsupportedAttribute(String),

    /// The generator has no support for the requested clause.
    #[error("unimplemented")]
    Unimplemented,

    /// ServiceAccount name is empty.
    #[error("service account name is not defined")]
    MissingServiceAccount,

    /// Pod namespace is empty.
    #[error("pod namespace is not defined")]
    MissingNamespace,

    /// The certificate custom fields annotation is not valid JSON.
    #[error("certificate custom fields are not valid json: {0}")]
    InvalidCustomFields(String),

    /// The CSR could not be decoded or parsed.
    #[error("CSR is not valid ({0})")]
    InvalidCsr(String),

    /// The CSR does not request a subject alternative name extension.
    #[error("could not extract extension from CSR (missing subject alternative name)")]
    MissingSubjectAltName,
}

/// An annotation value that could not be parsed as a boolean.
///
/// Never surfaced to callers of the gating functions: it only drives the
/// fallback to "disabled".
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("annotation {key} has non-boolean value {value:?}")]
pub struct AnnotationParseError {
    /// Annotation key.
    pub key: String,
    /// Raw annotation value.
    pub value: String,
}
