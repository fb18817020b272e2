//! Well-known annotation keys, header names and environment variables.

/// Workload annotation that switches XFCC header conditions to wildcard
/// (contains/prefix/suffix/presence) matching.
///
/// The value is parsed as a boolean; a missing or unparsable value disables it.
pub const XFCC_ANNOTATION: &str = "authz.contains.aspenmesh.io/xfcc";

/// ServiceAccount annotation carrying extra SAN entries for issued certificates.
///
/// Expected to hold a JSON object such as `{"SAN": {"DNS": [...], "URI": [...]}}`.
pub const CUSTOM_FIELDS_ANNOTATION: &str = "certificate.aspenmesh.io/customFields";

/// Name of the forwarded client certificate header.
pub const XFCC_HEADER: &str = "x-forwarded-client-cert";

/// Attribute prefix for request header conditions, e.g. `request.headers[x-foo]`.
pub const ATTR_REQUEST_HEADER: &str = "request.headers";

/// Environment variable enabling forced auto SNI for mesh-external
/// `ISTIO_MUTUAL` service entries with a wildcard SNI.
pub const CARRIER_GRADE_SERVICE_ENTRY_ISTIO_MUTUAL_ENV: &str =
    "PILOT_CARRIER_GRADE_SERVICE_ENTRY_ISTIO_MUTUAL";
