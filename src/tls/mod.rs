//! Carrier-grade TLS settings.
//!
//! - a restricted cipher list for server-side TLS, and the check used to
//!   validate gateway `cipherSuites`;
//! - the rule that forces auto SNI on mesh-external `ISTIO_MUTUAL` upstreams
//!   with a wildcard SNI.

use crate::features::Features;

/// Ciphers used for server-side TLS, in preference order.
pub const CARRIER_GRADE_CIPHERS: [&str; 6] = [
    "ECDHE-ECDSA-AES128-GCM-SHA256", // TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256
    "ECDHE-ECDSA-CHACHA20-POLY1305", // TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256
    "ECDHE-RSA-AES128-GCM-SHA256",   // TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256
    "ECDHE-RSA-CHACHA20-POLY1305",   // TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256
    "ECDHE-ECDSA-AES256-GCM-SHA384", // TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384
    "ECDHE-RSA-AES256-GCM-SHA384",   // TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384
];

/// Returns `true` if `cs` may appear in a gateway's `cipherSuites`.
///
/// `""` and `"ALL"` are accepted, as is anything starting with an operator
/// such as `-` or `+`, since expressions are not parsed. Everything else must
/// be one of [`CARRIER_GRADE_CIPHERS`].
pub fn is_valid_carrier_grade_cipher_suite(cs: &str) -> bool {
    if cs.is_empty() || cs == "ALL" {
        return true;
    }
    if cs.chars().next().is_some_and(|c| !c.is_alphanumeric()) {
        return true;
    }
    CARRIER_GRADE_CIPHERS.contains(&cs)
}

/// Application protocol of a service port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// HTTP/1.1.
    Http,
    /// HTTP/2.
    Http2,
    /// gRPC over HTTP/2.
    Grpc,
    /// TLS passthrough.
    Tls,
    /// Opaque TCP.
    #[default]
    Tcp,
}

impl Protocol {
    /// Returns `true` for HTTP/1.1.
    pub fn is_http(self) -> bool {
        self == Self::Http
    }

    /// Returns `true` for HTTP/2 based protocols.
    pub fn is_http2(self) -> bool {
        matches!(self, Self::Http2 | Self::Grpc)
    }
}

/// The parts of an upstream cluster that decide auto SNI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpstreamTarget {
    /// The service entry is `MESH_EXTERNAL`.
    pub mesh_external: bool,
    /// Protocol of the target port.
    pub protocol: Protocol,
}

/// Returns `true` if auto SNI must be forced for an `ISTIO_MUTUAL` upstream.
///
/// Applies to mesh-external HTTP targets whose configured SNI is a wildcard
/// (`*.example.com`), when the carrier-grade feature is on.
pub fn force_auto_sni(features: &Features, target: &UpstreamTarget, sni: &str) -> bool {
    features.carrier_grade_service_entry_istio_mutual
        && target.mesh_external
        && sni.starts_with("*.")
        && (target.protocol.is_http() || target.protocol.is_http2())
}

/// Upstream HTTP protocol options of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpstreamHttpProtocolOptions {
    /// Set SNI from the downstream `:authority`.
    pub auto_sni: bool,
    /// Validate the upstream certificate SAN against the `:authority`.
    pub auto_san_validation: bool,
}

impl UpstreamHttpProtocolOptions {
    /// Turns on the requested options. Options already on stay on.
    pub fn apply_auto_sni(&mut self, set_auto_sni: bool, set_auto_san_validation: bool) {
        if set_auto_sni {
            self.auto_sni = true;
        }
        if set_auto_san_validation {
            self.auto_san_validation = true;
        }
    }
}
