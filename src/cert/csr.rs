//! Identities requested in a certificate signing request.
//!
//! The CA merges the SANs a workload asks for with the identities it derived
//! from the caller's credentials. Signing itself happens elsewhere.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::extensions::ParsedExtension;
use x509_parser::nom::Err;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::{FromDer, GeneralName};

/// Returns the SAN entries (URI, DNS and IP) requested by a PEM-encoded CSR, sorted.
///
/// # Errors
///
/// - [`Error::InvalidCsr`] if the input is not a PEM-encoded CSR.
/// - [`Error::MissingSubjectAltName`] if the CSR requests no SAN extension.
pub fn csr_hosts(csr_pem: &[u8]) -> Result<Vec<String>> {
    let (_, pem) = parse_x509_pem(csr_pem).map_err(|e| match e {
        Err::Incomplete(_) => Error::InvalidCsr("incomplete PEM".to_string()),
        Err::Error(e) | Err::Failure(e) => Error::InvalidCsr(e.to_string()),
    })?;

    let (_, csr) = X509CertificationRequest::from_der(&pem.contents).map_err(|e| match e {
        Err::Incomplete(_) => Error::InvalidCsr("incomplete DER".to_string()),
        Err::Error(e) | Err::Failure(e) => Error::InvalidCsr(e.to_string()),
    })?;

    let san = csr
        .requested_extensions()
        .and_then(|mut exts| {
            exts.find_map(|ext| match ext {
                ParsedExtension::SubjectAlternativeName(san) => Some(san),
                _ => None,
            })
        })
        .ok_or(Error::MissingSubjectAltName)?;

    let mut hosts: Vec<String> = san
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::URI(uri) => Some((*uri).to_string()),
            GeneralName::DNSName(dns) => Some((*dns).to_string()),
            GeneralName::IPAddress(ip) => ip_to_string(ip),
            _ => None,
        })
        .collect();

    hosts.sort();
    Ok(hosts)
}

fn ip_to_string(bytes: &[u8]) -> Option<String> {
    let ip = match bytes.len() {
        4 => IpAddr::V4(Ipv4Addr::from(<[u8; 4]>::try_from(bytes).ok()?)),
        16 => IpAddr::V6(Ipv6Addr::from(<[u8; 16]>::try_from(bytes).ok()?)),
        _ => return None,
    };
    Some(ip.to_string())
}

/// Returns `true` if any of `identities` is one of `hosts`.
pub fn is_identity_in_hosts<I, H>(identities: &[I], hosts: &[H]) -> bool
where
    I: AsRef<str>,
    H: AsRef<str>,
{
    identities
        .iter()
        .any(|id| hosts.iter().any(|h| h.as_ref() == id.as_ref()))
}

/// Returns the union of `ids` and `hosts`, deduplicated and sorted.
pub fn add_csr_hosts_to_ids<I, H>(ids: &[I], hosts: &[H]) -> Vec<String>
where
    I: AsRef<str>,
    H: AsRef<str>,
{
    ids.iter()
        .map(AsRef::<str>::as_ref)
        .chain(hosts.iter().map(AsRef::<str>::as_ref))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
