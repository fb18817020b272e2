use xfcc_authz::cert::{add_csr_hosts_to_ids, csr_hosts, is_identity_in_hosts};
use xfcc_authz::Error;

const SPIFFE_ID: &str = "spiffe://cluster.local/ns/default/sa/sleep";

#[test]
fn csr_hosts_from_san_extension() {
    let csr: &[u8] = include_bytes!("testdata/csr/san.csr");

    let hosts = csr_hosts(csr).unwrap();

    assert_eq!(
        hosts,
        [
            "10.0.0.1",
            "foo.com",
            "sleep.default.svc.cluster.local",
            SPIFFE_ID,
        ]
    );
}

#[test]
fn csr_without_san_is_rejected() {
    let csr: &[u8] = include_bytes!("testdata/csr/no-san.csr");

    assert_eq!(csr_hosts(csr).unwrap_err(), Error::MissingSubjectAltName);
}

#[test]
fn corrupted_csr_is_rejected() {
    let csr: &[u8] = include_bytes!("testdata/csr/san.csr");
    let truncated = &csr[..csr.len() / 2];

    assert!(matches!(csr_hosts(truncated), Err(Error::InvalidCsr(_))));
}

#[test]
fn csr_hosts_merge_with_caller_identity() {
    let csr: &[u8] = include_bytes!("testdata/csr/san.csr");
    let hosts = csr_hosts(csr).unwrap();

    assert!(is_identity_in_hosts(&[SPIFFE_ID], &hosts));

    let ids = add_csr_hosts_to_ids(&[SPIFFE_ID], &hosts);
    assert_eq!(ids.len(), 4);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}
