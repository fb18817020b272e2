//! Certificate identity helpers for workload certificate issuance.

pub mod csr;
pub mod custom_fields;

pub use csr::{add_csr_hosts_to_ids, csr_hosts, is_identity_in_hosts};
pub use custom_fields::{CertificateCustomFields, CustomFields, San};
