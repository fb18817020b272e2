#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

//! XFCC-aware authorization for a service-mesh control plane.
//!
//! The crate compiles authorization rules on the `x-forwarded-client-cert`
//! header into header-match predicates, gated per workload by the
//! `authz.contains.aspenmesh.io/xfcc` annotation, and keeps the
//! ServiceAccount annotation cache that gating and certificate issuance read.
//!
//! ```rust
//! use xfcc_authz::authz::{Condition, Model, Principal, Rule};
//! use xfcc_authz::matcher::HeaderMatchSpecifier;
//! use xfcc_authz::serviceaccount::{Annotations, Event, ServiceAccount, ServiceAccountCache};
//!
//! # fn example() -> Result<(), xfcc_authz::Error> {
//! // Fed by the ServiceAccount watch.
//! let cache = ServiceAccountCache::new();
//! let annotations = Annotations::from([(
//!     "authz.contains.aspenmesh.io/xfcc".to_string(),
//!     "true".to_string(),
//! )]);
//! cache.on_event(None, &ServiceAccount::new("smf", "core", annotations), Event::Add);
//!
//! let rule = Rule {
//!     when: vec![Condition {
//!         key: "request.headers[x-forwarded-client-cert]".to_string(),
//!         values: vec!["*URI=com.example.nfType:smf*".to_string()],
//!         not_values: vec![],
//!     }],
//! };
//!
//! let policy = Model::for_service_account(&rule, &cache, "smf", "core")?.generate(false)?;
//! let Principal::AndIds(ids) = &policy.principals[0] else { unreachable!() };
//! assert_eq!(
//!     ids[0].as_header().map(|m| m.specifier()),
//!     Some(&HeaderMatchSpecifier::Contains("URI=com.example.nfType:smf".to_string()))
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Feature flags
//!
//! - **`logging`** (default): log through the `log` crate.
//! - **`tracing`**: log through `tracing` instead.

mod observability;

pub mod authz;
pub mod cert;
pub mod constants;
pub mod error;
pub mod features;
pub mod matcher;
pub mod serviceaccount;
pub mod tls;

pub use crate::{
    authz::{use_xfcc_header, GeneratorKind, Model},
    error::{AnnotationParseError, Error, Result},
    features::Features,
    matcher::{header_matcher, HeaderMatchSpecifier, HeaderMatcher},
    serviceaccount::{AnnotationSource, Annotations, ServiceAccountCache},
};
