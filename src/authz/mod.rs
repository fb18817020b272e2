//! Authorization rule compilation with XFCC-aware header matching.
//!
//! A workload opts in through the `authz.contains.aspenmesh.io/xfcc`
//! annotation. When it does, conditions on the `x-forwarded-client-cert`
//! header are compiled with [`GeneratorKind::Xfcc`], which understands `*`
//! wildcards; all other header conditions use exact matching.
//!
//! # Examples
//!
//! ```rust
//! use xfcc_authz::authz::{Condition, Model, Rule};
//! use xfcc_authz::matcher::HeaderMatchSpecifier;
//! use xfcc_authz::serviceaccount::Annotations;
//!
//! let annotations = Annotations::from([(
//!     "authz.contains.aspenmesh.io/xfcc".to_string(),
//!     "true".to_string(),
//! )]);
//! let rule = Rule {
//!     when: vec![Condition {
//!         key: "request.headers[x-forwarded-client-cert]".to_string(),
//!         values: vec!["*URI=com.example.nfType:smf*".to_string()],
//!         not_values: vec![],
//!     }],
//! };
//!
//! let policy = Model::new(&rule, &annotations)?.generate(false)?;
//! let json = serde_json::to_string(&policy).unwrap();
//! assert!(json.contains(r#""contains":"URI=com.example.nfType:smf""#));
//! # let _ = HeaderMatchSpecifier::Present(true);
//! # Ok::<(), xfcc_authz::Error>(())
//! ```

pub mod generator;
pub mod model;
pub mod rbac;

pub use generator::{header_name, parse_xfcc_annotation, use_xfcc_header, GeneratorKind};
pub use model::{compile_rules, Condition, Model, Rule};
pub use rbac::{Action, Permission, Policy, Principal, Rbac};
