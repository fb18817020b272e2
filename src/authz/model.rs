//! Compilation of authorization rules into [`Policy`] values.

use crate::authz::generator::{header_name, use_xfcc_header, GeneratorKind};
use crate::authz::rbac::{Action, Permission, Policy, Principal, Rbac};
use crate::constants::ATTR_REQUEST_HEADER;
use crate::error::{Error, Result};
use crate::observability::{log_debug, log_warn};
use crate::serviceaccount::{AnnotationSource, Annotations};
use serde::Deserialize;

/// A condition on a request attribute, e.g. `request.headers[x-forwarded-client-cert]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    /// Attribute key.
    pub key: String,
    /// The condition holds if the attribute matches any of these.
    pub values: Vec<String>,
    /// The condition holds if the attribute matches none of these.
    pub not_values: Vec<String>,
}

/// An authorization rule: all of its conditions must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Conditions, and-ed.
    pub when: Vec<Condition>,
}

#[derive(Debug, Clone)]
struct CompiledCondition {
    kind: GeneratorKind,
    condition: Condition,
}

/// A rule with its generators resolved.
///
/// Generator selection happens once in [`Model::new`]; [`Model::generate`]
/// only builds the output.
#[derive(Debug, Clone)]
pub struct Model {
    conditions: Vec<CompiledCondition>,
}

impl Model {
    /// Resolves the generators of `rule` for a workload with `annotations`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedAttribute`] if a condition is not on a request header.
    /// - [`Error::MalformedKey`] if a header condition key is malformed.
    pub fn new(rule: &Rule, annotations: &Annotations) -> Result<Self> {
        Self::with_xfcc(rule, use_xfcc_header(annotations))
    }

    /// Resolves the generators of `rule` using the annotations of the
    /// ServiceAccount `name` in `namespace`.
    ///
    /// An account not (yet) known to `source` has XFCC matching disabled.
    ///
    /// # Errors
    ///
    /// Same as [`Model::new`].
    pub fn for_service_account<S>(rule: &Rule, source: &S, name: &str, namespace: &str) -> Result<Self>
    where
        S: AnnotationSource + ?Sized,
    {
        let use_xfcc = source
            .get_annotations(name, namespace)
            .is_some_and(|a| use_xfcc_header(&a));
        Self::with_xfcc(rule, use_xfcc)
    }

    fn with_xfcc(rule: &Rule, use_xfcc: bool) -> Result<Self> {
        let conditions = rule
            .when
            .iter()
            .map(|condition| {
                if !condition.key.starts_with(ATTR_REQUEST_HEADER) {
                    return Err(Error::UnsupportedAttribute(condition.key.clone()));
                }
                let header = header_name(&condition.key)?;
                Ok(CompiledCondition {
                    kind: GeneratorKind::select(use_xfcc, header),
                    condition: condition.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { conditions })
    }

    /// Returns the generator chosen for each condition, in rule order.
    pub fn generator_kinds(&self) -> impl Iterator<Item = GeneratorKind> + '_ {
        self.conditions.iter().map(|c| c.kind)
    }

    /// Builds the policy for this rule.
    ///
    /// Each condition becomes `values OR-ed` AND NOT `not_values OR-ed`, and
    /// the conditions are AND-ed together.
    ///
    /// # Errors
    ///
    /// Any generator error, e.g. [`Error::UnsupportedProtocol`] when `for_tcp`
    /// is set.
    pub fn generate(&self, for_tcp: bool) -> Result<Policy> {
        let mut principals = Vec::new();

        for CompiledCondition { kind, condition } in &self.conditions {
            if !condition.values.is_empty() {
                principals.push(or_ids(
                    condition
                        .values
                        .iter()
                        .map(|v| kind.principal(&condition.key, v, for_tcp))
                        .collect::<Result<Vec<_>>>()?,
                ));
            }
            if !condition.not_values.is_empty() {
                principals.push(Principal::NotId(Box::new(or_ids(
                    condition
                        .not_values
                        .iter()
                        .map(|v| kind.principal(&condition.key, v, for_tcp))
                        .collect::<Result<Vec<_>>>()?,
                ))));
            }
        }

        let principal = if principals.is_empty() {
            Principal::Any(true)
        } else {
            Principal::AndIds(principals)
        };

        Ok(Policy {
            permissions: vec![Permission::Any(true)],
            principals: vec![principal],
        })
    }
}

fn or_ids(mut principals: Vec<Principal>) -> Principal {
    if principals.len() == 1 {
        principals.remove(0)
    } else {
        Principal::OrIds(principals)
    }
}

/// Compiles `rules` of the policy `name` for a workload with `annotations`.
///
/// A rule that fails to compile is logged and left out; the other rules are
/// still compiled. Policies are keyed `"{name}-rule[{index}]"`.
pub fn compile_rules(
    name: &str,
    action: Action,
    rules: &[Rule],
    annotations: &Annotations,
    for_tcp: bool,
) -> Rbac {
    let mut rbac = Rbac {
        action,
        ..Rbac::default()
    };

    for (i, rule) in rules.iter().enumerate() {
        let policy_name = format!("{name}-rule[{i}]");
        match Model::new(rule, annotations).and_then(|m| m.generate(for_tcp)) {
            Ok(policy) => {
                log_debug!("generated policy {policy_name}");
                rbac.policies.insert(policy_name, policy);
            }
            Err(e) => {
                log_warn!("skipped rule {policy_name}: {e}");
            }
        }
    }

    rbac
}
