//! Feature switches read from the environment.

use crate::constants::CARRIER_GRADE_SERVICE_ENTRY_ISTIO_MUTUAL_ENV;
use crate::observability::{log_info, log_warn};
use std::env;

/// Control-plane feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Force auto SNI and auto SAN validation on mesh-external `ISTIO_MUTUAL`
    /// service entries that use a wildcard SNI.
    pub carrier_grade_service_entry_istio_mutual: bool,
}

impl Features {
    /// Reads the features from the process environment.
    ///
    /// Unset variables keep their default. Invalid values are logged and also
    /// keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the features through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut features = Self::default();

        if let Some(enabled) = bool_var(&lookup, CARRIER_GRADE_SERVICE_ENTRY_ISTIO_MUTUAL_ENV) {
            features.carrier_grade_service_entry_istio_mutual = enabled;
        }
        if features.carrier_grade_service_entry_istio_mutual {
            log_info!("carrier grade ISTIO_MUTUAL service entries enabled");
        }

        features
    }
}

fn bool_var<F>(lookup: &F, name: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)?;
    let parsed = parse_bool(&value);
    if parsed.is_none() {
        log_warn!("invalid boolean {value:?} for {name}, using default");
    }
    parsed
}

/// Parses the boolean spellings accepted by Kubernetes tooling:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
