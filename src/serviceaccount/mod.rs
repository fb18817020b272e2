//! ServiceAccount annotation cache.
//!
//! [`ServiceAccountCache`] is fed by a ServiceAccount watch and queried by
//! policy compilation. It is eventually consistent: a lookup may miss an
//! account whose add event has not been delivered yet, and callers treat a
//! miss as "no annotations".

use crate::observability::log_debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

/// Kubernetes-style object annotations.
pub type Annotations = BTreeMap<String, String>;

/// The ServiceAccount fields the cache needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceAccount {
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// Object annotations.
    pub annotations: Annotations,
}

impl ServiceAccount {
    /// Creates a ServiceAccount with the given annotations.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            annotations,
        }
    }
}

/// Watch event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The object was created.
    Add,
    /// The object was modified.
    Update,
    /// The object was removed.
    Delete,
}

/// Lookup of ServiceAccount annotations by name and namespace.
pub trait AnnotationSource: Send + Sync {
    /// Returns the annotations of the ServiceAccount, or `None` if unknown.
    fn get_annotations(&self, name: &str, namespace: &str) -> Option<Arc<Annotations>>;
}

/// Returns the `namespace/name` cache key, or `name` for an empty namespace.
pub fn key(name: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}

/// Eventually consistent cache of ServiceAccount annotations.
///
/// A single reader/writer lock guards the whole map. Writes come from one
/// watch dispatcher and only hold the lock for one insert or remove.
#[derive(Debug, Default)]
pub struct ServiceAccountCache {
    service_accounts: RwLock<HashMap<String, Arc<Annotations>>>,
}

impl ServiceAccountCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a watch event for `current`.
    ///
    /// Add and update replace the stored annotations of the account; delete
    /// removes it. Events are applied in delivery order, without reordering
    /// or deduplication.
    pub fn on_event(&self, _previous: Option<&ServiceAccount>, current: &ServiceAccount, event: Event) {
        let key = key(&current.name, &current.namespace);
        let annotations = match event {
            Event::Add | Event::Update => Some(Arc::new(current.annotations.clone())),
            Event::Delete => None,
        };

        // A poisoned lock still guards a consistent map: every write is a
        // single insert or remove.
        let mut service_accounts = self
            .service_accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match annotations {
            Some(annotations) => {
                service_accounts.insert(key, annotations);
            }
            None => {
                service_accounts.remove(&key);
            }
        }
        drop(service_accounts);

        log_debug!("service account {event:?}: {}/{}", current.namespace, current.name);
    }

    /// Returns the annotations of ServiceAccount `name` in `namespace`.
    pub fn get_annotations(&self, name: &str, namespace: &str) -> Option<Arc<Annotations>> {
        self.service_accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key(name, namespace))
            .cloned()
    }

    /// Number of cached ServiceAccounts.
    pub fn len(&self) -> usize {
        self.service_accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no ServiceAccount is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnnotationSource for ServiceAccountCache {
    fn get_annotations(&self, name: &str, namespace: &str) -> Option<Arc<Annotations>> {
        ServiceAccountCache::get_annotations(self, name, namespace)
    }
}

impl<T: AnnotationSource + ?Sized> AnnotationSource for Arc<T> {
    fn get_annotations(&self, name: &str, namespace: &str) -> Option<Arc<Annotations>> {
        (**self).get_annotations(name, namespace)
    }
}
