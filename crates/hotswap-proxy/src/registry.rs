//! Proxy registry
//!
//! Provides [`ProxyRegistry`], the lookup from an implementation (or a type
//! already exposed by a handle) to the handle managing it. Used to prevent
//! double wrapping and to stop swaps into a proxy type.
//!
//! Entries are kept in a plain list: a session registers tens of components,
//! and lookups compare allocations, not hashes.

use crate::config::Retention;
use crate::handle::{ProxyHandle, WeakHandle};
use hotswap_component::{same_implementation, ImplRef, Implementation};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

enum Entry {
    Strong {
        key: ImplRef,
        handle: ProxyHandle,
    },
    Weak {
        key: Weak<dyn Implementation>,
        handle: WeakHandle,
    },
}

impl Entry {
    fn resolve(&self) -> Option<(ImplRef, ProxyHandle)> {
        match self {
            Self::Strong { key, handle } => Some((Arc::clone(key), handle.clone())),
            Self::Weak { key, handle } => Some((key.upgrade()?, handle.upgrade()?)),
        }
    }

    fn matches(key: &ImplRef, stored: &ImplRef, handle: &ProxyHandle) -> bool {
        same_implementation(stored, key) || handle.exposes(key)
    }
}

/// Registry of proxy handles
pub struct ProxyRegistry {
    retention: Retention,
    entries: Mutex<Vec<Entry>>,
}

impl ProxyRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new(retention: Retention) -> Self {
        Self {
            retention,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Retention policy of this registry
    #[inline]
    #[must_use]
    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Handle registered for `key`, or for the handle whose exposed type is `key`
    ///
    /// Entries whose referents are gone are dropped during the scan.
    #[must_use]
    pub fn find(&self, key: &ImplRef) -> Option<ProxyHandle> {
        let mut found = None;
        self.entries.lock().retain(|entry| {
            let Some((stored, handle)) = entry.resolve() else {
                return false;
            };
            if found.is_none() && Entry::matches(key, &stored, &handle) {
                found = Some(handle);
            }
            true
        });
        found
    }

    /// Whether `key` resolves to a registered handle
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &ImplRef) -> bool {
        self.find(key).is_some()
    }

    /// Record `handle` as the manager of `key`
    ///
    /// Callers look up first; this does not check for an existing entry.
    pub fn register(&self, key: ImplRef, handle: ProxyHandle) {
        let entry = match self.retention {
            Retention::Strong => Entry::Strong { key, handle },
            Retention::Weak => Entry::Weak {
                key: Arc::downgrade(&key),
                handle: handle.downgrade(),
            },
        };
        self.entries.lock().push(entry);
    }

    /// Drop entries whose referents are gone, returning how many were removed
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| entry.resolve().is_some());
        before - entries.len()
    }

    /// Number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.prune();
        self.entries.lock().len()
    }

    /// Whether no live entries remain
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for ProxyRegistry {
    fn default() -> Self {
        Self::new(Retention::default())
    }
}

impl std::fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyRegistry")
            .field("retention", &self.retention)
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}
