//! Proxy configuration
//!
//! Provides [`ProxyConfig`] and the collaborator contracts it carries: the
//! [`CapabilityProbe`] consulted at handle creation and the
//! [`Mount`](hotswap_component::Mount) used to build delegates.

use crate::filter::CapabilityFilter;
use hotswap_component::{DirectMount, Mount};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reports whether transparent interception is available
pub trait CapabilityProbe: Send + Sync {
    /// `true` when identity-preserving handles can be built
    fn supports_interception(&self) -> bool;
}

impl<F> CapabilityProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn supports_interception(&self) -> bool {
        self()
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProbe(pub bool);

impl Default for StaticProbe {
    fn default() -> Self {
        Self(true)
    }
}

impl CapabilityProbe for StaticProbe {
    fn supports_interception(&self) -> bool {
        self.0
    }
}

/// How the registry holds on to its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Entries disappear once nothing else references the handle
    #[default]
    Weak,
    /// Entries live until the registry is cleared
    Strong,
}

/// Configuration shared by every handle a factory creates
#[derive(Clone)]
pub struct ProxyConfig {
    /// Reserved property table
    pub filter: CapabilityFilter,
    /// Registry retention policy
    pub retention: Retention,
    /// Interception capability probe
    pub probe: Arc<dyn CapabilityProbe>,
    /// Delegate mounter
    pub mount: Arc<dyn Mount>,
}

impl ProxyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With reserved property table
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: CapabilityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// With registry retention policy
    #[inline]
    #[must_use]
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// With interception probe
    #[inline]
    #[must_use]
    pub fn with_probe(mut self, probe: impl CapabilityProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// With delegate mounter
    #[inline]
    #[must_use]
    pub fn with_mount(mut self, mount: impl Mount + 'static) -> Self {
        self.mount = Arc::new(mount);
        self
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            filter: CapabilityFilter::default(),
            retention: Retention::default(),
            probe: Arc::new(StaticProbe::default()),
            mount: Arc::new(DirectMount),
        }
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("filter", &self.filter)
            .field("retention", &self.retention)
            .field("interception", &self.probe.supports_interception())
            .finish_non_exhaustive()
    }
}
