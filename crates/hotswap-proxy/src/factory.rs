//! Handle creation
//!
//! [`ProxyFactory`] pairs a [`ProxyConfig`] with the registry its handles are
//! recorded in. The process-wide factory behind [`create_proxy`] uses the
//! default configuration.

use crate::config::ProxyConfig;
use crate::fallback::FallbackHandle;
use crate::handle::ProxyHandle;
use crate::proxy::IdentityProxy;
use crate::registry::ProxyRegistry;
use hotswap_component::{display_name, ImplRef};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, warn};

static GLOBAL: Lazy<ProxyFactory> = Lazy::new(ProxyFactory::new);

/// Creates and deduplicates proxy handles
#[derive(Debug)]
pub struct ProxyFactory {
    config: ProxyConfig,
    registry: Arc<ProxyRegistry>,
}

impl ProxyFactory {
    /// Create factory with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ProxyConfig::default())
    }

    /// Create factory with custom configuration
    #[must_use]
    pub fn with_config(config: ProxyConfig) -> Self {
        let registry = Arc::new(ProxyRegistry::new(config.retention));
        Self { config, registry }
    }

    /// Configuration handles are created with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Registry handles are recorded in
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ProxyRegistry {
        &self.registry
    }

    /// Handle managing `implementation`
    ///
    /// Returns the existing handle when `implementation` is already registered
    /// or is a type exposed by a registered handle. Otherwise builds an
    /// identity-preserving handle, or a fallback one when the probe reports no
    /// interception support.
    pub fn create_proxy(&self, implementation: ImplRef) -> ProxyHandle {
        if let Some(existing) = self.registry.find(&implementation) {
            debug!(
                component = %display_name(implementation.as_ref()),
                "reusing existing proxy handle"
            );
            return existing;
        }

        let handle = if self.config.probe.supports_interception() {
            ProxyHandle::Identity(IdentityProxy::new(
                Arc::clone(&implementation),
                &self.config,
                Arc::clone(&self.registry),
            ))
        } else {
            warn!(
                component = %display_name(implementation.as_ref()),
                "interception unavailable, live instances will not survive updates"
            );
            ProxyHandle::Fallback(Arc::new(FallbackHandle::new(Arc::clone(&implementation))))
        };
        self.registry.register(implementation, handle.clone());
        handle
    }

    /// Forget every registered handle
    pub fn reset(&self) {
        self.registry.clear();
    }
}

impl Default for ProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide factory
#[inline]
#[must_use]
pub fn global_factory() -> &'static ProxyFactory {
    &GLOBAL
}

/// Handle managing `implementation`, from the process-wide factory
pub fn create_proxy(implementation: ImplRef) -> ProxyHandle {
    GLOBAL.create_proxy(implementation)
}

/// Forget every handle in the process-wide registry
pub fn reset_registry() {
    GLOBAL.reset();
}
