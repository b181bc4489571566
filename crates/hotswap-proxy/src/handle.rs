//! Public handle
//!
//! [`ProxyHandle`] is what `create_proxy` returns. Whether it preserves
//! identity is decided once, at creation, from the capability probe.

use crate::fallback::FallbackHandle;
use crate::proxy::{IdentityProxy, ProxyClass};
use crate::state_machine::HandlePhase;
use hotswap_component::{same_implementation, ComponentError, ImplRef};
use std::sync::{Arc, Weak};

/// Result of [`ProxyHandle::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Pointer moved; `rebound` live instances received a new delegate
    Swapped {
        /// Number of live instances that received a delegate
        rebound: usize,
    },
    /// Target was already known to the registry; nothing changed
    Ignored,
    /// Fallback pointer replaced; nothing was transferred
    Replaced,
}

/// Long-lived handle around a swappable implementation
#[derive(Clone)]
pub enum ProxyHandle {
    /// Identity-preserving handle
    Identity(IdentityProxy),
    /// Degraded handle
    Fallback(Arc<FallbackHandle>),
}

impl ProxyHandle {
    /// Externally visible type
    ///
    /// Stable for identity handles; for fallback handles, whatever was set
    /// last.
    #[must_use]
    pub fn get(&self) -> ImplRef {
        match self {
            Self::Identity(proxy) => proxy.get(),
            Self::Fallback(fallback) => fallback.get(),
        }
    }

    /// Swap in `next`
    ///
    /// # Errors
    /// Component failures raised while building delegates.
    pub fn update(&self, next: ImplRef) -> Result<SwapOutcome, ComponentError> {
        match self {
            Self::Identity(proxy) => proxy.update(next),
            Self::Fallback(fallback) => {
                fallback.update(next);
                Ok(SwapOutcome::Replaced)
            }
        }
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> HandlePhase {
        match self {
            Self::Identity(proxy) => proxy.phase(),
            Self::Fallback(fallback) => fallback.phase(),
        }
    }

    /// Whether live instances keep identity and state across updates
    #[inline]
    #[must_use]
    pub fn is_identity_preserving(&self) -> bool {
        matches!(self, Self::Identity(_))
    }

    /// Identity proxy, if this handle is one
    #[inline]
    #[must_use]
    pub fn as_identity(&self) -> Option<&IdentityProxy> {
        match self {
            Self::Identity(proxy) => Some(proxy),
            Self::Fallback(_) => None,
        }
    }

    /// Whether both handles manage the same implementation slot
    #[must_use]
    pub fn same_handle(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity(a), Self::Identity(b)) => Arc::ptr_eq(a.class(), b.class()),
            (Self::Fallback(a), Self::Fallback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether `implementation` is the stable type this handle exposes
    pub(crate) fn exposes(&self, implementation: &ImplRef) -> bool {
        match self {
            Self::Identity(proxy) => same_implementation(&proxy.get(), implementation),
            Self::Fallback(_) => false,
        }
    }

    pub(crate) fn downgrade(&self) -> WeakHandle {
        match self {
            Self::Identity(proxy) => WeakHandle::Identity(Arc::downgrade(proxy.class())),
            Self::Fallback(fallback) => WeakHandle::Fallback(Arc::downgrade(fallback)),
        }
    }
}

impl std::fmt::Debug for ProxyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = match self {
            Self::Identity(proxy) => proxy.current(),
            Self::Fallback(fallback) => fallback.get(),
        };
        f.debug_struct("ProxyHandle")
            .field("identity_preserving", &self.is_identity_preserving())
            .field("phase", &self.phase())
            .field("current", &current.name())
            .finish()
    }
}

/// Non-owning form of [`ProxyHandle`] kept by weak registries
pub(crate) enum WeakHandle {
    Identity(Weak<ProxyClass>),
    Fallback(Weak<FallbackHandle>),
}

impl WeakHandle {
    pub(crate) fn upgrade(&self) -> Option<ProxyHandle> {
        match self {
            Self::Identity(class) => class
                .upgrade()
                .map(|class| ProxyHandle::Identity(IdentityProxy::from_class(class))),
            Self::Fallback(fallback) => fallback.upgrade().map(ProxyHandle::Fallback),
        }
    }
}
