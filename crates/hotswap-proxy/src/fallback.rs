//! Degraded handle for hosts without interception support
//!
//! A [`FallbackHandle`] is just a replaceable pointer. Instances constructed
//! from a previous `get()` keep running the implementation they were built
//! from, nothing is transferred on update, and a fresh `get()` is required to
//! observe the new implementation.

use crate::state_machine::HandlePhase;
use hotswap_component::ImplRef;
use parking_lot::RwLock;
use std::sync::Arc;

/// Non-identity-preserving handle
pub struct FallbackHandle {
    current: RwLock<ImplRef>,
    phase: RwLock<HandlePhase>,
}

impl FallbackHandle {
    /// Create handle exposing `implementation`
    #[must_use]
    pub fn new(implementation: ImplRef) -> Self {
        Self {
            current: RwLock::new(implementation),
            phase: RwLock::new(HandlePhase::Bound),
        }
    }

    /// Last implementation set on this handle
    #[inline]
    #[must_use]
    pub fn get(&self) -> ImplRef {
        Arc::clone(&self.current.read())
    }

    /// Replace the exposed implementation
    pub fn update(&self, next: ImplRef) {
        *self.current.write() = next;
        let mut phase = self.phase.write();
        *phase = phase.after_update();
    }

    /// Current lifecycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> HandlePhase {
        *self.phase.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotswap_component::{same_implementation, ComponentClass};

    #[test]
    fn update_replaces_pointer() {
        let first: ImplRef = ComponentClass::builder("First").build();
        let second: ImplRef = ComponentClass::builder("Second").build();
        let handle = FallbackHandle::new(Arc::clone(&first));

        assert!(same_implementation(&handle.get(), &first));
        assert_eq!(handle.phase(), HandlePhase::Bound);

        handle.update(Arc::clone(&second));
        assert!(same_implementation(&handle.get(), &second));
        assert_eq!(handle.phase(), HandlePhase::Swapped);
    }
}
