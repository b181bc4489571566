//! Implementation (component type) abstraction

use crate::error::ComponentError;
use crate::instance::InstanceRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared reference to an implementation
///
/// Identity is the allocation: two `ImplRef`s denote the same implementation
/// only if [`same_implementation`] holds.
pub type ImplRef = Arc<dyn Implementation>;

/// Names that say nothing about the component they label
const PLACEHOLDER_NAMES: &[&str] = &["", "Component", "Constructor"];

/// Component type as currently authored
pub trait Implementation: Send + Sync {
    /// Type name
    fn name(&self) -> &str;

    /// Human-facing name, when it differs from [`Implementation::name`]
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Create a new instance
    ///
    /// # Errors
    /// Whatever the implementation's own construction logic raises.
    fn construct(&self, props: Value, context: Value) -> Result<InstanceRef, ComponentError>;

    /// Capabilities of instances this type constructs
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Type-level member
    fn static_member(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Names of type-level members
    fn static_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Explicit capability declaration of an implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Constructs into an instance that owns a state store
    pub stateful: bool,
}

impl Capabilities {
    /// Capabilities of a stateful component type
    #[inline]
    #[must_use]
    pub const fn stateful() -> Self {
        Self { stateful: true }
    }
}

/// Pointer identity of two implementations
#[inline]
#[must_use]
pub fn same_implementation(a: &ImplRef, b: &ImplRef) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Name suitable for diagnostics; `"Unknown"` for placeholder names
#[must_use]
pub fn display_name(implementation: &dyn Implementation) -> String {
    let name = implementation
        .display_name()
        .unwrap_or_else(|| implementation.name());
    if PLACEHOLDER_NAMES.contains(&name) {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ComponentClass;

    #[test]
    fn same_implementation_is_pointer_identity() {
        let a: ImplRef = ComponentClass::builder("A").build();
        let b: ImplRef = ComponentClass::builder("A").build();
        let a2 = Arc::clone(&a);

        assert!(same_implementation(&a, &a2));
        assert!(!same_implementation(&a, &b));
    }

    #[test]
    fn display_name_prefers_display_name() {
        let named = ComponentClass::builder("Counter")
            .display_name("Pretty Counter")
            .build();
        assert_eq!(display_name(named.as_ref()), "Pretty Counter");
    }

    #[test]
    fn display_name_placeholder() {
        let anonymous = ComponentClass::builder("Constructor").build();
        assert_eq!(display_name(anonymous.as_ref()), "Unknown");

        let empty = ComponentClass::builder("").build();
        assert_eq!(display_name(empty.as_ref()), "Unknown");
    }
}
