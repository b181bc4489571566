//! Mount collaborator contract
//!
//! The swap core never instantiates delegates directly; it asks a [`Mount`]
//! for them. Hosts with a real render tree plug their own mounter in,
//! everything else uses [`DirectMount`].

use crate::error::ComponentError;
use crate::implementation::ImplRef;
use crate::instance::InstanceRef;
use serde_json::{Map, Value};

/// Instantiates implementations on behalf of the swap core
pub trait Mount: Send + Sync {
    /// Construct `implementation`, defaulting missing inputs to empty objects
    ///
    /// # Errors
    /// Construction failures of the implementation, unmodified.
    fn mount(
        &self,
        implementation: &ImplRef,
        props: Option<Value>,
        context: Option<Value>,
    ) -> Result<Mounted, ComponentError>;
}

/// Mount by calling [`Implementation::construct`](crate::Implementation::construct)
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMount;

impl Mount for DirectMount {
    fn mount(
        &self,
        implementation: &ImplRef,
        props: Option<Value>,
        context: Option<Value>,
    ) -> Result<Mounted, ComponentError> {
        let empty = || Value::Object(Map::new());
        let instance = implementation.construct(
            props.unwrap_or_else(empty),
            context.unwrap_or_else(empty),
        )?;
        Ok(Mounted::new(instance))
    }
}

/// A mounted instance
#[derive(Clone)]
pub struct Mounted {
    instance: InstanceRef,
}

impl Mounted {
    /// Wrap an already constructed instance
    #[inline]
    #[must_use]
    pub fn new(instance: InstanceRef) -> Self {
        Self { instance }
    }

    /// Props the instance was constructed with
    #[inline]
    #[must_use]
    pub fn props(&self) -> Value {
        self.instance.props()
    }

    /// Context the instance was constructed with
    #[inline]
    #[must_use]
    pub fn context(&self) -> Value {
        self.instance.context()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> Option<Value> {
        self.instance.state()
    }

    /// Call a lifecycle hook on the instance
    ///
    /// # Errors
    /// Lookup failures or whatever the hook raises.
    pub fn invoke(&self, hook: &str, args: &[Value]) -> Result<Value, ComponentError> {
        self.instance.invoke(hook, args)
    }

    /// Borrow the instance
    #[inline]
    #[must_use]
    pub fn instance(&self) -> &InstanceRef {
        &self.instance
    }

    /// Take the instance
    #[inline]
    #[must_use]
    pub fn into_instance(self) -> InstanceRef {
        self.instance
    }
}
