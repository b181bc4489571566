//! Builder-defined component types
//!
//! Provides [`ComponentClass`], the standard [`Implementation`] for hosts that
//! describe components as a constructor plus a method table.

use crate::error::ComponentError;
use crate::implementation::{Capabilities, Implementation};
use crate::instance::{Instance, InstanceRef, Method};
use crate::object::Object;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Constructor body; runs against the freshly allocated object
pub type Constructor = Arc<dyn Fn(&Object) -> Result<(), ComponentError> + Send + Sync>;

/// Component type built from a constructor and a method table
pub struct ComponentClass {
    name: String,
    display_name: Option<String>,
    capabilities: Capabilities,
    constructor: Option<Constructor>,
    methods: IndexMap<String, Method>,
    statics: IndexMap<String, Value>,
}

impl ComponentClass {
    /// Start building a class
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Names of methods defined by this class
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }
}

impl Implementation for ComponentClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn construct(&self, props: Value, context: Value) -> Result<InstanceRef, ComponentError> {
        let object = Object::new(&self.name, props, context, self.methods.clone());
        if let Some(constructor) = &self.constructor {
            constructor(&object)?;
        }
        Ok(object)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn static_member(&self, key: &str) -> Option<Value> {
        match key {
            "name" => Some(Value::String(self.name.clone())),
            "display_name" => self.display_name.clone().map(Value::String),
            _ => self.statics.get(key).cloned(),
        }
    }

    fn static_keys(&self) -> Vec<String> {
        self.statics.keys().cloned().collect()
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("methods", &self.method_names())
            .field("statics", &self.statics)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ComponentClass`]
#[must_use]
pub struct ClassBuilder {
    class: ComponentClass,
}

impl ClassBuilder {
    /// Create builder for a class named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            class: ComponentClass {
                name: name.into(),
                display_name: None,
                capabilities: Capabilities::default(),
                constructor: None,
                methods: IndexMap::new(),
                statics: IndexMap::new(),
            },
        }
    }

    /// Set display name
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.class.display_name = Some(name.into());
        self
    }

    /// Declare that instances own a state store
    pub fn stateful(mut self) -> Self {
        self.class.capabilities.stateful = true;
        self
    }

    /// Set constructor body
    pub fn constructor<F>(mut self, body: F) -> Self
    where
        F: Fn(&Object) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        self.class.constructor = Some(Arc::new(body));
        self
    }

    /// Add a method; lifecycle hooks are methods named after the hook
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&dyn Instance, &[Value]) -> Result<Value, ComponentError> + Send + Sync + 'static,
    {
        self.class.methods.insert(name.into(), Arc::new(body));
        self
    }

    /// Add a type-level member
    pub fn static_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.class.statics.insert(key.into(), value);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Arc<ComponentClass> {
        Arc::new(self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn counter() -> Arc<ComponentClass> {
        ComponentClass::builder("Counter")
            .stateful()
            .constructor(|this| {
                this.init_state(json!({ "counter": 0 }));
                this.set("answer", json!(42));
                Ok(())
            })
            .method("increment", |this, _| {
                let n = this
                    .state()
                    .and_then(|s| s["counter"].as_i64())
                    .unwrap_or_default();
                this.set_state(json!({ "counter": n + 1 }))?;
                Ok(Value::Null)
            })
            .static_value("version", json!(1))
            .build()
    }

    #[test]
    fn construct_runs_constructor() {
        let instance = counter().construct(json!({}), json!({})).unwrap();
        assert_eq!(instance.type_name(), "Counter");
        assert_eq!(instance.state(), Some(json!({ "counter": 0 })));
        assert_eq!(instance.get("answer").unwrap().into_field(), Some(json!(42)));
    }

    #[test]
    fn methods_mutate_state() {
        let instance = counter().construct(json!({}), json!({})).unwrap();
        instance.invoke("increment", &[]).unwrap();
        instance.invoke("increment", &[]).unwrap();
        assert_eq!(instance.state(), Some(json!({ "counter": 2 })));
    }

    #[test]
    fn instances_get_independent_method_tables() {
        let class = counter();
        let a = class.construct(json!({}), json!({})).unwrap();
        let b = class.construct(json!({}), json!({})).unwrap();

        a.replace_method("increment", crate::method(|_, _| Ok(json!("patched"))));
        assert_eq!(a.invoke("increment", &[]).unwrap(), json!("patched"));
        assert_eq!(b.invoke("increment", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn constructor_errors_propagate() {
        let failing = ComponentClass::builder("Broken")
            .constructor(|_| Err(ComponentError::construction("Broken", "no config")))
            .build();
        let err = failing.construct(json!({}), json!({})).err().unwrap();
        assert_eq!(err, ComponentError::construction("Broken", "no config"));
    }

    #[test]
    fn missing_method_is_reported() {
        let instance = counter().construct(json!({}), json!({})).unwrap();
        let err = instance.invoke("decrement", &[]).unwrap_err();
        assert!(matches!(err, ComponentError::MethodNotFound { .. }));
    }

    #[test]
    fn statics_and_capabilities() {
        let class = counter();
        assert!(class.capabilities().stateful);
        assert_eq!(class.static_member("version"), Some(json!(1)));
        assert_eq!(class.static_member("name"), Some(json!("Counter")));
        assert_eq!(class.static_keys(), vec!["version".to_string()]);

        let plain = ComponentClass::builder("Plain").build();
        assert!(!plain.capabilities().stateful);
    }
}
