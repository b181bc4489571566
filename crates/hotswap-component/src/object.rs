//! Default instance representation
//!
//! [`Object`] is what [`ComponentClass`](crate::ComponentClass) constructs:
//! ordered fields, a state store, and a per-instance method table seeded from
//! the class.

use crate::error::ComponentError;
use crate::instance::{
    method, BoundMethod, Instance, InstanceRef, Member, Method, PropertyDescriptor,
};
use crate::lifecycle;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Generic component instance
pub struct Object {
    me: Weak<Object>,
    type_name: String,
    props: Value,
    context: Value,
    fields: RwLock<IndexMap<String, Value>>,
    state: RwLock<Option<Value>>,
    methods: RwLock<IndexMap<String, Method>>,
}

impl Object {
    /// Create an instance with the given method table
    #[must_use]
    pub fn new(
        type_name: impl Into<String>,
        props: Value,
        context: Value,
        methods: IndexMap<String, Method>,
    ) -> Arc<Self> {
        let type_name = type_name.into();
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            type_name,
            props,
            context,
            fields: RwLock::new(IndexMap::new()),
            state: RwLock::new(None),
            methods: RwLock::new(methods),
        })
    }

    /// Assign state without running hooks; meant for constructors
    pub fn init_state(&self, state: Value) {
        *self.state.write() = Some(state);
    }

    fn receiver(&self) -> Option<InstanceRef> {
        self.me.upgrade().map(|me| me as InstanceRef)
    }

    fn set_state_method() -> Method {
        method(|this, args| {
            this.set_state(args.first().cloned().unwrap_or(Value::Null))?;
            Ok(Value::Null)
        })
    }

    fn run_hook(&self, name: &str, args: [Value; 2]) -> Result<(), ComponentError> {
        // Clone out of the lock so the hook can touch this object freely.
        let hook = self.methods.read().get(name).cloned();
        if let Some(hook) = hook {
            hook(self, &args)?;
        }
        Ok(())
    }
}

impl Instance for Object {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(&self, key: &str) -> Option<Member> {
        match key {
            lifecycle::STATE => return self.state().map(Member::Field),
            lifecycle::PROPS => return Some(Member::Field(self.props.clone())),
            lifecycle::CONTEXT => return Some(Member::Field(self.context.clone())),
            _ => {}
        }
        if let Some(value) = self.fields.read().get(key) {
            return Some(Member::Field(value.clone()));
        }
        let body = if key == lifecycle::SET_STATE {
            Some(Self::set_state_method())
        } else {
            self.methods.read().get(key).cloned()
        }?;
        let receiver = self.receiver()?;
        Some(Member::Method(BoundMethod::new(key, receiver, body)))
    }

    fn describe(&self, key: &str) -> Option<PropertyDescriptor> {
        match self.get(key)? {
            Member::Field(value) => Some(PropertyDescriptor::field(&self.type_name, value)),
            Member::Method(_) => Some(PropertyDescriptor::method(&self.type_name)),
        }
    }

    fn own_keys(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    fn has_own_field(&self, key: &str) -> bool {
        self.fields.read().contains_key(key)
    }

    fn set(&self, key: &str, value: Value) {
        if key == lifecycle::STATE {
            self.init_state(value);
        } else {
            self.fields.write().insert(key.to_string(), value);
        }
    }

    fn props(&self) -> Value {
        self.props.clone()
    }

    fn context(&self) -> Value {
        self.context.clone()
    }

    fn state(&self) -> Option<Value> {
        self.state.read().clone()
    }

    fn set_state(&self, partial: Value) -> Result<(), ComponentError> {
        let prev = self.state();
        let next = merge_state(prev.as_ref(), partial);

        self.run_hook(lifecycle::WILL_UPDATE, [self.props.clone(), next.clone()])?;
        *self.state.write() = Some(next);
        self.run_hook(
            lifecycle::DID_UPDATE,
            [self.props.clone(), prev.unwrap_or(Value::Null)],
        )
    }

    fn method(&self, name: &str) -> Option<Method> {
        self.methods.read().get(name).cloned()
    }

    fn replace_method(&self, name: &str, method: Method) -> Option<Method> {
        self.methods.write().insert(name.to_string(), method)
    }
}

/// Shallow-merge `partial` into `prev`
///
/// Objects merge key by key; any other shape replaces the previous state.
#[must_use]
pub fn merge_state(prev: Option<&Value>, partial: Value) -> Value {
    match (prev, partial) {
        (Some(Value::Object(prev)), Value::Object(partial)) => {
            let mut merged = prev.clone();
            merged.extend(partial);
            Value::Object(merged)
        }
        (_, partial) => partial,
    }
}
