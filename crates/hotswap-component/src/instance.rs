//! Live instance abstraction
//!
//! Provides [`Instance`], the property-addressable object that constructors
//! produce, together with [`Member`] and [`BoundMethod`].

use crate::error::ComponentError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Unbound method body; receives the instance it is called on
pub type Method =
    Arc<dyn Fn(&dyn Instance, &[Value]) -> Result<Value, ComponentError> + Send + Sync>;

/// Shared reference to a live instance
pub type InstanceRef = Arc<dyn Instance>;

/// Wrap a closure as a [`Method`]
#[inline]
pub fn method<F>(body: F) -> Method
where
    F: Fn(&dyn Instance, &[Value]) -> Result<Value, ComponentError> + Send + Sync + 'static,
{
    Arc::new(body)
}

/// Property-addressable live object
///
/// All mutation goes through interior mutability so instances can be shared
/// behind [`InstanceRef`]. Implementors must not hold internal locks while
/// running method or hook bodies.
pub trait Instance: Send + Sync {
    /// Name of the implementation that produced this instance
    fn type_name(&self) -> &str;

    /// Resolve a member by name
    fn get(&self, key: &str) -> Option<Member>;

    /// Describe a member without binding it
    fn describe(&self, key: &str) -> Option<PropertyDescriptor>;

    /// Names of materialized fields, in insertion order
    fn own_keys(&self) -> Vec<String>;

    /// Whether `key` is a field materialized on this object
    fn has_own_field(&self, key: &str) -> bool;

    /// Assign a field
    fn set(&self, key: &str, value: Value);

    /// Props captured at construction
    fn props(&self) -> Value;

    /// Context captured at construction
    fn context(&self) -> Value;

    /// Current state, if the instance has materialized any
    fn state(&self) -> Option<Value>;

    /// Merge `partial` into state, running update hooks
    fn set_state(&self, partial: Value) -> Result<(), ComponentError>;

    /// Raw method lookup, without binding
    fn method(&self, name: &str) -> Option<Method>;

    /// Replace a method on this instance only, returning the previous one
    fn replace_method(&self, name: &str, method: Method) -> Option<Method>;

    /// Resolve `name` and call it with `args`
    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ComponentError> {
        match self.get(name) {
            Some(Member::Method(method)) => method.call(args),
            Some(Member::Field(_)) => Err(ComponentError::NotCallable {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
            None => Err(ComponentError::MethodNotFound {
                component: self.type_name().to_string(),
                method: name.to_string(),
            }),
        }
    }
}

/// Resolved member of an instance
#[derive(Clone)]
pub enum Member {
    /// Plain data
    Field(Value),
    /// Method bound to its receiver
    Method(BoundMethod),
}

impl Member {
    /// Kind of this member
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Field(_) => MemberKind::Field,
            Self::Method(_) => MemberKind::Method,
        }
    }

    /// Field value, if this is a field
    #[inline]
    #[must_use]
    pub fn as_field(&self) -> Option<&Value> {
        match self {
            Self::Field(value) => Some(value),
            Self::Method(_) => None,
        }
    }

    /// Consume into a field value
    #[inline]
    #[must_use]
    pub fn into_field(self) -> Option<Value> {
        match self {
            Self::Field(value) => Some(value),
            Self::Method(_) => None,
        }
    }

    /// Consume into a bound method
    #[inline]
    #[must_use]
    pub fn into_method(self) -> Option<BoundMethod> {
        match self {
            Self::Method(method) => Some(method),
            Self::Field(_) => None,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(value) => f.debug_tuple("Field").field(value).finish(),
            Self::Method(method) => f.debug_tuple("Method").field(method).finish(),
        }
    }
}

/// Method paired with the instance it was resolved on
///
/// Calling it always runs against that receiver, no matter who holds the
/// bound method afterwards.
#[derive(Clone)]
pub struct BoundMethod {
    name: String,
    receiver: InstanceRef,
    body: Method,
}

impl BoundMethod {
    /// Bind `body` to `receiver`
    #[must_use]
    pub fn new(name: impl Into<String>, receiver: InstanceRef, body: Method) -> Self {
        Self {
            name: name.into(),
            receiver,
            body,
        }
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance the method runs against
    #[inline]
    #[must_use]
    pub fn receiver(&self) -> &InstanceRef {
        &self.receiver
    }

    /// Unbound body, for re-binding to another receiver
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Method {
        &self.body
    }

    /// Call the method
    ///
    /// # Errors
    /// Whatever the method body raises.
    pub fn call(&self, args: &[Value]) -> Result<Value, ComponentError> {
        (self.body)(self.receiver.as_ref(), args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("receiver", &self.receiver.type_name())
            .finish_non_exhaustive()
    }
}

/// Kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Plain data
    Field,
    /// Callable
    Method,
}

/// Reflection record for a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Member kind
    pub kind: MemberKind,
    /// Type name of the object the member lives on
    pub owner: String,
    /// Field value; `None` for methods
    pub value: Option<Value>,
    /// Whether assignment is permitted
    pub writable: bool,
    /// Whether the member shows up in `own_keys`
    pub enumerable: bool,
}

impl PropertyDescriptor {
    /// Descriptor for a field
    #[must_use]
    pub fn field(owner: impl Into<String>, value: Value) -> Self {
        Self {
            kind: MemberKind::Field,
            owner: owner.into(),
            value: Some(value),
            writable: true,
            enumerable: true,
        }
    }

    /// Descriptor for a method
    #[must_use]
    pub fn method(owner: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            owner: owner.into(),
            value: None,
            writable: true,
            enumerable: false,
        }
    }
}
