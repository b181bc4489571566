//! Hotswap Component Model
//!
//! The host-side object model that the swap core operates on.
//!
//! # Core Concepts
//!
//! - [`Implementation`]: a component type as currently authored; each reload
//!   produces a new value, compared by pointer identity
//! - [`Instance`]: a property-addressable live object (fields, bound methods,
//!   state store)
//! - [`ComponentClass`]: builder-defined implementation producing [`Object`]s
//! - [`Mount`]: collaborator contract for instantiating a type and reading back
//!   its props, context and state
//!
//! # Example
//!
//! ```rust,ignore
//! use hotswap_component::{ComponentClass, Instance, Implementation};
//! use serde_json::json;
//!
//! let counter = ComponentClass::builder("Counter")
//!     .stateful()
//!     .constructor(|this| {
//!         this.init_state(json!({ "counter": 0 }));
//!         Ok(())
//!     })
//!     .method("increment", |this, _args| {
//!         let n = this.state().and_then(|s| s["counter"].as_i64()).unwrap_or(0);
//!         this.set_state(json!({ "counter": n + 1 }))?;
//!         Ok(serde_json::Value::Null)
//!     })
//!     .build();
//!
//! let instance = counter.construct(json!({}), json!({}))?;
//! instance.invoke("increment", &[])?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod class;
mod error;
mod implementation;
mod instance;
pub mod lifecycle;
mod mount;
mod object;

// Re-exports
pub use class::{ClassBuilder, ComponentClass, Constructor};
pub use error::ComponentError;
pub use implementation::{
    display_name, same_implementation, Capabilities, ImplRef, Implementation,
};
pub use instance::{
    method, BoundMethod, Instance, InstanceRef, Member, MemberKind, Method, PropertyDescriptor,
};
pub use mount::{DirectMount, Mount, Mounted};
pub use object::{merge_state, Object};

/// Dynamic value used for props, context, state and fields
pub use serde_json::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
