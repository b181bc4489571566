//! Hotswap Proxy
//!
//! Stable handles around component implementations that can be replaced at
//! runtime. Code holding the type returned by [`ProxyHandle::get`], or any
//! instance constructed from it, keeps the same reference across every
//! [`ProxyHandle::update`]; behavior moves to the new implementation and
//! state moves with it.
//!
//! # Core Concepts
//!
//! - [`create_proxy`] / [`ProxyFactory`]: obtain the one handle per implementation
//! - [`IdentityProxy`]: swaps the implementation behind a stable [`ProxyClass`]
//! - [`InstanceBridge`]: the live instance; routes reads to its original object
//!   or to the delegate built from the current implementation
//! - [`CapabilityFilter`]: names that are never delegated
//! - [`ProxyRegistry`]: guards against double wrapping and swap cycles
//! - [`FallbackHandle`]: plain replaceable pointer when interception is unavailable
//!
//! # Example
//!
//! ```rust,ignore
//! use hotswap_proxy::create_proxy;
//! use serde_json::json;
//!
//! let handle = create_proxy(counter_v1);
//! let instance = handle.get().construct(json!({}), json!({}))?;
//! instance.invoke("increment", &[])?;
//!
//! // Reloaded code: same instance, new behavior, same state.
//! handle.update(counter_v2)?;
//! instance.invoke("increment", &[])?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bridge;
mod config;
mod error;
mod factory;
mod fallback;
mod filter;
mod handle;
mod proxy;
mod registry;
pub mod state_machine;

// Re-exports
pub use bridge::{InstanceBridge, StateSnapshot};
pub use config::{CapabilityProbe, ProxyConfig, Retention, StaticProbe};
pub use error::{ConfigError, TransitionError};
pub use factory::{create_proxy, global_factory, reset_registry, ProxyFactory};
pub use fallback::FallbackHandle;
pub use filter::{
    CapabilityFilter, ReservedPropertySet, DEFAULT_FRAMEWORK, DEFAULT_RESERVED,
    DEFAULT_RESERVED_STATICS,
};
pub use handle::{ProxyHandle, SwapOutcome};
pub use proxy::{IdentityProxy, ProxyClass};
pub use registry::ProxyRegistry;
pub use state_machine::HandlePhase;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
