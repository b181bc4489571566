//! Testing utilities for the hotswap workspace
//!
//! Shared fixtures, helpers and tracing setup.

#![allow(missing_docs)]

use hotswap_component::{ComponentClass, ImplRef, Instance, InstanceRef, Value};
use hotswap_proxy::{ProxyConfig, ProxyFactory, ProxyHandle, StaticProbe};
use serde_json::json;
use std::sync::{Arc, Once};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per test binary; honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Stateful counter whose `increment` adds `step`
pub fn counter(name: &str, step: i64) -> Arc<ComponentClass> {
    ComponentClass::builder(name)
        .stateful()
        .constructor(|this| {
            this.init_state(json!({ "counter": 0 }));
            Ok(())
        })
        .method("increment", move |this, _| {
            let n = counter_of(this);
            this.set_state(json!({ "counter": n + step }))?;
            Ok(Value::Null)
        })
        .method("render", |this, _| Ok(json!(counter_of(this))))
        .build()
}

/// Stateful counter that has no `increment`
pub fn counter_without_increment() -> Arc<ComponentClass> {
    ComponentClass::builder("CounterWithoutIncrementMethod")
        .stateful()
        .constructor(|this| {
            this.init_state(json!({ "counter": 0 }));
            Ok(())
        })
        .method("render", |this, _| Ok(json!(counter_of(this))))
        .build()
}

/// Component assigning `answer` once in its constructor; `None` assigns nothing
pub fn instance_property(name: &str, answer: Option<i64>, stateful: bool) -> Arc<ComponentClass> {
    let builder = ComponentClass::builder(name).constructor(move |this| {
        if let Some(answer) = answer {
            this.set("answer", json!(answer));
        }
        Ok(())
    });
    let builder = if stateful { builder.stateful() } else { builder };
    builder
        .method("render", |this, _| {
            Ok(this
                .get("answer")
                .and_then(|member| member.into_field())
                .unwrap_or(Value::Null))
        })
        .build()
}

/// `counter` field of an instance's state, zero when absent
pub fn counter_of(instance: &dyn Instance) -> i64 {
    instance
        .state()
        .and_then(|state| state["counter"].as_i64())
        .unwrap_or_default()
}

/// Construct through `handle` with empty props and context
pub fn mount_through(handle: &ProxyHandle) -> InstanceRef {
    handle
        .get()
        .construct(json!({}), json!({}))
        .expect("construction through proxy should succeed")
}

/// Isolated factory with interception available
pub fn identity_factory() -> ProxyFactory {
    init_tracing();
    ProxyFactory::new()
}

/// Isolated factory whose probe reports no interception support
pub fn fallback_factory() -> ProxyFactory {
    init_tracing();
    ProxyFactory::with_config(ProxyConfig::new().with_probe(StaticProbe(false)))
}

/// Upcast a class to an implementation reference
pub fn implementation(class: &Arc<ComponentClass>) -> ImplRef {
    Arc::clone(class) as ImplRef
}
