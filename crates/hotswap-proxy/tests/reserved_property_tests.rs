//! Reserved names stay on the live instance no matter what is swapped in.

use hotswap_component::{lifecycle, ComponentClass, Value};
use hotswap_proxy::{CapabilityFilter, ProxyConfig, ProxyFactory};
use hotswap_test_utils::{counter, counter_of, identity_factory, implementation, mount_through};
use pretty_assertions::assert_eq;
use serde_json::json;

fn overriding(name: &str) -> std::sync::Arc<ComponentClass> {
    ComponentClass::builder(name)
        .stateful()
        .method(lifecycle::SET_STATE, |_, _| Ok(json!("hijacked")))
        .method(lifecycle::SHOULD_UPDATE, |_, _| Ok(json!(false)))
        .method("render", |_, _| Ok(json!("overriding")))
        .build()
}

#[test]
fn reserved_members_resolve_on_original_object() {
    let factory = identity_factory();
    let handle = factory.create_proxy(implementation(&counter("Counter1x", 1)));
    let instance = mount_through(&handle);
    instance.invoke("increment", &[]).unwrap();

    for round in 0..3 {
        handle
            .update(implementation(&overriding(&format!("Overriding{round}"))))
            .unwrap();

        let set_state = instance
            .get(lifecycle::SET_STATE)
            .and_then(|member| member.into_method())
            .unwrap();
        assert_eq!(set_state.receiver().type_name(), "Counter1x");
        assert!(instance.get(lifecycle::SHOULD_UPDATE).is_none());

        let describe = instance.describe(lifecycle::STATE).unwrap();
        assert_eq!(describe.owner, "Counter1x");
        assert_eq!(instance.invoke("render", &[]).unwrap(), json!("overriding"));
    }

    instance
        .invoke(lifecycle::SET_STATE, &[json!({ "counter": 5 })])
        .unwrap();
    assert_eq!(counter_of(instance.as_ref()), 5);
}

#[test]
fn props_and_context_come_from_the_live_object() {
    let factory = identity_factory();
    let handle = factory.create_proxy(implementation(&counter("Counter1x", 1)));
    let instance = handle
        .get()
        .construct(json!({ "label": "a" }), json!({ "depth": 1 }))
        .unwrap();

    handle.update(implementation(&counter("Counter10x", 10))).unwrap();
    assert_eq!(
        instance.get(lifecycle::PROPS).and_then(|m| m.into_field()),
        Some(json!({ "label": "a" }))
    );
    assert_eq!(
        instance.get(lifecycle::CONTEXT).and_then(|m| m.into_field()),
        Some(json!({ "depth": 1 }))
    );
}

#[test]
fn custom_reserved_names_stay_on_original() {
    let filter = CapabilityFilter::default().with_reserved("render");
    let factory = ProxyFactory::with_config(ProxyConfig::new().with_filter(filter));
    let handle = factory.create_proxy(implementation(&counter("Counter1x", 1)));
    let instance = mount_through(&handle);
    instance.invoke("increment", &[]).unwrap();

    handle.update(implementation(&overriding("Overriding"))).unwrap();
    assert_eq!(instance.invoke("render", &[]).unwrap(), json!(1));
}

#[test]
fn reserved_statics_stay_on_original() {
    let versioned = |name: &str, version: i64| {
        ComponentClass::builder(name)
            .display_name(format!("{name} (v{version})"))
            .static_value("version", json!(version))
            .build()
    };

    let factory = identity_factory();
    let handle = factory.create_proxy(implementation(&versioned("Panel", 1)));
    let exposed = handle.get();
    handle.update(implementation(&versioned("PanelNext", 2))).unwrap();

    assert_eq!(exposed.static_member("name"), Some(json!("Panel")));
    assert_eq!(exposed.static_member("display_name"), Some(json!("Panel (v1)")));
    assert_eq!(exposed.static_member("version"), Some(json!(2)));
    assert_eq!(exposed.static_member("missing"), None::<Value>);
}
