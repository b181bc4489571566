//! Per-instance delegation
//!
//! Provides [`InstanceBridge`], the object handed out as the live instance.
//! It owns the originally constructed target and, after a swap, a delegate
//! built from the new implementation. Reads route between the two:
//!
//! 1. reserved names always resolve on the target
//! 2. fields the target already materialized stay on the target
//! 3. everything else resolves on the delegate, once one is installed
//!
//! Methods resolved on the delegate are re-bound to the bridge, so their
//! bodies read fields and state through these same rules and write state into
//! the live instance.
//!
//! Rule 2 means construction-time fields are not refreshed by a swap. There is
//! no way to learn the new value without re-running the new constructor
//! against the live object, and the old value may have been reassigned since.

use crate::filter::CapabilityFilter;
use hotswap_component::{
    lifecycle, method, BoundMethod, ComponentError, Instance, InstanceRef, Member, Method,
    PropertyDescriptor, Value,
};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Materialized inputs of a live instance, captured for a swap
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// Props the instance was constructed with
    pub props: Value,
    /// Context the instance was constructed with
    pub context: Value,
    /// Current state, if any has been materialized
    pub state: Option<Value>,
}

struct DelegateSlot {
    instance: InstanceRef,
    rebound: bool,
}

/// Live instance returned from constructing through a proxy
pub struct InstanceBridge {
    me: Weak<InstanceBridge>,
    target: InstanceRef,
    delegate: RwLock<Option<DelegateSlot>>,
    filter: CapabilityFilter,
}

impl InstanceBridge {
    pub(crate) fn new(target: InstanceRef, filter: CapabilityFilter) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            target,
            delegate: RwLock::new(None),
            filter,
        })
    }

    /// Originally constructed object
    #[inline]
    #[must_use]
    pub fn target(&self) -> &InstanceRef {
        &self.target
    }

    /// Currently installed delegate
    #[must_use]
    pub fn delegate(&self) -> Option<InstanceRef> {
        self.delegate
            .read()
            .as_ref()
            .map(|slot| Arc::clone(&slot.instance))
    }

    /// Capture `{props, context, state}` without running any component code
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            props: self.target.props(),
            context: self.target.context(),
            state: self.target.state(),
        }
    }

    pub(crate) fn install_delegate(&self, instance: InstanceRef) {
        *self.delegate.write() = Some(DelegateSlot {
            instance,
            rebound: false,
        });
    }

    /// Delegate to forward to, rebinding it on first use after a swap
    fn forward_target(&self) -> Option<InstanceRef> {
        let (delegate, needs_rebind) = {
            let mut guard = self.delegate.write();
            let slot = guard.as_mut()?;
            let needs_rebind = !slot.rebound;
            slot.rebound = true;
            (Arc::clone(&slot.instance), needs_rebind)
        };
        if needs_rebind {
            self.rebind(&delegate);
        }
        Some(delegate)
    }

    /// Wrap the delegate's pre-update hook so state changes made through
    /// delegate methods land in the live instance's state store.
    fn rebind(&self, delegate: &InstanceRef) {
        let target = Arc::clone(&self.target);
        let original = delegate.method(lifecycle::WILL_UPDATE);
        let adapter: Method = method(move |this, args| {
            if let Some(next_state) = args.get(1) {
                target.set_state(next_state.clone())?;
            }
            match &original {
                Some(hook) => hook(this, args),
                None => Ok(Value::Null),
            }
        });
        delegate.replace_method(lifecycle::WILL_UPDATE, adapter);
        debug!(
            component = delegate.type_name(),
            "rebound pre-update hook of delegate"
        );
    }

    /// Object that answers for `key` under the routing rules
    fn resolve(&self, key: &str, rebind: bool) -> InstanceRef {
        if self.filter.is_reserved(key) {
            return Arc::clone(&self.target);
        }
        let delegate = if rebind {
            self.forward_target()
        } else {
            self.delegate()
        };
        match delegate {
            Some(delegate) if !self.target.has_own_field(key) => delegate,
            _ => Arc::clone(&self.target),
        }
    }
}

impl Instance for InstanceBridge {
    fn type_name(&self) -> &str {
        self.target.type_name()
    }

    fn get(&self, key: &str) -> Option<Member> {
        let owner = self.resolve(key, true);
        let member = owner.get(key)?;
        if Arc::as_ptr(&owner).cast::<()>() == Arc::as_ptr(&self.target).cast::<()>() {
            return Some(member);
        }
        match (member, self.me.upgrade()) {
            (Member::Method(bound), Some(me)) => Some(Member::Method(BoundMethod::new(
                key,
                me as InstanceRef,
                bound.body().clone(),
            ))),
            (member, _) => Some(member),
        }
    }

    fn describe(&self, key: &str) -> Option<PropertyDescriptor> {
        self.resolve(key, false).describe(key)
    }

    fn own_keys(&self) -> Vec<String> {
        let mut keys = self.target.own_keys();
        if let Some(delegate) = self.delegate() {
            for key in delegate.own_keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn has_own_field(&self, key: &str) -> bool {
        self.target.has_own_field(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.target.set(key, value);
    }

    fn props(&self) -> Value {
        self.target.props()
    }

    fn context(&self) -> Value {
        self.target.context()
    }

    fn state(&self) -> Option<Value> {
        self.target.state()
    }

    fn set_state(&self, partial: Value) -> Result<(), ComponentError> {
        self.target.set_state(partial)?;
        // Mirror into the delegate without running its hooks.
        if let (Some(delegate), Some(state)) = (self.delegate(), self.target.state()) {
            delegate.set(lifecycle::STATE, state);
        }
        Ok(())
    }

    fn method(&self, name: &str) -> Option<Method> {
        self.resolve(name, false).method(name)
    }

    fn replace_method(&self, name: &str, method: Method) -> Option<Method> {
        self.target.replace_method(name, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotswap_component::{ComponentClass, Implementation, MemberKind};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn counter(name: &str, step: i64) -> Arc<ComponentClass> {
        let label = name.to_string();
        ComponentClass::builder(name)
            .stateful()
            .constructor(|this| {
                this.init_state(json!({ "counter": 0 }));
                Ok(())
            })
            .method("increment", move |this, _| {
                let n = this
                    .state()
                    .and_then(|s| s["counter"].as_i64())
                    .unwrap_or_default();
                this.set_state(json!({ "counter": n + step }))?;
                Ok(Value::Null)
            })
            .method("label", move |_, _| Ok(json!(label)))
            .build()
    }

    fn bridge_over(class: &Arc<ComponentClass>) -> Arc<InstanceBridge> {
        let target = class.construct(json!({}), json!({})).unwrap();
        InstanceBridge::new(target, CapabilityFilter::default())
    }

    fn delegate_of(class: &Arc<ComponentClass>, state: Option<Value>) -> InstanceRef {
        let delegate = class.construct(json!({}), json!({})).unwrap();
        if let Some(state) = state {
            delegate.set_state(state).unwrap();
        }
        delegate
    }

    #[test]
    fn without_delegate_reads_target() {
        let bridge = bridge_over(&counter("One", 1));
        bridge.invoke("increment", &[]).unwrap();
        assert_eq!(bridge.state(), Some(json!({ "counter": 1 })));
        assert_eq!(bridge.invoke("label", &[]).unwrap(), json!("One"));
        assert!(bridge.delegate().is_none());
    }

    #[test]
    fn forwarded_methods_update_live_state() {
        let bridge = bridge_over(&counter("One", 1));
        bridge.invoke("increment", &[]).unwrap();

        let ten = counter("Ten", 10);
        bridge.install_delegate(delegate_of(&ten, bridge.state()));
        bridge.invoke("increment", &[]).unwrap();

        assert_eq!(bridge.state(), Some(json!({ "counter": 11 })));
        assert_eq!(bridge.invoke("label", &[]).unwrap(), json!("Ten"));
    }

    #[test]
    fn rebind_happens_once_per_install() {
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&calls);
        let hooked = ComponentClass::builder("Hooked")
            .stateful()
            .constructor(|this| {
                this.init_state(json!({ "counter": 0 }));
                Ok(())
            })
            .method(lifecycle::WILL_UPDATE, move |_, _| {
                *seen.lock() += 1;
                Ok(Value::Null)
            })
            .method("bump", |_, _| Ok(Value::Null))
            .build();

        let bridge = bridge_over(&counter("One", 1));
        let delegate = delegate_of(&hooked, None);
        bridge.install_delegate(Arc::clone(&delegate));

        bridge.get("bump").unwrap();
        let first = delegate.method(lifecycle::WILL_UPDATE).unwrap();
        delegate.set_state(json!({ "bumped": true })).unwrap();

        bridge.get("bump").unwrap();
        let second = delegate.method(lifecycle::WILL_UPDATE).unwrap();
        delegate.set_state(json!({ "bumped": false })).unwrap();

        // Repeated forwarded reads must not stack adapters.
        assert!(Arc::as_ptr(&first).cast::<()>() == Arc::as_ptr(&second).cast::<()>());
        assert_eq!(*calls.lock(), 2);
        assert_eq!(bridge.state(), Some(json!({ "counter": 0, "bumped": false })));
    }

    #[test]
    fn forwarded_methods_run_against_the_bridge() {
        let bridge = bridge_over(&counter("One", 1));
        bridge.install_delegate(delegate_of(&counter("Ten", 10), Some(json!({ "counter": 0 }))));

        let increment = bridge.get("increment").unwrap().into_method().unwrap();
        let receiver = Arc::as_ptr(increment.receiver()).cast::<()>();
        assert!(receiver == Arc::as_ptr(&bridge).cast::<()>());
    }

    #[test]
    fn live_set_state_reaches_forwarded_methods() {
        let bridge = bridge_over(&counter("One", 1));
        bridge.invoke("increment", &[]).unwrap();
        let delegate = delegate_of(&counter("Ten", 10), bridge.state());
        bridge.install_delegate(Arc::clone(&delegate));

        bridge.set_state(json!({ "counter": 50 })).unwrap();
        assert_eq!(delegate.state(), Some(json!({ "counter": 50 })));

        bridge.invoke("increment", &[]).unwrap();
        assert_eq!(bridge.state(), Some(json!({ "counter": 60 })));
        assert_eq!(delegate.state(), Some(json!({ "counter": 60 })));
    }

    #[test]
    fn forwarded_methods_read_target_fields() {
        let reader = |name: &str, answer: i64| {
            ComponentClass::builder(name)
                .stateful()
                .constructor(move |this| {
                    this.set("answer", json!(answer));
                    Ok(())
                })
                .method("render", |this, _| {
                    Ok(this
                        .get("answer")
                        .and_then(Member::into_field)
                        .unwrap_or(Value::Null))
                })
                .build()
        };
        let bridge = bridge_over(&reader("Old", 42));
        bridge.install_delegate(reader("New", 43).construct(json!({}), json!({})).unwrap());

        assert_eq!(bridge.invoke("render", &[]).unwrap(), json!(42));
    }

    #[test]
    fn reserved_names_never_reach_delegate() {
        let bridge = bridge_over(&counter("One", 1));
        let delegate = delegate_of(&counter("Ten", 10), Some(json!({ "counter": 99 })));
        bridge.install_delegate(Arc::clone(&delegate));

        assert_eq!(
            bridge.get("state").unwrap().into_field(),
            Some(json!({ "counter": 0 }))
        );
        let set_state = bridge.get("set_state").unwrap().into_method().unwrap();
        assert_eq!(set_state.receiver().type_name(), "One");
        assert_eq!(delegate.state(), Some(json!({ "counter": 99 })));
    }

    #[test]
    fn target_fields_win_over_delegate() {
        let with_answer = |name: &str, answer: i64| {
            ComponentClass::builder(name)
                .stateful()
                .constructor(move |this| {
                    this.set("answer", json!(answer));
                    Ok(())
                })
                .build()
        };
        let bridge = bridge_over(&with_answer("Old", 42));
        let delegate = with_answer("New", 43).construct(json!({}), json!({})).unwrap();
        delegate.set("extra", json!(true));
        bridge.install_delegate(delegate);

        assert_eq!(bridge.get("answer").unwrap().into_field(), Some(json!(42)));
        assert_eq!(bridge.get("extra").unwrap().into_field(), Some(json!(true)));
    }

    #[test]
    fn reflection_surfaces_delegate_shape() {
        let bridge = bridge_over(&counter("One", 1));
        bridge.set("answer", json!(1));
        let delegate = delegate_of(&counter("Ten", 10), None);
        delegate.set("answer", json!(2));
        delegate.set("added", json!(3));
        bridge.install_delegate(delegate);

        assert_eq!(bridge.own_keys(), vec!["answer".to_string(), "added".to_string()]);

        let added = bridge.describe("added").unwrap();
        assert_eq!(added.owner, "Ten");
        let answer = bridge.describe("answer").unwrap();
        assert_eq!(answer.owner, "One");
        let increment = bridge.describe("increment").unwrap();
        assert_eq!((increment.kind, increment.owner.as_str()), (MemberKind::Method, "Ten"));
        let state = bridge.describe("state").unwrap();
        assert_eq!(state.owner, "One");
    }

    #[test]
    fn snapshot_reads_materialized_values() {
        let class = counter("One", 1);
        let target = class
            .construct(json!({ "step": 1 }), json!({ "theme": "dark" }))
            .unwrap();
        let bridge = InstanceBridge::new(target, CapabilityFilter::default());

        assert_eq!(
            bridge.snapshot(),
            StateSnapshot {
                props: json!({ "step": 1 }),
                context: json!({ "theme": "dark" }),
                state: Some(json!({ "counter": 0 })),
            }
        );
    }
}
