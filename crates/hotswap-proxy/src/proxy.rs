//! Identity-preserving proxy
//!
//! Provides [`ProxyClass`], the stable type handed out by `get()`, and
//! [`IdentityProxy`], the handle that swaps the implementation behind it.
//!
//! Constructing a [`ProxyClass`] constructs whatever implementation is current
//! and wraps the result in an [`InstanceBridge`]. The bridge is the live
//! instance; on every later update it receives a fresh delegate built from the
//! new implementation, seeded with the bridge's materialized state.

use crate::bridge::InstanceBridge;
use crate::config::ProxyConfig;
use crate::filter::CapabilityFilter;
use crate::handle::SwapOutcome;
use crate::registry::ProxyRegistry;
use crate::state_machine::HandlePhase;
use hotswap_component::{
    display_name, Capabilities, ComponentError, ImplRef, Implementation, InstanceRef, Mount, Value,
};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Stable exposed type of an identity-preserving handle
pub struct ProxyClass {
    original: ImplRef,
    current: RwLock<ImplRef>,
    phase: RwLock<HandlePhase>,
    live: Mutex<Vec<Weak<InstanceBridge>>>,
    filter: CapabilityFilter,
    mount: Arc<dyn Mount>,
    registry: Arc<ProxyRegistry>,
}

impl ProxyClass {
    /// Implementation the handle was created for
    #[inline]
    #[must_use]
    pub fn original(&self) -> &ImplRef {
        &self.original
    }

    /// Implementation new constructions and static reads go to
    #[inline]
    #[must_use]
    pub fn current(&self) -> ImplRef {
        Arc::clone(&self.current.read())
    }

    /// Live instances constructed through this type that are still referenced
    #[must_use]
    pub fn live_instances(&self) -> Vec<Arc<InstanceBridge>> {
        let mut live = self.live.lock();
        live.retain(|bridge| bridge.strong_count() > 0);
        live.iter().filter_map(Weak::upgrade).collect()
    }

    fn phase(&self) -> HandlePhase {
        *self.phase.read()
    }

    fn swap_current(&self, next: ImplRef) {
        *self.current.write() = next;
        let mut phase = self.phase.write();
        *phase = phase.after_update();
    }
}

impl Implementation for ProxyClass {
    fn name(&self) -> &str {
        self.original.name()
    }

    fn display_name(&self) -> Option<&str> {
        self.original.display_name()
    }

    fn construct(&self, props: Value, context: Value) -> Result<InstanceRef, ComponentError> {
        let current = self.current();
        let target = current.construct(props, context)?;
        let bridge = InstanceBridge::new(target, self.filter.clone());

        {
            let mut live = self.live.lock();
            live.retain(|bridge| bridge.strong_count() > 0);
            live.push(Arc::downgrade(&bridge));
        }
        debug!(
            component = %display_name(current.as_ref()),
            "constructed live instance"
        );
        Ok(bridge)
    }

    fn capabilities(&self) -> Capabilities {
        self.current().capabilities()
    }

    fn static_member(&self, key: &str) -> Option<Value> {
        if self.filter.is_reserved_static(key) {
            self.original.static_member(key)
        } else {
            self.current().static_member(key)
        }
    }

    fn static_keys(&self) -> Vec<String> {
        self.current().static_keys()
    }
}

/// Handle whose exposed type and live instances survive updates
#[derive(Clone)]
pub struct IdentityProxy {
    class: Arc<ProxyClass>,
}

impl IdentityProxy {
    pub(crate) fn new(
        original: ImplRef,
        config: &ProxyConfig,
        registry: Arc<ProxyRegistry>,
    ) -> Self {
        let class = ProxyClass {
            current: RwLock::new(Arc::clone(&original)),
            original,
            phase: RwLock::new(HandlePhase::Bound),
            live: Mutex::new(Vec::new()),
            filter: config.filter.clone(),
            mount: Arc::clone(&config.mount),
            registry,
        };
        Self {
            class: Arc::new(class),
        }
    }

    pub(crate) fn from_class(class: Arc<ProxyClass>) -> Self {
        Self { class }
    }

    pub(crate) fn class(&self) -> &Arc<ProxyClass> {
        &self.class
    }

    /// Stable exposed type
    #[inline]
    #[must_use]
    pub fn get(&self) -> ImplRef {
        Arc::clone(&self.class) as ImplRef
    }

    /// Implementation currently behind the exposed type
    #[inline]
    #[must_use]
    pub fn current(&self) -> ImplRef {
        self.class.current()
    }

    /// Current lifecycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> HandlePhase {
        self.class.phase()
    }

    /// Live instances constructed through this handle
    #[inline]
    #[must_use]
    pub fn live_instances(&self) -> Vec<Arc<InstanceBridge>> {
        self.class.live_instances()
    }

    /// Swap the implementation behind the exposed type
    ///
    /// Updating to anything the registry already knows (an original
    /// implementation or an exposed proxy type) changes nothing. Otherwise the
    /// current pointer moves to `next`, and when `next` is stateful each live
    /// instance gets a delegate of `next` mounted with its props and context
    /// and seeded with its state.
    ///
    /// # Errors
    /// Failures from mounting or seeding a delegate, unmodified. The pointer
    /// has already moved when they occur.
    pub fn update(&self, next: ImplRef) -> Result<SwapOutcome, ComponentError> {
        let name = display_name(next.as_ref());
        if self.class.registry.contains(&next) {
            debug!(component = %name, "ignoring update to an already proxied type");
            return Ok(SwapOutcome::Ignored);
        }

        self.class.swap_current(Arc::clone(&next));
        if !next.capabilities().stateful {
            info!(component = %name, "swapped stateless implementation");
            return Ok(SwapOutcome::Swapped { rebound: 0 });
        }

        let mut rebound = 0;
        for bridge in self.class.live_instances() {
            let snapshot = bridge.snapshot();
            let mounted =
                self.class
                    .mount
                    .mount(&next, Some(snapshot.props), Some(snapshot.context))?;
            if let Some(state) = snapshot.state {
                mounted.instance().set_state(state)?;
            }
            bridge.install_delegate(mounted.into_instance());
            rebound += 1;
        }
        info!(component = %name, rebound, "swapped implementation");
        Ok(SwapOutcome::Swapped { rebound })
    }
}
