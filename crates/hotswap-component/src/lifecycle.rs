//! Well-known member names of the host component model

/// State store field
pub const STATE: &str = "state";

/// Props carrier field
pub const PROPS: &str = "props";

/// Context carrier field
pub const CONTEXT: &str = "context";

/// Built-in state update method
pub const SET_STATE: &str = "set_state";

/// Host update scheduler
pub const UPDATER: &str = "updater";

/// Host bookkeeping slot
pub const INTERNAL_INSTANCE: &str = "_internal_instance";

/// Hook asked before an update is applied
pub const SHOULD_UPDATE: &str = "should_component_update";

/// Hook run with `[next_props, next_state]` before state is stored
pub const WILL_UPDATE: &str = "component_will_update";

/// Hook run with `[prev_props, prev_state]` after state is stored
pub const DID_UPDATE: &str = "component_did_update";
