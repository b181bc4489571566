//! Error types for the swap core
//!
//! Normal operation raises nothing: registry misses and cycle-guarded updates
//! are outcomes. Component failures pass through as
//! [`ComponentError`](hotswap_component::ComponentError) untouched.

use crate::state_machine::HandlePhase;

/// Reserved-table configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Table could not be parsed
    #[error("invalid reserved property table: {0}")]
    Parse(#[from] serde_json::Error),

    /// Table lists an empty property name
    #[error("reserved property table contains an empty name")]
    EmptyName,
}

/// Illegal handle phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal handle transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    /// Phase the handle was in
    pub from: HandlePhase,
    /// Phase that was requested
    pub to: HandlePhase,
}
