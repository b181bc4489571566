//! Handle phase transitions
//!
//! A handle is created `Bound` to its original implementation and moves to
//! `Swapped` on the first update. There is no terminal transition.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a proxy handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlePhase {
    /// No implementation captured yet
    #[default]
    Unbound,
    /// Exposing the original implementation
    Bound,
    /// At least one update has been applied
    Swapped,
}

impl HandlePhase {
    /// Phase after a successful update
    #[inline]
    #[must_use]
    pub fn after_update(self) -> Self {
        debug_assert!(validate_transition(self, Self::Swapped).is_ok());
        Self::Swapped
    }
}

/// Validates a phase transition.
///
/// # Errors
/// [`TransitionError`] when `to` is not reachable from `from`.
pub fn validate_transition(from: HandlePhase, to: HandlePhase) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: HandlePhase) -> Vec<HandlePhase> {
    use HandlePhase::*;
    match from {
        Unbound => vec![Bound],
        Bound | Swapped => vec![Swapped],
    }
}
