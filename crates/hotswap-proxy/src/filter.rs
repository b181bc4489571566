//! Reserved property filtering
//!
//! Provides [`CapabilityFilter`], the injected table of names that must never
//! be delegated to a swapped-in implementation.
//!
//! The table is curated by hand and tied to the host framework revision it was
//! written against. No structural test can tell a framework bookkeeping member
//! from a user-defined one, so nothing here is inferred.

use crate::error::ConfigError;
use hotswap_component::lifecycle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Framework revision the built-in table matches
pub const DEFAULT_FRAMEWORK: &str = "hotswap-component/0.1";

/// Instance members resolved on the original target by default
pub const DEFAULT_RESERVED: &[&str] = &[
    lifecycle::STATE,
    lifecycle::SET_STATE,
    lifecycle::PROPS,
    lifecycle::CONTEXT,
    lifecycle::UPDATER,
    lifecycle::INTERNAL_INSTANCE,
    lifecycle::SHOULD_UPDATE,
    lifecycle::DID_UPDATE,
    lifecycle::WILL_UPDATE,
];

/// Type-level members resolved on the original implementation by default
pub const DEFAULT_RESERVED_STATICS: &[&str] = &["name", "display_name", "length", "prototype"];

/// Reserved property table as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedPropertySet {
    /// Framework revision this table was curated for
    #[serde(default)]
    pub framework: Option<String>,
    /// Instance member names
    #[serde(default)]
    pub instance: BTreeSet<String>,
    /// Type-level member names
    #[serde(default)]
    pub statics: BTreeSet<String>,
}

impl ReservedPropertySet {
    /// Table with nothing reserved
    #[must_use]
    pub fn empty() -> Self {
        Self {
            framework: None,
            instance: BTreeSet::new(),
            statics: BTreeSet::new(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self
            .instance
            .iter()
            .chain(self.statics.iter())
            .any(String::is_empty)
        {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }
}

impl Default for ReservedPropertySet {
    fn default() -> Self {
        Self {
            framework: Some(DEFAULT_FRAMEWORK.to_string()),
            instance: DEFAULT_RESERVED.iter().map(ToString::to_string).collect(),
            statics: DEFAULT_RESERVED_STATICS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Shared, immutable view of a [`ReservedPropertySet`]
#[derive(Debug, Clone, Default)]
pub struct CapabilityFilter {
    set: Arc<ReservedPropertySet>,
}

impl CapabilityFilter {
    /// Wrap a table
    #[must_use]
    pub fn new(set: ReservedPropertySet) -> Self {
        Self { set: Arc::new(set) }
    }

    /// Filter that reserves nothing
    #[must_use]
    pub fn empty() -> Self {
        Self::new(ReservedPropertySet::empty())
    }

    /// Load a table from JSON
    ///
    /// # Errors
    /// [`ConfigError`] if the document does not parse or lists empty names.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let set: ReservedPropertySet = serde_json::from_str(json)?;
        set.validate()?;
        Ok(Self::new(set))
    }

    /// Copy of this filter with `name` also reserved
    #[must_use]
    pub fn with_reserved(&self, name: impl Into<String>) -> Self {
        let mut set = (*self.set).clone();
        set.instance.insert(name.into());
        Self::new(set)
    }

    /// Copy of this filter with `name` also reserved at type level
    #[must_use]
    pub fn with_reserved_static(&self, name: impl Into<String>) -> Self {
        let mut set = (*self.set).clone();
        set.statics.insert(name.into());
        Self::new(set)
    }

    /// Whether instance member `key` stays on the original target
    #[inline]
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        self.set.instance.contains(key)
    }

    /// Whether type-level member `key` stays on the original implementation
    #[inline]
    #[must_use]
    pub fn is_reserved_static(&self, key: &str) -> bool {
        self.set.statics.contains(key)
    }

    /// Framework revision the table was curated for
    #[inline]
    #[must_use]
    pub fn framework(&self) -> Option<&str> {
        self.set.framework.as_deref()
    }

    /// Underlying table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &ReservedPropertySet {
        &self.set
    }
}
