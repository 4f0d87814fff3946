//! Formatting preferences, keyed by the field portion of a binding key.
//!
//! All seven days of `stream_time` share one setting unless a caller pins an
//! override to a specific full key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::binding::key::BindingKey;
use crate::layout::fit::FitPrefs;

/// Field-keyed preference store with optional per-key overrides.
///
/// Resolution order: full-key override, then field default, then
/// [`FitPrefs::default`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefsStore {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, FitPrefs>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<String, FitPrefs>,
}

impl PrefsStore {
    /// Empty store; every key resolves to [`FitPrefs::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared preference for a field (e.g. `stream_time`).
    pub fn set_field_prefs(&mut self, field: impl Into<String>, prefs: FitPrefs) {
        self.fields.insert(field.into(), prefs);
    }

    /// Pin a preference to one full binding key, shadowing the field default.
    pub fn set_key_override(&mut self, key: impl Into<String>, prefs: FitPrefs) {
        self.overrides.insert(key.into(), prefs);
    }

    /// Drop a field's shared preference, reverting it to the default.
    pub fn clear_field_prefs(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// Drop a full-key override, reverting the key to its field default.
    pub fn clear_key_override(&mut self, key: &str) {
        self.overrides.remove(key);
    }

    /// Resolve the effective preference for a raw binding key.
    pub fn prefs_for_key(&self, key: &str) -> FitPrefs {
        if let Some(p) = self.overrides.get(key) {
            return p.clone();
        }
        let parsed = BindingKey::parse(key);
        self.fields
            .get(parsed.field())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/prefs.rs"]
mod tests;
