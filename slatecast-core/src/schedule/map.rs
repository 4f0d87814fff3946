//! The ephemeral binding-key → display-string map for one visible week.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::binding::key::BindingKey;

/// Field producing the stream's display name.
pub const FIELD_STREAM_NAME: &str = "stream_name";
/// Field producing the `HH:MM` start time.
pub const FIELD_STREAM_TIME: &str = "stream_time";
/// Field producing the game/category label.
pub const FIELD_GAME: &str = "game";
/// Field producing the duration in whole hours.
pub const FIELD_DURATION: &str = "duration";
/// Field producing free-form notes.
pub const FIELD_NOTES: &str = "notes";

/// Name shown for offsets with no scheduled stream.
pub const NO_STREAM_PLACEHOLDER: &str = "No stream";

pub(crate) const DAY_FIELDS: [&str; 5] = [
    FIELD_STREAM_NAME,
    FIELD_STREAM_TIME,
    FIELD_GAME,
    FIELD_DURATION,
    FIELD_NOTES,
];

/// Binding key → display string.
///
/// Absent keys mean "unset"; the overlay renders those blank. Rebuilt from
/// scratch whenever the visible week changes, so entries never go stale
/// piecemeal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleDataMap {
    entries: BTreeMap<String, String>,
}

impl ScheduleDataMap {
    /// Empty map; every key reads as unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// The display string for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set or replace the display string for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// True when `key` has no entry (distinct from an empty string).
    pub fn is_unset(&self, key: &str) -> bool {
        !self.entries.contains_key(key)
    }

    /// Number of set keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convenience lookup through the day-key convention.
    pub fn day_value(&self, offset: u8, field: &str) -> Option<&str> {
        self.get(&BindingKey::build_day(offset, field))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/map.rs"]
mod tests;
