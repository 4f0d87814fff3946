use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::foundation::error::SlatecastResult;

/// Owner (guild/server) of a template and its schedule.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    /// Wrap a raw owner identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scheduled stream as returned by the schedule data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Stream display name.
    pub name: String,
    /// Start timestamp; its date buckets the record into a weekday offset,
    /// its time becomes the `stream_time` field.
    pub start: NaiveDateTime,
    /// Planned length in minutes; displayed in whole hours.
    pub duration_minutes: u32,
    /// Game or category label.
    pub category: String,
    /// Free-form notes; absent and empty display the same.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// External schedule data source (Twitch, database, fixture).
///
/// Implementations surface transport failures as
/// [`SlatecastError::Fetch`](crate::foundation::error::SlatecastError::Fetch);
/// the binder keeps its previous state when that happens.
pub trait ScheduleSource {
    /// Stream records starting within `[range_start, range_end)`.
    fn streams(
        &self,
        owner: &OwnerId,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> SlatecastResult<Vec<StreamRecord>>;
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/record.rs"]
mod tests;
