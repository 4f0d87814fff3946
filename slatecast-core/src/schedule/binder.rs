//! The schedule data binder: pull stream records for a week, bucket them by
//! day offset, derive display values and drive the text layout engine.

use chrono::NaiveDate;

use crate::binding::key::BindingKey;
use crate::binding::week::{day_offset_of, week_range};
use crate::foundation::error::SlatecastResult;
use crate::layout::fit::{self, FittedBlock};
use crate::layout::measure::TextMeasure;
use crate::schedule::map::{
    DAY_FIELDS, FIELD_DURATION, FIELD_GAME, FIELD_NOTES, FIELD_STREAM_NAME, FIELD_STREAM_TIME,
    NO_STREAM_PLACEHOLDER, ScheduleDataMap,
};
use crate::schedule::prefs::PrefsStore;
use crate::schedule::record::{OwnerId, ScheduleSource, StreamRecord};
use crate::template::model::{Region, RegionId};

/// Build the full week map from raw records.
///
/// For each offset 0-6 the map always carries all five `day{N}_*` keys.
/// Records outside the visible week are dropped. When two records land on
/// the same offset the earlier start wins; an exact tie keeps the first in
/// input order.
pub fn build_week_map(week_start: NaiveDate, records: &[StreamRecord]) -> ScheduleDataMap {
    let mut winners: [Option<&StreamRecord>; 7] = [None; 7];
    for record in records {
        let Some(offset) = day_offset_of(week_start, record.start) else {
            tracing::warn!(
                name = %record.name,
                start = %record.start,
                %week_start,
                "stream record outside the visible week; dropped"
            );
            continue;
        };
        let slot = &mut winners[usize::from(offset)];
        match slot {
            Some(current) if current.start <= record.start => {
                tracing::debug!(
                    kept = %current.name,
                    dropped = %record.name,
                    offset,
                    "two streams on one day; keeping the earlier start"
                );
            }
            _ => *slot = Some(record),
        }
    }

    let mut map = ScheduleDataMap::new();
    for offset in 0..7u8 {
        match winners[usize::from(offset)] {
            Some(record) => {
                map.set(
                    BindingKey::build_day(offset, FIELD_STREAM_NAME),
                    record.name.clone(),
                );
                map.set(
                    BindingKey::build_day(offset, FIELD_STREAM_TIME),
                    record.start.format("%H:%M").to_string(),
                );
                map.set(
                    BindingKey::build_day(offset, FIELD_GAME),
                    record.category.clone(),
                );
                map.set(
                    BindingKey::build_day(offset, FIELD_DURATION),
                    duration_hours(record.duration_minutes),
                );
                map.set(
                    BindingKey::build_day(offset, FIELD_NOTES),
                    record.notes.clone().unwrap_or_default(),
                );
            }
            None => {
                for field in DAY_FIELDS {
                    let value = if field == FIELD_STREAM_NAME {
                        NO_STREAM_PLACEHOLDER
                    } else {
                        ""
                    };
                    map.set(BindingKey::build_day(offset, field), value);
                }
            }
        }
    }
    map
}

// Duration is displayed in whole hours, rounded to nearest.
fn duration_hours(minutes: u32) -> String {
    ((f64::from(minutes) / 60.0).round() as i64).to_string()
}

/// Ticket tying an in-flight fetch to the week view it was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    week_start: NaiveDate,
}

impl FetchTicket {
    /// The week the fetch was issued for.
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }
}

/// Outcome of applying fetched records to a [`ScheduleBinder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The records were current and the map was rebuilt.
    Applied,
    /// The week changed while the fetch was in flight; nothing was touched.
    Stale,
}

/// Holds the current week's schedule map and guards against stale fetches.
///
/// Week changes bump a monotonic generation; a fetch result is only applied
/// when its ticket still matches, so a slow response for an old week can
/// never overwrite a newer one.
#[derive(Clone, Debug)]
pub struct ScheduleBinder {
    generation: u64,
    week_start: NaiveDate,
    map: ScheduleDataMap,
}

impl ScheduleBinder {
    /// Binder for `week_start` with an empty map and generation 0.
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            generation: 0,
            week_start,
            map: ScheduleDataMap::new(),
        }
    }

    /// First visible day of the current week.
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// The current display map. Empty until the first successful apply.
    pub fn data(&self) -> &ScheduleDataMap {
        &self.map
    }

    /// Set a value outside the day convention (singular bindings).
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.set(key, value);
    }

    /// Switch the visible week and issue a ticket for its fetch. Any ticket
    /// issued earlier becomes stale immediately.
    pub fn begin_week(&mut self, week_start: NaiveDate) -> FetchTicket {
        self.generation += 1;
        self.week_start = week_start;
        FetchTicket {
            generation: self.generation,
            week_start,
        }
    }

    /// Apply fetched records if the ticket is still current.
    pub fn apply(&mut self, ticket: FetchTicket, records: &[StreamRecord]) -> ApplyOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "stale schedule fetch ignored"
            );
            return ApplyOutcome::Stale;
        }
        self.map = build_week_map(ticket.week_start, records);
        ApplyOutcome::Applied
    }

    /// Synchronous fetch-and-apply against a schedule source.
    ///
    /// On source failure the previous map is left untouched; the display
    /// degrades to stale rather than blank.
    #[tracing::instrument(skip(self, source))]
    pub fn refresh_from<S>(&mut self, source: &S, owner: &OwnerId) -> SlatecastResult<()>
    where
        S: ScheduleSource + ?Sized,
    {
        let ticket = self.begin_week(self.week_start);
        let (range_start, range_end) = week_range(ticket.week_start())?;
        let records = source.streams(owner, range_start, range_end)?;
        self.apply(ticket, &records);
        Ok(())
    }
}

/// A region paired with its fitted text block, ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedRegion {
    /// The region the block was fitted against.
    pub id: RegionId,
    /// The fitted text, anchored in absolute canvas coordinates.
    pub block: FittedBlock,
}

/// Fit every region's bound value against its bounding box.
///
/// Regions whose key has no map entry fit an empty string and come back as
/// blank blocks; map keys without a region are simply held for future
/// binding. Neither direction is an error.
pub fn build_overlay(
    regions: &[Region],
    map: &ScheduleDataMap,
    prefs: &PrefsStore,
    measure: &mut dyn TextMeasure,
) -> Vec<FittedRegion> {
    regions
        .iter()
        .map(|region| {
            let parsed = BindingKey::parse(&region.key);
            let value = map.get(&region.key).unwrap_or("");
            let effective = prefs.prefs_for_key(&region.key);
            let block = fit::fit_field(parsed.field(), value, region.bounds(), &effective, measure);
            FittedRegion {
                id: region.id,
                block,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/binder.rs"]
mod tests;
