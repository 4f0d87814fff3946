//! Calendar arithmetic for the 7-day display window.
//!
//! `week_start` is caller-defined: offset 0 means "first visible day" and
//! nothing here requires it to be a Monday. Weekday names always come from
//! the real date, never from a fixed table.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::foundation::error::{SlatecastError, SlatecastResult};

/// Calendar date `offset` days after the visible week's start.
pub fn date_for_offset(week_start: NaiveDate, offset: u8) -> SlatecastResult<NaiveDate> {
    week_start
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| {
            SlatecastError::validation(format!(
                "date overflow adding {offset} days to {week_start}"
            ))
        })
}

/// Full English weekday name for the date at `offset`.
pub fn weekday_name(week_start: NaiveDate, offset: u8) -> SlatecastResult<String> {
    Ok(date_for_offset(week_start, offset)?.format("%A").to_string())
}

/// Half-open fetch window `[week_start 00:00, week_start + 7d 00:00)` handed
/// to the schedule data source.
pub fn week_range(week_start: NaiveDate) -> SlatecastResult<(NaiveDateTime, NaiveDateTime)> {
    let end = date_for_offset(week_start, 7)?;
    Ok((week_start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
}

/// Bucket a timestamp into its day offset within the visible week, if any.
pub fn day_offset_of(week_start: NaiveDate, at: NaiveDateTime) -> Option<u8> {
    let days = at.date().signed_duration_since(week_start).num_days();
    (0..=6).contains(&days).then_some(days as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/binding/week.rs"]
mod tests;
