use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn offsets_walk_the_calendar() {
    // 2025-06-09 is a Monday.
    let monday = date(2025, 6, 9);
    assert_eq!(date_for_offset(monday, 0).unwrap(), monday);
    assert_eq!(date_for_offset(monday, 3).unwrap(), date(2025, 6, 12));
    assert_eq!(date_for_offset(monday, 6).unwrap(), date(2025, 6, 15));
}

#[test]
fn weekday_names_come_from_the_real_date() {
    let monday = date(2025, 6, 9);
    assert_eq!(weekday_name(monday, 0).unwrap(), "Monday");
    assert_eq!(weekday_name(monday, 3).unwrap(), "Thursday");
    // A week starting mid-week names accordingly.
    assert_eq!(weekday_name(date(2025, 6, 11), 0).unwrap(), "Wednesday");
}

#[test]
fn week_range_is_half_open_over_seven_days() {
    let (start, end) = week_range(date(2025, 6, 9)).unwrap();
    assert_eq!(start, date(2025, 6, 9).and_time(NaiveTime::MIN));
    assert_eq!(end, date(2025, 6, 16).and_time(NaiveTime::MIN));
}

#[test]
fn day_offset_of_buckets_into_the_visible_week() {
    let monday = date(2025, 6, 9);
    let at = |d: u32, h: u32| date(2025, 6, d).and_hms_opt(h, 0, 0).unwrap();

    assert_eq!(day_offset_of(monday, at(9, 0)), Some(0));
    assert_eq!(day_offset_of(monday, at(12, 19)), Some(3));
    assert_eq!(day_offset_of(monday, at(15, 23)), Some(6));
    // The next Monday and anything earlier than the start are outside.
    assert_eq!(day_offset_of(monday, at(16, 0)), None);
    assert_eq!(day_offset_of(monday, at(8, 23)), None);
}

#[test]
fn date_overflow_is_a_validation_error() {
    let err = date_for_offset(NaiveDate::MAX, 1).unwrap_err();
    assert!(matches!(err, SlatecastError::Validation(_)));
}
