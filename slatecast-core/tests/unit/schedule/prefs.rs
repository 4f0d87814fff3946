use super::*;
use crate::layout::fit::{Justify, TimeFormat};

#[test]
fn resolution_is_override_then_field_then_default() {
    let mut prefs = PrefsStore::new();
    assert_eq!(prefs.prefs_for_key("day0_stream_time"), FitPrefs::default());

    let field_level = FitPrefs {
        font_size: 18,
        justify: Justify::Left,
        time_format: Some(TimeFormat::TwelveHour),
    };
    prefs.set_field_prefs("stream_time", field_level.clone());
    // All seven day keys share the field setting.
    for day in 0..7u8 {
        assert_eq!(
            prefs.prefs_for_key(&BindingKey::build_day(day, "stream_time")),
            field_level
        );
    }
    // Other fields are untouched.
    assert_eq!(prefs.prefs_for_key("day0_game"), FitPrefs::default());

    let pinned = FitPrefs {
        font_size: 30,
        ..FitPrefs::default()
    };
    prefs.set_key_override("day2_stream_time", pinned.clone());
    assert_eq!(prefs.prefs_for_key("day2_stream_time"), pinned);
    assert_eq!(prefs.prefs_for_key("day3_stream_time"), field_level);

    prefs.clear_key_override("day2_stream_time");
    assert_eq!(prefs.prefs_for_key("day2_stream_time"), field_level);
    prefs.clear_field_prefs("stream_time");
    assert_eq!(prefs.prefs_for_key("day2_stream_time"), FitPrefs::default());
}

#[test]
fn singular_keys_resolve_by_their_whole_key() {
    let mut prefs = PrefsStore::new();
    prefs.set_field_prefs(
        "title",
        FitPrefs {
            font_size: 64,
            ..FitPrefs::default()
        },
    );
    assert_eq!(prefs.prefs_for_key("title").font_size, 64);
    // Non-day prefixes do not alias into day fields.
    assert_eq!(prefs.prefs_for_key("day03_title"), FitPrefs::default());
}

#[test]
fn empty_store_serializes_to_an_empty_object() {
    assert_eq!(
        serde_json::to_value(PrefsStore::new()).unwrap(),
        serde_json::json!({})
    );
}
