use super::*;
use crate::layout::measure::CharAdvanceMeasure;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn long_text_shrinks_to_the_floor_and_wraps() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(0.0, 0.0, 60.0, 40.0);
    let prefs = FitPrefs {
        font_size: 40,
        ..FitPrefs::default()
    };

    let block = fit("Epic Gaming Marathon With Friends", bounds, &prefs, &mut m);
    assert_eq!(block.font_size, MIN_FONT_SIZE);
    assert_eq!(block.lines, vec!["Epic Gaming", "Marathon", "With Friends"]);
    // The wrapped block fits the 90% usable box.
    assert!(block.size.width <= 54.0);
    assert!(block.size.height <= 36.0);
}

#[test]
fn short_text_keeps_the_requested_size() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(0.0, 0.0, 400.0, 100.0);
    let block = fit("Hi", bounds, &FitPrefs::default(), &mut m);
    assert_eq!(block.font_size, 24);
    assert_eq!(block.lines, vec!["Hi"]);
}

#[test]
fn too_tall_blocks_shrink_even_when_the_width_fits() {
    let mut m = CharAdvanceMeasure::default();
    // Wide but short box: width never binds, height does.
    let bounds = Rect::new(0.0, 0.0, 400.0, 25.0);
    let block = fit("Streaming", bounds, &FitPrefs::default(), &mut m);
    assert_eq!(block.lines, vec!["Streaming"]);
    // 1.2 * 18 fits inside the 22.5-unit usable height; 19 does not.
    assert_eq!(block.font_size, 18);
    assert!(block.size.height <= 22.5);
}

#[test]
fn single_words_overflow_rather_than_break() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(0.0, 0.0, 30.0, 30.0);
    let block = fit("Extraordinary", bounds, &FitPrefs::default(), &mut m);
    assert_eq!(block.lines.len(), 1);
    assert_eq!(block.font_size, MIN_FONT_SIZE);
    // Wider than the usable box at the floor: accepted, clips at render time.
    assert!(block.size.width > 27.0);
}

#[test]
fn empty_and_whitespace_values_fit_to_empty_blocks() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
    for text in ["", "   ", "\t\n"] {
        let block = fit(text, bounds, &FitPrefs::default(), &mut m);
        assert!(block.is_empty());
        assert!(block.lines.is_empty());
        assert_eq!(block.font_size, 24);
        assert_eq!(block.size, Size::ZERO);
    }
}

#[test]
fn refitting_at_the_returned_size_is_stable() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(0.0, 0.0, 60.0, 40.0);
    let text = "Epic Gaming Marathon With Friends";
    let first = fit(
        text,
        bounds,
        &FitPrefs {
            font_size: 40,
            ..FitPrefs::default()
        },
        &mut m,
    );
    let again = fit(
        text,
        bounds,
        &FitPrefs {
            font_size: first.font_size,
            ..FitPrefs::default()
        },
        &mut m,
    );
    assert_eq!(first, again);
}

#[test]
fn anchors_sit_at_the_margin_center_and_far_margin() {
    let mut m = CharAdvanceMeasure::default();
    let bounds = Rect::new(100.0, 50.0, 300.0, 150.0);
    let mut at = |justify| {
        let prefs = FitPrefs {
            justify,
            ..FitPrefs::default()
        };
        fit("x", bounds, &prefs, &mut m).anchor
    };

    let left = at(Justify::Left);
    assert!(close(left.x, 110.0) && close(left.y, 100.0));
    let center = at(Justify::Center);
    assert!(close(center.x, 200.0) && close(center.y, 100.0));
    let right = at(Justify::Right);
    assert!(close(right.x, 290.0) && close(right.y, 100.0));
}

#[test]
fn twelve_hour_rewrites_time_fields_only() {
    let p12 = FitPrefs {
        time_format: Some(TimeFormat::TwelveHour),
        ..FitPrefs::default()
    };
    assert_eq!(format_field_value("stream_time", "19:30", &p12), "7:30 PM");
    assert_eq!(format_field_value("stream_time", "00:05", &p12), "12:05 AM");
    assert_eq!(format_field_value("stream_time", "12:00", &p12), "12:00 PM");
    // Non-time fields and unparseable values pass through.
    assert_eq!(format_field_value("game", "19:30", &p12), "19:30");
    assert_eq!(format_field_value("stream_time", "soon", &p12), "soon");

    let p24 = FitPrefs {
        time_format: Some(TimeFormat::TwentyFourHour),
        ..FitPrefs::default()
    };
    assert_eq!(format_field_value("stream_time", "19:30", &p24), "19:30");
    assert_eq!(
        format_field_value("stream_time", "19:30", &FitPrefs::default()),
        "19:30"
    );
}

#[test]
fn fit_field_reformats_before_fitting() {
    let mut m = CharAdvanceMeasure::default();
    let prefs = FitPrefs {
        time_format: Some(TimeFormat::TwelveHour),
        ..FitPrefs::default()
    };
    let block = fit_field(
        "stream_time",
        "19:30",
        Rect::new(0.0, 0.0, 300.0, 60.0),
        &prefs,
        &mut m,
    );
    assert_eq!(block.lines, vec!["7:30 PM"]);
}
