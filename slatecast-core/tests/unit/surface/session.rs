use super::*;

fn surface() -> Surface {
    Surface::new(Canvas {
        width: 1280,
        height: 720,
    })
    .unwrap()
}

fn draw_triangle(s: &mut Surface, key: &str, origin: (f64, f64)) -> RegionId {
    s.begin_drawing(key).unwrap();
    s.add_point(Point::new(origin.0, origin.1)).unwrap();
    s.add_point(Point::new(origin.0 + 40.0, origin.1)).unwrap();
    s.add_point(Point::new(origin.0 + 20.0, origin.1 + 30.0))
        .unwrap();
    s.finish_region().unwrap()
}

#[test]
fn drawing_finishes_into_a_region_bound_to_the_active_key() {
    let mut s = surface();
    assert!(!s.is_drawing());
    assert_eq!(*s.mode(), SurfaceMode::Idle { selected: None });

    let id = draw_triangle(&mut s, "day0_stream_name", (100.0, 100.0));
    assert!(!s.is_drawing());
    assert_eq!(s.regions().len(), 1);

    let region = s.region(id).unwrap();
    assert_eq!(region.key, "day0_stream_name");
    assert_eq!(region.origin, Point::new(100.0, 100.0));
    assert_eq!(region.vertices[0], Point::new(0.0, 0.0));
    assert_eq!(region.vertices[1], Point::new(40.0, 0.0));
}

#[test]
fn begin_drawing_requires_a_key_and_an_idle_surface() {
    let mut s = surface();
    assert!(s.begin_drawing("").is_err());
    s.begin_drawing("k").unwrap();
    assert!(s.begin_drawing("other").is_err());
    // The original drawing is still live.
    assert!(s.is_drawing());
}

#[test]
fn finish_under_three_points_keeps_the_drawing_alive() {
    let mut s = surface();
    s.begin_drawing("k").unwrap();
    s.add_point(Point::new(0.0, 0.0)).unwrap();
    s.add_point(Point::new(10.0, 0.0)).unwrap();

    let err = s.finish_region().unwrap_err();
    assert!(matches!(err, SlatecastError::Validation(_)));
    // Captured points survive the failed finish.
    assert!(s.is_drawing());
    assert_eq!(s.pending_points().len(), 2);

    s.add_point(Point::new(5.0, 10.0)).unwrap();
    assert!(s.finish_region().is_ok());
    assert_eq!(s.regions().len(), 1);
}

#[test]
fn cancel_discards_pending_points() {
    let mut s = surface();
    s.begin_drawing("k").unwrap();
    s.add_point(Point::new(1.0, 1.0)).unwrap();
    s.cancel_drawing().unwrap();

    assert!(!s.is_drawing());
    assert!(s.regions().is_empty());
    assert!(s.pending_points().is_empty());
    assert!(s.cancel_drawing().is_err());
}

#[test]
fn point_capture_rejects_idle_and_non_finite_input() {
    let mut s = surface();
    assert!(s.add_point(Point::new(1.0, 1.0)).is_err());
    assert!(s.finish_region().is_err());

    s.begin_drawing("k").unwrap();
    assert!(s.add_point(Point::new(f64::NAN, 0.0)).is_err());
    assert!(s.add_point(Point::new(0.0, f64::INFINITY)).is_err());
    assert!(s.pending_points().is_empty());
}

#[test]
fn selection_picks_the_topmost_region_and_empty_clicks_clear() {
    let mut s = surface();
    let below = draw_triangle(&mut s, "a", (100.0, 100.0));
    let above = draw_triangle(&mut s, "b", (110.0, 105.0));

    // Overlapping interior point: the most recently added region wins.
    assert_eq!(s.select_at(Point::new(125.0, 115.0)), Some(above));
    assert_eq!(s.selected(), Some(above));

    // A point only the lower region covers.
    assert_eq!(s.select_at(Point::new(102.0, 101.0)), Some(below));

    // Clicking empty canvas clears the selection.
    assert_eq!(s.select_at(Point::new(600.0, 600.0)), None);
    assert_eq!(s.selected(), None);
}

#[test]
fn selection_is_disabled_while_drawing() {
    let mut s = surface();
    let id = draw_triangle(&mut s, "a", (100.0, 100.0));
    s.select_at(Point::new(120.0, 110.0));
    assert_eq!(s.selected(), Some(id));

    s.begin_drawing("b").unwrap();
    assert_eq!(s.select_at(Point::new(120.0, 110.0)), None);
    assert_eq!(s.selected(), None);
}

#[test]
fn move_and_delete_follow_the_selection() {
    let mut s = surface();
    let id = draw_triangle(&mut s, "k", (100.0, 100.0));
    assert!(s.move_selected(Vec2::new(5.0, 5.0)).is_err());

    s.select_at(Point::new(120.0, 110.0));
    s.move_selected(Vec2::new(5.0, -10.0)).unwrap();
    assert_eq!(s.region(id).unwrap().origin, Point::new(105.0, 90.0));

    let removed = s.delete_selected().unwrap();
    assert_eq!(removed.id, id);
    assert!(s.regions().is_empty());
    assert_eq!(s.selected(), None);
    assert!(s.delete_selected().is_err());
}

#[test]
fn delete_is_rejected_while_drawing() {
    let mut s = surface();
    draw_triangle(&mut s, "k", (100.0, 100.0));
    s.begin_drawing("other").unwrap();
    assert!(s.delete_selected().is_err());
}

#[test]
fn rebinding_requires_a_live_region_and_a_key() {
    let mut s = surface();
    let id = draw_triangle(&mut s, "old", (0.0, 0.0));
    s.set_region_key(id, "day4_game").unwrap();
    assert_eq!(s.region(id).unwrap().key, "day4_game");

    assert!(s.set_region_key(id, "").is_err());
    assert!(matches!(
        s.set_region_key(RegionId::new(), "x"),
        Err(SlatecastError::NotFound(_))
    ));
}

#[test]
fn to_template_requires_a_background() {
    let mut s = surface();
    draw_triangle(&mut s, "day0_game", (10.0, 10.0));
    assert!(s.to_template().is_err());

    s.set_background(Some(BackgroundRef::Upload {
        path: "bg.png".to_string(),
    }));
    let template = s.to_template().unwrap();
    assert_eq!(template.version, codec::TEMPLATE_VERSION);
    assert_eq!(template.day_groups.len(), 1);
}

#[test]
fn from_decoded_restores_a_surface() {
    let mut s = surface();
    draw_triangle(&mut s, "day1_notes", (50.0, 50.0));
    s.set_background(Some(BackgroundRef::Url {
        url: "u".to_string(),
    }));
    let template = s.to_template().unwrap();

    let decoded = codec::decode_template(&template).unwrap();
    let restored = Surface::from_decoded(decoded);
    assert_eq!(restored.regions().len(), 1);
    assert_eq!(restored.regions()[0].key, "day1_notes");
    assert_eq!(restored.canvas(), s.canvas());
    assert!(!restored.is_drawing());
    assert_eq!(
        restored.background(),
        Some(&BackgroundRef::Url {
            url: "u".to_string(),
        })
    );
}
