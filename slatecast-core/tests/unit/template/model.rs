use super::*;

fn triangle() -> Vec<Point> {
    vec![
        Point::new(10.0, 20.0),
        Point::new(40.0, 20.0),
        Point::new(25.0, 50.0),
    ]
}

#[test]
fn from_absolute_normalizes_into_local_space() {
    let region = Region::from_absolute("day0_game", &triangle()).unwrap();
    assert_eq!(region.key, "day0_game");
    assert_eq!(region.origin, Point::new(10.0, 20.0));
    assert_eq!(
        region.vertices,
        [
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(15.0, 30.0),
        ]
    );
    assert_eq!(region.absolute_vertices(), triangle());
    assert!(region.style.is_default());
}

#[test]
fn from_absolute_rejects_degenerate_shapes_and_empty_keys() {
    let err = Region::from_absolute("k", &triangle()[..2]).unwrap_err();
    assert!(err.to_string().contains("at least 3"));
    assert!(Region::from_absolute("", &triangle()).is_err());
}

#[test]
fn bounds_is_the_absolute_bounding_box() {
    let region = Region::from_absolute("k", &triangle()).unwrap();
    assert_eq!(region.bounds(), Rect::new(10.0, 20.0, 40.0, 50.0));
}

#[test]
fn hit_tests_the_absolute_polygon() {
    let region = Region::from_absolute("k", &triangle()).unwrap();
    assert!(region.hit(Point::new(25.0, 30.0)));
    assert!(!region.hit(Point::new(5.0, 5.0)));
    assert!(!region.hit(Point::new(11.0, 49.0)));
}

#[test]
fn translate_moves_only_the_origin() {
    let mut region = Region::from_absolute("k", &triangle()).unwrap();
    let local = region.vertices.clone();
    region.translate(Vec2::new(5.0, -3.0));
    assert_eq!(region.origin, Point::new(15.0, 17.0));
    assert_eq!(region.vertices, local);
    assert_eq!(region.bounds(), Rect::new(15.0, 17.0, 45.0, 47.0));
}

#[test]
fn region_validate_rejects_non_finite_coordinates() {
    let mut region = Region::from_absolute("k", &triangle()).unwrap();
    region.origin = Point::new(f64::NAN, 0.0);
    assert!(region.validate().is_err());

    let mut region = Region::from_absolute("k", &triangle()).unwrap();
    region.vertices[1] = Point::new(0.0, f64::INFINITY);
    assert!(region.validate().is_err());
}

#[test]
fn style_resolution_fills_in_system_defaults() {
    let style = RegionStyle {
        opacity: Some(0.5),
        ..RegionStyle::default()
    };
    let resolved = style.resolve();
    assert_eq!(resolved.opacity, 0.5);
    assert_eq!(resolved.fill, Rgba8::opaque(0x2a, 0x2a, 0x2e));
    assert_eq!(resolved.stroke, Rgba8::opaque(0xff, 0xff, 0xff));
    assert_eq!(resolved.stroke_width, 2.0);
    assert_eq!((resolved.scale_x, resolved.scale_y), (1.0, 1.0));
    assert_eq!(resolved.rotation_deg, 0.0);
}

#[test]
fn normalization_drops_fields_that_restate_defaults() {
    let style = RegionStyle {
        opacity: Some(0.5),
        scale_x: Some(1.0),
        stroke_width: Some(2.0),
        ..RegionStyle::default()
    };
    let normalized = style.normalized();
    assert_eq!(normalized.opacity, Some(0.5));
    assert_eq!(normalized.scale_x, None);
    assert_eq!(normalized.stroke_width, None);

    assert!(RegionStyle::default().is_default());
    assert!(
        RegionStyle {
            rotation_deg: Some(0.0),
            ..RegionStyle::default()
        }
        .normalized()
        .is_default()
    );
}

#[test]
fn style_validation_bounds() {
    let with_opacity = |o| RegionStyle {
        opacity: Some(o),
        ..RegionStyle::default()
    };
    assert!(with_opacity(1.5).validate().is_err());
    assert!(with_opacity(-0.1).validate().is_err());
    assert!(with_opacity(0.0).validate().is_ok());
    assert!(with_opacity(1.0).validate().is_ok());

    assert!(
        RegionStyle {
            stroke_width: Some(-1.0),
            ..RegionStyle::default()
        }
        .validate()
        .is_err()
    );
    assert!(
        RegionStyle {
            rotation_deg: Some(f64::NAN),
            ..RegionStyle::default()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn default_style_serializes_to_an_empty_object() {
    assert_eq!(
        serde_json::to_value(RegionStyle::default()).unwrap(),
        serde_json::json!({})
    );
    let style = RegionStyle {
        fill: Some(Rgba8::opaque(0x11, 0x22, 0x33)),
        ..RegionStyle::default()
    };
    assert_eq!(
        serde_json::to_value(&style).unwrap(),
        serde_json::json!({ "fill": "#112233" })
    );
}

#[test]
fn background_ref_serde_shape() {
    let url = BackgroundRef::Url {
        url: "https://cdn.example/bg.png".to_string(),
    };
    let v = serde_json::to_value(&url).unwrap();
    assert_eq!(v["source"], "url");
    assert_eq!(v["url"], "https://cdn.example/bg.png");
    assert_eq!(url.location(), "https://cdn.example/bg.png");

    let upload = BackgroundRef::Upload {
        path: "owners/1/bg.png".to_string(),
    };
    let v = serde_json::to_value(&upload).unwrap();
    assert_eq!(v["source"], "upload");
    assert_eq!(upload.location(), "owners/1/bg.png");
    assert_eq!(serde_json::from_value::<BackgroundRef>(v).unwrap(), upload);
}

#[test]
fn region_ids_are_unique_and_survive_serde() {
    let id = RegionId::new();
    assert_ne!(id, RegionId::new());
    let json = serde_json::to_string(&id).unwrap();
    let back: RegionId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}
