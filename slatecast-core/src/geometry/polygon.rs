//! Pure polygon helpers shared by the drawing surface, codec and renderer.

use crate::foundation::core::{Point, Rect, Vec2};

/// Axis-aligned bounding box of a point list. Empty input yields a zero rect.
pub fn bounding_box(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// Translate absolute points into the coordinate space anchored at their
/// bounding box's top-left. Returns the relative points and that origin.
pub fn to_local(points: &[Point]) -> (Vec<Point>, Point) {
    let origin = bounding_box(points).origin();
    let local = points
        .iter()
        .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
        .collect();
    (local, origin)
}

/// Shift every point by `delta`.
pub fn translate(points: &[Point], delta: Vec2) -> Vec<Point> {
    points.iter().map(|p| *p + delta).collect()
}

/// Even-odd ray cast. Points on an edge may land on either side; the drawing
/// surface only needs click-level precision.
pub fn contains_point(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            if p.x < a.x + t * (b.x - a.x) {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
