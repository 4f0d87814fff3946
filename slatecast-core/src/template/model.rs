//! In-memory template model: regions, styles, background references.
//!
//! This is the shape the rest of the engine works with; the versioned wire
//! documents live in [`crate::template::codec`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::foundation::core::{Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::geometry::polygon;

/// Stable identity of a region across save/load cycles.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RegionId(Uuid);

impl RegionId {
    /// Fresh random id for a newly drawn region.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    // Deterministic ids for legacy documents that carry none.
    pub(crate) fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-region paint and placement overrides.
///
/// Every field is optional; absent fields fall back to the system default
/// (see [`ResolvedStyle::default`]). The storage format only persists styles
/// that differ from the default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionStyle {
    /// Interior fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba8>,
    /// Outline color (authoring chrome; never exported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Rgba8>,
    /// Outline width in canvas units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Horizontal scale about the local bounding-box center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    /// Vertical scale about the local bounding-box center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    /// Rotation in degrees about the local bounding-box center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    /// Fill opacity, 0 to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl RegionStyle {
    /// True when every field is unset.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply system defaults to unset fields.
    pub fn resolve(&self) -> ResolvedStyle {
        let d = ResolvedStyle::default();
        ResolvedStyle {
            fill: self.fill.unwrap_or(d.fill),
            stroke: self.stroke.unwrap_or(d.stroke),
            stroke_width: self.stroke_width.unwrap_or(d.stroke_width),
            scale_x: self.scale_x.unwrap_or(d.scale_x),
            scale_y: self.scale_y.unwrap_or(d.scale_y),
            rotation_deg: self.rotation_deg.unwrap_or(d.rotation_deg),
            opacity: self.opacity.unwrap_or(d.opacity),
        }
    }

    /// Drop fields that restate the system default, keeping the persisted
    /// override sparse. Legacy documents store a full style per region; this
    /// is what reduces them on decode.
    pub fn normalized(&self) -> Self {
        fn keep<T: PartialEq>(v: Option<T>, default: T) -> Option<T> {
            v.filter(|x| *x != default)
        }

        let d = ResolvedStyle::default();
        Self {
            fill: keep(self.fill, d.fill),
            stroke: keep(self.stroke, d.stroke),
            stroke_width: keep(self.stroke_width, d.stroke_width),
            scale_x: keep(self.scale_x, d.scale_x),
            scale_y: keep(self.scale_y, d.scale_y),
            rotation_deg: keep(self.rotation_deg, d.rotation_deg),
            opacity: keep(self.opacity, d.opacity),
        }
    }

    /// Reject non-finite numbers and out-of-range widths/opacities.
    pub fn validate(&self) -> SlatecastResult<()> {
        for (name, v) in [
            ("stroke_width", self.stroke_width),
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("rotation_deg", self.rotation_deg),
            ("opacity", self.opacity),
        ] {
            if let Some(v) = v
                && !v.is_finite()
            {
                return Err(SlatecastError::validation(format!(
                    "style {name} must be finite, got {v}"
                )));
            }
        }
        if let Some(w) = self.stroke_width
            && w < 0.0
        {
            return Err(SlatecastError::validation(format!(
                "style stroke_width must be >= 0, got {w}"
            )));
        }
        if let Some(o) = self.opacity
            && !(0.0..=1.0).contains(&o)
        {
            return Err(SlatecastError::validation(format!(
                "style opacity must be within 0..=1, got {o}"
            )));
        }
        Ok(())
    }
}

/// A region style with all defaults applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Interior fill color.
    pub fill: Rgba8,
    /// Outline color (authoring chrome; never exported).
    pub stroke: Rgba8,
    /// Outline width in canvas units.
    pub stroke_width: f64,
    /// Horizontal scale about the local bounding-box center.
    pub scale_x: f64,
    /// Vertical scale about the local bounding-box center.
    pub scale_y: f64,
    /// Rotation in degrees about the local bounding-box center.
    pub rotation_deg: f64,
    /// Fill opacity, 0 to 1.
    pub opacity: f64,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            fill: Rgba8::opaque(0x2a, 0x2a, 0x2e),
            stroke: Rgba8::opaque(0xff, 0xff, 0xff),
            stroke_width: 2.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }
}

/// A user-drawn polygonal area bound to a data key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Stable identity, preserved across persistence cycles.
    pub id: RegionId,
    /// Binding key, free-form or day-offset-coded (`day{N}_{field}`).
    pub key: String,
    /// Vertices relative to `origin` (the bounding box top-left at
    /// authoring time). At least 3 for a persistable region.
    pub vertices: Vec<Point>,
    /// Absolute placement of the local coordinate space on the canvas.
    pub origin: Point,
    /// Overrides on top of the system default style.
    #[serde(default, skip_serializing_if = "RegionStyle::is_default")]
    pub style: RegionStyle,
}

impl Region {
    /// Build a region from absolute canvas points, normalizing them into the
    /// local space per the data model.
    pub fn from_absolute(key: impl Into<String>, points: &[Point]) -> SlatecastResult<Self> {
        if points.len() < 3 {
            return Err(SlatecastError::validation(format!(
                "a region needs at least 3 vertices, got {}",
                points.len()
            )));
        }
        let (vertices, origin) = polygon::to_local(points);
        let region = Self {
            id: RegionId::new(),
            key: key.into(),
            vertices,
            origin,
            style: RegionStyle::default(),
        };
        region.validate()?;
        Ok(region)
    }

    /// Vertices in absolute canvas coordinates.
    pub fn absolute_vertices(&self) -> Vec<Point> {
        polygon::translate(&self.vertices, self.origin.to_vec2())
    }

    /// Absolute bounding box on the canvas; the text-fit target rectangle.
    pub fn bounds(&self) -> Rect {
        let local = polygon::bounding_box(&self.vertices);
        Rect::new(
            local.x0 + self.origin.x,
            local.y0 + self.origin.y,
            local.x1 + self.origin.x,
            local.y1 + self.origin.y,
        )
    }

    /// Click hit-test against the absolute polygon.
    pub fn hit(&self, p: Point) -> bool {
        polygon::contains_point(&self.absolute_vertices(), p)
    }

    /// Shift the region on the canvas.
    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Reject degenerate shapes, empty keys and non-finite coordinates.
    pub fn validate(&self) -> SlatecastResult<()> {
        if self.vertices.len() < 3 {
            return Err(SlatecastError::validation(format!(
                "region {} needs at least 3 vertices, got {}",
                self.id,
                self.vertices.len()
            )));
        }
        if self.key.is_empty() {
            return Err(SlatecastError::validation(format!(
                "region {} has an empty binding key",
                self.id
            )));
        }
        if !self.origin.x.is_finite() || !self.origin.y.is_finite() {
            return Err(SlatecastError::validation(format!(
                "region {} origin must be finite",
                self.id
            )));
        }
        for v in &self.vertices {
            if !v.x.is_finite() || !v.y.is_finite() {
                return Err(SlatecastError::validation(format!(
                    "region {} has a non-finite vertex",
                    self.id
                )));
            }
        }
        self.style.validate()
    }
}

/// Where the canvas background image comes from.
///
/// The engine stores and compares these opaquely; resolving a URL or an
/// upload path to bytes is the caller's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BackgroundRef {
    /// Inline image URL; what legacy documents carry.
    Url {
        /// The image URL, stored verbatim.
        url: String,
    },
    /// Path of an uploaded file in the background asset store.
    Upload {
        /// Store-relative path, stored verbatim.
        path: String,
    },
}

impl BackgroundRef {
    /// The opaque location string, whichever variant holds it.
    pub fn location(&self) -> &str {
        match self {
            Self::Url { url } => url,
            Self::Upload { path } => path,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
