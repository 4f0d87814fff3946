//! Versioned template documents and the conversions to/from the in-memory
//! model.
//!
//! Documents are JSON trees. Version "1.0" is the legacy flat layout with
//! absolute float vertices and a full style per region; version "2.0" packs
//! day-bound regions into groups with shared integer bases and keeps styles
//! in a sparse override map. [`encode_template`] always writes "2.0";
//! [`decode_document`] accepts both. Anything else is rejected before it
//! reaches persistence or rendering.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::binding::key::BindingKey;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::foundation::math::Fnv1a64;
use crate::geometry::polygon;
use crate::template::model::{BackgroundRef, Region, RegionId, RegionStyle};

/// Version tag written by [`encode_template`].
pub const TEMPLATE_VERSION: &str = "2.0";
/// Legacy version still accepted by [`decode_document`].
pub const LEGACY_VERSION: &str = "1.0";

/// The optimized ("2.0") storage document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Format discriminator; always [`TEMPLATE_VERSION`] for this type.
    pub version: String,
    /// Canvas the coordinates are expressed in.
    pub canvas: Canvas,
    /// Background image reference.
    pub background: BackgroundRef,
    /// Day-bound regions, one group per weekday offset present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_groups: Vec<DayGroup>,
    /// Regions whose key is not day-offset-coded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub singular: Vec<SingularRegion>,
    /// Styles for regions that differ from the system default.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style_overrides: BTreeMap<RegionId, RegionStyle>,
}

/// Regions sharing one weekday offset; coordinates are packed relative to a
/// common integer base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayGroup {
    /// Weekday offset 0-6.
    pub day: u8,
    /// Shared base, the componentwise minimum of member origins.
    pub base_x: i32,
    /// Shared base, the componentwise minimum of member origins.
    pub base_y: i32,
    /// Members bound to this day, in input order.
    pub regions: Vec<GroupRegion>,
}

/// One member of a [`DayGroup`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupRegion {
    /// Stable region identity.
    pub id: RegionId,
    /// Field portion of the binding key; the full key is rebuilt as
    /// `day{group.day}_{field}` on decode.
    pub field: String,
    /// Origin x relative to the group base.
    pub offset_x: i32,
    /// Origin y relative to the group base.
    pub offset_y: i32,
    /// Region-local vertices, rounded to integers.
    pub vertices: Vec<[i32; 2]>,
}

/// A region outside the day convention, stored with its absolute origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingularRegion {
    /// Stable region identity.
    pub id: RegionId,
    /// The verbatim binding key.
    pub key: String,
    /// Absolute origin x, rounded to an integer.
    pub x: i32,
    /// Absolute origin y, rounded to an integer.
    pub y: i32,
    /// Region-local vertices, rounded to integers.
    pub vertices: Vec<[i32; 2]>,
}

/// In-memory result of decoding a stored document.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedTemplate {
    /// All regions, day-bound groups flattened back to full keys.
    pub regions: Vec<Region>,
    /// Canvas the template was authored against.
    pub canvas: Canvas,
    /// Background image reference.
    pub background: BackgroundRef,
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Serialize regions into a fresh "2.0" document.
///
/// Deterministic for unchanged input: groups are ordered by day, members and
/// singulars keep input order, the group base is the componentwise minimum
/// of its members' rounded origins, and style overrides are sorted by id.
/// Regions with fewer than 3 vertices are not persisted.
#[tracing::instrument(skip(regions, background))]
pub fn encode_template(
    regions: &[Region],
    canvas: Canvas,
    background: &BackgroundRef,
) -> SlatecastResult<Template> {
    canvas.validate()?;

    struct Member<'a> {
        region: &'a Region,
        field: String,
        x: i64,
        y: i64,
    }

    let mut groups: BTreeMap<u8, Vec<Member<'_>>> = BTreeMap::new();
    let mut singular = Vec::new();
    let mut style_overrides = BTreeMap::new();
    let mut seen = BTreeSet::new();

    for region in regions {
        if region.vertices.len() < 3 {
            tracing::warn!(id = %region.id, key = %region.key, "region has fewer than 3 vertices; not persisted");
            continue;
        }
        region.validate()?;
        if !seen.insert(region.id) {
            return Err(SlatecastError::validation(format!(
                "duplicate region id {}",
                region.id
            )));
        }

        let x = round_coord(region.origin.x, "region origin x")?;
        let y = round_coord(region.origin.y, "region origin y")?;
        let style = region.style.normalized();
        if !style.is_default() {
            style_overrides.insert(region.id, style);
        }

        match BindingKey::parse(&region.key) {
            BindingKey::Day { offset, field } => {
                groups
                    .entry(offset)
                    .or_default()
                    .push(Member { region, field, x, y });
            }
            BindingKey::Singular(_) => singular.push(SingularRegion {
                id: region.id,
                key: region.key.clone(),
                x: narrow(x, "region origin x")?,
                y: narrow(y, "region origin y")?,
                vertices: round_vertices(region)?,
            }),
        }
    }

    let mut day_groups = Vec::with_capacity(groups.len());
    for (day, members) in groups {
        let base_x = members.iter().map(|m| m.x).min().unwrap_or(0);
        let base_y = members.iter().map(|m| m.y).min().unwrap_or(0);
        let mut packed = Vec::with_capacity(members.len());
        for m in members {
            packed.push(GroupRegion {
                id: m.region.id,
                field: m.field,
                offset_x: narrow(m.x - base_x, "region day-group offset x")?,
                offset_y: narrow(m.y - base_y, "region day-group offset y")?,
                vertices: round_vertices(m.region)?,
            });
        }
        day_groups.push(DayGroup {
            day,
            base_x: narrow(base_x, "day group base x")?,
            base_y: narrow(base_y, "day group base y")?,
            regions: packed,
        });
    }

    Ok(Template {
        version: TEMPLATE_VERSION.to_string(),
        canvas,
        background: background.clone(),
        day_groups,
        singular,
        style_overrides,
    })
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode a stored document of either supported version.
///
/// The `version` discriminator is checked before anything else; documents
/// without one, or with an unknown one, are rejected rather than coerced.
#[tracing::instrument(skip(doc))]
pub fn decode_document(doc: &serde_json::Value) -> SlatecastResult<DecodedTemplate> {
    let version = match doc.get("version") {
        None => {
            return Err(SlatecastError::validation(
                "template is missing required field `version`",
            ));
        }
        Some(v) => v.as_str().ok_or_else(|| {
            SlatecastError::validation("template field `version` must be a string")
        })?,
    };

    match version {
        LEGACY_VERSION => decode_legacy(doc),
        TEMPLATE_VERSION => {
            let template: Template = serde_json::from_value(doc.clone())
                .map_err(|e| SlatecastError::validation(format!("malformed template document: {e}")))?;
            decode_template(&template)
        }
        other => Err(SlatecastError::validation(format!(
            "unsupported template `version` \"{other}\", expected \"{LEGACY_VERSION}\" or \"{TEMPLATE_VERSION}\""
        ))),
    }
}

/// Expand an already-typed "2.0" document into the in-memory model.
pub fn decode_template(template: &Template) -> SlatecastResult<DecodedTemplate> {
    if template.version != TEMPLATE_VERSION {
        return Err(SlatecastError::validation(format!(
            "unsupported template `version` \"{}\", expected \"{TEMPLATE_VERSION}\"",
            template.version
        )));
    }
    template.canvas.validate()?;

    let mut regions = Vec::new();
    let mut seen_ids = BTreeSet::new();
    let mut seen_days = BTreeSet::new();

    for group in &template.day_groups {
        if group.day > 6 {
            return Err(SlatecastError::validation(format!(
                "day group offset must be 0-6, got {}",
                group.day
            )));
        }
        if !seen_days.insert(group.day) {
            return Err(SlatecastError::validation(format!(
                "duplicate day group for offset {}",
                group.day
            )));
        }
        for member in &group.regions {
            if member.field.is_empty() {
                return Err(SlatecastError::validation(format!(
                    "region {} in day group {} has an empty field",
                    member.id, group.day
                )));
            }
            check_region_shape(member.id, &member.vertices, &mut seen_ids)?;
            let origin = Point::new(
                f64::from(group.base_x) + f64::from(member.offset_x),
                f64::from(group.base_y) + f64::from(member.offset_y),
            );
            regions.push(Region {
                id: member.id,
                key: BindingKey::build_day(group.day, &member.field),
                vertices: points_from_wire(&member.vertices),
                origin,
                style: override_style(template, member.id),
            });
        }
    }

    for s in &template.singular {
        if s.key.is_empty() {
            return Err(SlatecastError::validation(format!(
                "singular region {} has an empty binding key",
                s.id
            )));
        }
        check_region_shape(s.id, &s.vertices, &mut seen_ids)?;
        regions.push(Region {
            id: s.id,
            key: s.key.clone(),
            vertices: points_from_wire(&s.vertices),
            origin: Point::new(f64::from(s.x), f64::from(s.y)),
            style: override_style(template, s.id),
        });
    }

    for id in template.style_overrides.keys() {
        if !seen_ids.contains(id) {
            return Err(SlatecastError::validation(format!(
                "style override references unknown region id {id}"
            )));
        }
    }

    Ok(DecodedTemplate {
        regions,
        canvas: template.canvas,
        background: template.background.clone(),
    })
}

/// Re-encode any accepted document as the current version.
pub fn migrate_document(doc: &serde_json::Value) -> SlatecastResult<Template> {
    let decoded = decode_document(doc)?;
    encode_template(&decoded.regions, decoded.canvas, &decoded.background)
}

/// A [`Template`] as a JSON tree, ready for the persistence layer.
pub fn template_to_value(template: &Template) -> SlatecastResult<serde_json::Value> {
    serde_json::to_value(template).map_err(|e| SlatecastError::serde(e.to_string()))
}

/// Parse raw text into a JSON document, without interpreting it yet.
pub fn parse_document(text: &str) -> SlatecastResult<serde_json::Value> {
    serde_json::from_str(text)
        .map_err(|e| SlatecastError::validation(format!("template document is not valid JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Legacy ("1.0")
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LegacyTemplate {
    #[allow(dead_code)]
    version: String,
    canvas: Canvas,
    background_url: String,
    #[serde(default)]
    regions: Vec<LegacyRegion>,
}

#[derive(Deserialize)]
struct LegacyRegion {
    #[serde(default)]
    id: Option<RegionId>,
    key: String,
    /// Absolute float vertices.
    points: Vec<[f64; 2]>,
    #[serde(default)]
    style: RegionStyle,
}

fn decode_legacy(doc: &serde_json::Value) -> SlatecastResult<DecodedTemplate> {
    let legacy: LegacyTemplate = serde_json::from_value(doc.clone())
        .map_err(|e| SlatecastError::validation(format!("malformed legacy template: {e}")))?;
    legacy.canvas.validate()?;

    let mut regions = Vec::with_capacity(legacy.regions.len());
    let mut seen_ids = BTreeSet::new();
    for (index, r) in legacy.regions.iter().enumerate() {
        if r.key.is_empty() {
            return Err(SlatecastError::validation(format!(
                "legacy region #{index} has an empty binding key"
            )));
        }
        if r.points.len() < 3 {
            return Err(SlatecastError::validation(format!(
                "legacy region #{index} (\"{}\") needs at least 3 vertices, got {}",
                r.key,
                r.points.len()
            )));
        }
        let points: Vec<Point> = r.points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(SlatecastError::validation(format!(
                    "legacy region #{index} (\"{}\") has a non-finite vertex",
                    r.key
                )));
            }
        }
        r.style.validate()?;

        let (vertices, origin) = polygon::to_local(&points);
        let id = r.id.unwrap_or_else(|| legacy_region_id(&r.key, origin, index));
        if !seen_ids.insert(id) {
            return Err(SlatecastError::validation(format!(
                "duplicate region id {id}"
            )));
        }
        regions.push(Region {
            id,
            key: r.key.clone(),
            vertices,
            origin,
            style: r.style.normalized(),
        });
    }

    Ok(DecodedTemplate {
        regions,
        canvas: legacy.canvas,
        background: BackgroundRef::Url {
            url: legacy.background_url,
        },
    })
}

// Stable fallback id so repeated decodes of the same id-less legacy document
// agree on region identity.
fn legacy_region_id(key: &str, origin: Point, index: usize) -> RegionId {
    fn half(key: &str, origin: Point, index: usize, salt: u64) -> u64 {
        let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS ^ salt);
        h.write_bytes(key.as_bytes());
        h.write_u64(origin.x.round() as i64 as u64);
        h.write_u64(origin.y.round() as i64 as u64);
        h.write_u64(index as u64);
        h.finish()
    }

    let hi = half(key, origin, index, 0);
    let lo = half(key, origin, index, 0x9e37_79b9_7f4a_7c15);
    RegionId::from_u128((u128::from(hi) << 64) | u128::from(lo))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn override_style(template: &Template, id: RegionId) -> RegionStyle {
    template
        .style_overrides
        .get(&id)
        .cloned()
        .unwrap_or_default()
}

fn check_region_shape(
    id: RegionId,
    vertices: &[[i32; 2]],
    seen: &mut BTreeSet<RegionId>,
) -> SlatecastResult<()> {
    if vertices.len() < 3 {
        return Err(SlatecastError::validation(format!(
            "region {id} needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }
    if !seen.insert(id) {
        return Err(SlatecastError::validation(format!(
            "duplicate region id {id}"
        )));
    }
    Ok(())
}

fn points_from_wire(vertices: &[[i32; 2]]) -> Vec<Point> {
    vertices
        .iter()
        .map(|[x, y]| Point::new(f64::from(*x), f64::from(*y)))
        .collect()
}

fn round_vertices(region: &Region) -> SlatecastResult<Vec<[i32; 2]>> {
    region
        .vertices
        .iter()
        .map(|p| {
            Ok([
                narrow(round_coord(p.x, "region vertex x")?, "region vertex x")?,
                narrow(round_coord(p.y, "region vertex y")?, "region vertex y")?,
            ])
        })
        .collect()
}

fn round_coord(v: f64, what: &str) -> SlatecastResult<i64> {
    if !v.is_finite() {
        return Err(SlatecastError::validation(format!(
            "{what} must be finite, got {v}"
        )));
    }
    Ok(v.round() as i64)
}

fn narrow(v: i64, what: &str) -> SlatecastResult<i32> {
    i32::try_from(v).map_err(|_| {
        SlatecastError::validation(format!("{what} {v} is out of the storable range"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/template/codec.rs"]
mod tests;
