//! The interactive authoring surface: point capture, region finalization,
//! selection, movement and deletion.
//!
//! A [`Surface`] is a plain value owned by the calling session; there is no
//! ambient global canvas. All interaction is synchronous and local.

use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::geometry::polygon;
use crate::template::codec::{self, DecodedTemplate, Template};
use crate::template::model::{BackgroundRef, Region, RegionId, RegionStyle};

/// Interaction mode of a [`Surface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceMode {
    /// Regions are selectable, movable and deletable.
    Idle {
        /// At most one selected region.
        selected: Option<RegionId>,
    },
    /// Clicks append vertices of a new region; existing regions are inert.
    Drawing {
        /// Binding key the new region will carry.
        key: String,
        /// Points captured so far, in click order.
        pending: Vec<Point>,
    },
}

/// One authoring session's canvas state.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Canvas,
    background: Option<BackgroundRef>,
    regions: Vec<Region>,
    mode: SurfaceMode,
}

impl Surface {
    /// Blank surface in Idle mode, no background, no regions.
    pub fn new(canvas: Canvas) -> SlatecastResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            background: None,
            regions: Vec::new(),
            mode: SurfaceMode::Idle { selected: None },
        })
    }

    /// Rebuild a surface from a decoded template document.
    pub fn from_decoded(doc: DecodedTemplate) -> Self {
        Self {
            canvas: doc.canvas,
            background: Some(doc.background),
            regions: doc.regions,
            mode: SurfaceMode::Idle { selected: None },
        }
    }

    /// Canvas the surface is authored against.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Current background reference, if one is set.
    pub fn background(&self) -> Option<&BackgroundRef> {
        self.background.as_ref()
    }

    /// Replace or clear the background reference.
    pub fn set_background(&mut self, background: Option<BackgroundRef>) {
        self.background = background;
    }

    /// Live region set, in paint order (oldest first).
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a live region by id.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Current interaction mode.
    pub fn mode(&self) -> &SurfaceMode {
        &self.mode
    }

    /// True while a drawing is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, SurfaceMode::Drawing { .. })
    }

    /// The selected region's id, if any. Always `None` while drawing.
    pub fn selected(&self) -> Option<RegionId> {
        match self.mode {
            SurfaceMode::Idle { selected } => selected,
            SurfaceMode::Drawing { .. } => None,
        }
    }

    /// In-progress points of the current drawing, newest last.
    pub fn pending_points(&self) -> &[Point] {
        match &self.mode {
            SurfaceMode::Drawing { pending, .. } => pending,
            SurfaceMode::Idle { .. } => &[],
        }
    }

    /// Enter Drawing mode; the next finished region binds to `key`.
    pub fn begin_drawing(&mut self, key: impl Into<String>) -> SlatecastResult<()> {
        if self.is_drawing() {
            return Err(SlatecastError::validation(
                "a drawing is already in progress",
            ));
        }
        let key = key.into();
        if key.is_empty() {
            return Err(SlatecastError::validation(
                "cannot start drawing with an empty binding key",
            ));
        }
        self.mode = SurfaceMode::Drawing {
            key,
            pending: Vec::new(),
        };
        Ok(())
    }

    /// Append a vertex to the in-progress region.
    pub fn add_point(&mut self, p: Point) -> SlatecastResult<()> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(SlatecastError::validation("point must be finite"));
        }
        match &mut self.mode {
            SurfaceMode::Drawing { pending, .. } => {
                pending.push(p);
                Ok(())
            }
            SurfaceMode::Idle { .. } => Err(SlatecastError::validation(
                "no drawing in progress to add a point to",
            )),
        }
    }

    /// Materialize the in-progress points as a new region and return to Idle.
    ///
    /// Fewer than 3 points is rejected at this boundary; the captured points
    /// survive the error so the user can keep clicking.
    pub fn finish_region(&mut self) -> SlatecastResult<RegionId> {
        let SurfaceMode::Drawing { key, pending } = &self.mode else {
            return Err(SlatecastError::validation("no drawing in progress to finish"));
        };
        if pending.len() < 3 {
            return Err(SlatecastError::validation(format!(
                "a region needs at least 3 points, got {}",
                pending.len()
            )));
        }

        let (vertices, origin) = polygon::to_local(pending);
        let region = Region {
            id: RegionId::new(),
            key: key.clone(),
            vertices,
            origin,
            style: RegionStyle::default(),
        };
        let id = region.id;
        self.regions.push(region);
        self.mode = SurfaceMode::Idle { selected: None };
        Ok(id)
    }

    /// Discard the in-progress points without creating a region.
    pub fn cancel_drawing(&mut self) -> SlatecastResult<()> {
        if !self.is_drawing() {
            return Err(SlatecastError::validation("no drawing in progress to cancel"));
        }
        self.mode = SurfaceMode::Idle { selected: None };
        Ok(())
    }

    /// Click selection. The topmost (most recently added) region containing
    /// the point wins; clicking empty canvas clears the selection. Disabled
    /// while drawing.
    pub fn select_at(&mut self, p: Point) -> Option<RegionId> {
        if self.is_drawing() {
            return None;
        }
        let hit = self.regions.iter().rev().find(|r| r.hit(p)).map(|r| r.id);
        self.mode = SurfaceMode::Idle { selected: hit };
        hit
    }

    /// Shift the selected region on the canvas.
    pub fn move_selected(&mut self, delta: Vec2) -> SlatecastResult<()> {
        let Some(id) = self.selected() else {
            return Err(SlatecastError::validation("no region selected to move"));
        };
        // Selection always references a live region.
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == id) {
            region.translate(delta);
        }
        Ok(())
    }

    /// Remove the selected region from the live set and return it.
    pub fn delete_selected(&mut self) -> SlatecastResult<Region> {
        match self.mode {
            SurfaceMode::Drawing { .. } => Err(SlatecastError::validation(
                "delete is not available while drawing",
            )),
            SurfaceMode::Idle { selected: None } => {
                Err(SlatecastError::validation("no region selected to delete"))
            }
            SurfaceMode::Idle { selected: Some(id) } => {
                let index = self
                    .regions
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or_else(|| SlatecastError::not_found(format!("no region with id {id}")))?;
                self.mode = SurfaceMode::Idle { selected: None };
                Ok(self.regions.remove(index))
            }
        }
    }

    /// Rebind an existing region to a different key.
    pub fn set_region_key(&mut self, id: RegionId, key: impl Into<String>) -> SlatecastResult<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(SlatecastError::validation(
                "cannot rebind a region to an empty key",
            ));
        }
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SlatecastError::not_found(format!("no region with id {id}")))?;
        region.key = key;
        Ok(())
    }

    /// Serialize the surface for persistence. Requires a background
    /// reference, since a stored template always describes one.
    pub fn to_template(&self) -> SlatecastResult<Template> {
        let background = self.background.clone().ok_or_else(|| {
            SlatecastError::validation("cannot persist a template without a background reference")
        })?;
        codec::encode_template(&self.regions, self.canvas, &background)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/session.rs"]
mod tests;
