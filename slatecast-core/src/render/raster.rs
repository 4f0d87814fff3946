//! The raster export surface.
//!
//! Composites background, region fills and fitted text into a premultiplied
//! RGBA8 frame at a caller-specified pixel multiplier. Region outlines are
//! authoring chrome and are never drawn on export.

use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8};
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::geometry::polygon;
use crate::layout::fit::{FittedBlock, Justify};
use crate::render::text::{TextBrushRgba8, TextShaper};
use crate::schedule::binder::FittedRegion;
use crate::template::model::{Region, ResolvedStyle};

/// Decoded background image, premultiplied RGBA8.
#[derive(Clone)]
pub struct PreparedBackground {
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, shared so clones stay cheap.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedBackground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedBackground")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_background(bytes: &[u8]) -> SlatecastResult<PreparedBackground> {
    let dyn_img = image::load_from_memory(bytes).context("decode background image")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SlatecastError::render("background image has zero extent"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedBackground {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Export options.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Output pixels per canvas unit.
    pub pixel_scale: f64,
    /// Color of the fitted overlay text.
    pub text_color: Rgba8,
    /// Base color behind everything; transparent keeps the alpha channel
    /// clean for callers that composite the export themselves.
    pub clear_color: Rgba8,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            pixel_scale: 1.0,
            text_color: Rgba8::opaque(255, 255, 255),
            clear_color: Rgba8::transparent(),
        }
    }
}

/// Composite background + region fills + fitted text into a frame.
#[tracing::instrument(skip(background, regions, overlay, shaper, opts))]
pub fn render_canvas(
    canvas: Canvas,
    background: Option<&PreparedBackground>,
    regions: &[Region],
    overlay: &[FittedRegion],
    shaper: &mut TextShaper,
    opts: &RenderOpts,
) -> SlatecastResult<FrameRGBA> {
    canvas.validate()?;
    if !opts.pixel_scale.is_finite() || opts.pixel_scale <= 0.0 {
        return Err(SlatecastError::render(format!(
            "pixel_scale must be finite and > 0, got {}",
            opts.pixel_scale
        )));
    }

    let width = ((f64::from(canvas.width) * opts.pixel_scale).round() as u32).max(1);
    let height = ((f64::from(canvas.height) * opts.pixel_scale).round() as u32).max(1);
    let w16: u16 = width
        .try_into()
        .map_err(|_| SlatecastError::render("output width exceeds u16"))?;
    let h16: u16 = height
        .try_into()
        .map_err(|_| SlatecastError::render("output height exceeds u16"))?;

    let scale = Affine::scale(opts.pixel_scale);
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);

    if opts.clear_color != Rgba8::transparent() {
        let c = opts.clear_color;
        ctx.set_transform(affine_to_cpu(scale));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        ));
    }

    if let Some(bg) = background {
        let paint = rgba_premul_to_image(&bg.rgba8_premul, bg.width, bg.height)?;
        // Stretch the image over the whole canvas.
        let stretch = Affine::scale_non_uniform(
            f64::from(canvas.width) / f64::from(bg.width),
            f64::from(canvas.height) / f64::from(bg.height),
        );
        ctx.set_transform(affine_to_cpu(scale * stretch));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(bg.width),
            f64::from(bg.height),
        ));
    }

    for region in regions {
        if region.vertices.len() < 3 {
            continue;
        }
        let style = region.style.resolve();
        ctx.set_transform(affine_to_cpu(scale * region_transform(region, &style)));
        let fill = style.fill;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            fill.r, fill.g, fill.b, fill.a,
        ));
        let opacity = style.opacity.clamp(0.0, 1.0) as f32;
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_path(&bezpath_to_cpu(&polygon_path(&region.vertices)));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
    }

    for fitted in overlay {
        if fitted.block.is_empty() {
            continue;
        }
        draw_block(&mut ctx, shaper, &fitted.block, opts.text_color, scale)?;
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

// Lay the block's lines out around its anchor: the block is vertically
// centered on it, each line justified against it.
fn draw_block(
    ctx: &mut vello_cpu::RenderContext,
    shaper: &mut TextShaper,
    block: &FittedBlock,
    color: Rgba8,
    scale: Affine,
) -> SlatecastResult<()> {
    let brush = TextBrushRgba8::from(color);
    let mut y = block.anchor.y - block.size.height / 2.0;

    for line in &block.lines {
        let layout = shaper.layout(line, block.font_size as f32, brush, None)?;
        let line_size = TextShaper::layout_size(&layout);
        let x = match block.justify {
            Justify::Left => block.anchor.x,
            Justify::Center => block.anchor.x - line_size.width / 2.0,
            Justify::Right => block.anchor.x - line_size.width,
        };

        ctx.set_transform(affine_to_cpu(scale * Affine::translate((x, y))));
        for layout_line in layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(shaper.font_data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        y += line_size.height;
    }
    Ok(())
}

// T(origin) * T(anchor) * R * S * T(-anchor), anchored at the local bbox center.
fn region_transform(region: &Region, style: &ResolvedStyle) -> Affine {
    let anchor = polygon::bounding_box(&region.vertices).center().to_vec2();
    Affine::translate(region.origin.to_vec2())
        * Affine::translate(anchor)
        * Affine::rotate(style.rotation_deg.to_radians())
        * Affine::scale_non_uniform(style.scale_x, style.scale_y)
        * Affine::translate(-anchor)
}

fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = vertices.first() else {
        return path;
    };
    path.move_to(*first);
    for p in &vertices[1..] {
        path.line_to(*p);
    }
    path.close_path();
    path
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlatecastResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlatecastError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlatecastError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlatecastError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    let mut may_have_opacities = false;
    for px in bytes.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> SlatecastResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
