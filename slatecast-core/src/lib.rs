//! Slatecast is a schedule-template layout and compositing engine.
//!
//! A template is a set of polygonal regions drawn over a background image,
//! each bound to a data key such as `day3_stream_time`. Slatecast turns a
//! stored template plus a week of stream records into pixels (`FrameRGBA`):
//!
//! 1. **Decode**: stored JSON document -> [`DecodedTemplate`] (versioned codec)
//! 2. **Bind**: stream records -> [`ScheduleDataMap`] (one value per day key)
//! 3. **Fit**: each bound value -> [`FittedBlock`] (shrink, wrap, anchor)
//! 4. **Render**: background + region fills + fitted text -> [`FrameRGBA`]
//!
//! The drawing surface ([`Surface`]) sits in front of step 1 and produces the
//! documents the codec stores.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: encoding, binding and fitting are pure and
//!   stable for a given input.
//! - **No IO in the engine**: backgrounds, fonts and schedule data are
//!   front-loaded by the caller through [`TemplateStore`] and
//!   [`ScheduleSource`].
//! - **Premultiplied RGBA8** on the way out: the raster surface emits
//!   premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod binding;
mod foundation;
mod geometry;
mod layout;
mod render;
mod schedule;
mod surface;
mod template;

pub use binding::key::BindingKey;
pub use binding::week::{date_for_offset, day_offset_of, week_range, weekday_name};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{SlatecastError, SlatecastResult};
pub use geometry::polygon::{bounding_box, contains_point, to_local, translate};
pub use layout::fit::{
    FitPrefs, FittedBlock, Justify, MIN_FONT_SIZE, TimeFormat, fit, fit_field, format_field_value,
};
pub use layout::measure::{CharAdvanceMeasure, TextMeasure};
pub use render::raster::{
    FrameRGBA, PreparedBackground, RenderOpts, decode_background, render_canvas,
};
pub use render::text::{TextBrushRgba8, TextShaper};
pub use schedule::binder::{
    ApplyOutcome, FetchTicket, FittedRegion, ScheduleBinder, build_overlay, build_week_map,
};
pub use schedule::map::{
    FIELD_DURATION, FIELD_GAME, FIELD_NOTES, FIELD_STREAM_NAME, FIELD_STREAM_TIME,
    NO_STREAM_PLACEHOLDER, ScheduleDataMap,
};
pub use schedule::prefs::PrefsStore;
pub use schedule::record::{OwnerId, ScheduleSource, StreamRecord};
pub use surface::session::{Surface, SurfaceMode};
pub use template::codec::{
    DayGroup, DecodedTemplate, GroupRegion, LEGACY_VERSION, SingularRegion, TEMPLATE_VERSION,
    Template, decode_document, decode_template, encode_template, migrate_document, parse_document,
    template_to_value,
};
pub use template::model::{BackgroundRef, Region, RegionId, RegionStyle, ResolvedStyle};
pub use template::store::{MemoryTemplateStore, TemplateStore, require_template};
