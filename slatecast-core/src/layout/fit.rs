//! Text fitting: shrink, wrap and anchor a string inside a target rectangle.
//!
//! The fit never fails. Text that cannot fit even at the floor size is
//! returned as-is and clips at render time; that is an accepted visual
//! failure mode, not an error.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rect, Size};
use crate::layout::measure::TextMeasure;

/// Smallest font size the fit will shrink to.
pub const MIN_FONT_SIZE: u32 = 8;

// 10% total padding budget: the usable box is 90% of the bounds.
const FIT_BUDGET: f64 = 0.9;
// Left/right anchors sit 5% in from the bounds edge.
const ANCHOR_MARGIN: f64 = 0.05;

/// Horizontal justification of a fitted block.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    /// Anchor 5% in from the left edge.
    Left,
    /// Anchor at the horizontal center.
    #[default]
    Center,
    /// Anchor 5% in from the right edge.
    Right,
}

/// Clock display for time-valued fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `H:MM AM/PM`.
    TwelveHour,
    /// `HH:MM`, the stored form.
    TwentyFourHour,
}

/// Formatting preferences applied when fitting one binding's value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitPrefs {
    /// Requested font size; the fit may shrink below it, never above.
    pub font_size: u32,
    /// Horizontal justification inside the region bounds.
    #[serde(default)]
    pub justify: Justify,
    /// Clock rewriting for time fields; `None` leaves values untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
}

impl Default for FitPrefs {
    fn default() -> Self {
        Self {
            font_size: 24,
            justify: Justify::Center,
            time_format: None,
        }
    }
}

/// A positioned, sized, possibly multi-line text block.
///
/// `font_size` is the size actually used, so feeding a block's text back
/// through [`fit`] with that size is idempotent.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedBlock {
    /// Wrapped lines, top to bottom. Empty for empty input.
    pub lines: Vec<String>,
    /// Final font size after shrinking.
    pub font_size: u32,
    /// Anchor point derived from the justification (5%/50%/95% across the
    /// bounds, vertically centered).
    pub anchor: Point,
    /// Justification the anchor was computed for.
    pub justify: Justify,
    /// Measured extent of the block at `font_size`.
    pub size: Size,
}

impl FittedBlock {
    /// True when the block renders no glyphs.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.is_empty())
    }
}

/// Fit `text` into `bounds` per `prefs`, measuring with `measure`.
///
/// 1. Usable box is 90% of `bounds`.
/// 2. Shrink from `prefs.font_size` until the unwrapped line fits the width
///    budget or the floor is reached.
/// 3. Multi-word text greedily word-wraps at that size.
/// 4. While the wrapped block is still too tall and the size is above the
///    floor, shrink one step and re-wrap at the new size.
/// 5. Anchor from the justification; vertical center.
pub fn fit(text: &str, bounds: Rect, prefs: &FitPrefs, measure: &mut dyn TextMeasure) -> FittedBlock {
    let max_width = bounds.width() * FIT_BUDGET;
    let max_height = bounds.height() * FIT_BUDGET;
    let anchor = anchor_point(bounds, prefs.justify);
    let requested = prefs.font_size.max(1);

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return FittedBlock {
            lines: Vec::new(),
            font_size: requested,
            anchor,
            justify: prefs.justify,
            size: Size::ZERO,
        };
    }

    let mut font_size = requested;
    loop {
        let line = measure.measure(trimmed, f64::from(font_size));
        if line.width <= max_width || font_size <= MIN_FONT_SIZE {
            break;
        }
        font_size -= 1;
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let mut lines = wrap_words(&words, f64::from(font_size), max_width, measure);
    while font_size > MIN_FONT_SIZE
        && block_size(&lines, f64::from(font_size), measure).height > max_height
    {
        font_size -= 1;
        lines = wrap_words(&words, f64::from(font_size), max_width, measure);
    }

    let size = block_size(&lines, f64::from(font_size), measure);
    FittedBlock {
        lines,
        font_size,
        anchor,
        justify: prefs.justify,
        size,
    }
}

/// Field-aware value rewriting applied before layout.
///
/// `HH:MM` values of time fields become `H:MM AM/PM` under the 12-hour
/// preference; anything unparseable passes through unchanged.
pub fn format_field_value(field: &str, value: &str, prefs: &FitPrefs) -> String {
    if field.contains("time") && prefs.time_format == Some(TimeFormat::TwelveHour) {
        if let Ok(t) = NaiveTime::parse_from_str(value.trim(), "%H:%M") {
            return t.format("%-I:%M %p").to_string();
        }
    }
    value.to_string()
}

/// Reformat a field value per prefs, then fit it.
pub fn fit_field(
    field: &str,
    value: &str,
    bounds: Rect,
    prefs: &FitPrefs,
    measure: &mut dyn TextMeasure,
) -> FittedBlock {
    let display = format_field_value(field, value, prefs);
    fit(&display, bounds, prefs, measure)
}

fn anchor_point(bounds: Rect, justify: Justify) -> Point {
    let x = match justify {
        Justify::Left => bounds.x0 + ANCHOR_MARGIN * bounds.width(),
        Justify::Center => bounds.x0 + 0.5 * bounds.width(),
        Justify::Right => bounds.x0 + (1.0 - ANCHOR_MARGIN) * bounds.width(),
    };
    Point::new(x, bounds.y0 + 0.5 * bounds.height())
}

// Single words never wrap; a word wider than the box overflows on its own line.
fn wrap_words(
    words: &[&str],
    font_size: f64,
    max_width: f64,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    if words.len() <= 1 {
        return words.iter().map(|w| (*w).to_string()).collect();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, font_size).width <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn block_size(lines: &[String], font_size: f64, measure: &mut dyn TextMeasure) -> Size {
    lines.iter().fold(Size::ZERO, |acc, line| {
        let m = measure.measure(line, font_size);
        Size::new(acc.width.max(m.width), acc.height + m.height)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
