use crate::foundation::core::Size;

/// Measures a single line of text at a font size, in canvas units.
///
/// The fitting algorithm only ever asks for single-line extents; multi-line
/// blocks are sums over lines. `&mut self` because shaping backends keep
/// mutable font/layout contexts.
pub trait TextMeasure {
    /// Width = advance of the line, height = line height (ascent + descent +
    /// leading for shaped backends). Empty text measures zero.
    fn measure(&mut self, text: &str, font_size: f64) -> Size;
}

/// Deterministic measurement from a per-character-class advance table.
///
/// Used by tests and by headless callers that have no font loaded. Advances
/// are rough proportional-font ratios; the point is stability, not metric
/// accuracy.
#[derive(Clone, Copy, Debug)]
pub struct CharAdvanceMeasure {
    /// Line height as a multiple of the font size.
    pub line_height_factor: f64,
}

impl Default for CharAdvanceMeasure {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
        }
    }
}

fn advance_units(c: char) -> f64 {
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | '\'' | ':' | ';' | '!' | '|' => 0.30,
        'm' | 'w' | 'M' | 'W' | '@' => 0.85,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.70,
        _ => 0.55,
    }
}

impl TextMeasure for CharAdvanceMeasure {
    fn measure(&mut self, text: &str, font_size: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let advance: f64 = text.chars().map(advance_units).sum();
        Size::new(advance * font_size, self.line_height_factor * font_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/measure.rs"]
mod tests;
