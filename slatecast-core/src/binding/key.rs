//! The `day{N}_{field}` binding-key convention.
//!
//! A key like `day3_stream_time` binds a region to "the stream time of the
//! fourth visible day". Anything that does not match the convention exactly
//! is a singular key and binds verbatim; malformed day prefixes are not an
//! error.

/// A parsed binding key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingKey {
    /// Day-offset-coded key: `day{offset}_{field}` with offset 0-6.
    Day {
        /// Days after the visible week's start.
        offset: u8,
        /// Field portion, e.g. `stream_time`.
        field: String,
    },
    /// Any key outside the day convention, bound as-is.
    Singular(String),
}

impl BindingKey {
    /// Parse a raw key. Never fails; non-matching keys are singular.
    ///
    /// The match is strict: exactly one digit, offset 0-6, non-empty field.
    /// `day03_game` or `day7_game` are singular keys, which keeps them
    /// byte-identical through an encode/decode cycle.
    pub fn parse(raw: &str) -> Self {
        let singular = || Self::Singular(raw.to_string());

        let Some(rest) = raw.strip_prefix("day") else {
            return singular();
        };
        let Some((digit, field)) = rest.split_once('_') else {
            return singular();
        };
        if field.is_empty() {
            return singular();
        }
        let mut chars = digit.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ('0'..='6').contains(&c) => Self::Day {
                offset: c as u8 - b'0',
                field: field.to_string(),
            },
            _ => singular(),
        }
    }

    /// Inverse of [`BindingKey::parse`] for day-bound keys.
    pub fn build_day(offset: u8, field: &str) -> String {
        format!("day{offset}_{field}")
    }

    /// The raw key string this value round-trips to.
    pub fn to_key(&self) -> String {
        match self {
            Self::Day { offset, field } => Self::build_day(*offset, field),
            Self::Singular(key) => key.clone(),
        }
    }

    /// Field portion: the part after `day{N}_`, or the whole key for
    /// singular bindings. Formatting preferences are keyed by this.
    pub fn field(&self) -> &str {
        match self {
            Self::Day { field, .. } => field,
            Self::Singular(key) => key,
        }
    }

    /// Day offset for day-bound keys.
    pub fn day_offset(&self) -> Option<u8> {
        match self {
            Self::Day { offset, .. } => Some(*offset),
            Self::Singular(_) => None,
        }
    }

    /// Whether the field holds a clock time (drives 12-hour reformatting).
    pub fn is_time_field(&self) -> bool {
        self.field().contains("time")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/key.rs"]
mod tests;
