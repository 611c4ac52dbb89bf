use std::{fmt, str::FromStr};

use crate::foundation::error::{StackError, StackResult};

pub use kurbo::{Affine, Vec2};

/// A trigger-window bound: either absolute pixels or a percentage of the scroll container height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage (0..100) of the container height.
    Percent(f64),
}

impl Length {
    /// Resolve to pixels against the current container (or viewport) height.
    pub fn resolve(self, container_height: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => (pct / 100.0) * container_height,
        }
    }

    /// The raw numeric value, regardless of unit.
    pub fn value(self) -> f64 {
        match self {
            Self::Px(v) | Self::Percent(v) => v,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl FromStr for Length {
    type Err = StackError;

    /// `"15%"` is a percentage; anything else is read as a leading pixel number (`"40"`, `"40px"`).
    fn from_str(s: &str) -> StackResult<Self> {
        let value = parse_leading_f64(s)
            .ok_or_else(|| StackError::validation(format!("cannot parse length '{s}'")))?;
        if s.contains('%') {
            Ok(Self::Percent(value))
        } else {
            Ok(Self::Px(value))
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = StackError;

    fn try_from(repr: LengthRepr) -> StackResult<Self> {
        match repr {
            LengthRepr::Number(v) => Ok(Self::Px(v)),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(len: Length) -> Self {
        match len {
            Length::Px(v) => Self::Number(v),
            Length::Percent(v) => Self::Text(format!("{v}%")),
        }
    }
}

/// Longest numeric prefix of `s` (after leading whitespace), e.g. `"12.5px"` -> `12.5`.
fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    (1..=end)
        .rev()
        .filter(|&i| s.is_char_boundary(i))
        .find_map(|i| s[..i].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// One scroll observation, taken once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    /// Effective scroll offset in pixels.
    pub scroll_top: f64,
    /// Height of the viewport (window mode) or the scroll container (container mode).
    pub container_height: f64,
}

impl ScrollSample {
    pub fn new(scroll_top: f64, container_height: f64) -> Self {
        Self {
            scroll_top,
            container_height,
        }
    }
}

/// Round half-up to `digits` decimal places.
pub fn round_to(v: f64, digits: i32) -> f64 {
    let f = 10f64.powi(digits);
    let r = (v * f + 0.5).floor() / f;
    // Normalise -0.0 so serialized output stays stable.
    if r == 0.0 { 0.0 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
