use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Rect,
    error::{PixoraError, PixoraResult},
};

/// Reference line on an element or on the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Top edge.
    Top,
    /// Vertical centre.
    Center,
    /// Bottom edge.
    Bottom,
    /// Percentage of the height from the top.
    Percent(f64),
    /// Pixels from the top.
    Px(f64),
}

impl Edge {
    /// Distance of this line from the top of a box `extent` pixels tall.
    pub fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => extent * p / 100.0,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = PixoraError;

    fn from_str(s: &str) -> PixoraResult<Self> {
        let number = |n: &str| -> PixoraResult<f64> {
            n.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PixoraError::parse(format!("bad threshold edge '{s}'")))
        };
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => {
                if let Some(n) = s.strip_suffix('%') {
                    Ok(Self::Percent(number(n)?))
                } else if let Some(n) = s.strip_suffix("px") {
                    Ok(Self::Px(number(n)?))
                } else {
                    Err(PixoraError::parse(format!("bad threshold edge '{s}'")))
                }
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Scroll threshold: met when the `element` line reaches the `viewport` line.
///
/// Written as two words, element edge first: `"top 75%"`, `"bottom top"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
    /// Line on the trigger element.
    pub element: Edge,
    /// Line on the viewport.
    pub viewport: Edge,
}

impl Threshold {
    /// Threshold from its two lines.
    pub fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Document scroll offset at which the threshold is met for an element laid out at `rect`.
    pub fn scroll_position(&self, rect: &Rect, viewport_height: f64) -> f64 {
        rect.y0 + self.element.offset(rect.height()) - self.viewport.offset(viewport_height)
    }
}

impl FromStr for Threshold {
    type Err = PixoraError;

    fn from_str(s: &str) -> PixoraResult<Self> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(element), Some(viewport), None) => Ok(Self {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(PixoraError::parse(format!(
                "threshold '{s}' must be '<element edge> <viewport edge>'"
            ))),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for Threshold {
    type Error = PixoraError;

    fn try_from(value: String) -> PixoraResult<Self> {
        value.parse()
    }
}

impl From<Threshold> for String {
    fn from(t: Threshold) -> Self {
        t.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/threshold.rs"]
mod tests;
