use std::{f64::consts::PI, fmt, str::FromStr};

use crate::foundation::error::{PixoraError, PixoraResult};

/// Easing functions used to map normalized animation progress.
///
/// Textual names follow the `family.direction` convention used throughout the page
/// (`"power3.out"`, `"back.out(1.7)"`, `"none"`); `powerN` maps onto the polynomial of
/// degree `N + 1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation (`none`).
    Linear,
    /// Quadratic ease-in (`power1.in`).
    InQuad,
    /// Quadratic ease-out (`power1.out`).
    OutQuad,
    /// Quadratic ease-in/out (`power1.inOut`).
    InOutQuad,
    /// Cubic ease-in (`power2.in`).
    InCubic,
    /// Cubic ease-out (`power2.out`).
    OutCubic,
    /// Cubic ease-in/out (`power2.inOut`).
    InOutCubic,
    /// Quartic ease-in (`power3.in`).
    InQuart,
    /// Quartic ease-out (`power3.out`).
    OutQuart,
    /// Quartic ease-in/out (`power3.inOut`).
    InOutQuart,
    /// Quintic ease-in (`power4.in`).
    InQuint,
    /// Quintic ease-out (`power4.out`).
    OutQuint,
    /// Quintic ease-in/out (`power4.inOut`).
    InOutQuint,
    /// Sine ease-in.
    InSine,
    /// Sine ease-out.
    OutSine,
    /// Sine ease-in/out.
    InOutSine,
    /// Anticipating ease-in with the given overshoot.
    InBack(f64),
    /// Overshooting ease-out with the given overshoot.
    OutBack(f64),
    /// Anticipating and overshooting ease-in/out.
    InOutBack(f64),
    /// Bouncing ease-in.
    InBounce,
    /// Bouncing ease-out.
    OutBounce,
    /// Bouncing ease-in/out.
    InOutBounce,
}

const DEFAULT_BACK: f64 = 1.70158;

impl Default for Ease {
    fn default() -> Self {
        Self::OutQuad
    }
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => power_in(t, 2),
            Self::OutQuad => power_out(t, 2),
            Self::InOutQuad => power_in_out(t, 2),
            Self::InCubic => power_in(t, 3),
            Self::OutCubic => power_out(t, 3),
            Self::InOutCubic => power_in_out(t, 3),
            Self::InQuart => power_in(t, 4),
            Self::OutQuart => power_out(t, 4),
            Self::InOutQuart => power_in_out(t, 4),
            Self::InQuint => power_in(t, 5),
            Self::OutQuint => power_out(t, 5),
            Self::InOutQuint => power_in_out(t, 5),
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InBack(s) => {
                let c3 = s + 1.0;
                c3 * t * t * t - s * t * t
            }
            Self::OutBack(s) => {
                let c3 = s + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + s * u * u
            }
            Self::InOutBack(s) => {
                let c2 = s * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            Self::InBounce => 1.0 - bounce_out(1.0 - t),
            Self::OutBounce => bounce_out(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }

    /// Every named curve without an overshoot parameter.
    pub fn named() -> &'static [Ease] {
        &[
            Ease::Linear,
            Ease::InQuad,
            Ease::OutQuad,
            Ease::InOutQuad,
            Ease::InCubic,
            Ease::OutCubic,
            Ease::InOutCubic,
            Ease::InQuart,
            Ease::OutQuart,
            Ease::InOutQuart,
            Ease::InQuint,
            Ease::OutQuint,
            Ease::InOutQuint,
            Ease::InSine,
            Ease::OutSine,
            Ease::InOutSine,
            Ease::InBounce,
            Ease::OutBounce,
            Ease::InOutBounce,
        ]
    }
}

fn power_in(t: f64, n: i32) -> f64 {
    t.powi(n)
}

fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

fn power_in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

impl FromStr for Ease {
    type Err = PixoraError;

    fn from_str(s: &str) -> PixoraResult<Self> {
        let s = s.trim();
        if matches!(s, "none" | "linear") {
            return Ok(Self::Linear);
        }

        // `back.out(1.7)` carries its overshoot in parentheses.
        let (name, param) = match s.find('(') {
            Some(open) => {
                let close = s
                    .rfind(')')
                    .filter(|&c| c > open)
                    .ok_or_else(|| PixoraError::parse(format!("unbalanced ease '{s}'")))?;
                let p = s[open + 1..close]
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| PixoraError::parse(format!("bad ease parameter in '{s}'")))?;
                (&s[..open], Some(p))
            }
            None => (s, None),
        };

        let (family, dir) = name.split_once('.').unwrap_or((name, "out"));
        let ease = match (family, dir) {
            ("power1" | "quad", "in") => Self::InQuad,
            ("power1" | "quad", "out") => Self::OutQuad,
            ("power1" | "quad", "inOut") => Self::InOutQuad,
            ("power2" | "cubic", "in") => Self::InCubic,
            ("power2" | "cubic", "out") => Self::OutCubic,
            ("power2" | "cubic", "inOut") => Self::InOutCubic,
            ("power3" | "quart", "in") => Self::InQuart,
            ("power3" | "quart", "out") => Self::OutQuart,
            ("power3" | "quart", "inOut") => Self::InOutQuart,
            ("power4" | "quint", "in") => Self::InQuint,
            ("power4" | "quint", "out") => Self::OutQuint,
            ("power4" | "quint", "inOut") => Self::InOutQuint,
            ("sine", "in") => Self::InSine,
            ("sine", "out") => Self::OutSine,
            ("sine", "inOut") => Self::InOutSine,
            ("back", "in") => Self::InBack(param.unwrap_or(DEFAULT_BACK)),
            ("back", "out") => Self::OutBack(param.unwrap_or(DEFAULT_BACK)),
            ("back", "inOut") => Self::InOutBack(param.unwrap_or(DEFAULT_BACK)),
            ("bounce", "in") => Self::InBounce,
            ("bounce", "out") => Self::OutBounce,
            ("bounce", "inOut") => Self::InOutBounce,
            _ => return Err(PixoraError::parse(format!("unknown ease '{s}'"))),
        };
        if param.is_some() && family != "back" {
            return Err(PixoraError::parse(format!("ease '{s}' takes no parameter")));
        }
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::InQuint => "power4.in",
            Self::OutQuint => "power4.out",
            Self::InOutQuint => "power4.inOut",
            Self::InSine => "sine.in",
            Self::OutSine => "sine.out",
            Self::InOutSine => "sine.inOut",
            Self::InBack(s) => return write!(f, "back.in({s})"),
            Self::OutBack(s) => return write!(f, "back.out({s})"),
            Self::InOutBack(s) => return write!(f, "back.inOut({s})"),
            Self::InBounce => "bounce.in",
            Self::OutBounce => "bounce.out",
            Self::InOutBounce => "bounce.inOut",
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for Ease {
    type Error = PixoraError;

    fn try_from(value: String) -> PixoraResult<Self> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
