use std::collections::BTreeMap;

use crate::foundation::core::Vec2;

/// Animatable element property.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    /// Vertical translation as a percentage of the element height.
    YPercent,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Uniform scale.
    Scale,
    /// Horizontal scale.
    ScaleX,
    /// 2D rotation in degrees.
    Rotate,
    /// 3D rotation about the X axis in degrees.
    RotateX,
    /// 3D rotation about the Y axis in degrees.
    RotateY,
    /// Perspective distance used by 3D rotations, in px.
    Perspective,
    /// SVG stroke dash offset.
    DashOffset,
    /// Gaussian blur radius in px.
    Blur,
    /// Grayscale amount in percent.
    Grayscale,
    /// Shape morph progress between two icon paths.
    Morph,
    /// Counter value rendered into the element text.
    Value,
    /// Background-position X in px.
    BackgroundX,
    /// Background-position Y in px.
    BackgroundY,
    /// Progress along a bound motion path in `[0, 1]`.
    PathProgress,
}

impl Prop {
    /// Value an element has for this property when nothing was written yet.
    pub fn neutral(self) -> f64 {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX => 1.0,
            _ => 0.0,
        }
    }
}

/// Snapshot of property values.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<Prop, f64>);

impl Style {
    /// Empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Style::set`].
    pub fn with(mut self, prop: Prop, value: f64) -> Self {
        self.set(prop, value);
        self
    }

    /// Set one property.
    pub fn set(&mut self, prop: Prop, value: f64) {
        self.0.insert(prop, value);
    }

    /// Remove one property.
    pub fn remove(&mut self, prop: Prop) -> Option<f64> {
        self.0.remove(&prop)
    }

    /// Explicit value, if any.
    pub fn get(&self, prop: Prop) -> Option<f64> {
        self.0.get(&prop).copied()
    }

    /// Explicit value or the property's neutral value.
    pub fn value(&self, prop: Prop) -> f64 {
        self.get(prop).unwrap_or_else(|| prop.neutral())
    }

    /// Overlay `other` on top of this style.
    pub fn merge(&mut self, other: &Style) {
        for (prop, value) in other.iter() {
            self.set(prop, value);
        }
    }

    /// Properties in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Prop, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }

    /// Properties named by this style.
    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.0.keys().copied()
    }

    /// Number of explicit properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Prop, f64)> for Style {
    fn from_iter<I: IntoIterator<Item = (Prop, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Interpolation contract for animation value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t`.
    ///
    /// `t` may leave `[0, 1]` for overshooting eases.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Style {
    /// Interpolates every property named by `b`; properties missing from `a` start from
    /// their neutral value.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        b.iter()
            .map(|(prop, to)| (prop, f64::lerp(&a.value(prop), &to, t)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/style.rs"]
mod tests;
