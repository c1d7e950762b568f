use crate::{
    animation::{
        ease::Ease,
        style::{Prop, Style},
    },
    foundation::{
        core::NodeId,
        error::{PixoraError, PixoraResult},
    },
};

/// Extra iterations after the first one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Repeat `n` more times.
    Times(u32),
    /// Repeat until cancelled.
    Infinite,
}

/// How a new playback treats earlier playbacks animating the same properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overwrite {
    /// Earlier playbacks keep writing.
    #[default]
    None,
    /// Earlier playbacks stop writing the properties this tween animates.
    Auto,
}

/// Interpolation of a property set over one or more elements.
///
/// Every target is one animation unit; unit `i` starts `delay + i * stagger` seconds after
/// the tween itself starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Units in play order.
    pub targets: Vec<NodeId>,
    /// Start values; `None` captures the current values when each unit starts.
    pub from: Option<Style>,
    /// End values.
    pub to: Style,
    /// Seconds per iteration.
    pub duration: f64,
    /// Seconds before the first unit starts.
    pub delay: f64,
    /// Seconds between consecutive units.
    pub stagger: f64,
    /// Curve; `None` takes the enclosing timeline default.
    pub ease: Option<Ease>,
    /// Extra iterations.
    pub repeat: Option<Repeat>,
    /// Pause between iterations.
    pub repeat_delay: f64,
    /// Alternate direction on every other iteration.
    pub yoyo: bool,
    /// Conflict policy with earlier playbacks.
    pub overwrite: Overwrite,
}

/// Default tween duration in seconds.
pub const DEFAULT_DURATION: f64 = 0.5;

impl Tween {
    fn base(targets: Vec<NodeId>, from: Option<Style>, to: Style) -> Self {
        Self {
            targets,
            from,
            to,
            duration: DEFAULT_DURATION,
            delay: 0.0,
            stagger: 0.0,
            ease: None,
            repeat: None,
            repeat_delay: 0.0,
            yoyo: false,
            overwrite: Overwrite::None,
        }
    }

    /// Explicit start and end values.
    pub fn from_to(targets: impl Into<Vec<NodeId>>, from: Style, to: Style) -> Self {
        Self::base(targets.into(), Some(from), to)
    }

    /// From the current values to `to`.
    pub fn to(targets: impl Into<Vec<NodeId>>, to: Style) -> Self {
        Self::base(targets.into(), None, to)
    }

    /// Instant write of `style`.
    pub fn set(targets: impl Into<Vec<NodeId>>, style: Style) -> Self {
        Self::base(targets.into(), None, style).duration(0.0)
    }

    /// Builder: seconds per iteration.
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    /// Builder: initial delay.
    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    /// Builder: per-unit delay increment.
    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    /// Builder: easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Builder: extra iterations.
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Builder: pause between iterations.
    pub fn repeat_delay(mut self, secs: f64) -> Self {
        self.repeat_delay = secs;
        self
    }

    /// Builder: alternate direction.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Builder: conflict policy.
    pub fn overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Reject negative or non-finite timings.
    pub fn validate(&self) -> PixoraResult<()> {
        for (name, v) in [
            ("duration", self.duration),
            ("delay", self.delay),
            ("stagger", self.stagger),
            ("repeat_delay", self.repeat_delay),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PixoraError::animation(format!(
                    "tween {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if self.to.is_empty() {
            return Err(PixoraError::animation("tween has no target properties"));
        }
        Ok(())
    }

    /// Properties written by this tween.
    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.to.props()
    }

    fn iterations(&self) -> Option<u64> {
        match self.repeat {
            None => Some(1),
            Some(Repeat::Times(n)) => Some(u64::from(n) + 1),
            Some(Repeat::Infinite) => None,
        }
    }

    /// Seconds one unit takes from its start to its final value; infinite for endless loops.
    pub fn unit_duration(&self) -> f64 {
        match self.iterations() {
            Some(n) => {
                let n = n as f64;
                n * self.duration + (n - 1.0) * self.repeat_delay
            }
            None => f64::INFINITY,
        }
    }

    /// Start offset of unit `index` relative to the tween start.
    pub fn unit_offset(&self, index: usize) -> f64 {
        self.delay + index as f64 * self.stagger
    }

    /// Seconds from tween start until the last unit finishes.
    pub fn total_duration(&self) -> f64 {
        let last = self.targets.len().saturating_sub(1);
        self.unit_offset(last) + self.unit_duration()
    }

    /// Eased progress of a unit `t` seconds after it started, given the fallback ease.
    pub fn progress(&self, t: f64, default_ease: Ease) -> f64 {
        let ease = self.ease.unwrap_or(default_ease);
        if self.duration <= 0.0 {
            return ease.apply(1.0);
        }
        let t = t.max(0.0);
        let cycle = self.duration + self.repeat_delay;
        let mut k = (t / cycle).floor();
        if let Some(n) = self.iterations() {
            k = k.min(n as f64 - 1.0);
        }
        let within = (t - k * cycle).min(self.duration);
        let mut p = (within / self.duration).clamp(0.0, 1.0);
        if self.yoyo && (k as u64) % 2 == 1 {
            p = 1.0 - p;
        }
        ease.apply(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
