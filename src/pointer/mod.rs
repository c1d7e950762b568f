//! Pointer-driven effects.
//!
//! Every handler is a plain function of an explicit config struct and the event; it returns
//! the tweens to start. All returned tweens use [`Overwrite::Auto`], so the newest event
//! always wins over tweens started for earlier events.

use crate::{
    animation::{
        ease::Ease,
        style::{Prop, Style},
        tween::{Overwrite, Tween},
    },
    foundation::core::{NodeId, Point, Rect, Vec2, clamp_abs},
};

/// Pointer offset from the centre of `rect`, scaled so the edges map to `-1` and `1`.
///
/// Points outside the box are clamped; degenerate boxes report zero on that axis.
pub fn normalized_offset(point: Point, rect: Rect) -> Vec2 {
    let c = rect.center();
    let axis = |p: f64, c: f64, half: f64| {
        if half > 0.0 {
            ((p - c) / half).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    };
    Vec2::new(
        axis(point.x, c.x, rect.width() / 2.0),
        axis(point.y, c.y, rect.height() / 2.0),
    )
}

fn retarget(node: NodeId, to: Style, duration: f64, ease: Ease) -> Tween {
    Tween::to(vec![node], to)
        .duration(duration)
        .ease(ease)
        .overwrite(Overwrite::Auto)
}

/// Button that leans toward the pointer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Magnetic {
    /// Fraction of the pointer distance applied as offset.
    pub strength: f64,
    /// Largest offset per axis in pixels.
    pub max_offset: f64,
    /// Seconds to follow a move.
    pub follow: f64,
    /// Seconds to settle back after the pointer leaves.
    pub settle: f64,
}

impl Default for Magnetic {
    fn default() -> Self {
        Self {
            strength: 0.15,
            max_offset: 14.0,
            follow: 0.25,
            settle: 0.4,
        }
    }
}

impl Magnetic {
    /// Offset for a pointer at `point` with the target laid out at `rect`.
    pub fn offset(&self, point: Point, rect: Rect) -> Vec2 {
        let d = point - rect.center();
        Vec2::new(
            clamp_abs(d.x * self.strength, self.max_offset),
            clamp_abs(d.y * self.strength, self.max_offset),
        )
    }

    /// Follow the pointer.
    pub fn on_move(&self, target: NodeId, point: Point, rect: Rect) -> Tween {
        let o = self.offset(point, rect);
        retarget(
            target,
            Style::new().with(Prop::X, o.x).with(Prop::Y, o.y),
            self.follow,
            Ease::OutQuart,
        )
    }

    /// Return to rest.
    pub fn on_leave(&self, target: NodeId) -> Tween {
        retarget(
            target,
            Style::new().with(Prop::X, 0.0).with(Prop::Y, 0.0),
            self.settle,
            Ease::OutQuart,
        )
    }
}

/// Card that tilts toward the pointer in 3D.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tilt {
    /// Rotation at the card edge in degrees.
    pub max_deg: f64,
    /// Perspective distance in pixels.
    pub perspective: f64,
    /// Scale while hovered.
    pub hover_scale: f64,
}

impl Default for Tilt {
    fn default() -> Self {
        Self {
            max_deg: 5.0,
            perspective: 800.0,
            hover_scale: 1.05,
        }
    }
}

impl Tilt {
    /// `(rotate_x, rotate_y)` in degrees for a pointer at `point` over a card at `rect`.
    pub fn angles(&self, point: Point, rect: Rect) -> (f64, f64) {
        let n = normalized_offset(point, rect);
        (-n.y * self.max_deg, n.x * self.max_deg)
    }

    /// Lift the card.
    pub fn on_enter(&self, card: NodeId) -> Tween {
        retarget(
            card,
            Style::new().with(Prop::Scale, self.hover_scale),
            0.25,
            Ease::OutCubic,
        )
    }

    /// Tilt toward the pointer.
    pub fn on_move(&self, card: NodeId, point: Point, rect: Rect) -> Tween {
        let (rx, ry) = self.angles(point, rect);
        retarget(
            card,
            Style::new()
                .with(Prop::RotateX, rx)
                .with(Prop::RotateY, ry)
                .with(Prop::Perspective, self.perspective),
            0.2,
            Ease::OutCubic,
        )
    }

    /// Flatten and drop the card.
    pub fn on_leave(&self, card: NodeId) -> Tween {
        retarget(
            card,
            Style::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::RotateX, 0.0)
                .with(Prop::RotateY, 0.0),
            0.3,
            Ease::OutCubic,
        )
    }
}

/// Icon that grows while its region is hovered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoverScale {
    /// Scale while hovered.
    pub scale: f64,
    /// Seconds per transition.
    pub duration: f64,
}

impl Default for HoverScale {
    fn default() -> Self {
        Self {
            scale: 1.1,
            duration: 0.3,
        }
    }
}

impl HoverScale {
    /// Grow.
    pub fn on_enter(&self, target: NodeId) -> Tween {
        retarget(
            target,
            Style::new().with(Prop::Scale, self.scale),
            self.duration,
            Ease::OutQuad,
        )
    }

    /// Shrink back.
    pub fn on_leave(&self, target: NodeId) -> Tween {
        retarget(
            target,
            Style::new().with(Prop::Scale, 1.0),
            self.duration,
            Ease::OutQuad,
        )
    }
}

/// How an icon swap is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphCapability {
    /// Shape interpolation between the two icons.
    Morph,
    /// Opacity crossfade between the two icons.
    #[default]
    Crossfade,
}

/// Hover swap between a primary and an alternate icon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IconSwap {
    /// Rendering strategy.
    pub capability: MorphCapability,
}

const MORPH_SECS: f64 = 0.6;
const CROSSFADE_SECS: f64 = 0.4;

impl IconSwap {
    fn fade(&self, shown: NodeId, hidden: NodeId) -> Vec<Tween> {
        vec![
            retarget(
                shown,
                Style::new().with(Prop::Opacity, 1.0),
                CROSSFADE_SECS,
                Ease::OutQuad,
            ),
            retarget(
                hidden,
                Style::new().with(Prop::Opacity, 0.0),
                CROSSFADE_SECS,
                Ease::OutQuad,
            ),
        ]
    }

    /// Show the alternate icon.
    pub fn on_enter(&self, primary: NodeId, alternate: NodeId) -> Vec<Tween> {
        match self.capability {
            MorphCapability::Morph => vec![retarget(
                primary,
                Style::new().with(Prop::Morph, 1.0),
                MORPH_SECS,
                Ease::OutCubic,
            )],
            MorphCapability::Crossfade => self.fade(alternate, primary),
        }
    }

    /// Show the primary icon again.
    pub fn on_leave(&self, primary: NodeId, alternate: NodeId) -> Vec<Tween> {
        match self.capability {
            MorphCapability::Morph => vec![retarget(
                primary,
                Style::new().with(Prop::Morph, 0.0),
                MORPH_SECS,
                Ease::InOutCubic,
            )],
            MorphCapability::Crossfade => self.fade(primary, alternate),
        }
    }
}

/// Pointer input delivered to a bound region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer entered the region.
    Enter,
    /// Pointer moved inside the region.
    Move(Point),
    /// Pointer left the region.
    Leave,
}

/// Effect attached to a region, with the elements it drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEffect {
    /// `target` leans toward the pointer.
    Magnetic {
        /// Config.
        config: Magnetic,
        /// Element that moves.
        target: NodeId,
    },
    /// The region itself tilts.
    Tilt {
        /// Config.
        config: Tilt,
    },
    /// `target` grows while the region is hovered.
    HoverScale {
        /// Config.
        config: HoverScale,
        /// Element that scales.
        target: NodeId,
    },
    /// Hover swaps `primary` for `alternate`.
    IconSwap {
        /// Config.
        config: IconSwap,
        /// Icon shown at rest.
        primary: NodeId,
        /// Icon shown while hovered.
        alternate: NodeId,
    },
}

/// Region listening for pointer input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerBinding {
    /// Element whose box receives the events.
    pub region: NodeId,
    /// What the events do.
    pub effect: PointerEffect,
}

impl PointerBinding {
    /// Tweens answering `event`. `target_rect` is the current box of the moving element
    /// (the magnetic target or the tilted region); without it moves are ignored.
    pub fn respond(&self, event: PointerEvent, target_rect: Option<Rect>) -> Vec<Tween> {
        match (self.effect, event) {
            (PointerEffect::Magnetic { config, target }, PointerEvent::Move(p)) => target_rect
                .map(|r| config.on_move(target, p, r))
                .into_iter()
                .collect(),
            (PointerEffect::Magnetic { config, target }, PointerEvent::Leave) => {
                vec![config.on_leave(target)]
            }
            (PointerEffect::Tilt { config }, PointerEvent::Enter) => {
                vec![config.on_enter(self.region)]
            }
            (PointerEffect::Tilt { config }, PointerEvent::Move(p)) => target_rect
                .map(|r| config.on_move(self.region, p, r))
                .into_iter()
                .collect(),
            (PointerEffect::Tilt { config }, PointerEvent::Leave) => {
                vec![config.on_leave(self.region)]
            }
            (PointerEffect::HoverScale { config, target }, PointerEvent::Enter) => {
                vec![config.on_enter(target)]
            }
            (PointerEffect::HoverScale { config, target }, PointerEvent::Leave) => {
                vec![config.on_leave(target)]
            }
            (
                PointerEffect::IconSwap {
                    config,
                    primary,
                    alternate,
                },
                PointerEvent::Enter,
            ) => config.on_enter(primary, alternate),
            (
                PointerEffect::IconSwap {
                    config,
                    primary,
                    alternate,
                },
                PointerEvent::Leave,
            ) => config.on_leave(primary, alternate),
            _ => Vec::new(),
        }
    }

    /// Element whose box positions move responses.
    pub fn moving_element(&self) -> NodeId {
        match self.effect {
            PointerEffect::Magnetic { target, .. } => target,
            _ => self.region,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pointer/mod.rs"]
mod tests;
