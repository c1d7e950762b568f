//! Motion primitives: easing curves, style snapshots, tweens, timelines and the frame ticker.

pub mod ease;
pub mod path;
pub mod style;
pub mod ticker;
pub mod timeline;
pub mod tween;
