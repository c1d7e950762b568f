#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod dom;
pub mod pointer;
pub mod scroll;
pub mod section;
pub mod site;
pub mod stage;
pub mod text;

pub use animation::{ease::Ease, style::Prop, style::Style};
pub use foundation::core::{NodeId, Point, Rect, SectionId, Vec2, Viewport};
pub use foundation::error::{PixoraError, PixoraResult};
pub use section::{SectionPlan, SectionRuntime};
pub use stage::{Digest, Stage, StageConfig, init};
