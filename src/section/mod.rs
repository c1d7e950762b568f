//! Page sections: declarative motion plans and the runtime that mounts them.

pub mod plan;
pub mod runtime;

pub use plan::{Effect, SectionPlan, Step, TriggerPlan, TweenPlan};
pub use runtime::{SectionContext, SectionRuntime};
