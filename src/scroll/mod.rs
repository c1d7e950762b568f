//! Scroll-driven triggers: threshold lines and the crossing state machine.

pub mod threshold;
pub mod trigger;

pub use threshold::{Edge, Threshold};
pub use trigger::{TriggerEvent, TriggerId, TriggerMode, TriggerSet, TriggerSpec};
