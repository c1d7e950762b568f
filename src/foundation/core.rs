pub use kurbo::{Point, Rect, Vec2};

/// Handle to an element in a [`Document`](crate::dom::Document).
///
/// Handles carry the generation of their arena slot, so a handle to a removed element stays
/// dangling instead of aliasing the element that later reuses the slot.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// First-generation handle for slot `index`.
    pub fn new(index: u32) -> Self {
        Self::with_generation(index, 0)
    }

    pub(crate) fn with_generation(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Times the slot was recycled before this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Identity of a mounted section; owns every playback, trigger and binding it creates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SectionId(pub u32);

/// Visible window onto the document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// `value` clamped into `[-limit, limit]`.
pub(crate) fn clamp_abs(value: f64, limit: f64) -> f64 {
    let limit = limit.abs();
    value.clamp(-limit, limit)
}
