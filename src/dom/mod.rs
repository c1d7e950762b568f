//! Retained document model: element tree, layout boxes, styles and text.

mod document;
mod selector;

pub use document::{Document, Element, ElementData, NodeKind};
pub use selector::Selector;
