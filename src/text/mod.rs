//! Text decoration: letter/word segmentation and metric counters.

pub mod metric;
pub mod segment;
