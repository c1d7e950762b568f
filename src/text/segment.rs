use crate::{
    dom::{Document, Element},
    foundation::core::NodeId,
};

const NBSP: char = '\u{a0}';
const LETTER_CLASS: &str = "lt";
const WORD_CLASS: &str = "split-word";
const UNIT_STYLE: &str = "display:inline-block;will-change:transform";
const SPACER_STYLE: &str = "display:inline-block;width:.35em";

/// Unit size for staggered text reveals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One unit per character; whitespace becomes a fixed-width spacer.
    Letter,
    /// One unit per whitespace-separated word.
    Word,
}

/// One inline unit of segmented text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Visible text unit.
    Unit(String),
    /// Fixed-width space between letters.
    Spacer,
}

/// Result of segmenting a text run; does not touch any document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segmentation {
    /// Granularity used.
    pub granularity: Granularity,
    /// Units in reading order.
    pub segments: Vec<Segment>,
}

/// Split `text` into reveal units.
///
/// Empty or whitespace-only text yields no units.
pub fn segment(text: &str, granularity: Granularity) -> Segmentation {
    if text.trim().is_empty() {
        return Segmentation {
            granularity,
            segments: Vec::new(),
        };
    }
    let segments = match granularity {
        Granularity::Letter => text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    Segment::Spacer
                } else {
                    Segment::Unit(c.to_string())
                }
            })
            .collect(),
        Granularity::Word => {
            let words: Vec<&str> = text.split_whitespace().collect();
            let last = words.len().saturating_sub(1);
            words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let mut unit = (*w).to_string();
                    if i < last {
                        unit.push(NBSP);
                    }
                    Segment::Unit(unit)
                })
                .collect()
        }
    };
    Segmentation {
        granularity,
        segments,
    }
}

impl Segmentation {
    /// Number of animated units, spacers included.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Return `true` when there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn class(&self) -> &'static str {
        match self.granularity {
            Granularity::Letter => LETTER_CLASS,
            Granularity::Word => WORD_CLASS,
        }
    }

    /// Inline wrapper markup, one span per unit.
    pub fn render_markup(&self) -> String {
        let class = self.class();
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Spacer => {
                    format!("<span class=\"{class}\" style=\"{SPACER_STYLE}\">&nbsp;</span>")
                }
                Segment::Unit(u) => format!(
                    "<span class=\"{class}\" style=\"{UNIT_STYLE}\">{}</span>",
                    u.replace('&', "&amp;")
                        .replace('<', "&lt;")
                        .replace('>', "&gt;")
                        .replace(NBSP, "&nbsp;")
                ),
            })
            .collect()
    }
}

/// Segmentation applied to a document element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitText {
    node: NodeId,
    units: Vec<NodeId>,
}

impl SplitText {
    /// Replace the content of `node` with one inline element per unit.
    ///
    /// Returns `None` when `node` is missing. Text without units leaves the element untouched
    /// and yields a split whose revert does nothing.
    pub fn apply(doc: &mut Document, node: NodeId, granularity: Granularity) -> Option<Self> {
        let text = doc.text_content(node)?;
        let seg = segment(&text, granularity);
        if seg.is_empty() {
            return Some(Self {
                node,
                units: Vec::new(),
            });
        }

        let rect = doc.rect(node)?;
        doc.stash_children(node);
        let class = seg.class();
        let mut units = Vec::with_capacity(seg.len());
        for s in &seg.segments {
            let el = match s {
                Segment::Spacer => Element::new("span")
                    .class(class)
                    .attr("style", SPACER_STYLE)
                    .text(NBSP.to_string()),
                Segment::Unit(u) => Element::new("span")
                    .class(class)
                    .attr("style", UNIT_STYLE)
                    .text(u.clone()),
            };
            units.extend(doc.append(node, el.rect(rect)));
        }
        tracing::trace!(node = %node, units = units.len(), "split text");
        Some(Self { node, units })
    }

    /// Element that was split.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Unit handles in reading order.
    pub fn units(&self) -> &[NodeId] {
        &self.units
    }

    /// Restore the element's pristine content. Safe to call repeatedly.
    pub fn revert(&self, doc: &mut Document) {
        if !self.units.is_empty() {
            doc.restore_children(self.node);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/segment.rs"]
mod tests;
