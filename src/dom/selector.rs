use std::{fmt, str::FromStr};

use crate::{
    dom::Document,
    foundation::{
        core::NodeId,
        error::{PixoraError, PixoraResult},
    },
};

/// Simple element selector: `#id`, `.class` or `tag`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
}

impl Selector {
    /// Return `true` when element `id` matches.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        match self {
            Self::Id(want) => doc.element_id(id) == Some(want.as_str()),
            Self::Class(class) => doc.has_class(id, class),
            Self::Tag(tag) => doc.tag(id) == Some(tag.as_str()),
        }
    }

    /// Matching descendants of `scope` in document order.
    pub fn select(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|n| self.matches(doc, *n))
            .collect()
    }

    /// First matching descendant of `scope`.
    pub fn select_first(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .find(|n| self.matches(doc, *n))
    }
}

fn valid_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FromStr for Selector {
    type Err = PixoraError;

    fn from_str(s: &str) -> PixoraResult<Self> {
        let s = s.trim();
        let sel = if let Some(id) = s.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = s.strip_prefix('.') {
            Self::Class(class.to_string())
        } else {
            Self::Tag(s.to_string())
        };
        let ident = match &sel {
            Self::Id(v) | Self::Class(v) | Self::Tag(v) => v,
        };
        if !valid_ident(ident) {
            return Err(PixoraError::parse(format!("invalid selector '{s}'")));
        }
        Ok(sel)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "#{v}"),
            Self::Class(v) => write!(f, ".{v}"),
            Self::Tag(v) => f.write_str(v),
        }
    }
}

impl TryFrom<String> for Selector {
    type Error = PixoraError;

    fn try_from(value: String) -> PixoraResult<Self> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(sel: Selector) -> Self {
        sel.to_string()
    }
}
