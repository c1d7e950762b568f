use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    animation::{ease::Ease, style::Prop, tween::Tween},
    dom::Document,
    foundation::{
        core::NodeId,
        error::{PixoraError, PixoraResult},
    },
};

/// Where an item is placed in a timeline.
///
/// The textual form follows the page's position strings: `"1.5"`, `">"`, `">-0.2"`,
/// `"<"`, `"<+0.1"`, `"+=0.5"`; an empty string means "at the current end".
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    /// Absolute time in seconds.
    Absolute(f64),
    /// Relative to the end of the whole timeline built so far.
    End(f64),
    /// Relative to the end of the most recently added item.
    AfterPrevious(f64),
    /// Relative to the start of the most recently added item.
    WithPrevious(f64),
}

impl Default for Position {
    fn default() -> Self {
        Self::End(0.0)
    }
}

fn parse_offset(s: &str, full: &str) -> PixoraResult<f64> {
    if s.is_empty() {
        return Ok(0.0);
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| PixoraError::parse(format!("bad position offset in '{full}'")))?;
    if !v.is_finite() {
        return Err(PixoraError::parse(format!("non-finite position '{full}'")));
    }
    Ok(v)
}

impl FromStr for Position {
    type Err = PixoraError;

    fn from_str(s: &str) -> PixoraResult<Self> {
        let t = s.trim();
        if t.is_empty() {
            return Ok(Self::End(0.0));
        }
        if let Some(rest) = t.strip_prefix('>') {
            return Ok(Self::AfterPrevious(parse_offset(rest, s)?));
        }
        if let Some(rest) = t.strip_prefix('<') {
            return Ok(Self::WithPrevious(parse_offset(rest, s)?));
        }
        if let Some(rest) = t.strip_prefix("+=") {
            return Ok(Self::End(parse_offset(rest, s)?));
        }
        if let Some(rest) = t.strip_prefix("-=") {
            return Ok(Self::End(-parse_offset(rest, s)?));
        }
        let v = parse_offset(t, s)?;
        if v < 0.0 {
            return Err(PixoraError::parse(format!("negative absolute position '{s}'")));
        }
        Ok(Self::Absolute(v))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn signed(v: f64) -> String {
            if v == 0.0 {
                String::new()
            } else if v > 0.0 {
                format!("+{v}")
            } else {
                format!("{v}")
            }
        }
        match *self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::End(v) if v == 0.0 => Ok(()),
            Self::End(v) if v > 0.0 => write!(f, "+={v}"),
            Self::End(v) => write!(f, "-={}", -v),
            Self::AfterPrevious(v) => write!(f, ">{}", signed(v)),
            Self::WithPrevious(v) => write!(f, "<{}", signed(v)),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = PixoraError;

    fn try_from(value: String) -> PixoraResult<Self> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.to_string()
    }
}

/// Item scheduled in a [`Sequence`].
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// Property interpolation.
    Tween(Tween),
    /// Nested sequence.
    Sequence(Sequence),
    /// Named marker reported when playback crosses it.
    Cue(String),
}

impl Item {
    fn duration(&self) -> f64 {
        match self {
            Self::Tween(t) => t.total_duration(),
            Self::Sequence(s) => s.duration(),
            Self::Cue(_) => 0.0,
        }
    }
}

/// Item with its resolved start time.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// Start time in seconds relative to the sequence start.
    pub start: f64,
    /// Scheduled item.
    pub item: Item,
}

/// Immutable, fully resolved timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    entries: Vec<Entry>,
    duration: f64,
    ease: Ease,
}

/// Tween resolved to absolute sequence time.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledTween<'a> {
    /// Start of the tween in seconds from the outermost sequence start.
    pub start: f64,
    /// The tween.
    pub tween: &'a Tween,
    /// Ease used when the tween has none.
    pub default_ease: Ease,
}

impl Sequence {
    /// Sequence holding a single tween at time zero.
    pub fn of(tween: Tween) -> PixoraResult<Self> {
        TimelineBuilder::new().add(tween, Position::Absolute(0.0)).build()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// End of the last item; infinite when any item loops forever.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Ease applied to tweens without one.
    pub fn default_ease(&self) -> Ease {
        self.ease
    }

    /// Every tween with absolute start time, sorted by start.
    pub fn scheduled_tweens(&self) -> Vec<ScheduledTween<'_>> {
        let mut out = Vec::new();
        self.collect_tweens(0.0, &mut out);
        out.sort_by(|a, b| a.start.total_cmp(&b.start));
        out
    }

    fn collect_tweens<'a>(&'a self, base: f64, out: &mut Vec<ScheduledTween<'a>>) {
        for e in &self.entries {
            match &e.item {
                Item::Tween(t) => out.push(ScheduledTween {
                    start: base + e.start,
                    tween: t,
                    default_ease: self.ease,
                }),
                Item::Sequence(s) => s.collect_tweens(base + e.start, out),
                Item::Cue(_) => {}
            }
        }
    }

    /// Every cue with absolute time, sorted by time.
    pub fn cues(&self) -> Vec<(f64, String)> {
        let mut out = Vec::new();
        self.collect_cues(0.0, &mut out);
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        out
    }

    fn collect_cues(&self, base: f64, out: &mut Vec<(f64, String)>) {
        for e in &self.entries {
            match &e.item {
                Item::Cue(name) => out.push((base + e.start, name.clone())),
                Item::Sequence(s) => s.collect_cues(base + e.start, out),
                Item::Tween(_) => {}
            }
        }
    }

    /// Elements written by this sequence.
    pub fn targets(&self) -> BTreeSet<NodeId> {
        self.scheduled_tweens()
            .iter()
            .flat_map(|s| s.tween.targets.iter().copied())
            .collect()
    }

    /// Write the start values of every explicit-start tween, earliest tween first.
    ///
    /// Elements wait in their start state until the sequence plays (hidden headings, offset
    /// cards). Missing elements are skipped.
    pub fn prime(&self, doc: &mut Document) {
        let mut primed: BTreeSet<(NodeId, Prop)> = BTreeSet::new();
        for s in self.scheduled_tweens() {
            let Some(from) = &s.tween.from else {
                continue;
            };
            for &node in &s.tween.targets {
                for (prop, value) in from.iter() {
                    if primed.insert((node, prop)) && !doc.set_prop(node, prop, value) {
                        tracing::trace!(node = %node, "prime skipped missing element");
                    }
                }
            }
        }
    }
}

/// Builder resolving item positions as they are added.
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    entries: Vec<Entry>,
    prev_start: f64,
    prev_end: f64,
    end: f64,
    ease: Option<Ease>,
}

impl TimelineBuilder {
    /// Empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ease for tweens that do not name one.
    pub fn default_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    fn resolve(&self, position: Position) -> f64 {
        let t = match position {
            Position::Absolute(t) => t,
            Position::End(o) => self.end + o,
            Position::AfterPrevious(o) => self.prev_end + o,
            Position::WithPrevious(o) => self.prev_start + o,
        };
        t.max(0.0)
    }

    fn push(mut self, item: Item, position: Position) -> Self {
        let start = self.resolve(position);
        let end = start + item.duration();
        self.prev_start = start;
        self.prev_end = end;
        if end.is_finite() {
            self.end = self.end.max(end);
        }
        self.entries.push(Entry { start, item });
        self
    }

    /// Schedule a tween.
    pub fn add(self, tween: Tween, position: Position) -> Self {
        self.push(Item::Tween(tween), position)
    }

    /// Schedule a nested sequence.
    pub fn add_sequence(self, seq: Sequence, position: Position) -> Self {
        self.push(Item::Sequence(seq), position)
    }

    /// Schedule a named cue.
    pub fn cue(self, name: impl Into<String>, position: Position) -> Self {
        self.push(Item::Cue(name.into()), position)
    }

    /// Current end of the timeline in seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Validate every tween and freeze the timeline.
    pub fn build(self) -> PixoraResult<Sequence> {
        fn check(entries: &[Entry]) -> PixoraResult<()> {
            for e in entries {
                match &e.item {
                    Item::Tween(t) => t.validate()?,
                    Item::Sequence(s) => check(&s.entries)?,
                    Item::Cue(name) if name.is_empty() => {
                        return Err(PixoraError::animation("cue name must be non-empty"));
                    }
                    Item::Cue(_) => {}
                }
            }
            Ok(())
        }
        check(&self.entries)?;

        let duration = self
            .entries
            .iter()
            .map(|e| e.start + e.item.duration())
            .fold(0.0, f64::max);
        Ok(Sequence {
            entries: self.entries,
            duration,
            ease: self.ease.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
