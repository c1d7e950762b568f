use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::{
        ease::Ease,
        style::{Lerp, Prop},
        timeline::Sequence,
        tween::{Overwrite, Tween},
    },
    dom::Document,
    foundation::core::{NodeId, SectionId},
};

/// Handle to a playing sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PlaybackId(pub u64);

/// Something a playback reported during [`Ticker::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    /// Playback crossed a named cue.
    Cue {
        /// Reporting playback.
        playback: PlaybackId,
        /// Section that started it.
        owner: SectionId,
        /// Cue name.
        name: String,
    },
    /// Playback reached its end and was released.
    Complete {
        /// Finished playback.
        playback: PlaybackId,
        /// Section that started it.
        owner: SectionId,
    },
}

#[derive(Clone, Debug)]
struct Channel {
    prop: Prop,
    from: Option<f64>,
    to: f64,
    live: bool,
}

#[derive(Clone, Debug)]
struct Unit {
    node: NodeId,
    tween: usize,
    start: f64,
    channels: Vec<Channel>,
    started: bool,
}

#[derive(Clone, Debug)]
struct Playback {
    owner: SectionId,
    seq: Sequence,
    tweens: Vec<(Tween, Ease)>,
    units: Vec<Unit>,
    cues: Vec<(f64, String)>,
    next_cue: usize,
    time: f64,
    paused: bool,
    primed: bool,
}

impl Playback {
    fn new(seq: Sequence, owner: SectionId, paused: bool) -> Self {
        let mut tweens = Vec::new();
        let mut units = Vec::new();
        for s in seq.scheduled_tweens() {
            let idx = tweens.len();
            for (i, &node) in s.tween.targets.iter().enumerate() {
                let channels = s
                    .tween
                    .to
                    .iter()
                    .map(|(prop, to)| Channel {
                        prop,
                        from: s.tween.from.as_ref().and_then(|f| f.get(prop)),
                        to,
                        live: true,
                    })
                    .collect();
                units.push(Unit {
                    node,
                    tween: idx,
                    start: s.start + s.tween.unit_offset(i),
                    channels,
                    started: false,
                });
            }
            tweens.push((s.tween.clone(), s.default_ease));
        }
        units.sort_by(|a, b| a.start.total_cmp(&b.start));
        let cues = seq.cues();
        Self {
            owner,
            seq,
            tweens,
            units,
            cues,
            next_cue: 0,
            time: 0.0,
            paused,
            primed: false,
        }
    }

    fn kill(&mut self, node: NodeId, prop: Prop) {
        for unit in self.units.iter_mut().filter(|u| u.node == node) {
            for ch in unit.channels.iter_mut().filter(|c| c.prop == prop) {
                ch.live = false;
            }
        }
    }

    fn render(&mut self, doc: &mut Document) {
        if !self.primed {
            self.seq.prime(doc);
            self.primed = true;
        }
        let time = self.time;
        for unit in &mut self.units {
            if time < unit.start && !unit.started {
                continue;
            }
            if !unit.started {
                unit.started = true;
                let Some(style) = doc.style(unit.node) else {
                    tracing::trace!(node = %unit.node, "unit target missing");
                    unit.channels.clear();
                    continue;
                };
                for ch in unit.channels.iter_mut().filter(|c| c.from.is_none()) {
                    ch.from = Some(style.value(ch.prop));
                }
            }
            let (tween, ease) = &self.tweens[unit.tween];
            let p = tween.progress((time - unit.start).max(0.0), *ease);
            for ch in unit.channels.iter().filter(|c| c.live) {
                let from = ch.from.unwrap_or_else(|| ch.prop.neutral());
                doc.set_prop(unit.node, ch.prop, f64::lerp(&from, &ch.to, p));
            }
        }
    }
}

/// Frame-driven player for [`Sequence`]s.
///
/// A playback writes properties into the [`Document`] only from [`Ticker::tick`] and
/// [`Ticker::seek`]; cancelling between two calls guarantees no further writes.
#[derive(Debug, Default)]
pub struct Ticker {
    playbacks: BTreeMap<PlaybackId, Playback>,
    next_id: u64,
}

impl Ticker {
    /// Ticker with nothing playing.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, seq: Sequence, owner: SectionId, paused: bool) -> PlaybackId {
        let id = PlaybackId(self.next_id);
        self.next_id += 1;

        let auto: BTreeSet<(NodeId, Prop)> = seq
            .scheduled_tweens()
            .iter()
            .filter(|s| s.tween.overwrite == Overwrite::Auto)
            .flat_map(|s| {
                s.tween
                    .targets
                    .iter()
                    .flat_map(move |&n| s.tween.props().map(move |p| (n, p)))
            })
            .collect();
        if !auto.is_empty() {
            for pb in self.playbacks.values_mut() {
                for &(node, prop) in &auto {
                    pb.kill(node, prop);
                }
            }
        }

        tracing::trace!(playback = id.0, owner = owner.0, paused, "playback started");
        self.playbacks.insert(id, Playback::new(seq, owner, paused));
        id
    }

    /// Start playing `seq` on behalf of `owner` from the next tick.
    pub fn play(&mut self, seq: Sequence, owner: SectionId) -> PlaybackId {
        self.insert(seq, owner, false)
    }

    /// Register `seq` without advancing it on ticks; drive it with [`Ticker::seek`].
    pub fn play_paused(&mut self, seq: Sequence, owner: SectionId) -> PlaybackId {
        self.insert(seq, owner, true)
    }

    /// Move a playback to `progress` of its duration and render that state.
    ///
    /// Units that already started return to their start values when seeking before them.
    pub fn seek(&mut self, id: PlaybackId, progress: f64, doc: &mut Document) -> bool {
        let Some(pb) = self.playbacks.get_mut(&id) else {
            return false;
        };
        let duration = pb.seq.duration();
        if !duration.is_finite() {
            return false;
        }
        pb.time = progress.clamp(0.0, 1.0) * duration;
        pb.render(doc);
        true
    }

    /// Stop a playback. Already written values stay; returns `false` if it was not active.
    pub fn cancel(&mut self, id: PlaybackId) -> bool {
        let removed = self.playbacks.remove(&id).is_some();
        if removed {
            tracing::trace!(playback = id.0, "playback cancelled");
        }
        removed
    }

    /// Stop every playback started by `owner`; returns how many were stopped.
    pub fn cancel_owner(&mut self, owner: SectionId) -> usize {
        let before = self.playbacks.len();
        self.playbacks.retain(|_, pb| pb.owner != owner);
        before - self.playbacks.len()
    }

    /// Return `true` while the playback has not completed or been cancelled.
    pub fn is_active(&self, id: PlaybackId) -> bool {
        self.playbacks.contains_key(&id)
    }

    /// Number of live playbacks.
    pub fn active_count(&self) -> usize {
        self.playbacks.len()
    }

    /// Live playbacks started by `owner`.
    pub fn active_for(&self, owner: SectionId) -> Vec<PlaybackId> {
        self.playbacks
            .iter()
            .filter(|(_, pb)| pb.owner == owner)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Seconds a playback has advanced.
    pub fn elapsed(&self, id: PlaybackId) -> Option<f64> {
        self.playbacks.get(&id).map(|pb| pb.time)
    }

    /// Advance every running playback by `dt` seconds and write the resulting styles.
    pub fn tick(&mut self, dt: f64, doc: &mut Document) -> Vec<TickEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        let mut finished = Vec::new();

        for (&id, pb) in self.playbacks.iter_mut().filter(|(_, pb)| !pb.paused) {
            pb.time += dt;
            pb.render(doc);
            while let Some((at, name)) = pb.cues.get(pb.next_cue) {
                if *at > pb.time {
                    break;
                }
                events.push(TickEvent::Cue {
                    playback: id,
                    owner: pb.owner,
                    name: name.clone(),
                });
                pb.next_cue += 1;
            }
            if pb.time >= pb.seq.duration() {
                finished.push(id);
                events.push(TickEvent::Complete {
                    playback: id,
                    owner: pb.owner,
                });
            }
        }

        for id in finished {
            self.playbacks.remove(&id);
        }
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ticker.rs"]
mod tests;
