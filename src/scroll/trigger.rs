use std::collections::BTreeMap;

use crate::{
    dom::Document,
    foundation::core::{NodeId, Viewport},
    scroll::threshold::{Edge, Threshold},
};

/// How a trigger reacts to crossings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Fire `Enter` on the first downward crossing, then dispose.
    Once,
    /// Fire `Enter` on every downward crossing and `LeaveBack` when scrolling back above it.
    Repeatable,
    /// Report progress between start and end on every scroll.
    Scrub {
        /// Seconds the reported progress takes to catch up; `None` follows scroll exactly.
        #[serde(default)]
        smoothing: Option<f64>,
    },
}

/// Registration of one scroll trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSpec {
    /// Element whose layout box positions the thresholds.
    pub node: NodeId,
    /// Entry threshold.
    pub start: Threshold,
    /// Scrub end threshold; defaults to `"bottom top"`.
    pub end: Option<Threshold>,
    /// Reaction mode.
    pub mode: TriggerMode,
}

impl TriggerSpec {
    /// One-shot trigger.
    pub fn once(node: NodeId, start: Threshold) -> Self {
        Self {
            node,
            start,
            end: None,
            mode: TriggerMode::Once,
        }
    }

    /// Re-arming trigger.
    pub fn repeatable(node: NodeId, start: Threshold) -> Self {
        Self {
            mode: TriggerMode::Repeatable,
            ..Self::once(node, start)
        }
    }

    /// Progress trigger between `start` and `end`.
    pub fn scrub(node: NodeId, start: Threshold, end: Threshold, smoothing: Option<f64>) -> Self {
        Self {
            node,
            start,
            end: Some(end),
            mode: TriggerMode::Scrub { smoothing },
        }
    }
}

/// Handle to a registered trigger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerId(pub u64);

/// Trigger firing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerEvent {
    /// Scrolled down past the start threshold.
    Enter,
    /// Scrolled back above the point where `Enter` fired.
    LeaveBack,
    /// Scrub progress in `[0, 1]`.
    Scrub {
        /// Reported progress.
        progress: f64,
    },
}

const DEFAULT_END: Threshold = Threshold {
    element: Edge::Bottom,
    viewport: Edge::Top,
};

const SETTLE_EPSILON: f64 = 1e-4;

#[derive(Clone, Debug)]
struct Trigger {
    spec: TriggerSpec,
    entered_at: Option<f64>,
    target: Option<f64>,
    shown: Option<f64>,
}

/// Scroll triggers of one owner, evaluated against the current scroll offset.
#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: BTreeMap<TriggerId, Trigger>,
    next_id: u64,
}

impl TriggerSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger; it is first evaluated on the next [`TriggerSet::update`].
    pub fn register(&mut self, spec: TriggerSpec) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        self.triggers.insert(
            id,
            Trigger {
                spec,
                entered_at: None,
                target: None,
                shown: None,
            },
        );
        id
    }

    /// Remove one trigger; returns `false` if it was already gone.
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        self.triggers.remove(&id).is_some()
    }

    /// Remove every trigger.
    pub fn dispose_all(&mut self) {
        if !self.triggers.is_empty() {
            tracing::debug!(count = self.triggers.len(), "disposing triggers");
        }
        self.triggers.clear();
    }

    /// Return `true` while `id` is registered.
    pub fn contains(&self, id: TriggerId) -> bool {
        self.triggers.contains_key(&id)
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Return `true` when no trigger is registered.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Evaluate every trigger at document scroll offset `scroll_y`.
    ///
    /// Triggers whose element is missing are skipped. `Once` triggers are removed after
    /// firing.
    pub fn update(
        &mut self,
        scroll_y: f64,
        doc: &Document,
        viewport: Viewport,
    ) -> Vec<(TriggerId, TriggerEvent)> {
        let mut events = Vec::new();
        let mut spent = Vec::new();

        for (&id, trig) in &mut self.triggers {
            let Some(rect) = doc.rect(trig.spec.node) else {
                tracing::trace!(trigger = id.0, node = %trig.spec.node, "trigger element missing");
                continue;
            };
            let start = trig.spec.start.scroll_position(&rect, viewport.height);

            match trig.spec.mode {
                TriggerMode::Once | TriggerMode::Repeatable => match trig.entered_at {
                    None if scroll_y >= start => {
                        trig.entered_at = Some(start);
                        events.push((id, TriggerEvent::Enter));
                        if trig.spec.mode == TriggerMode::Once {
                            spent.push(id);
                        }
                    }
                    Some(entry) if scroll_y < entry => {
                        trig.entered_at = None;
                        events.push((id, TriggerEvent::LeaveBack));
                    }
                    _ => {}
                },
                TriggerMode::Scrub { smoothing } => {
                    let end = trig
                        .spec
                        .end
                        .unwrap_or(DEFAULT_END)
                        .scroll_position(&rect, viewport.height);
                    let progress = scrub_progress(scroll_y, start, end);
                    trig.target = Some(progress);
                    let smoothed = smoothing.is_some_and(|s| s > 0.0);
                    if (!smoothed || trig.shown.is_none()) && trig.shown != Some(progress) {
                        trig.shown = Some(progress);
                        events.push((id, TriggerEvent::Scrub { progress }));
                    }
                }
            }
        }

        for id in spent {
            tracing::debug!(trigger = id.0, "one-shot trigger disposed");
            self.triggers.remove(&id);
        }
        events
    }

    /// Advance smoothed scrub triggers by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Vec<(TriggerId, TriggerEvent)> {
        let mut events = Vec::new();
        if !(dt.is_finite() && dt > 0.0) {
            return events;
        }
        for (&id, trig) in &mut self.triggers {
            let TriggerMode::Scrub {
                smoothing: Some(s),
            } = trig.spec.mode
            else {
                continue;
            };
            let (Some(target), Some(shown)) = (trig.target, trig.shown) else {
                continue;
            };
            if shown == target || s <= 0.0 {
                continue;
            }
            let mut next = shown + (target - shown) * (1.0 - (-dt / s).exp());
            if (target - next).abs() < SETTLE_EPSILON {
                next = target;
            }
            trig.shown = Some(next);
            events.push((id, TriggerEvent::Scrub { progress: next }));
        }
        events
    }
}

fn scrub_progress(scroll_y: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if scroll_y >= start { 1.0 } else { 0.0 };
    }
    ((scroll_y - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
