use std::collections::BTreeMap;

use crate::{
    animation::{
        ease::Ease,
        path::MotionPath,
        style::{Prop, Style},
        ticker::{PlaybackId, TickEvent, Ticker},
        timeline::{Position, Sequence, TimelineBuilder},
        tween::{Repeat, Tween},
    },
    dom::{Document, Element},
    foundation::{
        core::{NodeId, Rect, SectionId, Viewport},
        error::PixoraResult,
        rng::{SplitMix64, stable_hash64},
    },
    pointer::{IconSwap, MorphCapability, PointerBinding, PointerEffect},
    scroll::{Edge, Threshold, TriggerEvent, TriggerId, TriggerSet, TriggerSpec},
    section::plan::{Effect, SectionPlan, Step, TriggerPlan, TweenPlan},
    text::{
        metric::{CounterFormat, token_from_attrs},
        segment::SplitText,
    },
};

/// Shared page state a section reads and writes while mounted.
#[derive(Debug)]
pub struct SectionContext<'a> {
    /// Page document.
    pub doc: &'a mut Document,
    /// Page ticker.
    pub ticker: &'a mut Ticker,
    /// Current viewport.
    pub viewport: Viewport,
    /// Seed for synthetic decorations.
    pub seed: u64,
    /// Icon swap rendering.
    pub morph: MorphCapability,
}

#[derive(Clone, Debug)]
enum Completion {
    RevertSplit(usize),
    Play(Sequence),
}

#[derive(Clone, Debug)]
struct Reaction {
    seq: Sequence,
    on_complete: Vec<Completion>,
    playing: Option<PlaybackId>,
    /// Playbacks started by completions and cues of the current run.
    follow_ups: Vec<PlaybackId>,
}

impl Reaction {
    fn new(seq: Sequence, on_complete: Vec<Completion>) -> Self {
        Self {
            seq,
            on_complete,
            playing: None,
            follow_ups: Vec::new(),
        }
    }

    /// Cancel the main playback and every follow-up, returning the main one.
    fn stop(&mut self, ticker: &mut Ticker) -> Option<PlaybackId> {
        for pb in self.follow_ups.drain(..) {
            ticker.cancel(pb);
        }
        let pb = self.playing.take()?;
        ticker.cancel(pb);
        Some(pb)
    }
}

/// Tweens matched inside `root`, chained back to back.
fn chain(tweens: &[TweenPlan], root: NodeId, doc: &Document) -> PixoraResult<Sequence> {
    let mut tl = TimelineBuilder::new();
    for plan in tweens {
        let targets = plan.targets.select(doc, root);
        if !targets.is_empty() {
            tl = tl.add(plan.build(targets), Position::default());
        }
    }
    tl.build()
}

const SLIDE_SECS: f64 = 0.75;
const UNDERLINE_SECS: f64 = 0.7;
const UNDERLINE_DELAY: f64 = 0.1;
const FIELD_MIN_SIZE: f64 = 40.0;
const FIELD_SIZE_RANGE: f64 = 140.0;

/// Live resources of one mounted section.
///
/// Everything the section creates (playbacks, triggers, split text, counters, synthetic
/// elements and pointer bindings) is released by [`SectionRuntime::unmount`].
#[derive(Debug)]
pub struct SectionRuntime {
    id: SectionId,
    name: String,
    root: Option<NodeId>,
    mounted: bool,
    triggers: TriggerSet,
    reactions: Vec<Reaction>,
    on_trigger: BTreeMap<TriggerId, usize>,
    scrubs: BTreeMap<TriggerId, PlaybackId>,
    running: BTreeMap<PlaybackId, usize>,
    cues: BTreeMap<String, Sequence>,
    cue_owner: BTreeMap<String, usize>,
    splits: Vec<SplitText>,
    counters: Vec<NodeId>,
    synthetic: Vec<NodeId>,
    dashed: Vec<NodeId>,
    on_path: Vec<NodeId>,
    bindings: Vec<PointerBinding>,
}

impl SectionRuntime {
    fn empty(id: SectionId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            root: None,
            mounted: true,
            triggers: TriggerSet::new(),
            reactions: Vec::new(),
            on_trigger: BTreeMap::new(),
            scrubs: BTreeMap::new(),
            running: BTreeMap::new(),
            cues: BTreeMap::new(),
            cue_owner: BTreeMap::new(),
            splits: Vec::new(),
            counters: Vec::new(),
            synthetic: Vec::new(),
            dashed: Vec::new(),
            on_path: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Mount `plan` on the document.
    ///
    /// A missing root mounts an inert section; missing effect targets skip that effect.
    /// Errors come only from invalid plan content, and leave nothing behind.
    #[tracing::instrument(skip_all, fields(section = %plan.name, id = id.0))]
    pub fn mount(
        id: SectionId,
        plan: &SectionPlan,
        cx: &mut SectionContext<'_>,
    ) -> PixoraResult<Self> {
        plan.validate()?;
        let mut rt = Self::empty(id, &plan.name);
        let Some(root) = plan.root.select_first(cx.doc, cx.doc.root()) else {
            tracing::trace!(root = %plan.root, "section root missing");
            return Ok(rt);
        };
        rt.root = Some(root);

        for effect in &plan.effects {
            if let Err(err) = rt.mount_effect(effect, root, cx) {
                rt.unmount(cx);
                return Err(err);
            }
        }
        tracing::debug!(
            triggers = rt.triggers.len(),
            bindings = rt.bindings.len(),
            splits = rt.splits.len(),
            "section mounted"
        );
        Ok(rt)
    }

    /// Owner id used for every playback of this section.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Plan name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root element, when it was found at mount.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Return `true` until [`SectionRuntime::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Pointer regions of this section.
    pub fn bindings(&self) -> &[PointerBinding] {
        &self.bindings
    }

    /// Registered scroll triggers.
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Elements this section added to the document.
    pub fn synthetic_nodes(&self) -> &[NodeId] {
        &self.synthetic
    }

    /// Elements currently split into letters or words.
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    fn trigger_spec(plan: &TriggerPlan, root: NodeId, doc: &Document) -> Option<TriggerSpec> {
        let node = match &plan.target {
            Some(sel) => sel.select_first(doc, root)?,
            None => root,
        };
        Some(TriggerSpec {
            node,
            start: plan.start,
            end: plan.end,
            mode: plan.mode,
        })
    }

    /// `None` when a trigger is wanted but its element is missing.
    fn resolve_trigger(
        plan: Option<&TriggerPlan>,
        root: NodeId,
        doc: &Document,
    ) -> Option<Option<TriggerSpec>> {
        match plan {
            None => Some(None),
            Some(p) => match Self::trigger_spec(p, root, doc) {
                Some(spec) => Some(Some(spec)),
                None => {
                    tracing::trace!("trigger element missing");
                    None
                }
            },
        }
    }

    fn resolve_targets(
        &mut self,
        plan: &TweenPlan,
        root: NodeId,
        doc: &mut Document,
    ) -> (Vec<NodeId>, Vec<usize>) {
        let matched = plan.targets.select(doc, root);
        let Some(granularity) = plan.split else {
            return (matched, Vec::new());
        };
        let mut units = Vec::new();
        let mut splits = Vec::new();
        for node in matched {
            if let Some(split) = SplitText::apply(doc, node, granularity) {
                units.extend_from_slice(split.units());
                splits.push(self.splits.len());
                self.splits.push(split);
            }
        }
        (units, splits)
    }

    fn arm(
        &mut self,
        reaction: Reaction,
        trigger: Option<TriggerSpec>,
        cx: &mut SectionContext<'_>,
    ) -> usize {
        let idx = self.reactions.len();
        self.reactions.push(reaction);
        match trigger {
            Some(spec) => {
                let tid = self.triggers.register(spec);
                self.on_trigger.insert(tid, idx);
            }
            None => self.start(idx, cx),
        }
        idx
    }

    fn start(&mut self, idx: usize, cx: &mut SectionContext<'_>) {
        let Some(r) = self.reactions.get_mut(idx) else {
            return;
        };
        if let Some(pb) = r.stop(cx.ticker) {
            self.running.remove(&pb);
        }
        let pb = cx.ticker.play(r.seq.clone(), self.id);
        r.playing = Some(pb);
        self.running.insert(pb, idx);
    }

    fn reset(&mut self, idx: usize, cx: &mut SectionContext<'_>) {
        let Some(r) = self.reactions.get_mut(idx) else {
            return;
        };
        if let Some(pb) = r.stop(cx.ticker) {
            self.running.remove(&pb);
        }
        r.seq.prime(cx.doc);
    }

    fn mount_effect(
        &mut self,
        effect: &Effect,
        root: NodeId,
        cx: &mut SectionContext<'_>,
    ) -> PixoraResult<()> {
        match effect {
            Effect::Set { targets, style } => {
                for node in targets.select(cx.doc, root) {
                    cx.doc.apply_style(node, style);
                }
            }

            Effect::Reveal {
                trigger,
                tween,
                revert_split,
                then,
            } => {
                let Some(spec) = Self::resolve_trigger(trigger.as_ref(), root, cx.doc) else {
                    return Ok(());
                };
                let (targets, splits) = self.resolve_targets(tween, root, cx.doc);
                if targets.is_empty() {
                    tracing::trace!(targets = %tween.targets, "reveal targets missing");
                    return Ok(());
                }
                let seq = Sequence::of(tween.build(targets))?;
                let mut on_complete = Vec::new();
                if *revert_split {
                    on_complete.extend(splits.into_iter().map(Completion::RevertSplit));
                }
                if let Some(then) = then {
                    let follow = chain(std::slice::from_ref(then), root, cx.doc)?;
                    if !follow.entries().is_empty() {
                        on_complete.push(Completion::Play(follow));
                    }
                }
                seq.prime(cx.doc);
                self.arm(Reaction::new(seq, on_complete), spec, cx);
            }

            Effect::Timeline {
                trigger,
                ease,
                steps,
            } => {
                let Some(spec) = Self::resolve_trigger(trigger.as_ref(), root, cx.doc) else {
                    return Ok(());
                };
                let mut tl = TimelineBuilder::new();
                if let Some(ease) = ease {
                    tl = tl.default_ease(*ease);
                }
                for step in steps {
                    tl = self.add_step(tl, step, root, cx)?;
                }
                let seq = tl.build()?;
                if seq.entries().is_empty() {
                    return Ok(());
                }
                seq.prime(cx.doc);
                let idx = self.arm(Reaction::new(seq, Vec::new()), spec, cx);
                for step in steps {
                    if let Step::Call { name, .. } = step {
                        self.cue_owner.insert(name.clone(), idx);
                    }
                }
            }

            Effect::SlideItems {
                items,
                content,
                underline,
                offset,
                start,
            } => {
                for (i, item) in items.select(cx.doc, root).into_iter().enumerate() {
                    let Some(body) = content.select_first(cx.doc, item) else {
                        continue;
                    };
                    let x = if i % 2 == 0 { -offset } else { *offset };
                    let mut tl = TimelineBuilder::new().add(
                        Tween::from_to(
                            vec![body],
                            Style::new().with(Prop::X, x).with(Prop::Opacity, 0.0),
                            Style::new().with(Prop::X, 0.0).with(Prop::Opacity, 1.0),
                        )
                        .duration(SLIDE_SECS)
                        .ease(Ease::OutQuart),
                        Position::Absolute(0.0),
                    );
                    if let Some(line) = underline.as_ref().and_then(|u| u.select_first(cx.doc, item))
                    {
                        tl = tl.add(
                            Tween::from_to(
                                vec![line],
                                Style::new().with(Prop::ScaleX, 0.0),
                                Style::new().with(Prop::ScaleX, 1.0),
                            )
                            .duration(UNDERLINE_SECS)
                            .delay(UNDERLINE_DELAY)
                            .ease(Ease::OutCubic),
                            Position::Absolute(0.0),
                        );
                    }
                    self.arm(
                        Reaction::new(tl.build()?, Vec::new()),
                        Some(TriggerSpec::repeatable(item, *start)),
                        cx,
                    );
                }
            }

            Effect::Counters {
                targets,
                value,
                closest,
                trigger,
                duration,
                ease,
            } => {
                for span in targets.select(cx.doc, root) {
                    let (format, target) = match value {
                        Some(v) => (CounterFormat::integer(), *v),
                        None => match token_from_attrs(cx.doc, span) {
                            Some(token) => (token.counter_format(), token.value),
                            None => continue,
                        },
                    };
                    let spec = match closest {
                        Some(class) => {
                            let node = cx.doc.closest_with_class(span, class).unwrap_or(span);
                            Some(TriggerSpec {
                                node,
                                start: trigger.start,
                                end: trigger.end,
                                mode: trigger.mode,
                            })
                        }
                        None => Self::trigger_spec(trigger, root, cx.doc),
                    };
                    let Some(spec) = spec else {
                        continue;
                    };
                    cx.doc.bind_counter(span, format);
                    self.counters.push(span);
                    let count = Tween::from_to(
                        vec![span],
                        Style::new().with(Prop::Value, 0.0),
                        Style::new().with(Prop::Value, target),
                    )
                    .duration(*duration)
                    .ease(*ease);
                    self.arm(Reaction::new(Sequence::of(count)?, Vec::new()), Some(spec), cx);
                }
            }

            Effect::Pulse {
                targets,
                scale,
                duration,
                repeat_delay,
                ease,
            } => {
                let nodes = targets.select(cx.doc, root);
                if nodes.is_empty() {
                    return Ok(());
                }
                let mut pulse = Tween::to(nodes, Style::new().with(Prop::Scale, *scale))
                    .duration(*duration)
                    .repeat(Repeat::Infinite)
                    .repeat_delay(*repeat_delay)
                    .yoyo(true);
                pulse.ease = *ease;
                self.arm(Reaction::new(Sequence::of(pulse)?, Vec::new()), None, cx);
            }

            Effect::Parallax {
                targets,
                to,
                trigger,
                min_viewport_width,
            } => {
                if min_viewport_width.is_some_and(|w| cx.viewport.width < w) {
                    return Ok(());
                }
                let nodes = targets.select(cx.doc, root);
                let Some(spec) = Self::trigger_spec(trigger, root, cx.doc) else {
                    return Ok(());
                };
                if nodes.is_empty() {
                    return Ok(());
                }
                let drift = Tween::to(nodes, to.clone()).ease(Ease::Linear);
                self.scrub(Sequence::of(drift)?, spec, cx);
            }

            Effect::ParallaxField {
                count,
                travel,
                depth,
                min_viewport_width,
            } => {
                let Some(area) = cx.doc.rect(root) else {
                    return Ok(());
                };
                let drifting = !min_viewport_width.is_some_and(|w| cx.viewport.width < w);
                let mut rng = SplitMix64::new(stable_hash64(cx.seed, &self.name));
                for i in 0..*count {
                    let size = FIELD_MIN_SIZE + rng.next_f64() * FIELD_SIZE_RANGE;
                    let left = area.x0 + rng.next_f64() * cx.viewport.width;
                    let top = area.y0 + rng.next_f64() * depth;
                    let circle = Element::new("div")
                        .class("parallax-circle")
                        .rect(Rect::new(left, top, left + size, top + size))
                        .style(
                            Style::new()
                                .with(Prop::Opacity, 0.2)
                                .with(Prop::Blur, 4.0),
                        );
                    let Some(node) = cx.doc.append(root, circle) else {
                        continue;
                    };
                    self.synthetic.push(node);
                    if drifting {
                        let y = if i % 2 == 1 { *travel } else { -travel };
                        let drift =
                            Tween::to(vec![node], Style::new().with(Prop::Y, y)).ease(Ease::Linear);
                        self.scrub(
                            Sequence::of(drift)?,
                            TriggerSpec::scrub(
                                node,
                                Threshold::new(Edge::Top, Edge::Bottom),
                                Threshold::new(Edge::Bottom, Edge::Top),
                                None,
                            ),
                            cx,
                        );
                    }
                }
            }

            Effect::Magnetic {
                region,
                target,
                config,
            } => {
                let region = match region {
                    Some(sel) => sel.select_first(cx.doc, root),
                    None => Some(root),
                };
                if let (Some(region), Some(target)) = (region, target.select_first(cx.doc, root)) {
                    self.bindings.push(PointerBinding {
                        region,
                        effect: PointerEffect::Magnetic {
                            config: *config,
                            target,
                        },
                    });
                }
            }

            Effect::Tilt { cards, config } => {
                for card in cards.select(cx.doc, root) {
                    self.bindings.push(PointerBinding {
                        region: card,
                        effect: PointerEffect::Tilt { config: *config },
                    });
                }
            }

            Effect::HoverScale {
                regions,
                target,
                config,
            } => {
                for region in regions.select(cx.doc, root) {
                    if let Some(target) = target.select_first(cx.doc, region) {
                        self.bindings.push(PointerBinding {
                            region,
                            effect: PointerEffect::HoverScale {
                                config: *config,
                                target,
                            },
                        });
                    }
                }
            }

            Effect::IconSwap {
                region,
                primary,
                alternate,
            } => {
                let Some(region) = region.select_first(cx.doc, root) else {
                    return Ok(());
                };
                let icons = (
                    primary.select_first(cx.doc, region),
                    alternate.select_first(cx.doc, region),
                );
                if let (Some(primary), Some(alternate)) = icons {
                    self.bindings.push(PointerBinding {
                        region,
                        effect: PointerEffect::IconSwap {
                            config: IconSwap {
                                capability: cx.morph,
                            },
                            primary,
                            alternate,
                        },
                    });
                }
            }
        }
        Ok(())
    }

    fn add_step(
        &mut self,
        tl: TimelineBuilder,
        step: &Step,
        root: NodeId,
        cx: &mut SectionContext<'_>,
    ) -> PixoraResult<TimelineBuilder> {
        match step {
            Step::Tween { at, tween } => {
                let (targets, _) = self.resolve_targets(tween, root, cx.doc);
                if targets.is_empty() {
                    tracing::trace!(targets = %tween.targets, "timeline step targets missing");
                    return Ok(tl);
                }
                Ok(tl.add(tween.build(targets), *at))
            }
            Step::DrawPath {
                at,
                path,
                d,
                dot,
                duration,
            } => {
                let Some(line) = path.select_first(cx.doc, root) else {
                    return Ok(tl);
                };
                let motion = MotionPath::from_svg(d)?;
                let len = motion.dash_length();
                cx.doc.set_attr(line, "stroke-dasharray", len.to_string());
                self.dashed.push(line);
                cx.doc.set_prop(line, Prop::DashOffset, len);
                let mut tl = tl.add(
                    Tween::to(vec![line], Style::new().with(Prop::DashOffset, 0.0))
                        .duration(*duration)
                        .ease(Ease::OutCubic),
                    *at,
                );
                if let Some(dot) = dot.as_ref().and_then(|s| s.select_first(cx.doc, root)) {
                    cx.doc.bind_motion_path(dot, motion);
                    self.on_path.push(dot);
                    tl = tl.add(
                        Tween::from_to(
                            vec![dot],
                            Style::new().with(Prop::PathProgress, 0.0),
                            Style::new().with(Prop::PathProgress, 1.0),
                        )
                        .duration(*duration)
                        .ease(Ease::Linear),
                        Position::WithPrevious(0.0),
                    );
                }
                Ok(tl)
            }
            Step::Call { at, name, tweens } => {
                let follow = chain(tweens, root, cx.doc)?;
                self.cues.insert(name.clone(), follow);
                Ok(tl.cue(name.clone(), *at))
            }
        }
    }

    fn scrub(&mut self, seq: Sequence, spec: TriggerSpec, cx: &mut SectionContext<'_>) {
        let pb = cx.ticker.play_paused(seq, self.id);
        let tid = self.triggers.register(spec);
        self.scrubs.insert(tid, pb);
    }

    fn on_trigger_event(&mut self, tid: TriggerId, event: TriggerEvent, cx: &mut SectionContext<'_>) {
        match event {
            TriggerEvent::Enter => {
                if let Some(&idx) = self.on_trigger.get(&tid) {
                    tracing::debug!(section = %self.name, trigger = tid.0, "enter");
                    self.start(idx, cx);
                }
            }
            TriggerEvent::LeaveBack => {
                if let Some(&idx) = self.on_trigger.get(&tid) {
                    tracing::debug!(section = %self.name, trigger = tid.0, "leave back");
                    self.reset(idx, cx);
                }
            }
            TriggerEvent::Scrub { progress } => {
                if let Some(&pb) = self.scrubs.get(&tid) {
                    cx.ticker.seek(pb, progress, cx.doc);
                }
            }
        }
    }

    /// Evaluate this section's triggers at scroll offset `scroll_y`.
    pub fn on_scroll(&mut self, scroll_y: f64, cx: &mut SectionContext<'_>) {
        if !self.mounted {
            return;
        }
        for (tid, event) in self.triggers.update(scroll_y, cx.doc, cx.viewport) {
            self.on_trigger_event(tid, event, cx);
        }
    }

    /// Advance smoothed scrubs by `dt` seconds.
    pub fn on_frame(&mut self, dt: f64, cx: &mut SectionContext<'_>) {
        if !self.mounted {
            return;
        }
        for (tid, event) in self.triggers.tick(dt) {
            self.on_trigger_event(tid, event, cx);
        }
    }

    /// React to a ticker event; events of other owners are ignored.
    pub fn on_tick_event(&mut self, event: &TickEvent, cx: &mut SectionContext<'_>) {
        if !self.mounted {
            return;
        }
        match event {
            TickEvent::Complete { playback, owner } if *owner == self.id => {
                let Some(idx) = self.running.remove(playback) else {
                    return;
                };
                let Some(r) = self.reactions.get_mut(idx) else {
                    return;
                };
                if r.playing == Some(*playback) {
                    r.playing = None;
                }
                for done in r.on_complete.clone() {
                    match done {
                        Completion::RevertSplit(i) => {
                            if let Some(split) = self.splits.get(i) {
                                split.revert(cx.doc);
                            }
                        }
                        Completion::Play(seq) => {
                            let pb = cx.ticker.play(seq, self.id);
                            if let Some(r) = self.reactions.get_mut(idx) {
                                r.follow_ups.push(pb);
                            }
                        }
                    }
                }
            }
            TickEvent::Cue { owner, name, .. } if *owner == self.id => {
                if let Some(seq) = self.cues.get(name) {
                    tracing::trace!(section = %self.name, cue = %name, "cue");
                    let pb = cx.ticker.play(seq.clone(), self.id);
                    let owner = self.cue_owner.get(name).copied();
                    if let Some(r) = owner.and_then(|idx| self.reactions.get_mut(idx)) {
                        r.follow_ups.push(pb);
                    }
                }
            }
            _ => {}
        }
    }

    /// Release everything the section created. Safe to call repeatedly.
    #[tracing::instrument(skip_all, fields(section = %self.name, id = self.id.0))]
    pub fn unmount(&mut self, cx: &mut SectionContext<'_>) {
        if !self.mounted {
            return;
        }
        let cancelled = cx.ticker.cancel_owner(self.id);
        self.triggers.dispose_all();
        self.bindings.clear();
        for split in self.splits.drain(..).rev() {
            split.revert(cx.doc);
        }
        for node in self.counters.drain(..) {
            cx.doc.unbind_counter(node);
        }
        for line in self.dashed.drain(..) {
            cx.doc.remove_attr(line, "stroke-dasharray");
        }
        for dot in self.on_path.drain(..) {
            cx.doc.unbind_motion_path(dot);
        }
        for node in self.synthetic.drain(..) {
            cx.doc.remove(node);
        }
        self.reactions.clear();
        self.on_trigger.clear();
        self.scrubs.clear();
        self.running.clear();
        self.cues.clear();
        self.cue_owner.clear();
        self.mounted = false;
        tracing::debug!(cancelled, "section unmounted");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/section/runtime.rs"]
mod tests;
