//! Page-level driver: one document, one ticker and every mounted section.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    animation::{
        style::Style,
        ticker::{TickEvent, Ticker},
        timeline::Sequence,
        tween::Tween,
    },
    dom::{Document, NodeKind},
    foundation::{
        core::{NodeId, Point, SectionId, Viewport},
        error::{PixoraError, PixoraResult},
    },
    pointer::{MorphCapability, PointerEvent},
    section::{SectionContext, SectionPlan, SectionRuntime},
};

/// Built-in capability registered once per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plugin {
    /// Scroll-position triggers.
    ScrollTrigger,
    /// Motion along SVG paths.
    MotionPath,
    /// Pointer observation.
    Observer,
}

/// Registered plugin set.
#[derive(Debug)]
pub struct PluginRegistry {
    plugins: BTreeSet<Plugin>,
}

impl PluginRegistry {
    /// Return `true` when `plugin` is registered.
    pub fn has(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Registered plugins in a stable order.
    pub fn plugins(&self) -> impl Iterator<Item = Plugin> + '_ {
        self.plugins.iter().copied()
    }
}

static REGISTRY: OnceLock<PluginRegistry> = OnceLock::new();
static INIT_RUNS: AtomicUsize = AtomicUsize::new(0);

/// Register the built-in plugins. Only the first call does any work; every call returns the
/// same registry.
pub fn init() -> &'static PluginRegistry {
    REGISTRY.get_or_init(|| {
        INIT_RUNS.fetch_add(1, Ordering::SeqCst);
        let plugins = BTreeSet::from([Plugin::ScrollTrigger, Plugin::MotionPath, Plugin::Observer]);
        tracing::debug!(count = plugins.len(), "plugins registered");
        PluginRegistry { plugins }
    })
}

/// How many times registration actually ran in this process.
pub fn init_runs() -> usize {
    INIT_RUNS.load(Ordering::SeqCst)
}

fn default_fps() -> f64 {
    60.0
}

/// Stage settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Visible window.
    pub viewport: Viewport,
    /// Frame rate used by [`Stage::run_frames`].
    pub fps: f64,
    /// Seed for synthetic decorations.
    pub seed: u64,
    /// Icon swap rendering.
    pub morph_capability: MorphCapability,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fps: default_fps(),
            seed: 0,
            morph_capability: MorphCapability::default(),
        }
    }
}

impl StageConfig {
    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> PixoraResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive sizes and frame rates.
    pub fn validate(&self) -> PixoraResult<()> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PixoraError::validation(format!(
                "viewport must be positive, got {width}x{height}"
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(PixoraError::validation(format!(
                "fps must be finite and > 0, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

/// Style and text of one animated element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NodeDigest {
    /// Element handle.
    pub node: NodeId,
    /// `tag#id.class` label.
    pub label: String,
    /// Written properties.
    pub style: Style,
    /// Text of counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Summary of one mounted section.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SectionDigest {
    /// Stage handle.
    pub id: SectionId,
    /// Plan name.
    pub name: String,
    /// Registered scroll triggers.
    pub triggers: usize,
    /// Pointer regions.
    pub bindings: usize,
    /// Live playbacks.
    pub playing: usize,
}

/// Observable state of a stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Digest {
    /// Current scroll offset.
    pub scroll_y: f64,
    /// Mounted sections.
    pub sections: Vec<SectionDigest>,
    /// Elements with written styles, in document order.
    pub nodes: Vec<NodeDigest>,
}

fn context<'a>(
    doc: &'a mut Document,
    ticker: &'a mut Ticker,
    config: &StageConfig,
) -> SectionContext<'a> {
    SectionContext {
        doc,
        ticker,
        viewport: config.viewport,
        seed: config.seed,
        morph: config.morph_capability,
    }
}

fn label(doc: &Document, node: NodeId) -> Option<String> {
    let Some(NodeKind::Element(e)) = doc.kind(node) else {
        return None;
    };
    let mut out = e.tag.clone();
    if let Some(id) = &e.id {
        out.push('#');
        out.push_str(id);
    }
    for class in &e.classes {
        out.push('.');
        out.push_str(class);
    }
    Some(out)
}

/// Page driver.
///
/// Hosts feed scroll offsets, pointer input and frame deltas; the stage routes them to the
/// mounted sections and the shared ticker.
#[derive(Debug)]
pub struct Stage {
    doc: Document,
    ticker: Ticker,
    config: StageConfig,
    sections: BTreeMap<SectionId, SectionRuntime>,
    scroll_y: f64,
    hovered: BTreeSet<(SectionId, usize)>,
    next_id: u32,
}

impl Stage {
    /// Stage over `doc`. Registers the built-in plugins on first use.
    pub fn new(doc: Document, config: StageConfig) -> PixoraResult<Self> {
        config.validate()?;
        init();
        Ok(Self {
            doc,
            ticker: Ticker::new(),
            config,
            sections: BTreeMap::new(),
            scroll_y: 0.0,
            hovered: BTreeSet::new(),
            next_id: 0,
        })
    }

    /// Mount `plan` and evaluate its triggers at the current scroll offset.
    #[tracing::instrument(skip_all, fields(section = %plan.name))]
    pub fn mount(&mut self, plan: &SectionPlan) -> PixoraResult<SectionId> {
        let id = SectionId(self.next_id);
        let mut cx = context(&mut self.doc, &mut self.ticker, &self.config);
        let mut rt = SectionRuntime::mount(id, plan, &mut cx)?;
        rt.on_scroll(self.scroll_y, &mut cx);
        self.next_id += 1;
        self.sections.insert(id, rt);
        Ok(id)
    }

    /// Mount every plan in order; on error, sections mounted so far stay mounted.
    pub fn mount_all(&mut self, plans: &[SectionPlan]) -> PixoraResult<Vec<SectionId>> {
        plans.iter().map(|p| self.mount(p)).collect()
    }

    /// Unmount a section. Returns `false` for unknown handles.
    #[tracing::instrument(skip(self))]
    pub fn unmount(&mut self, id: SectionId) -> bool {
        let Some(mut rt) = self.sections.remove(&id) else {
            return false;
        };
        rt.unmount(&mut context(&mut self.doc, &mut self.ticker, &self.config));
        self.hovered.retain(|(owner, _)| *owner != id);
        true
    }

    /// Unmount every section.
    pub fn unmount_all(&mut self) {
        let ids: Vec<SectionId> = self.sections.keys().copied().collect();
        for id in ids {
            self.unmount(id);
        }
    }

    /// Move the page to scroll offset `y` and fire crossed triggers.
    #[tracing::instrument(skip(self))]
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
        let mut cx = context(&mut self.doc, &mut self.ticker, &self.config);
        for rt in self.sections.values_mut() {
            rt.on_scroll(y, &mut cx);
        }
    }

    /// Advance playbacks by `dt` seconds and deliver their events to the owning sections.
    pub fn tick(&mut self, dt: f64) -> Vec<TickEvent> {
        let events = self.ticker.tick(dt, &mut self.doc);
        let mut cx = context(&mut self.doc, &mut self.ticker, &self.config);
        for event in &events {
            let owner = match event {
                TickEvent::Cue { owner, .. } | TickEvent::Complete { owner, .. } => *owner,
            };
            if let Some(rt) = self.sections.get_mut(&owner) {
                rt.on_tick_event(event, &mut cx);
            }
        }
        for rt in self.sections.values_mut() {
            rt.on_frame(dt, &mut cx);
        }
        events
    }

    /// Run `frames` ticks at the configured frame rate.
    pub fn run_frames(&mut self, frames: usize) -> Vec<TickEvent> {
        let dt = 1.0 / self.config.fps;
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(self.tick(dt));
        }
        events
    }

    fn play_all(&mut self, owner: SectionId, tweens: Vec<Tween>) {
        for tween in tweens {
            match Sequence::of(tween) {
                Ok(seq) => {
                    self.ticker.play(seq, owner);
                }
                Err(err) => tracing::debug!(%err, "pointer tween rejected"),
            }
        }
    }

    fn respond(&mut self, owner: SectionId, idx: usize, event: PointerEvent) {
        let Some(binding) = self
            .sections
            .get(&owner)
            .and_then(|rt| rt.bindings().get(idx))
            .copied()
        else {
            return;
        };
        let rect = self.doc.rect(binding.moving_element());
        let tweens = binding.respond(event, rect);
        self.play_all(owner, tweens);
    }

    fn regions(&self) -> Vec<(SectionId, usize, NodeId)> {
        self.sections
            .iter()
            .flat_map(|(&id, rt)| {
                rt.bindings()
                    .iter()
                    .enumerate()
                    .map(move |(i, b)| (id, i, b.region))
            })
            .collect()
    }

    /// Pointer moved to `point` in document coordinates.
    ///
    /// Regions under the pointer receive `Enter` on the first move and `Move` on every move;
    /// regions the pointer left receive `Leave`.
    pub fn pointer_move(&mut self, point: Point) {
        for (owner, idx, region) in self.regions() {
            let inside = self.doc.rect(region).is_some_and(|r| r.contains(point));
            let key = (owner, idx);
            if inside {
                if self.hovered.insert(key) {
                    self.respond(owner, idx, PointerEvent::Enter);
                }
                self.respond(owner, idx, PointerEvent::Move(point));
            } else if self.hovered.remove(&key) {
                self.respond(owner, idx, PointerEvent::Leave);
            }
        }
    }

    /// Pointer entered `node` without a position.
    pub fn pointer_enter(&mut self, node: NodeId) {
        for (owner, idx, region) in self.regions() {
            if region == node && self.hovered.insert((owner, idx)) {
                self.respond(owner, idx, PointerEvent::Enter);
            }
        }
    }

    /// Pointer left `node`.
    pub fn pointer_leave(&mut self, node: NodeId) {
        for (owner, idx, region) in self.regions() {
            if region == node && self.hovered.remove(&(owner, idx)) {
                self.respond(owner, idx, PointerEvent::Leave);
            }
        }
    }

    /// Document being animated.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access, e.g. for layout updates.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Shared ticker.
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Settings.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Current scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Mounted section by handle.
    pub fn section(&self, id: SectionId) -> Option<&SectionRuntime> {
        self.sections.get(&id)
    }

    /// Handles of mounted sections in mount order.
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.keys().copied().collect()
    }

    /// Snapshot of sections and every element with written styles.
    pub fn digest(&self) -> Digest {
        let sections = self
            .sections
            .values()
            .map(|rt| SectionDigest {
                id: rt.id(),
                name: rt.name().to_string(),
                triggers: rt.trigger_count(),
                bindings: rt.bindings().len(),
                playing: self.ticker.active_for(rt.id()).len(),
            })
            .collect();
        let nodes = self
            .doc
            .descendants(self.doc.root())
            .into_iter()
            .filter_map(|node| {
                let style = self.doc.style(node)?;
                if style.is_empty() {
                    return None;
                }
                Some(NodeDigest {
                    node,
                    label: label(&self.doc, node)?,
                    style: style.clone(),
                    text: self
                        .doc
                        .has_counter(node)
                        .then(|| self.doc.text_content(node))
                        .flatten(),
                })
            })
            .collect();
        Digest {
            scroll_y: self.scroll_y,
            sections,
            nodes,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/mod.rs"]
mod tests;
