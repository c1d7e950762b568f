use crate::{
    animation::{
        ease::Ease,
        style::Style,
        timeline::Position,
        tween::{DEFAULT_DURATION, Repeat, Tween},
    },
    dom::Selector,
    foundation::{
        core::NodeId,
        error::{PixoraError, PixoraResult},
    },
    pointer::{HoverScale, Magnetic, Tilt},
    scroll::{Edge, Threshold, TriggerMode},
    text::segment::Granularity,
};

/// Declarative description of one page section's motion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionPlan {
    /// Name used in logs and digests.
    pub name: String,
    /// Element the section is mounted on; selectors in effects are scoped to it.
    pub root: Selector,
    /// Effects in mount order.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl SectionPlan {
    /// Parse a plan from JSON.
    pub fn from_json(json: &str) -> PixoraResult<Self> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reject plans whose numbers could never animate.
    pub fn validate(&self) -> PixoraResult<()> {
        if self.name.trim().is_empty() {
            return Err(PixoraError::validation("section name must be non-empty"));
        }
        for effect in &self.effects {
            effect.validate().map_err(|e| match e {
                PixoraError::Validation(msg) | PixoraError::Animation(msg) => {
                    PixoraError::validation(format!("section '{}': {msg}", self.name))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

fn default_start() -> Threshold {
    Threshold::new(Edge::Top, Edge::Percent(75.0))
}

fn default_mode() -> TriggerMode {
    TriggerMode::Once
}

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

/// Scroll trigger attached to an effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerPlan {
    /// Element positioning the thresholds; defaults to the section root.
    #[serde(default)]
    pub target: Option<Selector>,
    /// Entry threshold.
    #[serde(default = "default_start")]
    pub start: Threshold,
    /// Scrub end threshold.
    #[serde(default)]
    pub end: Option<Threshold>,
    /// Reaction mode.
    #[serde(default = "default_mode")]
    pub mode: TriggerMode,
}

/// One tween over the elements matched inside the section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenPlan {
    /// Elements to animate.
    pub targets: Selector,
    /// Animate the letters or words of the matched elements instead of the elements.
    #[serde(default)]
    pub split: Option<Granularity>,
    /// Explicit start values.
    #[serde(default)]
    pub from: Option<Style>,
    /// End values.
    pub to: Style,
    /// Seconds per iteration.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Seconds before the first unit.
    #[serde(default)]
    pub delay: f64,
    /// Seconds between units.
    #[serde(default)]
    pub stagger: f64,
    /// Curve.
    #[serde(default)]
    pub ease: Option<Ease>,
    /// Extra iterations.
    #[serde(default)]
    pub repeat: Option<Repeat>,
    /// Pause between iterations.
    #[serde(default)]
    pub repeat_delay: f64,
    /// Alternate direction.
    #[serde(default)]
    pub yoyo: bool,
}

impl TweenPlan {
    /// Tween over resolved `targets`.
    pub fn build(&self, targets: Vec<NodeId>) -> Tween {
        let mut tween = match &self.from {
            Some(from) => Tween::from_to(targets, from.clone(), self.to.clone()),
            None => Tween::to(targets, self.to.clone()),
        }
        .duration(self.duration)
        .delay(self.delay)
        .stagger(self.stagger)
        .repeat_delay(self.repeat_delay)
        .yoyo(self.yoyo);
        tween.ease = self.ease;
        tween.repeat = self.repeat;
        tween
    }

    fn validate(&self) -> PixoraResult<()> {
        // Probe with one target so empty selections do not hide bad timings.
        self.build(vec![NodeId::new(0)]).validate()
    }
}

/// Step of a [`Effect::Timeline`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Tween placed at `at`.
    Tween {
        /// Placement.
        #[serde(default)]
        at: Position,
        /// The tween.
        tween: TweenPlan,
    },
    /// Stroke draw of an SVG path, optionally carrying a dot along it.
    DrawPath {
        /// Placement.
        #[serde(default)]
        at: Position,
        /// Path element.
        path: Selector,
        /// Path data of the element.
        d: String,
        /// Element moved along the path while it draws.
        #[serde(default)]
        dot: Option<Selector>,
        /// Seconds to draw.
        #[serde(default = "default_draw_duration")]
        duration: f64,
    },
    /// Named cue starting `tweens` back to back in their own playback.
    Call {
        /// Placement.
        #[serde(default)]
        at: Position,
        /// Cue name, unique within the section.
        name: String,
        /// Tweens chained one after another.
        tweens: Vec<TweenPlan>,
    },
}

fn default_draw_duration() -> f64 {
    0.8
}

fn default_slide_offset() -> f64 {
    60.0
}

fn default_slide_start() -> Threshold {
    Threshold::new(Edge::Top, Edge::Percent(85.0))
}

fn default_counter_duration() -> f64 {
    1.2
}

fn default_counter_ease() -> Ease {
    Ease::OutCubic
}

fn default_field_count() -> usize {
    12
}

fn default_field_travel() -> f64 {
    200.0
}

fn default_field_depth() -> f64 {
    5000.0
}

fn default_pulse_scale() -> f64 {
    1.05
}

fn default_pulse_duration() -> f64 {
    0.6
}

/// Motion attached to a section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Instant style write at mount.
    Set {
        /// Elements to write.
        targets: Selector,
        /// Values.
        style: Style,
    },
    /// One tween, played on trigger entry or at mount.
    Reveal {
        /// Trigger; `None` plays at mount.
        #[serde(default)]
        trigger: Option<TriggerPlan>,
        /// The tween.
        tween: TweenPlan,
        /// Restore split text once the reveal completes.
        #[serde(default)]
        revert_split: bool,
        /// Tween started when the reveal completes.
        #[serde(default)]
        then: Option<TweenPlan>,
    },
    /// Sequenced steps, played on trigger entry or at mount.
    Timeline {
        /// Trigger; `None` plays at mount.
        #[serde(default)]
        trigger: Option<TriggerPlan>,
        /// Ease for tweens without one.
        #[serde(default)]
        ease: Option<Ease>,
        /// Steps in insertion order.
        steps: Vec<Step>,
    },
    /// Items sliding in from alternating sides with an underline draw; reset on leave-back.
    SlideItems {
        /// Item elements; each one is its own trigger.
        items: Selector,
        /// Sliding part of an item.
        content: Selector,
        /// Underline inside an item.
        #[serde(default)]
        underline: Option<Selector>,
        /// Horizontal start offset in pixels.
        #[serde(default = "default_slide_offset")]
        offset: f64,
        /// Entry threshold of each item.
        #[serde(default = "default_slide_start")]
        start: Threshold,
    },
    /// Counting animation on numeric elements.
    Counters {
        /// Counter elements.
        targets: Selector,
        /// Target value for every element; `None` reads the metric attributes.
        #[serde(default)]
        value: Option<f64>,
        /// Use the closest ancestor with this class as the trigger element.
        #[serde(default)]
        closest: Option<String>,
        /// Trigger; `target` is ignored when `closest` is set.
        trigger: TriggerPlan,
        /// Seconds to count.
        #[serde(default = "default_counter_duration")]
        duration: f64,
        /// Curve.
        #[serde(default = "default_counter_ease")]
        ease: Ease,
    },
    /// Endless scale pulse starting at mount.
    Pulse {
        /// Pulsing elements.
        targets: Selector,
        /// Peak scale.
        #[serde(default = "default_pulse_scale")]
        scale: f64,
        /// Seconds per half cycle.
        #[serde(default = "default_pulse_duration")]
        duration: f64,
        /// Pause between half cycles.
        #[serde(default)]
        repeat_delay: f64,
        /// Curve.
        #[serde(default)]
        ease: Option<Ease>,
    },
    /// Style driven by scroll progress through the trigger.
    Parallax {
        /// Moving elements.
        targets: Selector,
        /// Values reached at the end threshold.
        to: Style,
        /// Trigger in scrub mode.
        trigger: TriggerPlan,
        /// Skip below this viewport width.
        #[serde(default)]
        min_viewport_width: Option<f64>,
    },
    /// Synthetic background shapes drifting with scroll.
    ParallaxField {
        /// Number of shapes.
        #[serde(default = "default_field_count")]
        count: usize,
        /// Vertical drift in pixels; odd shapes drift down, even ones up.
        #[serde(default = "default_field_travel")]
        travel: f64,
        /// Shapes are scattered over this many pixels below the root top.
        #[serde(default = "default_field_depth")]
        depth: f64,
        /// Skip the drift below this viewport width.
        #[serde(default)]
        min_viewport_width: Option<f64>,
    },
    /// Button leaning toward the pointer inside a region.
    Magnetic {
        /// Listening region; defaults to the section root.
        #[serde(default)]
        region: Option<Selector>,
        /// Moving element.
        target: Selector,
        /// Tuning.
        #[serde(default)]
        config: Magnetic,
    },
    /// Cards tilting toward the pointer.
    Tilt {
        /// Cards.
        cards: Selector,
        /// Tuning.
        #[serde(default)]
        config: Tilt,
    },
    /// Icon scaling while its region is hovered.
    HoverScale {
        /// Regions.
        regions: Selector,
        /// Scaled element inside each region.
        target: Selector,
        /// Tuning.
        #[serde(default)]
        config: HoverScale,
    },
    /// Icon swap on hover; morph or crossfade per stage capability.
    IconSwap {
        /// Region.
        region: Selector,
        /// Icon shown at rest.
        primary: Selector,
        /// Icon shown while hovered.
        alternate: Selector,
    },
}

impl Effect {
    fn validate(&self) -> PixoraResult<()> {
        let finite = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PixoraError::validation(format!(
                    "{name} must be finite and >= 0, got {v}"
                )))
            }
        };
        match self {
            Self::Set { .. } | Self::IconSwap { .. } => Ok(()),
            Self::Reveal { tween, then, .. } => {
                tween.validate()?;
                then.as_ref().map_or(Ok(()), TweenPlan::validate)
            }
            Self::Timeline { steps, .. } => {
                for step in steps {
                    match step {
                        Step::Tween { tween, .. } => tween.validate()?,
                        Step::DrawPath { duration, .. } => finite("draw duration", *duration)?,
                        Step::Call { name, tweens, .. } => {
                            if name.is_empty() {
                                return Err(PixoraError::validation("call name must be non-empty"));
                            }
                            for t in tweens {
                                t.validate()?;
                            }
                        }
                    }
                }
                Ok(())
            }
            Self::SlideItems { offset, .. } => finite("slide offset", *offset),
            Self::Counters {
                duration, value, ..
            } => {
                finite("counter duration", *duration)?;
                match value {
                    Some(v) if !v.is_finite() => Err(PixoraError::validation(format!(
                        "counter value must be finite, got {v}"
                    ))),
                    _ => Ok(()),
                }
            }
            Self::Pulse {
                duration,
                repeat_delay,
                ..
            } => {
                finite("pulse duration", *duration)?;
                finite("pulse repeat_delay", *repeat_delay)
            }
            Self::Parallax { trigger, .. } => match trigger.mode {
                TriggerMode::Scrub { .. } => Ok(()),
                _ => Err(PixoraError::validation("parallax trigger must scrub")),
            },
            Self::ParallaxField { travel, depth, .. } => {
                finite("field travel", *travel)?;
                finite("field depth", *depth)
            }
            Self::Magnetic { config, .. } => {
                finite("magnetic strength", config.strength)?;
                finite("magnetic max_offset", config.max_offset)
            }
            Self::Tilt { config, .. } => finite("tilt max_deg", config.max_deg),
            Self::HoverScale { config, .. } => finite("hover scale", config.scale),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/section/plan.rs"]
mod tests;
