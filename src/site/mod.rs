//! The Pixora page: its document with layout boxes and the motion plan of every section.

use crate::{
    animation::style::{Prop, Style},
    dom::{Document, Element},
    foundation::{
        core::{NodeId, Rect, SectionId, Viewport},
        error::{PixoraError, PixoraResult},
    },
    section::SectionPlan,
    stage::{Stage, StageConfig},
    text::metric::annotate_metrics,
};

const PLANS_JSON: &str = include_str!("plans.json");

/// Section plans of the page in mount order.
pub fn plans() -> PixoraResult<Vec<SectionPlan>> {
    let plans: Vec<SectionPlan> = serde_json::from_str(PLANS_JSON)?;
    for plan in &plans {
        plan.validate()?;
    }
    Ok(plans)
}

/// Stage over [`document`] with every plan of [`plans`] mounted.
pub fn stage(config: StageConfig) -> PixoraResult<(Stage, Vec<SectionId>)> {
    let mut stage = Stage::new(document(config.viewport)?, config)?;
    let ids = stage.mount_all(&plans()?)?;
    Ok((stage, ids))
}

const PAD: f64 = 64.0;

/// Id of every section root in document order, with its height as a multiple of the
/// viewport height or in pixels.
const SECTIONS: &[(&str, Height)] = &[
    ("hero", Height::Viewport(1.0)),
    ("about", Height::Px(1000.0)),
    ("solution", Height::Px(560.0)),
    ("why", Height::Viewport(0.75)),
    ("services", Height::Px(900.0)),
    ("case-studies", Height::Px(1300.0)),
    ("how", Height::Px(900.0)),
    ("cta", Height::Px(500.0)),
];

#[derive(Clone, Copy, Debug)]
enum Height {
    Viewport(f64),
    Px(f64),
}

const PROBLEMS: &[(&str, &str)] = &[
    (
        "Fundraising",
        "Investors don’t trust founders without a strong online presence.",
    ),
    (
        "Networking",
        "Endless coffee chats can’t scale your reach or influence.",
    ),
    (
        "Hiring",
        "Top talent won’t join leaders who look invisible online.",
    ),
    (
        "Time",
        "Founders are too busy running the company to manage LinkedIn.",
    ),
];

const WHY_CARDS: &[(&str, &str)] = &[
    (
        "VCs check LinkedIn",
        " of investors review your profile before a meeting. → Turn first impressions into instant trust.",
    ),
    (
        "Attract top talent",
        "The best candidates follow strong leaders. → Showcase vision and magnetize A-players.",
    ),
    (
        "Raise funding with credibility",
        "Consistency builds visibility, and visibility builds trust. → Become the founder investors believe in.",
    ),
    (
        "Close enterprise deals",
        "Decision-makers buy from leaders they recognize. → Convert cold outreach into warm conversations.",
    ),
];

const PLANS: &[(&str, &str, &str)] = &[
    (
        "Foundation",
        "For founders igniting their LinkedIn presence.",
        "₹83,000 / month",
    ),
    (
        "Amplify",
        "For leaders ready to scale their reach.",
        "₹1,24,500 / month",
    ),
    (
        "Influence",
        "For serious players going all-in on LinkedIn.",
        "₹1,66,000 / month",
    ),
];

const CASES: &[(&str, &str)] = &[
    (
        "Fintech Launch",
        "From stealth to scale—interactive metrics built investor confidence and accelerated fundraising momentum.",
    ),
    (
        "Enterprise SaaS",
        "Split-text storytelling powered clarity and urgency, driving a 2.1x increase in inbound demo requests and shortening sales cycles.",
    ),
    (
        "HealthTech",
        "Morphing iconography simplified complex product flows, leading to 18% faster adoption and smoother onboarding across teams.",
    ),
    (
        "Creator Tools",
        "Observer-powered gestures and microinteractions boosted signups by 22% while strengthening engagement with creators.",
    ),
];

const STEPS: &[(&str, &str)] = &[
    (
        "Deep Dive & Strategy",
        "We start with a comprehensive audit and strategy session to understand your unique goals and audience.",
    ),
    (
        "Content Creation & Optimization",
        "Our team crafts compelling content, optimized for engagement and designed to resonate with your target market.",
    ),
    (
        "Amplify & Engage",
        "We deploy and manage your content, actively engaging with your audience to maximize reach and impact.",
    ),
];

struct Page {
    doc: Document,
    width: f64,
}

impl Page {
    fn add(&mut self, parent: NodeId, el: Element) -> PixoraResult<NodeId> {
        self.doc
            .append(parent, el)
            .ok_or_else(|| PixoraError::validation(format!("missing parent node {parent}")))
    }

    /// Child box spanning the content column at `y`.
    fn full(&self, y: f64, h: f64) -> Rect {
        Rect::new(PAD, y, self.width - PAD, y + h)
    }

    fn hero(&mut self, root: NodeId, top: f64, height: f64) -> PixoraResult<()> {
        let w = self.width;
        let mid = top + height / 2.0;
        self.add(
            root,
            Element::new("span")
                .class("badge")
                .rect(Rect::new(w / 2.0 - 150.0, mid - 180.0, w / 2.0 + 150.0, mid - 150.0))
                .text("Autopilot • Growth • Influence"),
        )?;
        self.add(
            root,
            Element::new("h1")
                .class("big")
                .rect(self.full(mid - 130.0, 120.0))
                .text("Your LinkedIn Presence. On Autopilot."),
        )?;
        self.add(
            root,
            Element::new("p")
                .class("lead")
                .rect(Rect::new(w / 2.0 - 380.0, mid, w / 2.0 + 380.0, mid + 60.0))
                .text("Turn your profile into a growth engine for fundraising, hiring, and influence."),
        )?;
        self.add(
            root,
            Element::new("a")
                .class("btn")
                .attr("href", "#get-started")
                .rect(Rect::new(w / 2.0 - 90.0, mid + 90.0, w / 2.0 + 90.0, mid + 146.0))
                .text("Get Started"),
        )?;
        Ok(())
    }

    fn about(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        let half = self.width / 2.0;
        let left = self.add(
            root,
            Element::new("div")
                .class("problems")
                .class("col")
                .rect(Rect::new(PAD, top + 100.0, half - 32.0, top + 900.0)),
        )?;
        self.add(
            left,
            Element::new("div")
                .class("kicker")
                .rect(Rect::new(PAD, top + 100.0, half - 32.0, top + 130.0))
                .text("Problems"),
        )?;
        for (i, (title, body)) in PROBLEMS.iter().enumerate() {
            let y = top + 160.0 + i as f64 * 180.0;
            let bx = Rect::new(PAD, y, half - 32.0, y + 150.0);
            let card = self.add(
                left,
                Element::new("div").class("problem-card").class("card").rect(bx),
            )?;
            self.add(card, Element::new("h3").rect(bx).text(*title))?;
            self.add(card, Element::new("p").rect(bx).text(*body))?;
        }

        let x0 = half + 32.0;
        let x1 = self.width - PAD;
        let right = self.add(
            root,
            Element::new("div")
                .class("solution-col")
                .class("col")
                .rect(Rect::new(x0, top + 100.0, x1, top + 900.0)),
        )?;
        self.add(
            right,
            Element::new("div")
                .class("kicker")
                .rect(Rect::new(x0, top + 100.0, x1, top + 130.0))
                .text("Solution"),
        )?;
        self.add(
            right,
            Element::new("h2")
                .class("big")
                .rect(Rect::new(x0, top + 140.0, x1, top + 220.0))
                .text("Pixora’s 3x3 Framework"),
        )?;
        let diagram = Rect::new(x0, top + 240.0, x1, top + 420.0);
        let svg = self.add(right, Element::new("svg").class("diagram").rect(diagram))?;
        for (class, label) in [("sq1", "Posts / week"), ("sq2", "Months"), ("sq3", "Reach")] {
            self.add(
                svg,
                Element::new("rect").class(class).rect(diagram).text(label),
            )?;
        }
        for (line, d) in [
            ("line1", "M210 120 C 250 90, 300 90, 340 120"),
            ("line2", "M460 120 C 500 90, 550 90, 590 120"),
        ] {
            self.add(svg, Element::new("path").class(line).attr("d", d).rect(diagram))?;
        }
        for dot in ["dot1", "dot2"] {
            self.add(svg, Element::new("circle").class(dot).rect(diagram))?;
        }
        self.add(
            right,
            Element::new("p")
                .class("sub1")
                .class("lead")
                .rect(Rect::new(x0, top + 440.0, x1, top + 500.0))
                .text("Consistency compounds. Three posts per week, over months, builds exponential reach and trust."),
        )?;
        self.add(
            right,
            Element::new("p")
                .class("sub2")
                .rect(Rect::new(x0, top + 510.0, x1, top + 580.0))
                .text("Pixora runs your LinkedIn on autopilot, so you raise faster, hire smarter, and build influence without losing focus on your startup."),
        )?;
        Ok(())
    }

    fn solution(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        self.add(
            root,
            Element::new("h2")
                .class("big")
                .rect(self.full(top + 64.0, 80.0))
                .text("Pixora’s 3x3 Framework"),
        )?;
        let field = Rect::new(PAD, top + 156.0, PAD + 420.0, top + 336.0);
        let playfield = self.add(root, Element::new("div").class("playfield").rect(field))?;
        self.add(
            playfield,
            Element::new("div")
                .class("glow")
                .rect(Rect::new(field.x0, field.y0 + 20.0, field.x0 + 80.0, field.y0 + 160.0))
                .style(Style::new().with(Prop::Opacity, 0.0)),
        )?;
        self.add(
            playfield,
            Element::new("div")
                .class("line-clear")
                .rect(Rect::new(field.x0, field.y0 + 120.0, field.x1, field.y0 + 124.0))
                .style(Style::new().with(Prop::Opacity, 0.0)),
        )?;
        for (class, label) in [
            ("block-purple", "Posts / week"),
            ("block-teal", "Months"),
            ("block-orange", "Reach"),
        ] {
            let bx = Rect::new(field.x0, field.y1 - 86.0, field.x0 + 86.0, field.y1);
            let block = self.add(
                playfield,
                Element::new("div").class("block").class(class).rect(bx),
            )?;
            self.add(block, Element::new("div").class("label").rect(bx).text(label))?;
        }
        Ok(())
    }

    fn why(&mut self, root: NodeId, top: f64, height: f64) -> PixoraResult<()> {
        self.add(
            root,
            Element::new("div")
                .class("grid-bg")
                .rect(Rect::new(0.0, top, self.width, top + height)),
        )?;
        self.add(
            root,
            Element::new("h2")
                .class("big")
                .rect(self.full(top + 40.0, 80.0))
                .text("Why LinkedIn?"),
        )?;
        let grid = self.add(
            root,
            Element::new("div").class("grid").rect(self.full(top + 140.0, 260.0)),
        )?;
        let cell = (self.width - 2.0 * PAD - 48.0) / 4.0;
        for (i, (title, body)) in WHY_CARDS.iter().enumerate() {
            let x = PAD + i as f64 * (cell + 16.0);
            let bx = Rect::new(x, top + 140.0, x + cell, top + 400.0);
            let mut el = Element::new("div").class("card");
            if i == 3 {
                el = el.class("card-deals");
            }
            let card = self.add(grid, el.rect(bx))?;
            if i == 3 {
                let icon = Rect::new(x, bx.y0, x + 32.0, bx.y0 + 32.0);
                let svg = self.add(card, Element::new("svg").rect(icon))?;
                self.add(
                    svg,
                    Element::new("path")
                        .class("icon-mag")
                        .attr("d", "M28 12a16 16 0 1 1 0 32 16 16 0 0 1 0-32Zm18 30-10-10")
                        .rect(icon),
                )?;
                self.add(
                    svg,
                    Element::new("path")
                        .class("icon-handshake")
                        .attr(
                            "d",
                            "M12 36l8 6c2 1.5 4.5 1.5 6.5 0l3.5-3.5 3.5 3.5c2 1.5 4.5 1.5 6.5 0l8-6M20 28l8 6 8-6",
                        )
                        .rect(icon)
                        .style(Style::new().with(Prop::Opacity, 0.0)),
                )?;
            }
            self.add(card, Element::new("div").class("card-title").rect(bx).text(*title))?;
            if i == 0 {
                self.add(card, Element::new("span").class("stat").rect(bx).text("0"))?;
                self.add(card, Element::new("span").rect(bx).text("%"))?;
            }
            self.add(card, Element::new("p").rect(bx).text(*body))?;
        }
        Ok(())
    }

    fn services(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        let header = self.add(
            root,
            Element::new("header").class("header").rect(self.full(top + 64.0, 120.0)),
        )?;
        self.add(
            header,
            Element::new("h2")
                .class("title")
                .rect(self.full(top + 64.0, 70.0))
                .text("Our Plans"),
        )?;
        self.add(
            header,
            Element::new("p")
                .class("subtitle")
                .rect(self.full(top + 140.0, 40.0))
                .text("Pick your growth velocity"),
        )?;
        let cell = (self.width - 2.0 * PAD - 48.0) / 3.0;
        for (i, (plan, tagline, price)) in PLANS.iter().enumerate() {
            let x = PAD + i as f64 * (cell + 24.0);
            let bx = Rect::new(x, top + 240.0, x + cell, top + 800.0);
            let card = self.add(root, Element::new("article").class("price-card").rect(bx))?;
            self.add(card, Element::new("h3").class("plan").rect(bx).text(*plan))?;
            self.add(card, Element::new("p").class("tagline").rect(bx).text(*tagline))?;
            self.add(card, Element::new("div").class("price").rect(bx).text(*price))?;
        }
        Ok(())
    }

    fn case_studies(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        self.add(
            root,
            Element::new("h1")
                .class("big")
                .rect(self.full(top + 64.0, 90.0))
                .text("Outcomes, not just outputs"),
        )?;
        self.add(
            root,
            Element::new("p")
                .class("support")
                .rect(self.full(top + 164.0, 60.0))
                .text("Pixora transforms founder stories into measurable business outcomes—driving trust, traction, and growth."),
        )?;
        for (i, (title, text)) in CASES.iter().enumerate() {
            let y = top + 260.0 + i as f64 * 240.0;
            let bx = self.full(y, 220.0);
            let side = if i % 2 == 0 { "align-left" } else { "align-right" };
            let item = self.add(root, Element::new("div").class("case-item").class(side).rect(bx))?;
            let content = self.add(item, Element::new("div").class("case-content").rect(bx))?;
            self.add(content, Element::new("h3").class("case-title").rect(bx).text(*title))?;
            self.add(
                content,
                Element::new("div")
                    .class("case-underline")
                    .rect(Rect::new(bx.x0, y + 34.0, bx.x0 + 70.0, y + 36.0))
                    .style(Style::new().with(Prop::ScaleX, 0.0)),
            )?;
            let body = self.add(
                content,
                Element::new("p").class("case-description").rect(bx),
            )?;
            annotate_metrics(&mut self.doc, body, text);
        }
        Ok(())
    }

    fn how(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        self.add(
            root,
            Element::new("h2")
                .class("big")
                .rect(self.full(top + 64.0, 70.0))
                .text("How We Do It"),
        )?;
        let grid = self.add(
            root,
            Element::new("div")
                .class("how-we-do-it-grid")
                .rect(self.full(top + 180.0, 460.0)),
        )?;
        let cell = (self.width - 2.0 * PAD - 48.0) / 3.0;
        for (i, (title, body)) in STEPS.iter().enumerate() {
            let x = PAD + i as f64 * (cell + 24.0);
            let bx = Rect::new(x, top + 180.0, x + cell, top + 640.0);
            let step = self.add(grid, Element::new("div").class("how-we-do-it-step").rect(bx))?;
            self.add(
                step,
                Element::new("div")
                    .class("how-we-do-it-icon")
                    .rect(Rect::new(x + cell / 2.0 - 24.0, bx.y0 + 30.0, x + cell / 2.0 + 24.0, bx.y0 + 78.0)),
            )?;
            self.add(step, Element::new("h3").rect(bx).text(*title))?;
            self.add(step, Element::new("p").rect(bx).text(*body))?;
        }
        let w = self.width;
        self.add(
            root,
            Element::new("a")
                .class("btn")
                .attr("href", "#contact")
                .rect(Rect::new(w / 2.0 - 110.0, top + 700.0, w / 2.0 + 110.0, top + 764.0))
                .text("Book a Call"),
        )?;
        Ok(())
    }

    fn cta(&mut self, root: NodeId, top: f64) -> PixoraResult<()> {
        self.add(
            root,
            Element::new("h2")
                .class("big")
                .rect(self.full(top + 120.0, 80.0))
                .text("Ready to add gravity to your story?"),
        )?;
        self.add(
            root,
            Element::new("p")
                .class("lead")
                .rect(self.full(top + 210.0, 40.0))
                .text("Let's choreograph a narrative your audience can't ignore."),
        )?;
        let w = self.width;
        self.add(
            root,
            Element::new("a")
                .class("btn")
                .attr("href", "#")
                .rect(Rect::new(w / 2.0 - 110.0, top + 290.0, w / 2.0 + 110.0, top + 350.0))
                .text("Start the Project"),
        )?;
        Ok(())
    }
}

/// The page laid out for `viewport`: a background canvas followed by every section stacked
/// top to bottom.
pub fn document(viewport: Viewport) -> PixoraResult<Document> {
    let mut page = Page {
        doc: Document::new(),
        width: viewport.width,
    };
    let body = page.doc.root();
    let canvas = page.add(body, Element::new("div").id("canvas").class("canvas-bg"))?;
    let main = page.add(body, Element::new("main"))?;

    let mut top = 0.0;
    for &(id, height) in SECTIONS {
        let h = match height {
            Height::Viewport(f) => f * viewport.height,
            Height::Px(px) => px,
        };
        let bx = Rect::new(0.0, top, viewport.width, top + h);
        let mut el = Element::new("section").id(id).class("section").rect(bx);
        if id == "cta" {
            el = el.class("contrast");
        }
        let root = page.add(main, el)?;
        match id {
            "hero" => page.hero(root, top, h)?,
            "about" => page.about(root, top)?,
            "solution" => page.solution(root, top)?,
            "why" => page.why(root, top, h)?,
            "services" => page.services(root, top)?,
            "case-studies" => page.case_studies(root, top)?,
            "how" => page.how(root, top)?,
            _ => page.cta(root, top)?,
        }
        top += h;
    }
    page.doc.set_rect(main, Rect::new(0.0, 0.0, viewport.width, top));
    page.doc.set_rect(canvas, Rect::new(0.0, 0.0, viewport.width, top));
    page.doc.set_rect(body, Rect::new(0.0, 0.0, viewport.width, top));
    tracing::debug!(height = top, nodes = page.doc.node_count(), "page laid out");
    Ok(page.doc)
}

#[cfg(test)]
#[path = "../../tests/unit/site/mod.rs"]
mod tests;
