use super::*;
use crate::foundation::error::PixoraError;
use crate::text::metric::annotate_metrics;

const FRAME: f64 = 1.0 / 60.0;

struct Page {
    doc: Document,
    ticker: Ticker,
    section: NodeId,
}

impl Page {
    fn new() -> Self {
        let mut doc = Document::new();
        let body = doc.root();
        let section = doc
            .append(
                body,
                Element::new("section")
                    .id("demo")
                    .rect(Rect::new(0.0, 1000.0, 1280.0, 1800.0)),
            )
            .unwrap();
        Self {
            doc,
            ticker: Ticker::new(),
            section,
        }
    }

    fn child(&mut self, parent: NodeId, el: Element) -> NodeId {
        self.doc.append(parent, el).unwrap()
    }

    fn cx(&mut self) -> SectionContext<'_> {
        SectionContext {
            doc: &mut self.doc,
            ticker: &mut self.ticker,
            viewport: Viewport::default(),
            seed: 7,
            morph: MorphCapability::default(),
        }
    }

    fn mount(&mut self, json: &str) -> SectionRuntime {
        let plan = SectionPlan::from_json(json).unwrap();
        SectionRuntime::mount(SectionId(1), &plan, &mut self.cx()).unwrap()
    }

    fn run(&mut self, rt: &mut SectionRuntime, frames: usize) {
        for _ in 0..frames {
            let events = self.ticker.tick(FRAME, &mut self.doc);
            let mut cx = self.cx();
            for e in &events {
                rt.on_tick_event(e, &mut cx);
            }
            rt.on_frame(FRAME, &mut cx);
        }
    }
}

fn block() -> Rect {
    Rect::new(100.0, 1100.0, 600.0, 1200.0)
}

#[test]
fn missing_root_mounts_inert() {
    let mut page = Page::new();
    let mut rt = page.mount(r##"{"name":"ghost","root":"#nowhere","effects":[{"kind":"pulse","targets":".btn"}]}"##);
    assert!(rt.is_mounted());
    assert!(rt.root().is_none());
    assert_eq!(rt.trigger_count(), 0);
    assert_eq!(page.ticker.active_count(), 0);
    rt.unmount(&mut page.cx());
    assert!(!rt.is_mounted());
}

#[test]
fn reveal_primes_then_plays_on_entry() {
    let mut page = Page::new();
    let s = page.section;
    let card = page.child(s, Element::new("div").class("card").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"why","root":"#demo","effects":[{"kind":"reveal","trigger":{"start":"top 75%"},
            "tween":{"targets":".card","from":{"x":-100,"opacity":0},"to":{"x":0,"opacity":1},"duration":1.2}}]}"##,
    );
    assert_eq!(page.doc.prop(card, Prop::Opacity), Some(0.0));
    assert_eq!(rt.trigger_count(), 1);

    // Start sits at 1000 - 600 = 400.
    rt.on_scroll(300.0, &mut page.cx());
    page.run(&mut rt, 90);
    assert_eq!(page.doc.prop(card, Prop::Opacity), Some(0.0));

    rt.on_scroll(400.0, &mut page.cx());
    assert_eq!(rt.trigger_count(), 0);
    page.run(&mut rt, 90);
    assert_eq!(page.doc.prop(card, Prop::Opacity), Some(1.0));
    assert_eq!(page.doc.prop(card, Prop::X), Some(0.0));
    assert_eq!(page.ticker.active_count(), 0);
}

#[test]
fn split_reveal_reverts_and_chains_follow_up() {
    let mut page = Page::new();
    let s = page.section;
    let h1 = page.child(
        s,
        Element::new("h1").rect(block()).text("Real results"),
    );
    let btn = page.child(s, Element::new("a").class("btn").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"cases","root":"#demo","effects":[{"kind":"reveal",
            "tween":{"targets":"h1","split":"word","from":{"y":24,"opacity":0},"to":{"y":0,"opacity":1},"duration":0.6,"stagger":0.06},
            "revert_split":true,
            "then":{"targets":".btn","to":{"scale":1.05},"duration":0.6,"repeat":"infinite","yoyo":true}}]}"##,
    );
    assert!(page.doc.is_decorated(h1));
    assert_eq!(rt.split_count(), 1);

    page.run(&mut rt, 60);
    assert!(!page.doc.is_decorated(h1));
    assert_eq!(page.doc.text_content(h1).as_deref(), Some("Real results"));
    assert_eq!(page.ticker.active_count(), 1);
    assert!(page.doc.prop(btn, Prop::Scale).unwrap() > 1.0);

    rt.unmount(&mut page.cx());
    assert_eq!(page.ticker.active_count(), 0);
}

#[test]
fn timeline_cue_starts_its_own_playback() {
    let mut page = Page::new();
    let s = page.section;
    let a = page.child(s, Element::new("div").class("a").rect(block()));
    let glow = page.child(s, Element::new("div").class("glow").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"heading","root":"#demo","effects":[{"kind":"timeline","steps":[
            {"step":"tween","tween":{"targets":".a","to":{"y":100},"duration":1.0}},
            {"step":"call","name":"glow","tweens":[
                {"targets":".glow","from":{"x":-80},"to":{"x":420},"duration":0.8},
                {"targets":".glow","to":{"opacity":0},"duration":0.2}]}]}]}"##,
    );
    assert_eq!(page.ticker.active_count(), 1);
    page.run(&mut rt, 30);
    assert_eq!(page.doc.prop(glow, Prop::X), Some(0.0));

    page.run(&mut rt, 31);
    assert_eq!(page.doc.prop(a, Prop::Y), Some(100.0));
    assert_eq!(page.ticker.active_count(), 1);
    page.run(&mut rt, 70);
    assert_eq!(page.doc.prop(glow, Prop::X), Some(420.0));
    assert_eq!(page.doc.prop(glow, Prop::Opacity), Some(0.0));
    assert_eq!(page.ticker.active_count(), 0);
}

#[test]
fn draw_path_sets_dash_and_moves_dot() {
    let mut page = Page::new();
    let s = page.section;
    let path = page.child(s, Element::new("path").class("p1").rect(block()));
    let dot = page.child(s, Element::new("circle").class("dot").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"problem","root":"#demo","effects":[{"kind":"timeline","steps":[
            {"step":"draw_path","path":".p1","d":"M210 120 C 250 90, 300 90, 340 120","dot":".dot"}]}]}"##,
    );
    let dash = page.doc.attr(path, "stroke-dasharray").unwrap().parse::<f64>().unwrap();
    assert!(dash > 130.0);
    assert!(page.doc.prop(path, Prop::DashOffset).unwrap() > 0.0);

    page.run(&mut rt, 60);
    assert_eq!(page.doc.prop(path, Prop::DashOffset), Some(0.0));
    assert!((page.doc.prop(dot, Prop::X).unwrap() - 340.0).abs() < 0.05);
    assert!((page.doc.prop(dot, Prop::Y).unwrap() - 120.0).abs() < 0.05);
}

#[test]
fn draw_path_decorations_are_cleared_on_unmount() {
    let mut page = Page::new();
    let s = page.section;
    let path = page.child(s, Element::new("path").class("p1").rect(block()));
    let dot = page.child(s, Element::new("circle").class("dot").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"problem","root":"#demo","effects":[{"kind":"timeline","steps":[
            {"step":"draw_path","path":".p1","d":"M0 0 L100 0","dot":".dot"}]}]}"##,
    );
    page.run(&mut rt, 60);
    let end = page.doc.prop(dot, Prop::X).unwrap();
    assert!((end - 100.0).abs() < 1e-6);

    rt.unmount(&mut page.cx());
    assert!(page.doc.attr(path, "stroke-dasharray").is_none());
    assert!(!page.doc.has_motion_path(dot));
    page.doc.set_prop(dot, Prop::PathProgress, 0.5);
    assert_eq!(page.doc.prop(dot, Prop::X), Some(end));
}

#[test]
fn leave_back_cancels_reveal_follow_up() {
    let mut page = Page::new();
    let s = page.section;
    page.child(s, Element::new("div").class("step").rect(block()));
    let btn = page.child(s, Element::new("a").class("btn").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"how","root":"#demo","effects":[{"kind":"reveal",
            "trigger":{"start":"top 75%","mode":"repeatable"},
            "tween":{"targets":".step","from":{"y":50,"opacity":0},"to":{"y":0,"opacity":1},"duration":0.5},
            "then":{"targets":".btn","to":{"scale":1.05},"duration":0.6,"repeat":"infinite","yoyo":true}}]}"##,
    );
    for _ in 0..3 {
        rt.on_scroll(400.0, &mut page.cx());
        page.run(&mut rt, 45);
        assert_eq!(page.ticker.active_count(), 1);
        assert!(page.doc.prop(btn, Prop::Scale).unwrap() > 1.0);

        rt.on_scroll(0.0, &mut page.cx());
        assert_eq!(page.ticker.active_count(), 0);
    }
    page.run(&mut rt, 10);
    assert_eq!(page.ticker.active_count(), 0);
    assert_eq!(rt.trigger_count(), 1);
}

#[test]
fn leave_back_cancels_cue_playbacks() {
    let mut page = Page::new();
    let s = page.section;
    page.child(s, Element::new("div").class("a").rect(block()));
    page.child(s, Element::new("div").class("glow").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"solution","root":"#demo","effects":[{"kind":"timeline",
            "trigger":{"start":"top 75%","mode":"repeatable"},"steps":[
            {"step":"tween","tween":{"targets":".a","to":{"y":100},"duration":0.2}},
            {"step":"call","name":"glow","tweens":[
                {"targets":".glow","to":{"opacity":0},"duration":0.4,"repeat":"infinite","yoyo":true}]}]}]}"##,
    );
    for _ in 0..3 {
        rt.on_scroll(400.0, &mut page.cx());
        page.run(&mut rt, 30);
        assert_eq!(page.ticker.active_count(), 1);

        rt.on_scroll(0.0, &mut page.cx());
        assert_eq!(page.ticker.active_count(), 0);
    }
}

#[test]
fn slide_items_replay_and_reset() {
    let mut page = Page::new();
    let s = page.section;
    let mut contents = Vec::new();
    for i in 0..2 {
        let y = 1100.0 + 300.0 * i as f64;
        let item = page.child(
            s,
            Element::new("div")
                .class("case-item")
                .rect(Rect::new(0.0, y, 1280.0, y + 200.0)),
        );
        contents.push(page.child(
            item,
            Element::new("div")
                .class("case-content")
                .rect(Rect::new(0.0, y, 1280.0, y + 200.0)),
        ));
    }
    let mut rt = page.mount(
        r##"{"name":"cases","root":"#demo","effects":[{"kind":"slide_items","items":".case-item","content":".case-content"}]}"##,
    );
    assert_eq!(rt.trigger_count(), 2);

    // First item starts at 1100 - 680 = 420.
    rt.on_scroll(430.0, &mut page.cx());
    page.run(&mut rt, 60);
    assert_eq!(page.doc.prop(contents[0], Prop::X), Some(0.0));
    assert_eq!(page.doc.prop(contents[1], Prop::X), Some(0.0));

    rt.on_scroll(0.0, &mut page.cx());
    assert_eq!(page.doc.prop(contents[0], Prop::X), Some(-60.0));
    assert_eq!(page.doc.prop(contents[0], Prop::Opacity), Some(0.0));

    rt.on_scroll(1000.0, &mut page.cx());
    page.run(&mut rt, 60);
    assert_eq!(page.doc.prop(contents[0], Prop::X), Some(0.0));
    assert_eq!(page.doc.prop(contents[1], Prop::X), Some(0.0));
    assert_eq!(rt.trigger_count(), 2);
}

#[test]
fn counters_read_metric_attributes() {
    let mut page = Page::new();
    let s = page.section;
    let item = page.child(s, Element::new("div").class("case-item").rect(block()));
    let p = page.child(item, Element::new("p").rect(block()));
    let spans = annotate_metrics(&mut page.doc, p, "Lift of 2.1x in leads");
    let mut rt = page.mount(
        r##"{"name":"cases","root":"#demo","effects":[{"kind":"counters","targets":".metric",
            "closest":"case-item","trigger":{"start":"top 90%","mode":"repeatable"}}]}"##,
    );
    let span = spans[0];
    rt.on_scroll(1100.0, &mut page.cx());
    page.run(&mut rt, 3);
    let mid = page.doc.text_content(span).unwrap();
    assert!(mid.ends_with('x'));
    page.run(&mut rt, 90);
    assert_eq!(page.doc.text_content(span).as_deref(), Some("2.1x"));

    rt.on_scroll(0.0, &mut page.cx());
    assert_eq!(page.doc.text_content(span).as_deref(), Some("0.0x"));
}

#[test]
fn scrub_parallax_follows_scroll() {
    let mut page = Page::new();
    let s = page.section;
    let bg = page.child(s, Element::new("div").class("bg").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"why","root":"#demo","effects":[{"kind":"parallax","targets":".bg","to":{"y":-100},
            "trigger":{"start":"top bottom","end":"bottom top","mode":{"scrub":{}}}}]}"##,
    );
    // Range: 1000 - 800 = 200 to 1800.
    rt.on_scroll(1000.0, &mut page.cx());
    assert!((page.doc.prop(bg, Prop::Y).unwrap() + 50.0).abs() < 1e-9);
    rt.on_scroll(5000.0, &mut page.cx());
    assert_eq!(page.doc.prop(bg, Prop::Y), Some(-100.0));
    rt.on_scroll(0.0, &mut page.cx());
    assert_eq!(page.doc.prop(bg, Prop::Y), Some(0.0));
}

#[test]
fn parallax_respects_min_width() {
    let mut page = Page::new();
    let s = page.section;
    page.child(s, Element::new("div").class("bg").rect(block()));
    let plan = SectionPlan::from_json(
        r##"{"name":"why","root":"#demo","effects":[{"kind":"parallax","targets":".bg","to":{"y":-100},
            "trigger":{"mode":{"scrub":{}}},"min_viewport_width":768}]}"##,
    )
    .unwrap();
    let mut cx = page.cx();
    cx.viewport = Viewport::new(500.0, 800.0);
    let rt = SectionRuntime::mount(SectionId(2), &plan, &mut cx).unwrap();
    assert_eq!(rt.trigger_count(), 0);
    assert_eq!(page.ticker.active_count(), 0);
}

#[test]
fn parallax_field_is_seeded_and_removed_on_unmount() {
    let json = r##"{"name":"canvas","root":"#demo","effects":[{"kind":"parallax_field","count":5}]}"##;
    let mut first = Page::new();
    let before = first.doc.node_count();
    let mut rt = first.mount(json);
    assert_eq!(rt.synthetic_nodes().len(), 5);
    assert_eq!(rt.trigger_count(), 5);
    let rects: Vec<_> = rt
        .synthetic_nodes()
        .iter()
        .map(|&n| first.doc.rect(n).unwrap())
        .collect();
    let circle = rt.synthetic_nodes()[0];
    assert_eq!(first.doc.prop(circle, Prop::Opacity), Some(0.2));
    assert_eq!(first.doc.prop(circle, Prop::Blur), Some(4.0));

    let mut second = Page::new();
    let again = second.mount(json);
    let rects_again: Vec<_> = again
        .synthetic_nodes()
        .iter()
        .map(|&n| second.doc.rect(n).unwrap())
        .collect();
    assert_eq!(rects, rects_again);

    rt.unmount(&mut first.cx());
    assert_eq!(first.doc.node_count(), before);
    assert_eq!(rt.trigger_count(), 0);
}

#[test]
fn pointer_effects_become_bindings() {
    let mut page = Page::new();
    let s = page.section;
    let btn = page.child(s, Element::new("a").class("btn").rect(block()));
    let card = page.child(s, Element::new("div").class("card").rect(block()));
    let primary = page.child(card, Element::new("svg").class("icon").rect(block()));
    let alternate = page.child(card, Element::new("svg").class("icon-alt").rect(block()));
    let plan = SectionPlan::from_json(
        r##"{"name":"mix","root":"#demo","effects":[
            {"kind":"magnetic","target":".btn"},
            {"kind":"tilt","cards":".card"},
            {"kind":"icon_swap","region":".card","primary":".icon","alternate":".icon-alt"}]}"##,
    )
    .unwrap();
    let mut cx = page.cx();
    cx.morph = MorphCapability::Morph;
    let mut rt = SectionRuntime::mount(SectionId(3), &plan, &mut cx).unwrap();

    let b = rt.bindings();
    assert_eq!(b.len(), 3);
    assert_eq!(b[0].region, s);
    assert_eq!(b[0].moving_element(), btn);
    assert_eq!(b[1].region, card);
    assert_eq!(
        b[2].effect,
        PointerEffect::IconSwap {
            config: IconSwap {
                capability: MorphCapability::Morph
            },
            primary,
            alternate,
        }
    );
    rt.unmount(&mut page.cx());
    assert!(rt.bindings().is_empty());
}

#[test]
fn unmount_cancels_and_is_idempotent() {
    let mut page = Page::new();
    let s = page.section;
    let btn = page.child(s, Element::new("a").class("btn").rect(block()));
    let mut rt = page.mount(
        r##"{"name":"hero","root":"#demo","effects":[{"kind":"pulse","targets":".btn"}]}"##,
    );
    page.run(&mut rt, 10);
    let frozen = page.doc.prop(btn, Prop::Scale).unwrap();
    assert!(frozen > 1.0);

    rt.unmount(&mut page.cx());
    rt.unmount(&mut page.cx());
    page.run(&mut rt, 10);
    assert_eq!(page.doc.prop(btn, Prop::Scale), Some(frozen));
    assert_eq!(page.ticker.active_count(), 0);
}

#[test]
fn invalid_draw_path_fails_mount_cleanly() {
    let mut page = Page::new();
    let s = page.section;
    page.child(s, Element::new("path").class("p1").rect(block()));
    page.child(s, Element::new("a").class("btn").rect(block()));
    let plan = SectionPlan::from_json(
        r##"{"name":"broken","root":"#demo","effects":[
            {"kind":"pulse","targets":".btn"},
            {"kind":"timeline","steps":[{"step":"draw_path","path":".p1","d":"not a path"}]}]}"##,
    )
    .unwrap();
    let err = SectionRuntime::mount(SectionId(4), &plan, &mut page.cx()).unwrap_err();
    assert!(matches!(err, PixoraError::Parse(_)));
    assert_eq!(page.ticker.active_count(), 0);
}
