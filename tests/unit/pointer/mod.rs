use super::*;
use crate::animation::{ticker::Ticker, timeline::Sequence};
use crate::dom::{Document, Element};
use crate::foundation::core::SectionId;

fn card() -> Rect {
    Rect::new(100.0, 100.0, 300.0, 500.0)
}

#[test]
fn normalized_offset_spans_unit_square() {
    assert_eq!(normalized_offset(Point::new(200.0, 300.0), card()), Vec2::ZERO);
    assert_eq!(
        normalized_offset(Point::new(300.0, 100.0), card()),
        Vec2::new(1.0, -1.0)
    );
    assert_eq!(
        normalized_offset(Point::new(-50.0, 900.0), card()),
        Vec2::new(-1.0, 1.0)
    );
    let flat = Rect::new(0.0, 10.0, 100.0, 10.0);
    assert_eq!(normalized_offset(Point::new(75.0, 99.0), flat), Vec2::new(0.5, 0.0));
}

#[test]
fn magnetic_offset_is_clamped() {
    let m = Magnetic::default();
    let o = m.offset(Point::new(220.0, 300.0), card());
    assert!((o.x - 3.0).abs() < 1e-9);
    assert_eq!(o.y, 0.0);
    let far = m.offset(Point::new(2000.0, -2000.0), card());
    assert_eq!(far, Vec2::new(14.0, -14.0));
}

#[test]
fn tilt_angles_follow_pointer_quadrant() {
    let t = Tilt::default();
    let (rx, ry) = t.angles(Point::new(300.0, 100.0), card());
    assert_eq!((rx, ry), (5.0, 5.0));
    let (rx, ry) = t.angles(Point::new(150.0, 400.0), card());
    assert!((rx + 2.5).abs() < 1e-9);
    assert!((ry + 2.5).abs() < 1e-9);
    let tween = t.on_move(NodeId::new(1), Point::new(200.0, 300.0), card());
    assert_eq!(tween.to.get(Prop::Perspective), Some(800.0));
    assert_eq!(tween.overwrite, Overwrite::Auto);
}

#[test]
fn icon_swap_variant_is_explicit() {
    let (a, b) = (NodeId::new(1), NodeId::new(2));
    let morph = IconSwap {
        capability: MorphCapability::Morph,
    };
    let enter = morph.on_enter(a, b);
    assert_eq!(enter.len(), 1);
    assert_eq!(enter[0].to.get(Prop::Morph), Some(1.0));

    let fade = IconSwap::default();
    let enter = fade.on_enter(a, b);
    assert_eq!(enter.len(), 2);
    assert_eq!(enter[0].targets, vec![b]);
    assert_eq!(enter[0].to.get(Prop::Opacity), Some(1.0));
    assert_eq!(enter[1].targets, vec![a]);
    assert_eq!(enter[1].to.get(Prop::Opacity), Some(0.0));
    let leave = fade.on_leave(a, b);
    assert_eq!(leave[0].targets, vec![a]);
}

#[test]
fn binding_ignores_events_its_effect_does_not_use() {
    let binding = PointerBinding {
        region: NodeId::new(1),
        effect: PointerEffect::HoverScale {
            config: HoverScale::default(),
            target: NodeId::new(2),
        },
    };
    assert!(binding.respond(PointerEvent::Move(Point::ORIGIN), Some(card())).is_empty());
    assert_eq!(binding.respond(PointerEvent::Enter, None)[0].targets, vec![NodeId::new(2)]);

    let magnet = PointerBinding {
        region: NodeId::new(1),
        effect: PointerEffect::Magnetic {
            config: Magnetic::default(),
            target: NodeId::new(3),
        },
    };
    assert!(magnet.respond(PointerEvent::Move(Point::ORIGIN), None).is_empty());
    assert_eq!(magnet.moving_element(), NodeId::new(3));
}

#[test]
fn rapid_moves_track_only_the_latest_event() {
    let mut doc = Document::new();
    let root = doc.root();
    let cta = doc
        .append(root, Element::new("a").class("btn").rect(card()))
        .unwrap();
    let m = Magnetic::default();
    let mut ticker = Ticker::new();

    for x in [0.0, 400.0, 120.0, 260.0] {
        let tween = m.on_move(cta, Point::new(x, 300.0), card());
        ticker.play(Sequence::of(tween).unwrap(), SectionId(0));
        ticker.tick(1.0 / 60.0, &mut doc);
    }
    for _ in 0..60 {
        ticker.tick(1.0 / 60.0, &mut doc);
    }
    // Last target: (260 - 200) * 0.15 = 9.
    assert!((doc.prop(cta, Prop::X).unwrap() - 9.0).abs() < 1e-9);
    assert_eq!(ticker.active_count(), 0);
}
