use super::*;
use crate::animation::style::Style;
use crate::dom::Element;

fn fade(node: u32, secs: f64) -> Tween {
    Tween::to(vec![NodeId::new(node)], Style::new().with(Prop::Opacity, 1.0)).duration(secs)
}

#[test]
fn position_strings_parse() {
    assert_eq!("".parse::<Position>().unwrap(), Position::End(0.0));
    assert_eq!("1.5".parse::<Position>().unwrap(), Position::Absolute(1.5));
    assert_eq!(">".parse::<Position>().unwrap(), Position::AfterPrevious(0.0));
    assert_eq!(">-0.2".parse::<Position>().unwrap(), Position::AfterPrevious(-0.2));
    assert_eq!("<+0.1".parse::<Position>().unwrap(), Position::WithPrevious(0.1));
    assert_eq!("+=0.5".parse::<Position>().unwrap(), Position::End(0.5));
    assert_eq!("-=0.3".parse::<Position>().unwrap(), Position::End(-0.3));
    assert!(">abc".parse::<Position>().is_err());
    assert!("-1".parse::<Position>().is_err());
}

#[test]
fn position_serde_uses_strings() {
    let p: Position = serde_json::from_str("\">-0.2\"").unwrap();
    assert_eq!(p, Position::AfterPrevious(-0.2));
    assert_eq!(serde_json::to_string(&p).unwrap(), "\">-0.2\"");
    assert_eq!(serde_json::to_string(&Position::End(0.0)).unwrap(), "\"\"");
}

#[test]
fn offsets_resolve_at_insertion() {
    let seq = TimelineBuilder::new()
        .add(fade(1, 1.0), Position::default())
        .add(fade(2, 0.5), Position::AfterPrevious(-0.2))
        .add(fade(3, 0.5), Position::WithPrevious(0.1))
        .add(fade(4, 0.2), Position::Absolute(3.0))
        .build()
        .unwrap();
    let starts: Vec<f64> = seq.entries().iter().map(|e| e.start).collect();
    assert!((starts[0] - 0.0).abs() < 1e-12);
    assert!((starts[1] - 0.8).abs() < 1e-12);
    assert!((starts[2] - 0.9).abs() < 1e-12);
    assert!((starts[3] - 3.0).abs() < 1e-12);
    assert!((seq.duration() - 3.2).abs() < 1e-12);
}

#[test]
fn negative_resolution_clamps_to_zero() {
    let seq = TimelineBuilder::new()
        .add(fade(1, 0.3), Position::End(-1.0))
        .build()
        .unwrap();
    assert_eq!(seq.entries()[0].start, 0.0);
}

#[test]
fn nested_sequences_and_cues_flatten_to_absolute_time() {
    let inner = TimelineBuilder::new()
        .add(fade(2, 0.5), Position::default())
        .cue("glow", Position::Absolute(0.25))
        .build()
        .unwrap();
    let seq = TimelineBuilder::new()
        .default_ease(Ease::OutCubic)
        .add(fade(1, 1.0), Position::default())
        .add_sequence(inner, Position::AfterPrevious(0.5))
        .build()
        .unwrap();
    let tweens = seq.scheduled_tweens();
    assert_eq!(tweens.len(), 2);
    assert!((tweens[1].start - 1.5).abs() < 1e-12);
    assert_eq!(tweens[0].default_ease, Ease::OutCubic);
    assert_eq!(seq.cues(), vec![(1.75, "glow".to_string())]);
    assert!((seq.duration() - 2.0).abs() < 1e-12);
}

#[test]
fn infinite_items_make_infinite_sequences() {
    let seq = TimelineBuilder::new()
        .add(
            fade(1, 0.6).repeat(crate::animation::tween::Repeat::Infinite),
            Position::default(),
        )
        .add(fade(2, 0.5), Position::default())
        .build()
        .unwrap();
    assert!(seq.duration().is_infinite());
    // The end cursor ignores endless items.
    assert_eq!(seq.entries()[1].start, 0.0);
}

#[test]
fn build_rejects_invalid_tweens() {
    let err = TimelineBuilder::new()
        .add(fade(1, -1.0), Position::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, PixoraError::Animation(_)));
    assert!(TimelineBuilder::new().cue("", Position::default()).build().is_err());
}

#[test]
fn prime_writes_first_from_value_per_prop() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.append(root, Element::new("h2")).unwrap();
    let seq = TimelineBuilder::new()
        .add(
            Tween::from_to(
                vec![a],
                Style::new().with(Prop::Y, 40.0).with(Prop::Opacity, 0.0),
                Style::new().with(Prop::Y, 0.0).with(Prop::Opacity, 1.0),
            ),
            Position::default(),
        )
        .add(
            Tween::from_to(
                vec![a, NodeId::new(999)],
                Style::new().with(Prop::Opacity, 0.5),
                Style::new().with(Prop::Opacity, 1.0),
            ),
            Position::default(),
        )
        .build()
        .unwrap();
    seq.prime(&mut doc);
    assert_eq!(doc.prop(a, Prop::Y), Some(40.0));
    assert_eq!(doc.prop(a, Prop::Opacity), Some(0.0));
    assert_eq!(seq.targets().len(), 2);
}
