use super::*;
use crate::dom::Element;
use crate::foundation::core::Rect;

const VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

/// Section laid out at y = 1000..1600; "top 75%" is met at scroll 400.
fn page() -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let section = doc
        .append(
            root,
            Element::new("section").rect(Rect::new(0.0, 1000.0, 1280.0, 1600.0)),
        )
        .unwrap();
    (doc, section)
}

fn top_75() -> Threshold {
    "top 75%".parse().unwrap()
}

fn events_of(set: &mut TriggerSet, doc: &Document, ys: &[f64]) -> Vec<TriggerEvent> {
    ys.iter()
        .flat_map(|&y| set.update(y, doc, VIEWPORT))
        .map(|(_, e)| e)
        .collect()
}

#[test]
fn once_fires_exactly_once() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    let id = set.register(TriggerSpec::once(section, top_75()));
    let events = events_of(&mut set, &doc, &[0.0, 500.0, 0.0, 600.0, 100.0, 900.0]);
    assert_eq!(events, vec![TriggerEvent::Enter]);
    assert!(!set.contains(id));
}

#[test]
fn repeatable_cycles_enter_and_leave_back() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    set.register(TriggerSpec::repeatable(section, top_75()));
    let events = events_of(&mut set, &doc, &[0.0, 450.0, 700.0, 420.0, 399.0, 300.0, 401.0]);
    assert_eq!(
        events,
        vec![
            TriggerEvent::Enter,
            TriggerEvent::LeaveBack,
            TriggerEvent::Enter
        ]
    );
}

#[test]
fn already_past_start_fires_on_first_update() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    set.register(TriggerSpec::once(section, top_75()));
    assert_eq!(events_of(&mut set, &doc, &[2000.0]), vec![TriggerEvent::Enter]);
}

#[test]
fn missing_elements_are_skipped() {
    let (mut doc, section) = page();
    let mut set = TriggerSet::new();
    set.register(TriggerSpec::repeatable(section, top_75()));
    doc.remove(section);
    assert!(events_of(&mut set, &doc, &[0.0, 900.0]).is_empty());
    assert_eq!(set.len(), 1);
}

#[test]
fn dispose_all_silences_the_set() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    set.register(TriggerSpec::repeatable(section, top_75()));
    set.register(TriggerSpec::once(section, top_75()));
    set.dispose_all();
    assert!(set.is_empty());
    assert!(events_of(&mut set, &doc, &[900.0]).is_empty());
}

#[test]
fn scrub_maps_scroll_to_progress() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    // "top bottom" = 200, "bottom top" = 1600.
    set.register(TriggerSpec::scrub(
        section,
        "top bottom".parse().unwrap(),
        "bottom top".parse().unwrap(),
        None,
    ));
    let events = events_of(&mut set, &doc, &[0.0, 900.0, 900.0, 5000.0]);
    assert_eq!(
        events,
        vec![
            TriggerEvent::Scrub { progress: 0.0 },
            TriggerEvent::Scrub { progress: 0.5 },
            TriggerEvent::Scrub { progress: 1.0 },
        ]
    );
}

#[test]
fn smoothed_scrub_catches_up_on_tick() {
    let (doc, section) = page();
    let mut set = TriggerSet::new();
    set.register(TriggerSpec::scrub(
        section,
        "top bottom".parse().unwrap(),
        "bottom top".parse().unwrap(),
        Some(1.5),
    ));
    assert_eq!(
        events_of(&mut set, &doc, &[0.0]),
        vec![TriggerEvent::Scrub { progress: 0.0 }]
    );
    assert!(events_of(&mut set, &doc, &[1600.0]).is_empty());

    let mut last = 0.0;
    for _ in 0..1200 {
        for (_, e) in set.tick(1.0 / 60.0) {
            let TriggerEvent::Scrub { progress } = e else {
                panic!("unexpected {e:?}");
            };
            assert!(progress > last);
            last = progress;
        }
    }
    assert_eq!(last, 1.0);
    assert!(set.tick(1.0 / 60.0).is_empty());
}
