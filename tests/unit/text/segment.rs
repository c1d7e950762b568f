use super::*;

fn heading(doc: &mut Document, text: &str) -> NodeId {
    doc.append(doc.root(), Element::new("h1").class("big").text(text))
        .unwrap()
}

#[test]
fn letters_turn_spaces_into_spacers() {
    let seg = segment("Go on", Granularity::Letter);
    assert_eq!(
        seg.segments,
        vec![
            Segment::Unit("G".into()),
            Segment::Unit("o".into()),
            Segment::Spacer,
            Segment::Unit("o".into()),
            Segment::Unit("n".into()),
        ]
    );
}

#[test]
fn words_carry_trailing_nbsp_except_last() {
    let seg = segment("  Stories   that move ", Granularity::Word);
    assert_eq!(
        seg.segments,
        vec![
            Segment::Unit("Stories\u{a0}".into()),
            Segment::Unit("that\u{a0}".into()),
            Segment::Unit("move".into()),
        ]
    );
}

#[test]
fn blank_text_has_no_units() {
    for g in [Granularity::Letter, Granularity::Word] {
        assert!(segment("", g).is_empty());
        assert!(segment(" \n\t ", g).is_empty());
        assert_eq!(segment("   ", g).render_markup(), "");
    }
}

#[test]
fn render_markup_matches_inline_wrappers() {
    let seg = segment("a b", Granularity::Letter);
    assert_eq!(
        seg.render_markup(),
        "<span class=\"lt\" style=\"display:inline-block;will-change:transform\">a</span>\
         <span class=\"lt\" style=\"display:inline-block;width:.35em\">&nbsp;</span>\
         <span class=\"lt\" style=\"display:inline-block;will-change:transform\">b</span>"
    );
}

#[test]
fn split_then_revert_round_trips_markup() {
    let inputs = ["Motion with gravity", "x", "", "   ", "A & <B>", "Ünïcødé wörds"];
    for g in [Granularity::Letter, Granularity::Word] {
        for input in inputs {
            let mut doc = Document::new();
            let h = heading(&mut doc, input);
            let before = doc.inner_html(h).unwrap();

            let split = SplitText::apply(&mut doc, h, g).unwrap();
            assert_eq!(split.units().len(), segment(input, g).len());
            split.revert(&mut doc);

            assert_eq!(doc.inner_html(h).unwrap(), before, "{g:?} {input:?}");
        }
    }
}

#[test]
fn units_are_attached_children() {
    let mut doc = Document::new();
    let h = heading(&mut doc, "Hi there");
    let split = SplitText::apply(&mut doc, h, Granularity::Word).unwrap();
    assert_eq!(split.units().len(), 2);
    assert_eq!(doc.children(h), split.units());
    assert!(split.units().iter().all(|u| doc.has_class(*u, "split-word")));
    assert_eq!(doc.text_content(h).unwrap(), "Hi\u{a0}there");
}

#[test]
fn repeated_mounts_revert_to_pristine() {
    let mut doc = Document::new();
    let h = heading(&mut doc, "Pixora studio");
    let pristine = doc.inner_html(h).unwrap();

    // A second split without revert must not capture the decorated markup.
    let first = SplitText::apply(&mut doc, h, Granularity::Letter).unwrap();
    let second = SplitText::apply(&mut doc, h, Granularity::Letter).unwrap();
    assert!(first.units().iter().all(|u| !doc.is_attached(*u)));
    second.revert(&mut doc);
    assert_eq!(doc.inner_html(h).unwrap(), pristine);

    first.revert(&mut doc);
    second.revert(&mut doc);
    assert_eq!(doc.inner_html(h).unwrap(), pristine);
}

#[test]
fn missing_node_short_circuits() {
    let mut doc = Document::new();
    let h = heading(&mut doc, "gone");
    doc.remove(h);
    assert!(SplitText::apply(&mut doc, h, Granularity::Letter).is_none());
}
