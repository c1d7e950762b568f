use super::*;

#[test]
fn decimal_with_times_suffix() {
    let tokens = metric_tokens("2.1x increase");
    assert_eq!(tokens.len(), 1);
    let t = &tokens[0];
    assert_eq!(t.value, 2.1);
    assert_eq!(t.suffix, MetricSuffix::Times);
    assert_eq!(t.precision, 1);
    assert_eq!(t.literal, "2.1x");
    assert_eq!(t.span, 0..4);
}

#[test]
fn integer_with_percent_suffix() {
    let tokens = metric_tokens("18% faster");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, 18.0);
    assert_eq!(tokens[0].suffix, MetricSuffix::Percent);
    assert_eq!(tokens[0].precision, 0);
}

#[test]
fn pieces_preserve_surrounding_text_in_order() {
    let text = "Cut churn by 22% and grew pipeline 3.25x in 6 months";
    let pieces = parse_metrics(text);
    let rebuilt: String = pieces
        .iter()
        .map(|p| match p {
            Piece::Text(t) => (*t).to_string(),
            Piece::Metric(m) => m.literal.clone(),
        })
        .collect();
    assert_eq!(rebuilt, text);

    let tokens = metric_tokens(text);
    let literals: Vec<&str> = tokens.iter().map(|t| t.literal.as_str()).collect();
    assert_eq!(literals, ["22%", "3.25x", "6"]);
    assert_eq!(tokens[1].precision, 2);
    assert!(tokens.windows(2).all(|w| w[0].span.end <= w[1].span.start));
}

#[test]
fn text_without_numbers_passes_through() {
    assert_eq!(
        parse_metrics("no numbers here"),
        vec![Piece::Text("no numbers here")]
    );
    assert!(parse_metrics("").is_empty());
}

#[test]
fn trailing_dot_is_not_a_fraction() {
    let tokens = metric_tokens("version 3. next");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].literal, "3");
    assert_eq!(tokens[0].precision, 0);
}

#[test]
fn format_keeps_fixed_precision_and_suffix() {
    let t = &metric_tokens("2.1x")[0];
    assert_eq!(t.format(0.0), "0.0x");
    assert_eq!(t.format(1.0), "1.0x");
    assert_eq!(t.format(2.1), "2.1x");
    assert_eq!(t.render_zero(), "0.0x");
    assert_eq!(CounterFormat::integer().render(74.6), "75");
    assert_eq!(CounterFormat::integer().render(-0.2), "0");
}

#[test]
fn counting_to_22_is_non_decreasing_and_exact() {
    use crate::animation::ease::Ease;

    let t = &metric_tokens("22%")[0];
    let frames = 72;
    let shown: Vec<String> = (0..=frames)
        .map(|i| {
            let p = Ease::OutCubic.apply(f64::from(i) / f64::from(frames));
            t.format(t.value * p)
        })
        .collect();
    let numbers: Vec<i64> = shown
        .iter()
        .map(|s| s.trim_end_matches('%').parse().unwrap())
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(shown.last().map(String::as_str), Some("22%"));
    assert!(shown.iter().all(|s| s.ends_with('%') && !s.contains('.')));
}

#[test]
fn markup_wraps_metrics_with_data_attributes() {
    let html = render_metric_markup("a 2.1x lift");
    assert_eq!(
        html,
        "a <span class=\"metric\" data-decimals=\"1\" data-suffix=\"x\" data-value=\"2.1\">2.1x</span> lift"
    );
}

#[test]
fn annotate_builds_spans_readable_as_tokens() {
    let mut doc = Document::new();
    let p = doc.append(doc.root(), Element::new("p")).unwrap();
    let spans = annotate_metrics(&mut doc, p, "up 18% and 2.1x");
    assert_eq!(spans.len(), 2);
    assert_eq!(doc.text_content(p).unwrap(), "up 18% and 2.1x");

    let t = token_from_attrs(&doc, spans[1]).unwrap();
    assert_eq!(t.value, 2.1);
    assert_eq!(t.precision, 1);
    assert_eq!(t.suffix, MetricSuffix::Times);
    assert!(token_from_attrs(&doc, p).is_none());
}
