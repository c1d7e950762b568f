use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use crate::{
    dom::{Document, Element},
    foundation::core::NodeId,
};

static METRIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)(%|x)?").expect("metric pattern is valid"));

/// Unit suffix attached to a metric literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MetricSuffix {
    /// No suffix.
    #[default]
    #[serde(rename = "")]
    None,
    /// `%`
    #[serde(rename = "%")]
    Percent,
    /// `x` (multiplier)
    #[serde(rename = "x")]
    Times,
}

impl MetricSuffix {
    /// Literal suffix text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Percent => "%",
            Self::Times => "x",
        }
    }

    fn from_match(s: Option<&str>) -> Self {
        match s {
            Some("%") => Self::Percent,
            Some("x") => Self::Times,
            _ => Self::None,
        }
    }
}

/// Numeric literal found in free text, ready to drive a counting animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricToken {
    /// Matched substring including the suffix.
    pub literal: String,
    /// Target value.
    pub value: f64,
    /// Suffix following the number.
    pub suffix: MetricSuffix,
    /// Fractional digits of the literal; every rendered frame uses exactly this many.
    pub precision: usize,
    /// Byte range of `literal` in the scanned text.
    pub span: Range<usize>,
}

impl MetricToken {
    /// Render `value` with this token's precision and suffix.
    pub fn format(&self, value: f64) -> String {
        self.counter_format().render(value)
    }

    /// Text shown after a reset.
    pub fn render_zero(&self) -> String {
        self.format(0.0)
    }

    /// Formatting rule for counters driven by this token.
    pub fn counter_format(&self) -> CounterFormat {
        CounterFormat {
            precision: self.precision,
            suffix: self.suffix,
        }
    }
}

/// One piece of scanned text.
#[derive(Clone, Debug, PartialEq)]
pub enum Piece<'a> {
    /// Unannotated text.
    Text(&'a str),
    /// Recognised metric.
    Metric(MetricToken),
}

/// Scan `text` left to right for `<number>[%|x]` literals.
///
/// Matches never overlap. A literal that does not parse as a number is passed through as
/// text.
pub fn parse_metrics(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in METRIC_PATTERN.captures_iter(text) {
        let (Some(full), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // An unparsable literal stays inside the next text piece since `last` is not advanced.
        let Some(value) = num.as_str().parse::<f64>().ok().filter(|v| v.is_finite()) else {
            continue;
        };
        if full.start() > last {
            pieces.push(Piece::Text(&text[last..full.start()]));
        }
        let precision = num
            .as_str()
            .split_once('.')
            .map(|(_, frac)| frac.len())
            .unwrap_or(0);
        pieces.push(Piece::Metric(MetricToken {
            literal: full.as_str().to_string(),
            value,
            suffix: MetricSuffix::from_match(caps.get(2).map(|m| m.as_str())),
            precision,
            span: full.range(),
        }));
        last = full.end();
    }
    if last < text.len() {
        pieces.push(Piece::Text(&text[last..]));
    }
    pieces
}

/// Only the metric tokens of `text`.
pub fn metric_tokens(text: &str) -> Vec<MetricToken> {
    parse_metrics(text)
        .into_iter()
        .filter_map(|p| match p {
            Piece::Metric(m) => Some(m),
            Piece::Text(_) => None,
        })
        .collect()
}

/// Annotated markup: each metric wrapped in a `metric` span carrying its counter data.
pub fn render_metric_markup(text: &str) -> String {
    let mut out = String::new();
    for piece in parse_metrics(text) {
        match piece {
            Piece::Text(t) => out.push_str(t),
            Piece::Metric(m) => out.push_str(&format!(
                "<span class=\"metric\" data-decimals=\"{}\" data-suffix=\"{}\" data-value=\"{}\">{}</span>",
                m.precision,
                m.suffix.as_str(),
                &m.literal[..m.literal.len() - m.suffix.as_str().len()],
                m.literal
            )),
        }
    }
    out
}

/// Append `text` under `parent` with every metric wrapped in a `metric` span.
///
/// Returns the metric span handles in text order.
pub fn annotate_metrics(doc: &mut Document, parent: NodeId, text: &str) -> Vec<NodeId> {
    let mut spans = Vec::new();
    for piece in parse_metrics(text) {
        match piece {
            Piece::Text(t) => {
                doc.append_text(parent, t);
            }
            Piece::Metric(m) => {
                let Some(rect) = doc.rect(parent) else {
                    return spans;
                };
                let number = &m.literal[..m.literal.len() - m.suffix.as_str().len()];
                let span = doc.append(
                    parent,
                    Element::new("span")
                        .class("metric")
                        .attr("data-value", number)
                        .attr("data-suffix", m.suffix.as_str())
                        .attr("data-decimals", m.precision.to_string())
                        .rect(rect)
                        .text(m.literal.clone()),
                );
                spans.extend(span);
            }
        }
    }
    spans
}

/// Read counter data back from a `metric` span.
pub fn token_from_attrs(doc: &Document, span: NodeId) -> Option<MetricToken> {
    let number = doc.attr(span, "data-value")?;
    let value = number.parse::<f64>().ok()?;
    let suffix = match doc.attr(span, "data-suffix").unwrap_or("") {
        "%" => MetricSuffix::Percent,
        "x" => MetricSuffix::Times,
        _ => MetricSuffix::None,
    };
    let precision = doc
        .attr(span, "data-decimals")
        .and_then(|d| d.parse::<usize>().ok())
        .unwrap_or(0);
    Some(MetricToken {
        literal: format!("{number}{}", suffix.as_str()),
        value,
        suffix,
        precision,
        span: 0..number.len() + suffix.as_str().len(),
    })
}

/// How a counter renders its current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CounterFormat {
    /// Fractional digits.
    pub precision: usize,
    /// Suffix appended after the number.
    pub suffix: MetricSuffix,
}

impl CounterFormat {
    /// Whole numbers, no suffix.
    pub fn integer() -> Self {
        Self::default()
    }

    /// Render `value`.
    pub fn render(&self, value: f64) -> String {
        // Avoid "-0" for values that round to zero from below.
        let value = if value.abs() < 0.5 * 10f64.powi(-(self.precision as i32)) {
            0.0
        } else {
            value
        };
        format!("{:.*}{}", self.precision, value, self.suffix.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metric.rs"]
mod tests;
