//! Plain-text rendering of results and comparisons.

use crate::compare::LabeledResult;
use crate::result::{Metric, DISPLAY_CAP};

/// Placeholder for an absent value.
pub const ABSENT: &str = "—";

/// Placeholder for a non-finite value.
pub const INFINITE: &str = "∞";

/// Format a metric value.
///
/// Absent values print as `—` and non-finite ones as `∞`. Magnitudes in
/// `(0, 1e-4)` or at least `1e5` use 4-digit scientific notation with a
/// signed exponent (`1.2346e-5`, `3.0000e+5`); everything else uses 4 fixed
/// decimals.
#[must_use]
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value else {
        return ABSENT.to_string();
    };
    if !value.is_finite() {
        return INFINITE.to_string();
    }
    // -0.0 prints as 0
    let value = if value == 0.0 { 0.0 } else { value };
    let abs = value.abs();
    if (abs != 0.0 && abs < 1e-4) || abs >= 1e5 {
        let text = format!("{value:.4e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        format!("{value:.4}")
    }
}

/// Format a probability with 6 fixed decimals.
#[must_use]
pub fn format_probability(value: Option<f64>) -> String {
    match value {
        None => ABSENT.to_string(),
        Some(v) if !v.is_finite() => INFINITE.to_string(),
        Some(v) => format!("{:.6}", if v == 0.0 { 0.0 } else { v }),
    }
}

fn metric_lines(labeled: &LabeledResult) -> impl Iterator<Item = String> + '_ {
    Metric::ALL.into_iter().map(move |metric| {
        format!(
            "{}: {}",
            metric.label(),
            format_number(labeled.result.metric(metric))
        )
    })
}

/// Text export of a single result.
///
/// ```text
/// Model: M/M/1:GD/∞/∞
/// p0: 0.5000
/// …
/// c̄: 0.5000
/// pn (n≤20):
/// p0: 0.500000
/// …
/// ```
#[must_use]
pub fn results_text(labeled: &LabeledResult) -> String {
    results_text_with_cap(labeled, DISPLAY_CAP)
}

/// Text export listing `p_n` only for `n ≤ cap`.
#[must_use]
pub fn results_text_with_cap(labeled: &LabeledResult, cap: u64) -> String {
    let mut lines = vec![format!("Model: {}", labeled.label)];
    lines.extend(metric_lines(labeled));
    lines.push(format!("pn (n≤{cap}):"));
    lines.extend(
        labeled
            .result
            .display_sequence(cap)
            .iter()
            .map(|entry| format!("p{}: {}", entry.n, format_probability(Some(entry.value)))),
    );
    lines.join("\n")
}

/// Text export of two results side by side: the A block, a blank line,
/// then the B block.
#[must_use]
pub fn comparison_text(a: &LabeledResult, b: &LabeledResult) -> String {
    let mut lines = vec![format!("Model A: {}", a.label)];
    lines.extend(metric_lines(a));
    lines.push(String::new());
    lines.push(format!("Model B: {}", b.label));
    lines.extend(metric_lines(b));
    lines.join("\n")
}
