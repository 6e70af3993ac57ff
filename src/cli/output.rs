//! CLI output formatting.
//!
//! Every `render_*` function returns the text it would print so the output
//! can be tested; the `print_*` wrappers write it to stdout or stderr.

use serde::Serialize;

use crate::compare::{ComparisonRow, LabeledResult};
use crate::error::{QueueError, QueueResult};
use crate::models::MODELS;
use crate::report::{format_number, results_text_with_cap};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Shown under an M/G/1 result.
pub const APPROXIMATE_PN_NOTE: &str =
    "Note: p_n for M/G/1 uses the geometric approximation (1-ρ)ρⁿ; it is exact only for exponential service.";

/// Print version information.
pub fn print_version() {
    match option_env!("QUEUECALC_GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            println!("queuecalc {} ({hash})", env!("CARGO_PKG_VERSION"));
        }
        _ => println!("queuecalc {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"queuecalc - Steady-state metrics for classical queueing models

USAGE:
    queuecalc <COMMAND> [OPTIONS]

COMMANDS:
    list                              List models and their parameters

    compute <model> <key=value>...    Compute one model
        --json                        Emit JSON instead of text

    formula <model> <metric>          Show the LaTeX formula of a metric

    run <scenarios.yaml>              Evaluate every scenario in a file
        --json                        Emit JSON instead of text

    compare <scenarios.yaml>          Compare the first two scenarios (A and B)
        --json                        Emit table and chart data as JSON

    help                              Show this help message
    version                           Show version information

EXAMPLES:
    queuecalc compute mm1_inf lambda=1 mu=2
    queuecalc compute mmc_n lambda=4 mu=2 c=3 N=10 --json
    queuecalc formula mmr_repair cBar
    queuecalc run scenarios/bank.yaml

METRICS:
    p0, pN, lambdaEff (λeff), lambdaLost (λlost), Ls, Lq, Ws, Wq, cBar (c̄)

LOGGING:
    Diagnostics go to stderr. Set RUST_LOG=queuecalc=debug for detail.
"
    );
}

/// Registered models with their parameters and input hints.
#[must_use]
pub fn render_model_list() -> String {
    let mut lines = Vec::new();
    for spec in &MODELS {
        lines.push(format!("{:<12} {}", spec.id, spec.label));
        for param in spec.params {
            lines.push(format!(
                "    {:<12} {:<30} {}",
                param.id,
                param.label,
                param.rules.hint()
            ));
        }
    }
    lines.join("\n")
}

/// Print the model list.
pub fn print_model_list() {
    println!("{}", render_model_list());
}

/// Status badge, metrics, distribution and messages of one result.
#[must_use]
pub fn render_result(labeled: &LabeledResult, cap: u64) -> String {
    let result = &labeled.result;
    let mut lines = vec![
        format!("Status: {}", result.status()),
        results_text_with_cap(labeled, cap),
    ];
    lines.extend(result.warnings.iter().map(|w| format!("⚠ {w}")));
    lines.extend(result.errors.iter().map(|e| format!("✗ {e}")));
    if labeled.model.pn_is_approximate() {
        lines.push(APPROXIMATE_PN_NOTE.to_string());
    }
    lines.join("\n")
}

/// Print one result.
pub fn print_result(labeled: &LabeledResult, cap: u64) {
    println!("{}", render_result(labeled, cap));
}

/// Metric table for two slots.
#[must_use]
pub fn render_comparison_table(rows: &[ComparisonRow]) -> String {
    let mut lines = vec![format!("{:<8} {:>14} {:>14}", "Metric", "A", "B")];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<8} {:>14} {:>14}",
            row.metric.label(),
            format_number(row.a),
            format_number(row.b)
        )
    }));
    lines.join("\n")
}

/// Pretty JSON.
///
/// Non-finite numbers serialize as `null`.
///
/// # Errors
///
/// Returns [`QueueError::Serialization`] if encoding fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> QueueResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| QueueError::serialization(e.to_string()))
}

/// Print an error, one line per message for parameter problems.
pub fn print_error(error: &QueueError) {
    match error {
        QueueError::InvalidParameters { messages } => {
            eprintln!("✗ Invalid parameters:");
            for message in messages {
                eprintln!("  • {message}");
            }
        }
        other => eprintln!("Error: {other}"),
    }
}

/// Print a section banner.
pub fn print_banner(title: &str) {
    println!("{SEPARATOR}");
    println!("{title}");
    println!("{SEPARATOR}");
}
