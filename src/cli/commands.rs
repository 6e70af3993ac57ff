//! CLI command handlers.
//!
//! Each handler returns `ExitCode::SUCCESS` when every requested result is
//! stable, and exit code 1 on invalid input, I/O failure, or an unstable
//! result.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use super::output::{
    print_banner, print_error, print_help, print_model_list, print_result, print_version,
    render_comparison_table, render_json,
};
use super::{Args, Command};
use crate::compare::{ChartSeries, ComparisonRow, LabeledResult, Session, Slot};
use crate::config::ScenarioFile;
use crate::error::{QueueError, QueueResult};
use crate::formula::{formula, title};
use crate::models::ModelKind;
use crate::result::{Metric, DISPLAY_CAP};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    tracing::debug!(command = ?args.command, "dispatching");
    match args.command {
        Command::List => {
            print_model_list();
            ExitCode::SUCCESS
        }
        Command::Compute {
            model,
            params,
            json,
        } => compute_model(&model, &params, json),
        Command::Formula { model, metric } => show_formula(&model, &metric),
        Command::Run {
            scenario_path,
            json,
        } => run_scenarios(&scenario_path, json),
        Command::Compare {
            scenario_path,
            json,
        } => compare_scenarios(&scenario_path, json),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

fn exit_code(stable: bool) -> ExitCode {
    if stable {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn fail(error: &QueueError) -> ExitCode {
    print_error(error);
    ExitCode::from(1)
}

/// Compute one model from raw `key=value` text.
#[must_use]
pub fn compute_model(model: &str, params: &[(String, String)], json: bool) -> ExitCode {
    let mut session = Session::new();
    let labeled = match session.compute_raw(model, params.iter().map(|(k, v)| (k, v))) {
        Ok(labeled) => labeled,
        Err(e) => return fail(&e),
    };

    if json {
        match render_json(labeled) {
            Ok(text) => println!("{text}"),
            Err(e) => return fail(&e),
        }
    } else {
        print_result(labeled, DISPLAY_CAP);
    }
    exit_code(labeled.result.is_valid())
}

/// Print the formula of `metric` for `model`.
#[must_use]
pub fn show_formula(model: &str, metric: &str) -> ExitCode {
    let kind = match ModelKind::from_id(model) {
        Ok(kind) => kind,
        Err(e) => return fail(&e),
    };
    let metric = match Metric::parse(metric) {
        Ok(metric) => metric,
        Err(e) => return fail(&e),
    };
    println!("{} ({})", title(metric), kind.label());
    println!("{}", formula(metric, kind));
    ExitCode::SUCCESS
}

#[derive(Serialize)]
struct NamedResult<'a> {
    name: &'a str,
    #[serde(flatten)]
    item: &'a LabeledResult,
}

/// Evaluate every scenario in a file.
#[must_use]
pub fn run_scenarios(path: &Path, json: bool) -> ExitCode {
    let file = match ScenarioFile::load(path) {
        Ok(file) => file,
        Err(e) => return fail(&e),
    };
    let results = match file.evaluate() {
        Ok(results) => results,
        Err(e) => return fail(&e),
    };
    let stable = results.iter().all(|item| item.result.is_valid());

    if json || file.report.json {
        let named: Vec<_> = file
            .scenarios
            .iter()
            .zip(&results)
            .map(|(scenario, item)| NamedResult {
                name: &scenario.name,
                item,
            })
            .collect();
        match render_json(&named) {
            Ok(text) => println!("{text}"),
            Err(e) => return fail(&e),
        }
    } else {
        for (scenario, item) in file.scenarios.iter().zip(&results) {
            print_banner(&format!("Scenario: {}", scenario.name));
            print_result(item, file.report.display_cap);
            println!();
        }
        println!(
            "{} scenario(s), {} unstable",
            results.len(),
            results.iter().filter(|item| !item.result.is_valid()).count()
        );
    }
    exit_code(stable)
}

#[derive(Debug, Serialize)]
struct ComparisonReport {
    status: String,
    table: Vec<ComparisonRow>,
    chart: ChartSeries,
}

fn compare_first_two(file: &ScenarioFile) -> QueueResult<Session> {
    let mut session = Session::new();
    for (slot, scenario) in [Slot::A, Slot::B].into_iter().zip(&file.scenarios) {
        session.compute(&scenario.model, &scenario.params)?;
        session.save_slot(slot)?;
    }
    Ok(session)
}

/// Put the first two scenarios of a file into slots A and B and compare.
#[must_use]
pub fn compare_scenarios(path: &Path, json: bool) -> ExitCode {
    let file = match ScenarioFile::load(path) {
        Ok(file) => file,
        Err(e) => return fail(&e),
    };
    let session = match compare_first_two(&file) {
        Ok(session) => session,
        Err(e) => return fail(&e),
    };
    let slots = session.slots();
    let (a, b) = match slots.both() {
        Ok(pair) => pair,
        Err(e) => return fail(&e),
    };
    let stable = a.result.is_valid() && b.result.is_valid();

    let report = slots.comparison_table().and_then(|table| {
        Ok(ComparisonReport {
            status: slots.status_line(),
            table,
            chart: slots.chart_series()?,
        })
    });
    let report = match report {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };

    if json {
        match render_json(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => return fail(&e),
        }
    } else {
        print_banner(&report.status);
        println!("{}", render_comparison_table(&report.table));
        for (slot, item) in [(Slot::A, a), (Slot::B, b)] {
            for error in &item.result.errors {
                println!("✗ Model {slot}: {error}");
            }
        }
    }
    exit_code(stable)
}
