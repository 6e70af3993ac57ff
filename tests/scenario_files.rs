//! Scenario files shipped under `scenarios/` and hand-written edge cases.

use queuecalc::config::{ReportConfig, Scenario, ScenarioFile};
use queuecalc::prelude::*;
use std::path::PathBuf;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn bank_file_loads_and_evaluates() {
    let file = ScenarioFile::load(scenario_path("bank.yaml")).expect("load");
    assert_eq!(file.report.display_cap, 10);
    assert_eq!(file.scenarios.len(), 3);

    let results = file.evaluate().expect("evaluate");
    assert!(results.iter().all(|item| item.result.is_valid()));

    // A bounded lobby turns some customers away.
    let lobby = &results[2];
    assert_eq!(lobby.model, ModelKind::MmcN);
    assert!(lobby.result.lambda_lost > 0.0);
    assert!(lobby.result.lambda_eff < 4.0);
}

#[test]
fn workshop_file_second_mechanic_helps() {
    let file = ScenarioFile::load(scenario_path("workshop.yaml")).expect("load");
    let results = file.evaluate().expect("evaluate");
    assert_eq!(file.report, ReportConfig::default());

    let (one, two) = (&results[0].result, &results[1].result);
    assert!(two.ls < one.ls);
    assert!(two.wq < one.wq);
    assert!(results[2].model.pn_is_approximate());
}

#[test]
fn unstable_scenarios_evaluate_with_errors() {
    let yaml = r"
scenarios:
  - name: overloaded
    model: mmc_inf
    params: { lambda: 10, mu: 1, c: 2 }
";
    let file = ScenarioFile::from_yaml(yaml).expect("valid file");
    let results = file.evaluate().expect("evaluate");
    assert_eq!(results[0].result.status(), ResultStatus::Unstable);
    assert_eq!(results[0].result.ls, f64::INFINITY);
}

#[test]
fn semantic_errors_name_the_scenario() {
    let yaml = r"
scenarios:
  - name: fine
    model: mminf
    params: { lambda: 1, mu: 1 }
  - name: missing capacity
    model: mm1_n
    params: { lambda: 1, mu: 1 }
";
    let err = ScenarioFile::from_yaml(yaml).expect_err("missing N");
    let msg = err.to_string();
    assert!(msg.contains("scenario 'missing capacity'"), "{msg}");
    assert!(msg.contains("System capacity N is required."), "{msg}");
}

#[test]
fn unknown_parameter_rejected() {
    let yaml = r"
scenarios:
  - name: typo
    model: mm1_inf
    params: { lamda: 1, mu: 1 }
";
    let msg = ScenarioFile::from_yaml(yaml).expect_err("typo").to_string();
    assert!(msg.contains("Unknown parameter 'lamda' for mm1_inf."), "{msg}");
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = ScenarioFile::from_yaml("scenarios: [ {").expect_err("malformed");
    assert!(matches!(err, QueueError::YamlParse(_)));
}

#[test]
fn built_file_survives_disk_round_trip() {
    let file = ScenarioFile::builder()
        .display_cap(4)
        .scenario(Scenario::new(
            "erlang",
            "mmc_n",
            param_values([("lambda", 2.0), ("mu", 1.0), ("c", 2.0), ("N", 2.0)]),
        ))
        .build();
    let path = std::env::temp_dir().join(format!("queuecalc_round_trip_{}.yaml", std::process::id()));
    std::fs::write(&path, file.to_yaml().expect("yaml")).expect("write");

    let loaded = ScenarioFile::load(&path).expect("load");
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, file);

    // Erlang B with a = 2, c = 2: B = 2 / 5.
    let results = loaded.evaluate().expect("evaluate");
    let blocking = results[0].result.p_capacity.expect("bounded");
    assert!((blocking - 0.4).abs() < 1e-12);
}
