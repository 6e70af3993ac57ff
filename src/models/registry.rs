//! Static catalog of the supported models and their parameter rules.
//!
//! The registry holds no behavior beyond describing parameters, validating
//! raw input against those descriptions, and handing off to the model's
//! compute function.

use indexmap::IndexMap;
use serde::Serialize;

use super::{ModelKind, ParamValues};
use crate::error::{QueueError, QueueResult};
use crate::result::ComputationResult;
use crate::state_space::MAX_STATES;

/// Validation rules for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRules {
    /// Must be strictly greater than zero.
    pub positive: bool,
    /// Must be a whole number.
    pub integer: bool,
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
}

impl ParamRules {
    /// Strictly positive real (rates, means).
    pub const POSITIVE: Self = Self {
        positive: true,
        integer: false,
        min: None,
        max: None,
    };

    /// Non-negative real (variances).
    pub const NON_NEGATIVE: Self = Self {
        positive: false,
        integer: false,
        min: Some(0.0),
        max: None,
    };

    /// Whole number that sizes the state space.
    pub const COUNT: Self = Self {
        positive: false,
        integer: true,
        min: Some(1.0),
        max: Some(MAX_STATES as f64),
    };

    /// Check `value` against every rule, in declaration order.
    ///
    /// Returns one message per violated rule.
    #[must_use]
    pub fn check(&self, label: &str, value: f64) -> Vec<String> {
        let mut messages = Vec::new();
        if self.positive && value <= 0.0 {
            messages.push(format!("{label} must be > 0."));
        }
        if let Some(min) = self.min {
            if value < min {
                messages.push(format!("{label} must be ≥ {min}."));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                messages.push(format!("{label} must be ≤ {max}."));
            }
        }
        if self.integer && value.fract() != 0.0 {
            messages.push(format!("{label} must be an integer."));
        }
        messages
    }

    /// Short input hint for this rule set.
    #[must_use]
    pub fn hint(&self) -> String {
        if self.integer {
            "Required. Integer.".to_string()
        } else if self.positive {
            "Required. > 0.".to_string()
        } else if let Some(min) = self.min {
            format!("Required. ≥ {min}.")
        } else {
            "Required.".to_string()
        }
    }
}

/// One declared parameter of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Stable identifier used as the map key.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Validation rules.
    pub rules: ParamRules,
}

impl ParamSpec {
    const fn new(id: &'static str, label: &'static str, rules: ParamRules) -> Self {
        Self { id, label, rules }
    }
}

/// Immutable model descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSpec {
    /// Model this descriptor belongs to.
    pub kind: ModelKind,
    /// Stable identifier.
    pub id: &'static str,
    /// Kendall-notation display name.
    pub label: &'static str,
    /// Declared parameters, in input order.
    pub params: &'static [ParamSpec],
}

const LAMBDA: ParamSpec = ParamSpec::new("lambda", "Arrival rate λ", ParamRules::POSITIVE);
const MU: ParamSpec = ParamSpec::new("mu", "Service rate μ", ParamRules::POSITIVE);
const SERVERS: ParamSpec = ParamSpec::new("c", "Servers c", ParamRules::COUNT);

/// The seven supported models, indexed by [`ModelKind`] discriminant.
pub static MODELS: [ModelSpec; 7] = [
    ModelSpec {
        kind: ModelKind::Mm1Inf,
        id: "mm1_inf",
        label: "M/M/1:GD/∞/∞",
        params: &[LAMBDA, MU],
    },
    ModelSpec {
        kind: ModelKind::Mm1N,
        id: "mm1_n",
        label: "M/M/1:GD/N/∞",
        params: &[
            LAMBDA,
            MU,
            ParamSpec::new("N", "System capacity N", ParamRules::COUNT),
        ],
    },
    ModelSpec {
        kind: ModelKind::MmcInf,
        id: "mmc_inf",
        label: "M/M/c:GD/∞/∞",
        params: &[LAMBDA, MU, SERVERS],
    },
    ModelSpec {
        kind: ModelKind::MmcN,
        id: "mmc_n",
        label: "M/M/c:GD/N/∞",
        params: &[
            LAMBDA,
            MU,
            SERVERS,
            ParamSpec::new("N", "System capacity N (≥ c)", ParamRules::COUNT),
        ],
    },
    ModelSpec {
        kind: ModelKind::Mminf,
        id: "mminf",
        label: "M/M/∞:GD/∞/∞",
        params: &[LAMBDA, MU],
    },
    ModelSpec {
        kind: ModelKind::MmrRepair,
        id: "mmr_repair",
        label: "M/M/R:GD/K/K",
        params: &[
            ParamSpec::new("lambda", "Failure/arrival rate λ", ParamRules::POSITIVE),
            ParamSpec::new("mu", "Repair rate μ", ParamRules::POSITIVE),
            ParamSpec::new("R", "Servers R (repairers)", ParamRules::COUNT),
            ParamSpec::new("K", "Population size K (units)", ParamRules::COUNT),
        ],
    },
    ModelSpec {
        kind: ModelKind::Mg1Pk,
        id: "mg1_pk",
        label: "M/G/1:GD/∞/∞",
        params: &[
            LAMBDA,
            ParamSpec::new("meanService", "E{t} (service mean)", ParamRules::POSITIVE),
            ParamSpec::new(
                "varService",
                "Var{t} (service variance)",
                ParamRules::NON_NEGATIVE,
            ),
        ],
    },
];

/// Look up a model by identifier.
#[must_use]
pub fn lookup(id: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|spec| spec.id == id)
}

/// Look up a model by identifier, failing on unknown ids.
///
/// # Errors
///
/// Returns [`QueueError::UnknownModel`] when `id` is not registered.
pub fn require(id: &str) -> QueueResult<&'static ModelSpec> {
    lookup(id).ok_or_else(|| QueueError::UnknownModel(id.to_string()))
}

impl ModelSpec {
    /// Declared parameter with the given id.
    #[must_use]
    pub fn param(&self, id: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.id == id)
    }

    /// Validate numeric input against the declared rules.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidParameters`] listing every violation:
    /// missing or non-finite values, rule violations, unknown ids.
    pub fn validate(&self, values: &ParamValues) -> QueueResult<ParamValues> {
        let entries = self
            .params
            .iter()
            .map(|p| (p, values.get(p.id).map(|v| Some(*v).filter(|v| v.is_finite()))));
        let unknown = values.keys().map(String::as_str);
        self.collect(entries, unknown)
    }

    /// Validate textual input (one `(id, text)` pair per field).
    ///
    /// Empty text counts as missing; text that does not parse to a finite
    /// number is reported as non-numeric.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidParameters`] listing every violation.
    pub fn validate_raw<I, K, V>(&self, raw: I) -> QueueResult<ParamValues>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw: IndexMap<String, String> = raw
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.as_ref().trim().to_string()))
            .collect();
        let entries = self.params.iter().map(|p| {
            let parsed = raw
                .get(p.id)
                .filter(|text| !text.is_empty())
                .map(|text| text.parse::<f64>().ok().filter(|v| v.is_finite()));
            (p, parsed)
        });
        let unknown = raw.keys().map(String::as_str);
        self.collect(entries, unknown)
    }

    /// Validate and compute in one step.
    ///
    /// # Errors
    ///
    /// Returns validation errors, or a guard violation if the model produced
    /// a NaN.
    pub fn evaluate(&self, values: &ParamValues) -> QueueResult<ComputationResult> {
        let values = self.validate(values)?;
        self.kind.compute(&values)
    }

    /// Shared rule checking.
    ///
    /// `entries` yields each declared parameter with `None` when missing,
    /// `Some(None)` when non-numeric, `Some(Some(v))` otherwise.
    fn collect<'a>(
        &self,
        entries: impl Iterator<Item = (&'static ParamSpec, Option<Option<f64>>)>,
        supplied: impl Iterator<Item = &'a str>,
    ) -> QueueResult<ParamValues> {
        let mut values = ParamValues::new();
        let mut messages = Vec::new();

        for (param, entry) in entries {
            match entry {
                None => messages.push(format!("{} is required.", param.label)),
                Some(None) => messages.push(format!("{} must be numeric.", param.label)),
                Some(Some(value)) => {
                    messages.extend(param.rules.check(param.label, value));
                    values.insert(param.id.to_string(), value);
                }
            }
        }
        for id in supplied {
            if self.param(id).is_none() {
                messages.push(format!("Unknown parameter '{id}' for {}.", self.id));
            }
        }

        if messages.is_empty() {
            Ok(values)
        } else {
            Err(QueueError::InvalidParameters { messages })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(err: QueueError) -> Vec<String> {
        match err {
            QueueError::InvalidParameters { messages } => messages,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_registry_has_seven_models_in_kind_order() {
        assert_eq!(MODELS.len(), 7);
        for (index, spec) in MODELS.iter().enumerate() {
            assert_eq!(spec.kind as usize, index, "{} out of order", spec.id);
            assert_eq!(spec.kind.id(), spec.id);
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let spec = lookup("mmc_n").expect("registered");
        assert_eq!(spec.label, "M/M/c:GD/N/∞");
        assert_eq!(spec.params.len(), 4);
        assert!(lookup("mm2").is_none());
        assert!(matches!(require("mm2"), Err(QueueError::UnknownModel(_))));
    }

    #[test]
    fn test_rule_hints() {
        assert_eq!(ParamRules::COUNT.hint(), "Required. Integer.");
        assert_eq!(ParamRules::POSITIVE.hint(), "Required. > 0.");
        assert_eq!(ParamRules::NON_NEGATIVE.hint(), "Required. ≥ 0.");
    }

    #[test]
    fn test_rule_check_messages() {
        let msgs = ParamRules::COUNT.check("Servers c", 0.5);
        assert_eq!(
            msgs,
            vec![
                "Servers c must be ≥ 1.".to_string(),
                "Servers c must be an integer.".to_string()
            ]
        );
        assert!(ParamRules::POSITIVE.check("μ", 2.0).is_empty());
        assert_eq!(ParamRules::POSITIVE.check("μ", 0.0), vec!["μ must be > 0."]);
    }

    #[test]
    fn test_count_upper_bound() {
        let msgs = ParamRules::COUNT.check("K", 2e6);
        assert_eq!(msgs, vec!["K must be ≤ 1000000."]);
    }

    #[test]
    fn test_validate_numeric_ok() {
        let spec = require("mm1_n").expect("registered");
        let mut values = ParamValues::new();
        values.insert("N".to_string(), 4.0);
        values.insert("lambda".to_string(), 1.0);
        values.insert("mu".to_string(), 2.0);
        let validated = spec.validate(&values).expect("valid");
        let keys: Vec<_> = validated.keys().cloned().collect();
        assert_eq!(keys, vec!["lambda", "mu", "N"]);
    }

    #[test]
    fn test_validate_numeric_reports_everything() {
        let spec = require("mmc_n").expect("registered");
        let mut values = ParamValues::new();
        values.insert("lambda".to_string(), -1.0);
        values.insert("mu".to_string(), f64::NAN);
        values.insert("c".to_string(), 2.5);
        values.insert("z".to_string(), 1.0);
        let msgs = messages(spec.validate(&values).expect_err("invalid"));
        assert_eq!(
            msgs,
            vec![
                "Arrival rate λ must be > 0.",
                "Service rate μ must be numeric.",
                "Servers c must be an integer.",
                "System capacity N (≥ c) is required.",
                "Unknown parameter 'z' for mmc_n.",
            ]
        );
    }

    #[test]
    fn test_validate_raw_text() {
        let spec = require("mg1_pk").expect("registered");
        let values = spec
            .validate_raw([("lambda", " 1 "), ("meanService", "0.5"), ("varService", "0")])
            .expect("valid");
        assert_eq!(values.get("meanService"), Some(&0.5));

        let msgs = messages(
            spec.validate_raw([("lambda", ""), ("meanService", "abc"), ("varService", "-1")])
                .expect_err("invalid"),
        );
        assert_eq!(
            msgs,
            vec![
                "Arrival rate λ is required.",
                "E{t} (service mean) must be numeric.",
                "Var{t} (service variance) must be ≥ 0.",
            ]
        );
    }

    #[test]
    fn test_validate_raw_rejects_non_finite_text() {
        let spec = require("mm1_inf").expect("registered");
        let msgs = messages(
            spec.validate_raw([("lambda", "inf"), ("mu", "NaN")])
                .expect_err("invalid"),
        );
        assert_eq!(msgs.len(), 2);
        assert!(msgs.iter().all(|m| m.ends_with("must be numeric.")));
    }

    #[test]
    fn test_evaluate_runs_model() {
        let spec = require("mm1_inf").expect("registered");
        let values = spec
            .validate_raw([("lambda", "1"), ("mu", "2")])
            .expect("valid");
        let result = spec.evaluate(&values).expect("computed");
        assert!((result.ls - 1.0).abs() < 1e-12);
    }
}
