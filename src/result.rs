//! The uniform output record shared by every model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueueError, QueueResult};
use crate::models::ModelKind;

/// Highest `n` included in the displayed `p_n` sequence.
pub const DISPLAY_CAP: u64 = 20;

/// Effective throughput below which ratios `L / λeff` are flagged as fragile.
pub const NEAR_ZERO_THROUGHPUT: f64 = 1e-6;

/// Warning attached when effective throughput is near zero.
pub const NEAR_ZERO_THROUGHPUT_WARNING: &str =
    "λeff is near zero; results may be numerically unstable.";

/// One entry of the steady-state distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PnEntry {
    /// Number of customers in the system.
    pub n: u64,
    /// Steady-state probability of exactly `n` customers.
    pub value: f64,
}

/// Steady-state metrics produced by a model.
///
/// Every model populates every field. When `errors` is non-empty the
/// divergent metrics hold `+inf` rather than being left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Probability of an empty system.
    pub p0: f64,
    /// Probability of a full system, `None` for unbounded capacity.
    #[serde(rename = "pN")]
    pub p_capacity: Option<f64>,
    /// `p_n` for `n ≤ min(DISPLAY_CAP, capacity)`.
    pub pn: Vec<PnEntry>,
    /// Effective arrival rate.
    #[serde(rename = "lambdaEff")]
    pub lambda_eff: f64,
    /// Rate of arrivals turned away.
    #[serde(rename = "lambdaLost")]
    pub lambda_lost: f64,
    /// Expected number in system.
    #[serde(rename = "Ls")]
    pub ls: f64,
    /// Expected number in queue.
    #[serde(rename = "Lq")]
    pub lq: f64,
    /// Expected time in system.
    #[serde(rename = "Ws")]
    pub ws: f64,
    /// Expected time in queue.
    #[serde(rename = "Wq")]
    pub wq: f64,
    /// Expected number of busy servers.
    #[serde(rename = "cBar")]
    pub c_bar: f64,
    /// Advisory messages; the result is still usable.
    pub warnings: Vec<String>,
    /// Fatal messages; the result is not a valid steady state.
    pub errors: Vec<String>,
}

impl ComputationResult {
    /// True when no fatal condition was reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Overall status of this result.
    #[must_use]
    pub fn status(&self) -> ResultStatus {
        if !self.errors.is_empty() {
            ResultStatus::Unstable
        } else if !self.warnings.is_empty() {
            ResultStatus::ComputedWithWarnings
        } else {
            ResultStatus::Computed
        }
    }

    /// Read a scalar metric. Returns `None` only for an absent `pN`.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::P0 => Some(self.p0),
            Metric::PCapacity => self.p_capacity,
            Metric::LambdaEff => Some(self.lambda_eff),
            Metric::LambdaLost => Some(self.lambda_lost),
            Metric::Ls => Some(self.ls),
            Metric::Lq => Some(self.lq),
            Metric::Ws => Some(self.ws),
            Metric::Wq => Some(self.wq),
            Metric::CBar => Some(self.c_bar),
        }
    }

    /// The `p_n` entries with `n ≤ cap`.
    #[must_use]
    pub fn display_sequence(&self, cap: u64) -> &[PnEntry] {
        let end = self.pn.partition_point(|entry| entry.n <= cap);
        &self.pn[..end]
    }

    /// Append the near-zero throughput warning when `lambda_eff` is tiny.
    pub(crate) fn flag_low_throughput(&mut self) {
        if self.lambda_eff < NEAR_ZERO_THROUGHPUT {
            self.warnings.push(NEAR_ZERO_THROUGHPUT_WARNING.to_string());
        }
    }

    /// Result for parameters that violate a structural constraint.
    ///
    /// Queue metrics are set to `+inf` and the distribution is left empty.
    /// `pN` is reported as zero for models with a finite capacity.
    pub(crate) fn rejected(kind: ModelKind, lambda: f64, error: impl Into<String>) -> Self {
        Self {
            p0: 0.0,
            p_capacity: kind.is_bounded().then_some(0.0),
            pn: Vec::new(),
            lambda_eff: lambda,
            lambda_lost: 0.0,
            ls: f64::INFINITY,
            lq: f64::INFINITY,
            ws: f64::INFINITY,
            wq: f64::INFINITY,
            c_bar: 0.0,
            warnings: Vec::new(),
            errors: vec![error.into()],
        }
    }
}

/// Time in system/queue as `L / λeff`, infinite when nothing flows.
pub(crate) fn per_throughput(length: f64, lambda_eff: f64) -> f64 {
    if lambda_eff > 0.0 {
        length / lambda_eff
    } else {
        f64::INFINITY
    }
}

/// Overall status of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    /// No warnings, no errors.
    Computed,
    /// Usable, with advisory warnings.
    ComputedWithWarnings,
    /// Fatal errors present.
    Unstable,
}

impl ResultStatus {
    /// Short status text.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Computed => "Computed",
            Self::ComputedWithWarnings => "Computed with warnings",
            Self::Unstable => "Unstable / invalid",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.badge())
    }
}

/// Scalar metrics of a [`ComputationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// `p0`
    P0,
    /// `pN`
    PCapacity,
    /// `λeff`
    LambdaEff,
    /// `λlost`
    LambdaLost,
    /// `Ls`
    Ls,
    /// `Lq`
    Lq,
    /// `Ws`
    Ws,
    /// `Wq`
    Wq,
    /// `c̄`
    CBar,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Self; 9] = [
        Self::P0,
        Self::PCapacity,
        Self::LambdaEff,
        Self::LambdaLost,
        Self::Ls,
        Self::Lq,
        Self::Ws,
        Self::Wq,
        Self::CBar,
    ];

    /// Field name used in serialized results.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::P0 => "p0",
            Self::PCapacity => "pN",
            Self::LambdaEff => "lambdaEff",
            Self::LambdaLost => "lambdaLost",
            Self::Ls => "Ls",
            Self::Lq => "Lq",
            Self::Ws => "Ws",
            Self::Wq => "Wq",
            Self::CBar => "cBar",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::P0 => "p0",
            Self::PCapacity => "pN",
            Self::LambdaEff => "λeff",
            Self::LambdaLost => "λlost",
            Self::Ls => "Ls",
            Self::Lq => "Lq",
            Self::Ws => "Ws",
            Self::Wq => "Wq",
            Self::CBar => "c̄",
        }
    }

    /// LaTeX symbol.
    #[must_use]
    pub const fn latex(self) -> &'static str {
        match self {
            Self::LambdaEff => r"\lambda_{eff}",
            Self::LambdaLost => r"\lambda_{lost}",
            Self::CBar => r"\bar{c}",
            other => other.key(),
        }
    }

    /// Parse a metric from its key or its display label.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownMetric`] for anything else.
    pub fn parse(name: &str) -> QueueResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == name || m.label() == name)
            .ok_or_else(|| QueueError::UnknownMetric(name.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ComputationResult {
        ComputationResult {
            p0: 0.5,
            p_capacity: None,
            pn: (0..=20)
                .map(|n| PnEntry {
                    n,
                    value: 0.5_f64.powi(n as i32 + 1),
                })
                .collect(),
            lambda_eff: 1.0,
            lambda_lost: 0.0,
            ls: 1.0,
            lq: 0.5,
            ws: 1.0,
            wq: 0.5,
            c_bar: 0.5,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_status_progression() {
        let mut result = sample();
        assert_eq!(result.status(), ResultStatus::Computed);

        result.warnings.push("careful".to_string());
        assert_eq!(result.status(), ResultStatus::ComputedWithWarnings);

        result.errors.push("unstable".to_string());
        assert_eq!(result.status(), ResultStatus::Unstable);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_status_badges() {
        assert_eq!(ResultStatus::Computed.to_string(), "Computed");
        assert_eq!(
            ResultStatus::ComputedWithWarnings.badge(),
            "Computed with warnings"
        );
        assert_eq!(ResultStatus::Unstable.badge(), "Unstable / invalid");
    }

    #[test]
    fn test_display_sequence_caps() {
        let result = sample();
        assert_eq!(result.display_sequence(20).len(), 21);
        assert_eq!(result.display_sequence(5).len(), 6);
        assert_eq!(result.display_sequence(0).len(), 1);
        assert_eq!(result.display_sequence(100).len(), 21);
    }

    #[test]
    fn test_low_throughput_warning() {
        let mut result = sample();
        result.lambda_eff = 1e-9;
        result.flag_low_throughput();
        assert_eq!(result.warnings, vec![NEAR_ZERO_THROUGHPUT_WARNING]);

        let mut healthy = sample();
        healthy.flag_low_throughput();
        assert!(healthy.warnings.is_empty());
    }

    #[test]
    fn test_rejected_markers() {
        let result = ComputationResult::rejected(ModelKind::MmcN, 2.0, "Capacity N must be ≥ c.");
        assert_eq!(result.status(), ResultStatus::Unstable);
        assert_eq!(result.p_capacity, Some(0.0));
        assert_eq!(result.lambda_eff, 2.0);
        assert!(result.ls.is_infinite());
        assert!(result.wq.is_infinite());
        assert!(result.pn.is_empty());
    }

    #[test]
    fn test_per_throughput() {
        assert_eq!(per_throughput(2.0, 4.0), 0.5);
        assert!(per_throughput(2.0, 0.0).is_infinite());
    }

    #[test]
    fn test_metric_lookup() {
        let result = sample();
        assert_eq!(result.metric(Metric::Ls), Some(1.0));
        assert_eq!(result.metric(Metric::PCapacity), None);
        assert_eq!(result.metric(Metric::CBar), Some(0.5));
    }

    #[test]
    fn test_metric_parse_key_and_label() {
        assert_eq!(Metric::parse("lambdaEff").ok(), Some(Metric::LambdaEff));
        assert_eq!(Metric::parse("λeff").ok(), Some(Metric::LambdaEff));
        assert_eq!(Metric::parse("c̄").ok(), Some(Metric::CBar));
        assert_eq!(Metric::parse("cBar").ok(), Some(Metric::CBar));
        assert!(Metric::parse("throughput").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        for key in ["\"p0\"", "\"pN\"", "\"lambdaEff\"", "\"Ls\"", "\"Wq\"", "\"cBar\""] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }
}
