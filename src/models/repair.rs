//! Machine-repair model: a finite population of units that fail and queue
//! for a fixed crew of repairers.

use serde::{Deserialize, Serialize};

use super::params::{count, real};
use super::{p0_or_normalize, ModelKind, ParamValues, QueueModel};
use crate::error::QueueResult;
use crate::math::{combination, factorial, MAX_FINITE_FACTORIAL};
use crate::result::{per_throughput, ComputationResult, DISPLAY_CAP};
use crate::state_space::StateSpace;

/// Error text when there are more repairers than units.
pub const REPAIRERS_EXCEED_POPULATION: &str = "Servers R must be ≤ population size K.";

/// M/M/R:GD/K/K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmrRepair {
    /// Failure rate λ per running unit.
    pub lambda: f64,
    /// Repair rate μ per repairer.
    pub mu: f64,
    /// Repairers R.
    pub repairers: u64,
    /// Population K.
    pub population: u64,
}

impl MmrRepair {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, repairers: u64, population: u64) -> Self {
        Self {
            lambda,
            mu,
            repairers,
            population,
        }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing or a count is not whole.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::MmrRepair;
        Ok(Self::new(
            real(values, kind, "lambda")?,
            real(values, kind, "mu")?,
            count(values, kind, "R")?,
            count(values, kind, "K")?,
        ))
    }

    /// Per-unit ratio `ρ = λ / μ`.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.lambda / self.mu
    }

    /// `Σ_n p_n / p_0` from the binomial closed form, for `K ≤ 170`.
    fn closed_form_p0(&self) -> Option<f64> {
        let k = i64::try_from(self.population)
            .ok()
            .filter(|k| *k <= MAX_FINITE_FACTORIAL)?;
        let r = i64::try_from(self.repairers).ok()?;
        let rho = self.rho();
        let r_fact = factorial(r);

        let total: f64 = (0..=k)
            .map(|n| {
                let weight = combination(k, n) * rho.powf(n as f64);
                if n <= r {
                    weight
                } else {
                    weight * factorial(n) / (r_fact * (r as f64).powf((n - r) as f64))
                }
            })
            .sum();
        Some(1.0 / total)
    }
}

impl QueueModel for MmrRepair {
    fn kind(&self) -> ModelKind {
        ModelKind::MmrRepair
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::FiniteSource {
            rho: self.rho(),
            population: self.population,
            repairers: self.repairers,
        }
    }

    fn compute(&self) -> ComputationResult {
        let Self {
            lambda, population, ..
        } = *self;
        if self.repairers > population {
            return ComputationResult::rejected(self.kind(), lambda, REPAIRERS_EXCEED_POPULATION);
        }

        let space = self.state_space();
        let (p0, ln_p0) = p0_or_normalize(self.closed_form_p0(), &space);
        let agg = space.full_range_aggregate(ln_p0);

        let ls = agg.mean;
        let lq = agg.queued;
        let lambda_eff = lambda * (population as f64 - ls);

        let mut result = ComputationResult {
            p0,
            p_capacity: Some(agg.last.value),
            pn: space.display_sequence(ln_p0, DISPLAY_CAP),
            lambda_eff,
            lambda_lost: 0.0,
            ls,
            lq,
            ws: per_throughput(ls, lambda_eff),
            wq: per_throughput(lq, lambda_eff),
            c_bar: agg.busy,
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        result.flag_low_throughput();
        result
    }
}
