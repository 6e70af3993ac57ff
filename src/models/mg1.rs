//! M/G/1 via the Pollaczek–Khinchine mean-value formula.

use serde::{Deserialize, Serialize};

use super::params::real;
use super::{ModelKind, ParamValues, QueueModel, UNSTABLE};
use crate::error::QueueResult;
use crate::result::{ComputationResult, DISPLAY_CAP};
use crate::state_space::StateSpace;

/// M/G/1:GD/∞/∞ with general service time of given mean and variance.
///
/// Only the means are exact. The distribution of the number in system is
/// not determined by two moments, so `pn` reports the geometric sequence
/// `(1-ρ)ρⁿ` as an approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mg1Pk {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Mean service time `E{t}`.
    pub mean_service: f64,
    /// Service time variance `Var{t}`.
    pub var_service: f64,
}

impl Mg1Pk {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mean_service: f64, var_service: f64) -> Self {
        Self {
            lambda,
            mean_service,
            var_service,
        }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::Mg1Pk;
        Ok(Self::new(
            real(values, kind, "lambda")?,
            real(values, kind, "meanService")?,
            real(values, kind, "varService")?,
        ))
    }

    /// Server utilization `ρ = λ·E{t}`.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.lambda * self.mean_service
    }
}

impl QueueModel for Mg1Pk {
    fn kind(&self) -> ModelKind {
        ModelKind::Mg1Pk
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::SingleServer {
            rho: self.rho(),
            capacity: None,
        }
    }

    fn compute(&self) -> ComputationResult {
        let Self {
            lambda,
            mean_service,
            var_service,
        } = *self;
        let rho = self.rho();
        let p0 = (1.0 - rho).max(0.0);

        let mut result = ComputationResult {
            p0,
            p_capacity: None,
            pn: self.state_space().display_sequence(p0.ln(), DISPLAY_CAP),
            lambda_eff: lambda,
            lambda_lost: 0.0,
            ls: f64::INFINITY,
            lq: f64::INFINITY,
            ws: f64::INFINITY,
            wq: f64::INFINITY,
            c_bar: rho,
            warnings: Vec::new(),
            errors: Vec::new(),
        };

        if rho >= 1.0 {
            result.errors.push(UNSTABLE.to_string());
            return result;
        }

        let lambda_sq = lambda * lambda;
        let lq = (lambda_sq * var_service + rho * rho) / (2.0 * (1.0 - rho));
        let wq = lq / lambda;
        result.lq = lq;
        result.wq = wq;
        result.ws = wq + mean_service;
        result.ls = rho + lambda_sq * (mean_service * mean_service + var_service) / (2.0 * (1.0 - rho));
        result
    }
}
