//! Single-server Markovian queues.

use serde::{Deserialize, Serialize};

use super::params::{count, real};
use super::{p0_or_normalize, ModelKind, ParamValues, QueueModel, UNSTABLE_DIVERGES};
use crate::error::QueueResult;
use crate::math::{geometric_sum, UNIT_RATIO_EPSILON};
use crate::result::{per_throughput, ComputationResult, DISPLAY_CAP};
use crate::state_space::StateSpace;

/// Distance from `ρ = 1` inside which the finite-capacity closed form loses
/// precision.
const NEAR_CRITICAL: f64 = 1e-4;

/// M/M/1:GD/∞/∞.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mm1 {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ.
    pub mu: f64,
}

impl Mm1 {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64) -> Self {
        Self { lambda, mu }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda` or `mu` is missing.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::Mm1Inf;
        Ok(Self::new(real(values, kind, "lambda")?, real(values, kind, "mu")?))
    }

    /// Traffic intensity `λ / μ`.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.lambda / self.mu
    }
}

impl QueueModel for Mm1 {
    fn kind(&self) -> ModelKind {
        ModelKind::Mm1Inf
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::SingleServer {
            rho: self.rho(),
            capacity: None,
        }
    }

    fn compute(&self) -> ComputationResult {
        let Self { lambda, mu } = *self;
        let rho = self.rho();
        let p0 = 1.0 - rho;
        let pn = self
            .state_space()
            .display_sequence(p0.max(0.0).ln(), DISPLAY_CAP);

        let mut result = ComputationResult {
            p0,
            p_capacity: None,
            pn,
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
            result.errors.push(UNSTABLE_DIVERGES.to_string());
            return result;
        }

        result.ls = rho / (1.0 - rho);
        result.lq = rho * rho / (1.0 - rho);
        result.ws = 1.0 / (mu - lambda);
        result.wq = lambda / (mu * (mu - lambda));
        result
    }
}

/// M/M/1:GD/N/∞ (arrivals finding `N` in the system are lost).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mm1Finite {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ.
    pub mu: f64,
    /// System capacity N.
    pub capacity: u64,
}

impl Mm1Finite {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, capacity: u64) -> Self {
        Self {
            lambda,
            mu,
            capacity,
        }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing or `N` is not whole.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::Mm1N;
        Ok(Self::new(
            real(values, kind, "lambda")?,
            real(values, kind, "mu")?,
            count(values, kind, "N")?,
        ))
    }

    /// Traffic intensity `λ / μ`. May exceed one.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.lambda / self.mu
    }

    /// Closed-form `(p_0, p_N, Ls)`.
    ///
    /// `None` when `ρ^(N+1)` terms overflow, or when `ρ` is close enough to
    /// one that the `Ls` numerator cancels.
    fn closed_form(&self) -> Option<(f64, f64, f64)> {
        let rho = self.rho();
        let n = self.capacity as f64;
        if (rho - 1.0).abs() < UNIT_RATIO_EPSILON {
            let p0 = 1.0 / (n + 1.0);
            return Some((p0, p0 * rho.powf(n), n / 2.0));
        }
        if (rho - 1.0).abs() < NEAR_CRITICAL {
            return None;
        }
        let rho_n = rho.powf(n);
        let rho_n1 = rho_n * rho;
        if !((n + 1.0) * rho_n1).is_finite() {
            return None;
        }
        let p0 = 1.0 / geometric_sum(rho, self.capacity as i64 + 1);
        let ls = rho * (1.0 - (n + 1.0) * rho_n + n * rho_n1) / ((1.0 - rho) * (1.0 - rho_n1));
        Some((p0, p0 * rho_n, ls))
    }
}

impl QueueModel for Mm1Finite {
    fn kind(&self) -> ModelKind {
        ModelKind::Mm1N
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::SingleServer {
            rho: self.rho(),
            capacity: Some(self.capacity),
        }
    }

    fn compute(&self) -> ComputationResult {
        let lambda = self.lambda;
        let space = self.state_space();

        let (p0, ln_p0, p_full, ls) = match self.closed_form() {
            Some((p0, p_full, ls)) if p0 > 0.0 && p_full.is_finite() && ls.is_finite() => {
                (p0, p0.ln(), p_full, ls)
            }
            _ => {
                let (p0, ln_p0) = p0_or_normalize(None, &space);
                let agg = space.full_range_aggregate(ln_p0);
                (p0, ln_p0, agg.last.value, agg.mean)
            }
        };

        let lambda_eff = lambda * (1.0 - p_full);
        let lq = ls - (1.0 - p0);
        let mut result = ComputationResult {
            p0,
            p_capacity: Some(p_full),
            pn: space.display_sequence(ln_p0, DISPLAY_CAP),
            lambda_eff,
            lambda_lost: lambda * p_full,
            ls,
            lq,
            ws: per_throughput(ls, lambda_eff),
            wq: per_throughput(lq, lambda_eff),
            c_bar: 1.0 - p0,
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        result.flag_low_throughput();
        result
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Little's law holds for stable single-server queues.
        #[test]
        fn prop_mm1_littles_law(lambda in 0.01f64..10.0, spare in 0.01f64..10.0) {
            let r = Mm1::new(lambda, lambda + spare).compute();
            prop_assert!(r.errors.is_empty());
            prop_assert!((r.ls - r.lambda_eff * r.ws).abs() <= 1e-9 * r.ls.max(1.0));
            prop_assert!((r.lq - r.lambda_eff * r.wq).abs() <= 1e-9 * r.lq.max(1.0));
        }

        /// Finite capacity never produces NaN and conserves flow.
        #[test]
        fn prop_mm1_finite_well_formed(
            lambda in 0.001f64..100.0,
            mu in 0.001f64..100.0,
            capacity in 1u64..2000,
        ) {
            let r = Mm1Finite::new(lambda, mu, capacity).compute();
            let p_full = r.p_capacity.unwrap_or(f64::NAN);
            prop_assert!((0.0..=1.0).contains(&r.p0));
            prop_assert!((0.0..=1.0 + 1e-12).contains(&p_full));
            prop_assert!(!r.ls.is_nan() && !r.lq.is_nan());
            prop_assert!(r.ls <= capacity as f64 + 1e-6);
            prop_assert!((r.lambda_eff + r.lambda_lost - lambda).abs() <= 1e-9 * lambda.max(1.0));
        }
    }
}
