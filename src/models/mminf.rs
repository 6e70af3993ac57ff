//! Self-service queue: every arrival finds a free server.

use serde::{Deserialize, Serialize};

use super::params::real;
use super::{ModelKind, ParamValues, QueueModel};
use crate::error::QueueResult;
use crate::result::{ComputationResult, DISPLAY_CAP};
use crate::state_space::StateSpace;

/// M/M/∞:GD/∞/∞. Always stable; the number in system is Poisson(λ/μ).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmInfinite {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ.
    pub mu: f64,
}

impl MmInfinite {
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
        let kind = ModelKind::Mminf;
        Ok(Self::new(real(values, kind, "lambda")?, real(values, kind, "mu")?))
    }

    /// Offered load `a = λ / μ`.
    #[must_use]
    pub fn load(&self) -> f64 {
        self.lambda / self.mu
    }
}

impl QueueModel for MmInfinite {
    fn kind(&self) -> ModelKind {
        ModelKind::Mminf
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::Unlimited { load: self.load() }
    }

    fn compute(&self) -> ComputationResult {
        let a = self.load();
        // ln p0 = -a exactly, so p_n stays representable even when e^-a underflows
        let ln_p0 = -a;
        ComputationResult {
            p0: ln_p0.exp(),
            p_capacity: None,
            pn: self.state_space().display_sequence(ln_p0, DISPLAY_CAP),
            lambda_eff: self.lambda,
            lambda_lost: 0.0,
            ls: a,
            lq: 0.0,
            ws: 1.0 / self.mu,
            wq: 0.0,
            c_bar: a,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}
