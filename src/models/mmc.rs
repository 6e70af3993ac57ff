//! Multi-server Markovian queues.

use serde::{Deserialize, Serialize};

use super::params::{count, real};
use super::{p0_or_normalize, ModelKind, ParamValues, QueueModel, UNSTABLE_DIVERGES};
use crate::error::QueueResult;
use crate::math::{factorial, geometric_sum, MAX_FINITE_FACTORIAL};
use crate::result::{per_throughput, ComputationResult, DISPLAY_CAP};
use crate::state_space::StateSpace;

/// Error text when the capacity cannot hold every server.
pub const CAPACITY_BELOW_SERVERS: &str = "Capacity N must be ≥ c.";

/// `Σ_{n<c} aⁿ/n!`, or `None` when `c!` is not finite.
fn idle_head(load: f64, servers: u64) -> Option<(i64, f64)> {
    let c = i64::try_from(servers)
        .ok()
        .filter(|c| *c <= MAX_FINITE_FACTORIAL)?;
    let head = (0..c).map(|n| load.powf(n as f64) / factorial(n)).sum();
    Some((c, head))
}

/// M/M/c:GD/∞/∞.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mmc {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ per server.
    pub mu: f64,
    /// Servers c.
    pub servers: u64,
}

impl Mmc {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, servers: u64) -> Self {
        Self {
            lambda,
            mu,
            servers,
        }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing or `c` is not whole.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::MmcInf;
        Ok(Self::new(
            real(values, kind, "lambda")?,
            real(values, kind, "mu")?,
            count(values, kind, "c")?,
        ))
    }

    /// Offered load `a = λ / μ`.
    #[must_use]
    pub fn load(&self) -> f64 {
        self.lambda / self.mu
    }

    /// Per-server utilization `ρ = a / c`.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.load() / self.servers as f64
    }

    fn closed_form_p0(&self) -> Option<f64> {
        let a = self.load();
        let (c, head) = idle_head(a, self.servers)?;
        let tail = a.powf(c as f64) / factorial(c) / (1.0 - self.rho());
        Some(1.0 / (head + tail))
    }
}

impl QueueModel for Mmc {
    fn kind(&self) -> ModelKind {
        ModelKind::MmcInf
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::MultiServer {
            load: self.load(),
            servers: self.servers,
            capacity: None,
        }
    }

    fn compute(&self) -> ComputationResult {
        let Self { lambda, mu, .. } = *self;
        let a = self.load();
        let rho = self.rho();
        let space = self.state_space();

        let mut result = ComputationResult {
            p0: 0.0,
            p_capacity: None,
            pn: Vec::new(),
            lambda_eff: lambda,
            lambda_lost: 0.0,
            ls: f64::INFINITY,
            lq: f64::INFINITY,
            ws: f64::INFINITY,
            wq: f64::INFINITY,
            c_bar: a,
            warnings: Vec::new(),
            errors: Vec::new(),
        };

        if rho >= 1.0 {
            result.p0 = self
                .closed_form_p0()
                .filter(|p| p.is_finite())
                .unwrap_or(0.0);
            result.pn = space.display_sequence(result.p0.max(0.0).ln(), DISPLAY_CAP);
            result.errors.push(UNSTABLE_DIVERGES.to_string());
            return result;
        }

        let (p0, ln_p0) = p0_or_normalize(self.closed_form_p0(), &space);
        // p_c · ρ / (1-ρ)² with p_c = p_0 · a^c / c!
        let p_c = space.probability(ln_p0, self.servers);
        let lq = p_c * rho / ((1.0 - rho) * (1.0 - rho));
        let wq = lq / lambda;

        result.p0 = p0;
        result.pn = space.display_sequence(ln_p0, DISPLAY_CAP);
        result.lq = lq;
        result.ls = lq + a;
        result.wq = wq;
        result.ws = wq + 1.0 / mu;
        result
    }
}

/// M/M/c:GD/N/∞ (arrivals finding `N` in the system are lost).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmcFinite {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ per server.
    pub mu: f64,
    /// Servers c.
    pub servers: u64,
    /// System capacity N.
    pub capacity: u64,
}

impl MmcFinite {
    /// Create the model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, servers: u64, capacity: u64) -> Self {
        Self {
            lambda,
            mu,
            servers,
            capacity,
        }
    }

    /// Extract from a validated parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing or a count is not whole.
    pub fn from_values(values: &ParamValues) -> QueueResult<Self> {
        let kind = ModelKind::MmcN;
        Ok(Self::new(
            real(values, kind, "lambda")?,
            real(values, kind, "mu")?,
            count(values, kind, "c")?,
            count(values, kind, "N")?,
        ))
    }

    /// Offered load `a = λ / μ`.
    #[must_use]
    pub fn load(&self) -> f64 {
        self.lambda / self.mu
    }

    /// Per-server utilization `ρ = a / c`. May exceed one.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.load() / self.servers as f64
    }

    fn closed_form_p0(&self) -> Option<f64> {
        let a = self.load();
        let (c, head) = idle_head(a, self.servers)?;
        let waiting_room = i64::try_from(self.capacity - self.servers).ok()?;
        let tail = a.powf(c as f64) / factorial(c) * geometric_sum(self.rho(), waiting_room + 1);
        Some(1.0 / (head + tail))
    }
}

impl QueueModel for MmcFinite {
    fn kind(&self) -> ModelKind {
        ModelKind::MmcN
    }

    fn state_space(&self) -> StateSpace {
        StateSpace::MultiServer {
            load: self.load(),
            servers: self.servers,
            capacity: Some(self.capacity),
        }
    }

    fn compute(&self) -> ComputationResult {
        let lambda = self.lambda;
        if self.capacity < self.servers {
            return ComputationResult::rejected(self.kind(), lambda, CAPACITY_BELOW_SERVERS);
        }

        let space = self.state_space();
        let (p0, ln_p0) = p0_or_normalize(self.closed_form_p0(), &space);
        let agg = space.full_range_aggregate(ln_p0);

        let p_full = agg.last.value;
        let lambda_eff = lambda * (1.0 - p_full);
        let ls = agg.mean;
        let lq = agg.queued;

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
            c_bar: ls - lq,
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        result.flag_low_throughput();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mm1;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_mmc_reference_point() {
        // 1 + 2 + 2 + (8/6)·3 = 9
        let r = Mmc::new(4.0, 2.0, 3).compute();
        assert!(r.errors.is_empty());
        assert!((r.p0 - 1.0 / 9.0).abs() < TOL);
        assert!((r.lq - 8.0 / 9.0).abs() < TOL);
        assert!((r.ls - 26.0 / 9.0).abs() < TOL);
        assert!((r.wq - 2.0 / 9.0).abs() < TOL);
        assert!((r.ws - 13.0 / 18.0).abs() < TOL);
        assert!((r.c_bar - 2.0).abs() < TOL);
    }

    #[test]
    fn test_mmc_single_server_matches_mm1() {
        let multi = Mmc::new(1.5, 2.0, 1).compute();
        let single = Mm1::new(1.5, 2.0).compute();
        assert!((multi.p0 - single.p0).abs() < TOL);
        assert!((multi.ls - single.ls).abs() < TOL);
        assert!((multi.lq - single.lq).abs() < TOL);
        assert!((multi.wq - single.wq).abs() < TOL);
    }

    #[test]
    fn test_mmc_unstable() {
        let r = Mmc::new(6.0, 2.0, 3).compute();
        assert_eq!(r.errors, vec![UNSTABLE_DIVERGES]);
        assert!(r.lq.is_infinite() && r.ls.is_infinite());
        assert!(r.ws.is_infinite() && r.wq.is_infinite());
        assert_eq!(r.pn.len(), 21);
        assert!(!r.p0.is_nan());
        assert_eq!(r.pn[0].value, r.p0.max(0.0));

        // a > c: the closed form goes negative, the display starts from zero
        let r = Mmc::new(9.0, 2.0, 3).compute();
        assert_eq!(r.errors, vec![UNSTABLE_DIVERGES]);
        assert_eq!(r.pn[0].value, r.p0.max(0.0));
        assert!(r.pn.iter().all(|entry| entry.value == 0.0));
    }

    #[test]
    fn test_mmc_many_servers_uses_log_domain() {
        let r = Mmc::new(900.0, 1.0, 1000).compute();
        assert!(r.errors.is_empty());
        assert!(r.p0 >= 0.0 && r.p0.is_finite());
        assert!(r.lq.is_finite() && r.lq >= 0.0);
        assert!((r.ls - r.lq - 900.0).abs() < 1e-6);
    }

    #[test]
    fn test_mmc_finite_rejects_small_capacity() {
        let r = MmcFinite::new(4.0, 2.0, 3, 2).compute();
        assert_eq!(r.errors, vec![CAPACITY_BELOW_SERVERS]);
        assert!(r.ls.is_infinite());
        assert!(r.pn.is_empty());
        assert_eq!(r.p_capacity, Some(0.0));
        assert_eq!(r.lambda_eff, 4.0);
    }

    #[test]
    fn test_mmc_finite_erlang_loss() {
        // N = c: blocking probability is Erlang B, B(2, 1) = 0.2
        let r = MmcFinite::new(1.0, 1.0, 2, 2).compute();
        assert!(r.errors.is_empty());
        assert!((r.p_capacity.expect("bounded") - 0.2).abs() < TOL);
        assert!(r.lq.abs() < TOL);
        assert!((r.lambda_lost - 0.2).abs() < TOL);
    }

    #[test]
    fn test_mmc_finite_conservation() {
        let r = MmcFinite::new(5.0, 1.0, 3, 10).compute();
        assert!((r.ls - r.lq - r.c_bar).abs() < TOL);
        assert!((r.lambda_eff + r.lambda_lost - 5.0).abs() < TOL);
        assert!((r.ls - r.lambda_eff * r.ws).abs() < TOL);
    }

    #[test]
    fn test_mmc_finite_large_load_no_overflow() {
        let r = MmcFinite::new(800.0, 1.0, 400, 5000).compute();
        assert!(r.errors.is_empty());
        for value in [r.p0, r.ls, r.lq, r.ws, r.wq, r.c_bar] {
            assert!(value.is_finite(), "non-finite metric in {r:?}");
        }
        let p_full = r.p_capacity.expect("bounded");
        assert!((0.0..=1.0).contains(&p_full));
        assert!((r.lambda_eff - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_mmc_finite_display_caps_at_capacity() {
        let r = MmcFinite::new(1.0, 1.0, 2, 5).compute();
        assert_eq!(r.pn.len(), 6);
        let r = MmcFinite::new(1.0, 1.0, 2, 50).compute();
        assert_eq!(r.pn.len(), 21);
    }
}
