//! Birth-death state spaces behind the Markovian models.
//!
//! Each model's steady-state distribution satisfies
//! `p_n = p_{n-1} · λ_{n-1} / μ_n`, so it is fully described by the ratio of
//! consecutive probabilities. Two separate operations read it:
//!
//! - [`StateSpace::display_sequence`]: the first `cap + 1` probabilities for
//!   presentation.
//! - [`StateSpace::full_range_aggregate`]: moments over every reachable state,
//!   independent of any display truncation.
//!
//! Both run in the log domain so large capacities or loads far above one
//! never produce `inf / inf`.

use serde::{Deserialize, Serialize};

use crate::math::LogSum;
use crate::result::PnEntry;

/// Upper bound on states visited in an unbounded walk, and on any capacity.
pub const MAX_STATES: u64 = 1_000_000;

/// Largest per-step log ratio, just under `ln(f64::MAX)`.
pub const MAX_LN_RATIO: f64 = 709.0;

/// Probability below which an unbounded tail is treated as exhausted.
const TAIL_EPSILON: f64 = 1e-17;

/// Ratio structure of a birth-death chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StateSpace {
    /// One server with traffic intensity `rho`.
    SingleServer {
        /// `λ / μ`.
        rho: f64,
        /// System capacity, `None` when unbounded.
        capacity: Option<u64>,
    },
    /// `servers` parallel servers with offered load `load = λ / μ`.
    MultiServer {
        /// `λ / μ`.
        load: f64,
        /// Number of servers `c`.
        servers: u64,
        /// System capacity, `None` when unbounded.
        capacity: Option<u64>,
    },
    /// Every customer is served on arrival.
    Unlimited {
        /// `λ / μ`.
        load: f64,
    },
    /// Finite population of `population` units and `repairers` servers.
    FiniteSource {
        /// `λ / μ` per unit.
        rho: f64,
        /// Population size `K`.
        population: u64,
        /// Repairers `R`.
        repairers: u64,
    },
}

impl StateSpace {
    /// Largest reachable state, `None` when unbounded.
    #[must_use]
    pub const fn capacity(&self) -> Option<u64> {
        match *self {
            Self::SingleServer { capacity, .. } | Self::MultiServer { capacity, .. } => capacity,
            Self::Unlimited { .. } => None,
            Self::FiniteSource { population, .. } => Some(population),
        }
    }

    /// Number of busy servers in state `n`.
    #[must_use]
    pub fn busy_servers(&self, n: u64) -> u64 {
        match *self {
            Self::SingleServer { .. } => n.min(1),
            Self::MultiServer { servers, .. } => n.min(servers),
            Self::Unlimited { .. } => n,
            Self::FiniteSource { repairers, .. } => n.min(repairers),
        }
    }

    /// `ln(p_n / p_{n-1})` for `n ≥ 1`.
    ///
    /// Saturates at [`MAX_LN_RATIO`] when `λ / μ` overflows, so a walk from
    /// `ln p_0 = -inf` yields zeros rather than NaN.
    #[must_use]
    pub fn ln_ratio(&self, n: u64) -> f64 {
        let busy = self.busy_servers(n).max(1) as f64;
        let ln_ratio = match *self {
            Self::SingleServer { rho, .. } => rho.ln(),
            Self::MultiServer { load, .. } | Self::Unlimited { load } => (load / busy).ln(),
            Self::FiniteSource {
                rho, population, ..
            } => {
                let waiting = population.saturating_sub(n - 1) as f64;
                (waiting * rho / busy).ln()
            }
        };
        ln_ratio.min(MAX_LN_RATIO)
    }

    /// Unnormalized log weights `ln(p_n / p_0)`, starting at `n = 0`.
    ///
    /// Bounded spaces stop at their capacity; unbounded ones never stop.
    #[must_use]
    pub fn ln_weights(&self) -> LnWeights {
        LnWeights {
            space: *self,
            next: 0,
            ln_weight: 0.0,
        }
    }

    /// `ln Σ_n p_n / p_0`, i.e. `-ln p_0`.
    ///
    /// Unbounded spaces add their tail analytically; an unstable unbounded
    /// space yields `+inf`.
    #[must_use]
    pub fn ln_normalizer(&self) -> f64 {
        match *self {
            Self::SingleServer {
                rho,
                capacity: None,
            } => {
                if rho < 1.0 {
                    -(1.0 - rho).ln()
                } else {
                    f64::INFINITY
                }
            }
            Self::MultiServer {
                load,
                servers,
                capacity: None,
            } => {
                let rho = load / servers as f64;
                if rho >= 1.0 {
                    return f64::INFINITY;
                }
                let mut sum = LogSum::new();
                for (n, ln_w) in self.ln_weights() {
                    if n == servers {
                        // Σ_{n≥c} w_c · ρ^(n-c)
                        sum.push(ln_w - (1.0 - rho).ln());
                        break;
                    }
                    sum.push(ln_w);
                }
                sum.ln()
            }
            Self::Unlimited { load } => load,
            _ => {
                let mut sum = LogSum::new();
                for (_, ln_w) in self.ln_weights() {
                    sum.push(ln_w);
                }
                sum.ln()
            }
        }
    }

    /// Probabilities `p_n` from `ln p_0`, starting at `n = 0`.
    pub fn probabilities(&self, ln_p0: f64) -> impl Iterator<Item = PnEntry> {
        self.ln_weights().map(move |(n, ln_w)| PnEntry {
            n,
            value: (ln_p0 + ln_w).exp(),
        })
    }

    /// Probability of exactly `n` customers, walking from `p_0`.
    #[must_use]
    pub fn probability(&self, ln_p0: f64, n: u64) -> f64 {
        if self.capacity().is_some_and(|cap| n > cap) {
            return 0.0;
        }
        self.probabilities(ln_p0)
            .nth(usize::try_from(n).unwrap_or(usize::MAX))
            .map_or(0.0, |entry| entry.value)
    }

    /// First `min(cap, capacity) + 1` probabilities.
    #[must_use]
    pub fn display_sequence(&self, ln_p0: f64, cap: u64) -> Vec<PnEntry> {
        self.probabilities(ln_p0)
            .take_while(|entry| entry.n <= cap)
            .collect()
    }

    /// Moments of the distribution over its full range.
    ///
    /// Bounded spaces are walked to their capacity. Unbounded ones are walked
    /// until past the mode and the tail falls below `1e-17`, capped at
    /// [`MAX_STATES`] states.
    #[must_use]
    pub fn full_range_aggregate(&self, ln_p0: f64) -> Aggregate {
        let servers = match *self {
            Self::SingleServer { .. } => 1,
            Self::MultiServer { servers, .. } => servers,
            Self::FiniteSource { repairers, .. } => repairers,
            Self::Unlimited { .. } => u64::MAX,
        };
        let mode = match *self {
            Self::MultiServer { load, servers, .. } => (load.ceil() as u64).max(servers),
            Self::Unlimited { load } => load.ceil() as u64,
            _ => 0,
        };
        let bounded = self.capacity().is_some();

        let mut agg = Aggregate::default();
        for entry in self.probabilities(ln_p0) {
            let PnEntry { n, value } = entry;
            let nf = n as f64;
            agg.mass += value;
            agg.mean += nf * value;
            agg.busy += self.busy_servers(n) as f64 * value;
            if n > servers {
                agg.queued += (n - servers) as f64 * value;
            }
            agg.last = entry;
            agg.states = n + 1;

            if !bounded && (agg.states >= MAX_STATES || (n > mode && value < TAIL_EPSILON)) {
                break;
            }
        }
        agg
    }
}

/// Iterator over `(n, ln(p_n / p_0))`.
#[derive(Debug, Clone)]
pub struct LnWeights {
    space: StateSpace,
    next: u64,
    ln_weight: f64,
}

impl Iterator for LnWeights {
    type Item = (u64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.next;
        if self.space.capacity().is_some_and(|cap| n > cap) {
            return None;
        }
        if n > 0 {
            self.ln_weight += self.space.ln_ratio(n);
        }
        self.next += 1;
        Some((n, self.ln_weight))
    }
}

/// Moments accumulated over a state space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    /// `Σ p_n`.
    pub mass: f64,
    /// `Σ n·p_n` (Ls).
    pub mean: f64,
    /// `Σ max(n - servers, 0)·p_n` (Lq).
    pub queued: f64,
    /// `Σ min(n, servers)·p_n` (c̄).
    pub busy: f64,
    /// Last state visited; the boundary probability for bounded spaces.
    pub last: PnEntry,
    /// Number of states visited.
    pub states: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_single_server_geometric_ratio() {
        let space = StateSpace::SingleServer {
            rho: 0.5,
            capacity: None,
        };
        let ln_p0 = -space.ln_normalizer();
        assert!((ln_p0.exp() - 0.5).abs() < TOL);

        let seq = space.display_sequence(ln_p0, 20);
        assert_eq!(seq.len(), 21);
        assert!((seq[3].value - 0.5 * 0.125).abs() < TOL);
    }

    #[test]
    fn test_finite_capacity_stops_at_capacity() {
        let space = StateSpace::SingleServer {
            rho: 2.0,
            capacity: Some(4),
        };
        let weights: Vec<_> = space.ln_weights().collect();
        assert_eq!(weights.len(), 5);
        assert_eq!(space.display_sequence(0.0, 20).len(), 5);
    }

    #[test]
    fn test_multi_server_normalizer_matches_closed_form() {
        // λ=4, μ=2, c=3: 1 + 2 + 2 + (8/6)·3 = 9
        let space = StateSpace::MultiServer {
            load: 2.0,
            servers: 3,
            capacity: None,
        };
        let p0 = (-space.ln_normalizer()).exp();
        assert!((p0 - 1.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unstable_unbounded_normalizer_is_infinite() {
        let single = StateSpace::SingleServer {
            rho: 1.5,
            capacity: None,
        };
        assert_eq!(single.ln_normalizer(), f64::INFINITY);

        let multi = StateSpace::MultiServer {
            load: 3.0,
            servers: 3,
            capacity: None,
        };
        assert_eq!(multi.ln_normalizer(), f64::INFINITY);
    }

    #[test]
    fn test_unlimited_is_poisson() {
        let space = StateSpace::Unlimited { load: 2.0 };
        let ln_p0 = -space.ln_normalizer();
        let p2 = space.probability(ln_p0, 2);
        assert!((p2 - (-2.0_f64).exp() * 2.0).abs() < TOL);
    }

    #[test]
    fn test_aggregate_mass_finite_source() {
        let space = StateSpace::FiniteSource {
            rho: 0.1,
            population: 10,
            repairers: 2,
        };
        let agg = space.full_range_aggregate(-space.ln_normalizer());
        assert!((agg.mass - 1.0).abs() < 1e-12);
        assert_eq!(agg.states, 11);
        assert_eq!(agg.last.n, 10);
        assert!(agg.busy <= 2.0);
        assert!((agg.mean - agg.queued - agg.busy).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_unbounded_tail_terminates() {
        let space = StateSpace::SingleServer {
            rho: 0.9,
            capacity: None,
        };
        let agg = space.full_range_aggregate(-space.ln_normalizer());
        assert!((agg.mass - 1.0).abs() < 1e-12);
        assert!((agg.mean - 9.0).abs() < 1e-9);
        assert!(agg.states < MAX_STATES);
    }

    #[test]
    fn test_large_load_no_overflow() {
        let space = StateSpace::MultiServer {
            load: 800.0,
            servers: 400,
            capacity: Some(5000),
        };
        let ln_p0 = -space.ln_normalizer();
        assert!(ln_p0.is_finite());
        let agg = space.full_range_aggregate(ln_p0);
        assert!((agg.mass - 1.0).abs() < 1e-9);
        assert!(agg.last.value.is_finite());
        assert!(agg.mean.is_finite());
    }

    #[test]
    fn test_probability_beyond_capacity_is_zero() {
        let space = StateSpace::SingleServer {
            rho: 0.5,
            capacity: Some(3),
        };
        assert_eq!(space.probability(0.0, 4), 0.0);
    }

    #[test]
    fn test_busy_servers() {
        let single = StateSpace::SingleServer {
            rho: 0.5,
            capacity: None,
        };
        assert_eq!(single.busy_servers(0), 0);
        assert_eq!(single.busy_servers(7), 1);

        let repair = StateSpace::FiniteSource {
            rho: 0.5,
            population: 5,
            repairers: 2,
        };
        assert_eq!(repair.busy_servers(4), 2);
    }

    #[test]
    fn test_overflowing_ratio_saturates() {
        let single = StateSpace::SingleServer {
            rho: f64::INFINITY,
            capacity: None,
        };
        let multi = StateSpace::MultiServer {
            load: 1e300 / 1e-300,
            servers: 2,
            capacity: Some(10),
        };
        assert_eq!(single.ln_ratio(1), MAX_LN_RATIO);
        assert_eq!(multi.ln_ratio(5), MAX_LN_RATIO);

        let seq = single.display_sequence(f64::NEG_INFINITY, 20);
        assert_eq!(seq.len(), 21);
        assert!(seq.iter().all(|entry| entry.value == 0.0));

        let ln_p0 = -multi.ln_normalizer();
        assert!(ln_p0.is_finite());
        let agg = multi.full_range_aggregate(ln_p0);
        assert!((agg.mass - 1.0).abs() < 1e-12);
        assert!((agg.last.value - 1.0).abs() < 1e-12);
    }
}
