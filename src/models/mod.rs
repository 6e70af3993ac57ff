//! Queueing models.
//!
//! Every model is a small value type implementing [`QueueModel`]. Models are
//! built from a validated [`ParamValues`] map through [`ModelKind::build`] and
//! produce a [`ComputationResult`] that always carries every metric, even when
//! the system is unstable.
//!
//! # Models
//!
//! | id | Kendall | State space |
//! |----|---------|-------------|
//! | `mm1_inf` | M/M/1:GD/∞/∞ | single server, unbounded |
//! | `mm1_n` | M/M/1:GD/N/∞ | single server, capacity N |
//! | `mmc_inf` | M/M/c:GD/∞/∞ | c servers, unbounded |
//! | `mmc_n` | M/M/c:GD/N/∞ | c servers, capacity N |
//! | `mminf` | M/M/∞:GD/∞/∞ | unlimited servers |
//! | `mmr_repair` | M/M/R:GD/K/K | finite source of K units, R repairers |
//! | `mg1_pk` | M/G/1:GD/∞/∞ | Pollaczek–Khinchine, general service |

mod mg1;
mod mm1;
mod mmc;
mod mminf;
mod params;
pub mod registry;
mod repair;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueueError, QueueResult};
use crate::guard::ResultGuard;
use crate::result::ComputationResult;
use crate::state_space::StateSpace;

pub use mg1::Mg1Pk;
pub use mm1::{Mm1, Mm1Finite};
pub use mmc::{Mmc, MmcFinite};
pub use mminf::MmInfinite;
pub use params::{param_values, ParamValues};
pub use registry::{lookup, require, ModelSpec, ParamRules, ParamSpec, MODELS};
pub use repair::MmrRepair;

/// Error text for an unbounded Markovian model with `ρ ≥ 1`.
pub const UNSTABLE_DIVERGES: &str = "System unstable (ρ ≥ 1). Metrics diverge.";

/// Error text for an unstable M/G/1 model.
pub const UNSTABLE: &str = "System unstable (ρ ≥ 1).";

/// Common interface of every steady-state model.
pub trait QueueModel {
    /// Which model this is.
    fn kind(&self) -> ModelKind;

    /// Birth-death chain describing the distribution.
    ///
    /// For `mg1_pk` this is the geometric approximation used for display.
    fn state_space(&self) -> StateSpace;

    /// Compute the steady-state metrics.
    ///
    /// Never fails: instability and structural violations are reported in
    /// the result's `errors`.
    fn compute(&self) -> ComputationResult;
}

/// Identifier of a supported model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// M/M/1:GD/∞/∞
    Mm1Inf,
    /// M/M/1:GD/N/∞
    Mm1N,
    /// M/M/c:GD/∞/∞
    MmcInf,
    /// M/M/c:GD/N/∞
    MmcN,
    /// M/M/∞:GD/∞/∞
    Mminf,
    /// M/M/R:GD/K/K
    MmrRepair,
    /// M/G/1:GD/∞/∞
    Mg1Pk,
}

impl ModelKind {
    /// All models in registry order.
    pub const ALL: [Self; 7] = [
        Self::Mm1Inf,
        Self::Mm1N,
        Self::MmcInf,
        Self::MmcN,
        Self::Mminf,
        Self::MmrRepair,
        Self::Mg1Pk,
    ];

    /// Registry descriptor.
    #[must_use]
    pub fn spec(self) -> &'static ModelSpec {
        &MODELS[self as usize]
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Mm1Inf => "mm1_inf",
            Self::Mm1N => "mm1_n",
            Self::MmcInf => "mmc_inf",
            Self::MmcN => "mmc_n",
            Self::Mminf => "mminf",
            Self::MmrRepair => "mmr_repair",
            Self::Mg1Pk => "mg1_pk",
        }
    }

    /// Kendall-notation label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Parse a model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnknownModel`] for unregistered ids.
    pub fn from_id(id: &str) -> QueueResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| QueueError::UnknownModel(id.to_string()))
    }

    /// True when the displayed `p_n` is an approximation rather than exact.
    #[must_use]
    pub const fn pn_is_approximate(self) -> bool {
        matches!(self, Self::Mg1Pk)
    }

    /// True when the model has a finite system capacity.
    #[must_use]
    pub const fn is_bounded(self) -> bool {
        matches!(self, Self::Mm1N | Self::MmcN | Self::MmrRepair)
    }

    /// Build the model from a parameter map.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::MissingParameter`] or
    /// [`QueueError::InvalidParameters`] when a value is absent or a count is
    /// not a whole number.
    pub fn build(self, values: &ParamValues) -> QueueResult<Box<dyn QueueModel>> {
        Ok(match self {
            Self::Mm1Inf => Box::new(Mm1::from_values(values)?),
            Self::Mm1N => Box::new(Mm1Finite::from_values(values)?),
            Self::MmcInf => Box::new(Mmc::from_values(values)?),
            Self::MmcN => Box::new(MmcFinite::from_values(values)?),
            Self::Mminf => Box::new(MmInfinite::from_values(values)?),
            Self::MmrRepair => Box::new(MmrRepair::from_values(values)?),
            Self::Mg1Pk => Box::new(Mg1Pk::from_values(values)?),
        })
    }

    /// Build, compute, and guard a result.
    ///
    /// `values` is expected to have passed [`ModelSpec::validate`].
    ///
    /// # Errors
    ///
    /// Returns extraction errors from [`ModelKind::build`], or a guard
    /// violation if the result holds a NaN or an out-of-range probability.
    pub fn compute(self, values: &ParamValues) -> QueueResult<ComputationResult> {
        tracing::debug!(model = self.id(), ?values, "computing steady state");
        let model = self.build(values)?;
        let result = model.compute();

        if let Err(err) = ResultGuard::default().check(&result) {
            tracing::warn!(model = self.id(), error = %err, "result rejected by guard");
            return Err(err);
        }
        if !result.errors.is_empty() {
            tracing::warn!(model = self.id(), errors = ?result.errors, "model is unstable or invalid");
        } else if !result.warnings.is_empty() {
            tracing::warn!(model = self.id(), warnings = ?result.warnings, "computed with warnings");
        }
        Ok(result)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Shared `p_0` selection: a closed form when it is a usable probability,
/// otherwise the log-domain normalizer of `space`.
///
/// Returns `(p_0, ln p_0)`.
pub(crate) fn p0_or_normalize(closed_form: Option<f64>, space: &StateSpace) -> (f64, f64) {
    match closed_form {
        Some(p0) if p0.is_finite() && p0 > 0.0 && p0 <= 1.0 => (p0, p0.ln()),
        _ => {
            let ln_p0 = -space.ln_normalizer();
            (ln_p0.exp(), ln_p0)
        }
    }
}
