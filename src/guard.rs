//! Post-computation guard.
//!
//! Runs after every model computation and stops a result from reaching a
//! caller when it contains NaN, or when a result without errors reports a
//! probability outside `[0, 1]`.
//!
//! `+inf` is not an anomaly: divergent metrics of an unstable system are
//! reported as infinity on purpose.

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, QueueResult};
use crate::result::ComputationResult;

/// Guard violation types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GuardViolation {
    /// NaN in a scalar field or a `pn` entry.
    NonFiniteValue {
        /// Field where the value was found (e.g. `"pn[3]"`).
        location: String,
    },
    /// Probability outside `[0, 1]` beyond tolerance.
    ConstraintViolation {
        /// Constraint name.
        name: String,
        /// Distance outside the allowed range.
        violation: f64,
    },
}

impl From<GuardViolation> for QueueError {
    fn from(v: GuardViolation) -> Self {
        match v {
            GuardViolation::NonFiniteValue { location } => Self::NonFiniteValue { location },
            GuardViolation::ConstraintViolation { name, violation } => {
                Self::ConstraintViolation { name, violation }
            }
        }
    }
}

/// Guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// NaN detection enabled.
    pub check_nan: bool,
    /// Range checks on probabilities of valid results.
    pub check_probabilities: bool,
    /// Slack allowed outside `[0, 1]` for rounding.
    pub probability_tolerance: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            check_nan: true,
            check_probabilities: true,
            probability_tolerance: 1e-9,
        }
    }
}

/// Guard applied to every [`ComputationResult`].
///
/// # Example
///
/// ```rust
/// use queuecalc::guard::ResultGuard;
/// use queuecalc::models::{Mm1, QueueModel};
///
/// let guard = ResultGuard::default();
/// let result = Mm1::new(1.0, 2.0).compute();
/// assert!(guard.check(&result).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResultGuard {
    config: GuardConfig,
}

impl ResultGuard {
    /// Create a guard with the given configuration.
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Inspect a result.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - `NonFiniteValue`: NaN in any metric or `pn` entry
    /// - `ConstraintViolation`: a probability outside `[0, 1]` in a result
    ///   whose `errors` is empty
    pub fn check(&self, result: &ComputationResult) -> QueueResult<()> {
        if self.config.check_nan {
            Self::check_nan(result)?;
        }
        if self.config.check_probabilities && result.errors.is_empty() {
            self.check_probabilities(result)?;
        }
        Ok(())
    }

    fn scalars(result: &ComputationResult) -> [(&'static str, Option<f64>); 9] {
        [
            ("p0", Some(result.p0)),
            ("pN", result.p_capacity),
            ("lambdaEff", Some(result.lambda_eff)),
            ("lambdaLost", Some(result.lambda_lost)),
            ("Ls", Some(result.ls)),
            ("Lq", Some(result.lq)),
            ("Ws", Some(result.ws)),
            ("Wq", Some(result.wq)),
            ("cBar", Some(result.c_bar)),
        ]
    }

    fn check_nan(result: &ComputationResult) -> Result<(), GuardViolation> {
        for (name, value) in Self::scalars(result) {
            if value.is_some_and(f64::is_nan) {
                return Err(GuardViolation::NonFiniteValue {
                    location: name.to_string(),
                });
            }
        }
        for entry in &result.pn {
            if entry.value.is_nan() {
                return Err(GuardViolation::NonFiniteValue {
                    location: format!("pn[{}]", entry.n),
                });
            }
        }
        Ok(())
    }

    fn check_probabilities(&self, result: &ComputationResult) -> Result<(), GuardViolation> {
        let tol = self.config.probability_tolerance;
        let out_of_range = |value: f64| {
            if value < 0.0 {
                -value
            } else {
                value - 1.0
            }
        };

        let named = [("p0", Some(result.p0)), ("pN", result.p_capacity)];
        for (name, value) in named {
            if let Some(value) = value {
                let violation = out_of_range(value);
                if violation > tol {
                    return Err(GuardViolation::ConstraintViolation {
                        name: format!("{name}_range"),
                        violation,
                    });
                }
            }
        }
        for entry in &result.pn {
            let violation = out_of_range(entry.value);
            if violation > tol {
                return Err(GuardViolation::ConstraintViolation {
                    name: format!("pn[{}]_range", entry.n),
                    violation,
                });
            }
        }

        let mass: f64 = result.pn.iter().map(|e| e.value).sum();
        if mass - 1.0 > tol {
            return Err(GuardViolation::ConstraintViolation {
                name: "pn_mass".to_string(),
                violation: mass - 1.0,
            });
        }
        Ok(())
    }
}
