//! # queuecalc
//!
//! Steady-state metrics for classical queueing models.
//!
//! Seven models are supported, from M/M/1 to the machine-repair model
//! M/M/R:GD/K/K and the Pollaczek–Khinchine M/G/1 queue. Every computation
//! returns the same record: `p0`, `pN`, the first `p_n`, effective and lost
//! arrival rates, `Ls`, `Lq`, `Ws`, `Wq` and the mean number of busy servers.
//! Distributions are evaluated in the log domain, so large populations and
//! server counts stay finite.
//!
//! ## Example
//!
//! ```rust
//! use queuecalc::prelude::*;
//!
//! let params = param_values([("lambda", 4.0), ("mu", 2.0), ("c", 3.0)]);
//! let result = ModelKind::MmcInf.compute(&params).unwrap();
//! assert!((result.p0 - 1.0 / 9.0).abs() < 1e-12);
//! assert!((result.lq - 8.0 / 9.0).abs() < 1e-12);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::float_cmp,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod formula;
pub mod guard;
pub mod math;
pub mod models;
pub mod report;
pub mod result;
pub mod state_space;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::compare::{CompareSlots, LabeledResult, Session, Slot};
    pub use crate::config::{Scenario, ScenarioFile};
    pub use crate::error::{QueueError, QueueResult};
    pub use crate::guard::{GuardConfig, ResultGuard};
    pub use crate::models::{param_values, require, ModelKind, ParamValues, QueueModel};
    pub use crate::result::{ComputationResult, Metric, PnEntry, ResultStatus};
    pub use crate::state_space::StateSpace;
}

/// Re-export for public API
pub use error::{QueueError, QueueResult};
