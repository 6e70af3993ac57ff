//! Scenario files: batches of model evaluations described in YAML.
//!
//! Mistakes are caught before anything is computed:
//! - unknown keys are rejected by serde
//! - structural rules (non-empty names, `display_cap` range) by `validator`
//! - model ids and parameter values by the model registry
//!
//! ```yaml
//! schema_version: "1.0"
//! report:
//!   display_cap: 20
//!   json: false
//! scenarios:
//!   - name: single teller
//!     model: mm1_inf
//!     params: { lambda: 1.0, mu: 2.0 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::compare::LabeledResult;
use crate::error::{QueueError, QueueResult};
use crate::models::{require, ParamValues};
use crate::result::DISPLAY_CAP;

/// Top-level scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Output settings.
    #[validate(nested)]
    #[serde(default)]
    pub report: ReportConfig,

    /// Evaluations to run, in order.
    #[validate(length(min = 1), nested)]
    pub scenarios: Vec<Scenario>,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl ScenarioFile {
    /// Load a scenario file from disk.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> QueueResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading scenario file");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a scenario file from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> QueueResult<Self> {
        let file: Self = serde_yaml::from_str(yaml)?;
        file.check()?;
        Ok(file)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Serialization`] if encoding fails.
    pub fn to_yaml(&self) -> QueueResult<String> {
        serde_yaml::to_string(self).map_err(|e| QueueError::serialization(e.to_string()))
    }

    /// Create a builder.
    #[must_use]
    pub fn builder() -> ScenarioFileBuilder {
        ScenarioFileBuilder::default()
    }

    /// Run structural and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Validation`] for structural problems and
    /// [`QueueError::Config`] naming the first scenario whose model or
    /// parameters are rejected.
    pub fn check(&self) -> QueueResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Every model id must resolve and every params map must pass the
    /// model's validation rules.
    fn validate_semantic(&self) -> QueueResult<()> {
        for scenario in &self.scenarios {
            scenario
                .validated_params()
                .map_err(|e| QueueError::config(format!("scenario '{}': {e}", scenario.name)))?;
        }
        Ok(())
    }

    /// Compute every scenario in order.
    ///
    /// Unstable results are returned like any other; they carry their own
    /// `errors`.
    ///
    /// # Errors
    ///
    /// Returns the first validation or guard error.
    pub fn evaluate(&self) -> QueueResult<Vec<LabeledResult>> {
        self.scenarios.iter().map(Scenario::evaluate).collect()
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Highest `n` printed in `p_n` listings.
    #[validate(range(max = 20))]
    #[serde(default = "default_display_cap")]
    pub display_cap: u64,

    /// Emit JSON instead of text.
    #[serde(default)]
    pub json: bool,
}

const fn default_display_cap() -> u64 {
    DISPLAY_CAP
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            display_cap: DISPLAY_CAP,
            json: false,
        }
    }
}

/// One model evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Display name.
    #[validate(length(min = 1))]
    pub name: String,

    /// Model identifier, e.g. `mmc_n`.
    #[validate(length(min = 1))]
    pub model: String,

    /// Parameter values keyed by parameter id.
    #[serde(default)]
    pub params: ParamValues,
}

impl Scenario {
    /// Create a scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, model: impl Into<String>, params: ParamValues) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            params,
        }
    }

    fn validated_params(&self) -> QueueResult<ParamValues> {
        require(&self.model)?.validate(&self.params)
    }

    /// Validate and compute this scenario.
    ///
    /// # Errors
    ///
    /// Returns lookup, validation, or guard errors.
    pub fn evaluate(&self) -> QueueResult<LabeledResult> {
        let spec = require(&self.model)?;
        let params = spec.validate(&self.params)?;
        tracing::debug!(scenario = %self.name, model = spec.id, "evaluating scenario");
        let result = spec.kind.compute(&params)?;
        Ok(LabeledResult::new(spec.kind, params, result))
    }
}

/// Builder for programmatic scenario files.
#[derive(Debug, Default)]
pub struct ScenarioFileBuilder {
    display_cap: Option<u64>,
    json: bool,
    scenarios: Vec<Scenario>,
}

impl ScenarioFileBuilder {
    /// Set the `p_n` display cap.
    #[must_use]
    pub const fn display_cap(mut self, cap: u64) -> Self {
        self.display_cap = Some(cap);
        self
    }

    /// Request JSON output.
    #[must_use]
    pub const fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Append a scenario.
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Build the file. Call [`ScenarioFile::check`] to validate it.
    #[must_use]
    pub fn build(self) -> ScenarioFile {
        ScenarioFile {
            schema_version: default_schema_version(),
            report: ReportConfig {
                display_cap: self.display_cap.unwrap_or(DISPLAY_CAP),
                json: self.json,
            },
            scenarios: self.scenarios,
        }
    }
}
