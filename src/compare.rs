//! Two-slot comparison and the interactive session that feeds it.
//!
//! A [`Session`] remembers the last successful computation. Saving copies
//! that result into slot A or B of its [`CompareSlots`]. Both slots must be
//! set before a comparison can be rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueueError, QueueResult};
use crate::models::{require, ModelKind, ParamValues};
use crate::report;
use crate::result::{ComputationResult, Metric};

/// Metrics plotted in a comparison chart.
pub const CHART_METRICS: [Metric; 5] = [Metric::Ls, Metric::Lq, Metric::Ws, Metric::Wq, Metric::CBar];

/// A result together with the model and inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledResult {
    /// Model identifier.
    pub model: ModelKind,
    /// Kendall-notation label.
    pub label: String,
    /// Validated inputs.
    pub params: ParamValues,
    /// Computed metrics.
    pub result: ComputationResult,
}

impl LabeledResult {
    /// Attach model metadata to a result.
    #[must_use]
    pub fn new(model: ModelKind, params: ParamValues, result: ComputationResult) -> Self {
        Self {
            model,
            label: model.label().to_string(),
            params,
            result,
        }
    }
}

/// Comparison slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Model A.
    A,
    /// Model B.
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// One row of a side-by-side comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Metric compared.
    pub metric: Metric,
    /// Value in slot A.
    pub a: Option<f64>,
    /// Value in slot B.
    pub b: Option<f64>,
}

/// Bar-chart data for the two slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Category labels, one per metric.
    pub labels: Vec<&'static str>,
    /// Series name for slot A.
    pub a_label: String,
    /// Values for slot A.
    pub a: Vec<f64>,
    /// Series name for slot B.
    pub b_label: String,
    /// Values for slot B.
    pub b: Vec<f64>,
}

/// Two optional saved results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareSlots {
    a: Option<LabeledResult>,
    b: Option<LabeledResult>,
}

impl CompareSlots {
    /// Empty slots.
    #[must_use]
    pub const fn new() -> Self {
        Self { a: None, b: None }
    }

    /// Store `item` in `slot`, replacing any previous content.
    pub fn set(&mut self, slot: Slot, item: LabeledResult) {
        *self.slot_mut(slot) = Some(item);
    }

    /// Content of `slot`.
    #[must_use]
    pub const fn get(&self, slot: Slot) -> Option<&LabeledResult> {
        match slot {
            Slot::A => self.a.as_ref(),
            Slot::B => self.b.as_ref(),
        }
    }

    /// Empty both slots.
    pub fn clear(&mut self) {
        self.a = None;
        self.b = None;
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<LabeledResult> {
        match slot {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        }
    }

    /// Both slots, when both are set.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptySlot`] if either slot is empty.
    pub fn both(&self) -> QueueResult<(&LabeledResult, &LabeledResult)> {
        match (&self.a, &self.b) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(QueueError::EmptySlot),
        }
    }

    /// Status text, e.g. `Model A: M/M/1:GD/∞/∞ | Model B: —`.
    #[must_use]
    pub fn status_line(&self) -> String {
        let label = |slot: Slot| {
            self.get(slot)
                .map_or_else(|| report::ABSENT.to_string(), |item| item.label.clone())
        };
        format!("Model A: {} | Model B: {}", label(Slot::A), label(Slot::B))
    }

    /// Every metric of both slots, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptySlot`] if either slot is empty.
    pub fn comparison_table(&self) -> QueueResult<Vec<ComparisonRow>> {
        let (a, b) = self.both()?;
        Ok(Metric::ALL
            .into_iter()
            .map(|metric| ComparisonRow {
                metric,
                a: a.result.metric(metric),
                b: b.result.metric(metric),
            })
            .collect())
    }

    /// Chart data over [`CHART_METRICS`].
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptySlot`] if either slot is empty.
    pub fn chart_series(&self) -> QueueResult<ChartSeries> {
        let (a, b) = self.both()?;
        let values = |item: &LabeledResult| -> Vec<f64> {
            CHART_METRICS
                .iter()
                .map(|m| item.result.metric(*m).unwrap_or(f64::NAN))
                .collect()
        };
        Ok(ChartSeries {
            labels: CHART_METRICS.iter().map(|m| m.label()).collect(),
            a_label: a.label.clone(),
            a: values(a),
            b_label: b.label.clone(),
            b: values(b),
        })
    }

    /// Text export of both slots.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptySlot`] if either slot is empty.
    pub fn comparison_text(&self) -> QueueResult<String> {
        let (a, b) = self.both()?;
        Ok(report::comparison_text(a, b))
    }
}

/// Last computation plus comparison slots.
#[derive(Debug, Clone, Default)]
pub struct Session {
    last: Option<LabeledResult>,
    slots: CompareSlots,
}

impl Session {
    /// Fresh session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            slots: CompareSlots::new(),
        }
    }

    /// Validate and compute; on success the result becomes the last result.
    ///
    /// A failed validation leaves the previous last result in place.
    ///
    /// # Errors
    ///
    /// Returns lookup, validation, or guard errors.
    pub fn compute(&mut self, model_id: &str, values: &ParamValues) -> QueueResult<&LabeledResult> {
        let spec = require(model_id)?;
        let values = spec.validate(values)?;
        let result = spec.kind.compute(&values)?;
        Ok(&*self.last.insert(LabeledResult::new(spec.kind, values, result)))
    }

    /// Like [`Session::compute`] with textual inputs.
    ///
    /// # Errors
    ///
    /// Returns lookup, validation, or guard errors.
    pub fn compute_raw<I, K, V>(&mut self, model_id: &str, raw: I) -> QueueResult<&LabeledResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let spec = require(model_id)?;
        let values = spec.validate_raw(raw)?;
        let result = spec.kind.compute(&values)?;
        Ok(&*self.last.insert(LabeledResult::new(spec.kind, values, result)))
    }

    /// Most recent successful computation.
    #[must_use]
    pub const fn last(&self) -> Option<&LabeledResult> {
        self.last.as_ref()
    }

    /// Copy the last result into `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NothingComputed`] before any computation.
    pub fn save_slot(&mut self, slot: Slot) -> QueueResult<()> {
        let item = self
            .last
            .clone()
            .ok_or_else(|| QueueError::nothing_computed(format!("set {slot}")))?;
        tracing::debug!(%slot, model = item.model.id(), "saved comparison slot");
        self.slots.set(slot, item);
        Ok(())
    }

    /// Result shown by export actions: the last result, else slot B, else
    /// slot A.
    #[must_use]
    pub fn active(&self) -> Option<&LabeledResult> {
        self.last
            .as_ref()
            .or_else(|| self.slots.get(Slot::B))
            .or_else(|| self.slots.get(Slot::A))
    }

    /// Text export of the active result.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NothingComputed`] when there is nothing to show.
    pub fn results_text(&self) -> QueueResult<String> {
        self.active()
            .map(report::results_text)
            .ok_or_else(|| QueueError::nothing_computed("copy"))
    }

    /// Comparison slots.
    #[must_use]
    pub const fn slots(&self) -> &CompareSlots {
        &self.slots
    }

    /// Forget the last result and empty both slots.
    pub fn reset(&mut self) {
        self.last = None;
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::param_values;

    fn mm1(lambda: f64) -> ParamValues {
        param_values([("lambda", lambda), ("mu", 2.0)])
    }

    #[test]
    fn test_save_requires_computation() {
        let mut session = Session::new();
        let err = session.save_slot(Slot::A).expect_err("nothing computed");
        assert_eq!(err.to_string(), "Compute first, then set A.");
        assert!(session.slots().get(Slot::A).is_none());
    }

    #[test]
    fn test_status_line() {
        let mut session = Session::new();
        assert_eq!(session.slots().status_line(), "Model A: — | Model B: —");
        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        session.save_slot(Slot::A).expect("save");
        assert_eq!(
            session.slots().status_line(),
            "Model A: M/M/1:GD/∞/∞ | Model B: —"
        );
    }

    #[test]
    fn test_active_precedence() {
        let mut session = Session::new();
        assert!(session.active().is_none());
        assert!(session.results_text().is_err());

        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        session.save_slot(Slot::A).expect("save A");
        session
            .compute("mminf", &param_values([("lambda", 3.0), ("mu", 2.0)]))
            .expect("compute");
        session.save_slot(Slot::B).expect("save B");
        assert_eq!(session.active().map(|r| r.model), Some(ModelKind::Mminf));

        let mut slots_only = Session::new();
        slots_only.slots = session.slots().clone();
        assert_eq!(slots_only.active().map(|r| r.model), Some(ModelKind::Mminf));

        slots_only.slots.b = None;
        assert_eq!(slots_only.active().map(|r| r.model), Some(ModelKind::Mm1Inf));
    }

    #[test]
    fn test_failed_validation_keeps_last() {
        let mut session = Session::new();
        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        assert!(session.compute("mm1_inf", &mm1(-1.0)).is_err());
        let last = session.last().expect("kept");
        assert_eq!(last.params.get("lambda"), Some(&1.0));
    }

    #[test]
    fn test_comparison_requires_both() {
        let mut session = Session::new();
        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        session.save_slot(Slot::A).expect("save");
        let err = session.slots().comparison_text().expect_err("B empty");
        assert_eq!(err.to_string(), "Set both Model A and Model B first.");
        assert!(session.slots().chart_series().is_err());
    }

    #[test]
    fn test_comparison_table_and_chart() {
        let mut session = Session::new();
        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        session.save_slot(Slot::A).expect("save A");
        session.compute("mm1_inf", &mm1(1.5)).expect("compute");
        session.save_slot(Slot::B).expect("save B");

        let table = session.slots().comparison_table().expect("table");
        assert_eq!(table.len(), 9);
        assert_eq!(table[0].metric, Metric::P0);
        assert_eq!(table[1].a, None);

        let chart = session.slots().chart_series().expect("chart");
        assert_eq!(chart.labels, vec!["Ls", "Lq", "Ws", "Wq", "c̄"]);
        assert!((chart.a[0] - 1.0).abs() < 1e-12);
        assert!((chart.b[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new();
        session.compute("mm1_inf", &mm1(1.0)).expect("compute");
        session.save_slot(Slot::A).expect("save");
        session.save_slot(Slot::B).expect("save");
        session.reset();
        assert!(session.last().is_none());
        assert!(session.active().is_none());
        assert!(session.slots().both().is_err());
    }

    #[test]
    fn test_compute_raw() {
        let mut session = Session::new();
        let item = session
            .compute_raw("mmc_inf", [("lambda", "4"), ("mu", "2"), ("c", "3")])
            .expect("compute");
        assert!((item.result.p0 - 1.0 / 9.0).abs() < 1e-12);
        assert!(session.compute_raw("nope", [("lambda", "1")]).is_err());
    }
}
