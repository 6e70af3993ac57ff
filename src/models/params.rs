//! Typed extraction of validated parameter maps.

use indexmap::IndexMap;

use super::ModelKind;
use crate::error::{QueueError, QueueResult};

/// Parameter values keyed by parameter id, in declaration order.
pub type ParamValues = IndexMap<String, f64>;

/// Build a [`ParamValues`] map from `(id, value)` pairs.
#[must_use]
pub fn param_values<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> ParamValues {
    pairs
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

/// Read a real-valued parameter.
pub(crate) fn real(values: &ParamValues, kind: ModelKind, id: &str) -> QueueResult<f64> {
    values
        .get(id)
        .copied()
        .ok_or_else(|| QueueError::MissingParameter {
            model: kind.id().to_string(),
            param: id.to_string(),
        })
}

/// Read a whole-number parameter.
pub(crate) fn count(values: &ParamValues, kind: ModelKind, id: &str) -> QueueResult<u64> {
    let value = real(values, kind, id)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        let label = kind.spec().param(id).map_or(id, |p| p.label);
        return Err(QueueError::InvalidParameters {
            messages: vec![format!("{label} must be an integer.")],
        });
    }
    Ok(value as u64)
}
