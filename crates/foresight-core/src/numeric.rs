//! Numeric guards and step statistics
//!
//! Forecast payloads come from an external service and are not trusted to be
//! clean: any element may be null, NaN, infinite or not a number at all.
//! Everything here is total over such input and never panics.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Values below this magnitude are treated as zero when used as a denominator
pub const ZERO_TOLERANCE: f64 = 1e-9;

/// True for missing, NaN and infinite values. Zero is a valid number.
pub fn is_invalid_number(value: Option<f64>) -> bool {
    match value {
        Some(v) => !v.is_finite(),
        None => true,
    }
}

/// The valid elements of a sequence, in order
pub fn finite_values(seq: &[Option<f64>]) -> Vec<f64> {
    seq.iter()
        .filter_map(|v| v.filter(|x| x.is_finite()))
        .collect()
}

/// Count of invalid elements in a sequence
pub fn invalid_count(seq: &[Option<f64>]) -> usize {
    seq.iter().filter(|v| is_invalid_number(**v)).count()
}

fn step_deltas(seq: &[f64]) -> impl Iterator<Item = f64> + '_ {
    seq.windows(2).map(|w| (w[1] - w[0]).abs())
}

/// Mean of `|seq[i] - seq[i-1]|`; 0 when there are fewer than two elements
pub fn mean_absolute_step_delta(seq: &[f64]) -> f64 {
    if seq.len() < 2 {
        return 0.0;
    }
    step_deltas(seq).sum::<f64>() / (seq.len() - 1) as f64
}

/// Largest `|seq[i] - seq[i-1]|`; 0 when there are fewer than two elements
pub fn max_absolute_step_delta(seq: &[f64]) -> f64 {
    step_deltas(seq).fold(0.0, f64::max)
}

/// Coerce an arbitrary JSON value to a number the way the dashboard does.
///
/// `null` is missing, booleans are 1/0, numeric strings are parsed
/// (`"NaN"` and `"Infinity"` included), anything else is NaN so it shows up
/// as invalid instead of failing deserialization.
pub fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}

/// Lenient deserializer for a required numeric sequence
pub fn deserialize_lenient_seq<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw.iter().map(coerce_value).collect())
}

/// Lenient deserializer for an optional numeric sequence (`null` is absent)
pub fn deserialize_lenient_opt_seq<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw.map(|values| values.iter().map(coerce_value).collect()))
}

/// A non-negative whole count, from any JSON value `coerce_value` understands.
///
/// `4.0` is 4. Negative, fractional and non-finite values are absent.
pub fn coerce_count(value: &Value) -> Option<u64> {
    coerce_value(value)
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}

/// Lenient deserializer for an optional count (`null` is absent)
pub fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_count))
}
