//! Raw shapes of the classifier-history payload.
//!
//! Upstream fields are loosely typed: numbers arrive as JSON numbers or as
//! strings depending on the record, so most fields are kept as [`Value`] and
//! interpreted by the normaliser.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ClassifiersPayload {
    pub member_data: MemberData,
    pub classifiers: Vec<DivisionHistory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MemberData {
    pub member_number: Value,
    pub member_id: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DivisionHistory {
    pub division_id: Value,
    pub division_classifiers: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawEntry {
    pub code: Value,
    pub source: Value,
    pub hf: Value,
    pub percent: Value,
    pub sd: Value,
    pub clubid: Value,
    pub club_name: Value,
    pub classifier: Value,
}

/// Render a JSON scalar the way it appears in the upstream text.
///
/// Strings are returned unquoted and `null` as the empty string. Numbers use
/// their shortest round-trip form with no trailing `.0`, so `16.0` and `16`
/// both render as `16`.
pub(super) fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) if number.is_f64() => number
            .as_f64()
            .map_or_else(|| number.to_string(), |float| float.to_string()),
        other => other.to_string(),
    }
}

/// Interpret a JSON number or numeric string.
///
/// Returns `None` for anything that is not a finite number.
pub(super) fn json_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Interpret a division identifier given as a number or numeric string.
pub(super) fn json_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
