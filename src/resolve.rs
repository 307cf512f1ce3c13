//! Turns the loosely typed configuration payload into [`VectorizerOptions`].
//!
//! Every recognized key is optional. A key only counts as set when its value
//! is truthy (not `null`, `false`, `0` or `""`); anything else falls back to
//! the default. Enumerated keys never fail: unrecognized values resolve to
//! the default member.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{ColorMode, Hierarchy, PathMode, VectorizerOptions};
use crate::{BridgeError, BridgeResult};

/// Raw configuration object as supplied by the caller, one slot per recognized key.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub color_mode: Option<Value>,
    pub color_precision: Option<Value>,
    pub filter_speckle: Option<Value>,
    pub splice_threshold: Option<Value>,
    pub corner_threshold: Option<Value>,
    pub hierarchical: Option<Value>,
    pub mode: Option<Value>,
    pub layer_difference: Option<Value>,
    pub length_threshold: Option<Value>,
    pub max_iterations: Option<Value>,
    pub path_precision: Option<Value>,
}

/// Parse the serialized configuration payload. An empty payload is `{}`.
pub fn parse_config(payload: &str) -> BridgeResult<RawConfig> {
    if payload.trim().is_empty() {
        return Ok(RawConfig::default());
    }

    let value: Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(BridgeError::NotAnObject(json_type_name(&value)));
    }
    Ok(serde_json::from_value(value)?)
}

/// Resolve every field of the raw configuration, filling in defaults.
pub fn resolve(raw: &RawConfig) -> BridgeResult<VectorizerOptions> {
    let defaults = VectorizerOptions::default();

    Ok(VectorizerOptions {
        color_mode: enum_field(
            "colorMode",
            raw.color_mode.as_ref(),
            &[("binary", ColorMode::Binary), ("color", ColorMode::Color)],
        ),
        color_precision: integer_field(
            "colorPrecision",
            raw.color_precision.as_ref(),
            defaults.color_precision,
        )?,
        filter_speckle: integer_field(
            "filterSpeckle",
            raw.filter_speckle.as_ref(),
            defaults.filter_speckle,
        )?,
        splice_threshold: number_field(
            "spliceThreshold",
            raw.splice_threshold.as_ref(),
            defaults.splice_threshold,
        )?,
        corner_threshold: number_field(
            "cornerThreshold",
            raw.corner_threshold.as_ref(),
            defaults.corner_threshold,
        )?,
        hierarchical: enum_field(
            "hierarchical",
            raw.hierarchical.as_ref(),
            &[("cutout", Hierarchy::Cutout), ("stacked", Hierarchy::Stacked)],
        ),
        mode: enum_field(
            "mode",
            raw.mode.as_ref(),
            &[
                ("polygon", PathMode::Polygon),
                ("none", PathMode::None),
                ("spline", PathMode::Spline),
            ],
        ),
        layer_difference: number_field(
            "layerDifference",
            raw.layer_difference.as_ref(),
            defaults.layer_difference,
        )?,
        length_threshold: number_field(
            "lengthThreshold",
            raw.length_threshold.as_ref(),
            defaults.length_threshold,
        )?,
        max_iterations: integer_field(
            "maxIterations",
            raw.max_iterations.as_ref(),
            defaults.max_iterations,
        )?,
        path_precision: integer_field(
            "pathPrecision",
            raw.path_precision.as_ref(),
            defaults.path_precision,
        )?,
    })
}

/// Parse and resolve a serialized configuration payload in one step.
pub fn resolve_payload(payload: &str) -> BridgeResult<VectorizerOptions> {
    let raw = parse_config(payload)?;
    resolve(&raw)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidValue {
        key,
        reason: reason.into(),
    }
}

/// Read a set value as a finite number, parsing strings textually.
fn parse_number(key: &'static str, value: &Value) -> BridgeResult<f64> {
    let number = match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(key, format!("`{number}` is not representable")))?,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(key, format!("`{text}` is not a number")))?,
        other => {
            return Err(invalid(
                key,
                format!("expected a number, got {}", json_type_name(other)),
            ));
        }
    };

    if !number.is_finite() {
        return Err(invalid(key, format!("`{number}` is not a finite number")));
    }
    Ok(number)
}

fn number_field(key: &'static str, raw: Option<&Value>, default: f64) -> BridgeResult<f64> {
    match raw.filter(|value| is_truthy(value)) {
        Some(value) => parse_number(key, value),
        None => Ok(default),
    }
}

fn integer_field(key: &'static str, raw: Option<&Value>, default: i64) -> BridgeResult<i64> {
    let Some(value) = raw.filter(|value| is_truthy(value)) else {
        return Ok(default);
    };

    if let Value::Number(number) = value
        && let Some(int) = number.as_i64()
    {
        return Ok(int);
    }
    if let Value::String(text) = value
        && let Ok(int) = text.trim().parse::<i64>()
    {
        return Ok(int);
    }

    let number = parse_number(key, value)?;
    // i64::MAX is not exactly representable; its f64 rounding is 2^63.
    if number.fract() != 0.0 || number < i64::MIN as f64 || number >= i64::MAX as f64 {
        return Err(invalid(key, format!("expected an integer, got {number}")));
    }
    Ok(number as i64)
}

/// Closed match against `choices`; anything else is the type's default.
fn enum_field<T>(key: &'static str, raw: Option<&Value>, choices: &[(&str, T)]) -> T
where
    T: Copy + Default + std::fmt::Debug,
{
    let Some(value) = raw.filter(|value| is_truthy(value)) else {
        return T::default();
    };

    if let Some(text) = value.as_str()
        && let Some((_, member)) = choices.iter().find(|(name, _)| *name == text)
    {
        return *member;
    }

    let fallback = T::default();
    debug!(key, %value, ?fallback, "unrecognized value, using default");
    fallback
}
