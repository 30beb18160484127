//! Raw input → fixed-order feature vector.

use oncoscore_common::{PredictError, Result};

use crate::raw::{RawInput, RawValue};
use crate::spec::{FeatureSpec, FieldKind, FieldSpec};
use crate::FeatureVector;

/// Normalize a raw attribute map into the encoded vector a module's fitted
/// transform expects.
///
/// Required fields that are absent or empty fail the request; optional
/// fields become the NaN sentinel for the imputer. Out-of-range numerics
/// are passed through unclamped.
pub fn normalize(raw: &RawInput, spec: &FeatureSpec) -> Result<FeatureVector> {
    let mut vector = Vec::with_capacity(spec.width());

    for field in &spec.fields {
        match raw.get(&field.name) {
            None if field.required => {
                return Err(PredictError::MissingField(field.name.clone()));
            }
            None => push_missing(field, &mut vector),
            Some(value) => encode(field, value, &mut vector)?,
        }
    }

    Ok(vector)
}

fn push_missing(field: &FieldSpec, out: &mut FeatureVector) {
    match &field.kind {
        FieldKind::Numeric | FieldKind::Boolean => out.push(f64::NAN),
        // Missing optional categorical encodes as the baseline (all zeros).
        FieldKind::Categorical { .. } => out.extend(std::iter::repeat(0.0).take(field.width())),
    }
}

fn encode(field: &FieldSpec, value: &RawValue, out: &mut FeatureVector) -> Result<()> {
    match &field.kind {
        FieldKind::Numeric => out.push(parse_numeric(field, value)?),
        FieldKind::Boolean => out.push(parse_boolean(field, value)?),
        FieldKind::Categorical {
            categories,
            baseline,
        } => {
            let token = match value {
                RawValue::Text(s) => s.trim(),
                other => {
                    return Err(PredictError::invalid_enum(&field.name, &other.display()));
                }
            };
            if !categories.iter().any(|c| c == token) {
                return Err(PredictError::invalid_enum(&field.name, token));
            }
            for category in categories.iter().filter(|c| *c != baseline) {
                out.push(if category == token { 1.0 } else { 0.0 });
            }
        }
    }
    Ok(())
}

fn parse_numeric(field: &FieldSpec, value: &RawValue) -> Result<f64> {
    match value {
        RawValue::Number(n) => Ok(*n),
        RawValue::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| PredictError::invalid_number(&field.name, s)),
        other => Err(PredictError::invalid_number(&field.name, &other.display())),
    }
}

fn parse_boolean(field: &FieldSpec, value: &RawValue) -> Result<f64> {
    let parsed = match value {
        RawValue::Bool(true) => Some(1.0),
        RawValue::Bool(false) => Some(0.0),
        RawValue::Number(n) if *n == 1.0 => Some(1.0),
        RawValue::Number(n) if *n == 0.0 => Some(0.0),
        RawValue::Text(s) => match s.trim() {
            t if t.eq_ignore_ascii_case("yes") || t == "1" => Some(1.0),
            t if t.eq_ignore_ascii_case("no") || t == "0" => Some(0.0),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| PredictError::invalid_enum(&field.name, &value.display()))
}
