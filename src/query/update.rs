use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::value_objects::FieldPath;
use crate::query::errors::QueryParseError;
use crate::query::ordering::values_equal;

/// Errors raised while applying a parsed update to a document
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Cannot apply $inc to non-numeric field {path}")]
    NonNumericInc { path: String },

    #[error("Cannot set {path}: {segment} is not an object")]
    PathConflict { path: String, segment: String },
}

#[derive(Debug, Clone, PartialEq)]
enum UpdateOp {
    Set(FieldPath, Value),
    Inc(FieldPath, Number),
    Unset(FieldPath),
}

/// Parsed update document (`{$set: {price: 15.99}}`)
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDocument {
    ops: Vec<UpdateOp>,
}

impl UpdateDocument {
    pub fn parse(update_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = update_doc
            .as_object()
            .ok_or(QueryParseError::NotADocument("update document"))?;

        if entries.is_empty() {
            return Err(QueryParseError::EmptyUpdate);
        }

        let mut ops = Vec::new();
        for (operator, operand) in entries {
            if !operator.starts_with('$') {
                return Err(QueryParseError::UpdateWithoutOperators);
            }

            let fields = operand.as_object().ok_or_else(|| {
                QueryParseError::InvalidOperand {
                    operator: operator.clone(),
                    expected: "a field-to-value document".to_string(),
                }
            })?;

            if fields.is_empty() {
                return Err(QueryParseError::EmptyUpdate);
            }

            for (key, value) in fields {
                let path = FieldPath::new(key)?;
                if path.segments()[0] == "_id" {
                    return Err(QueryParseError::IdImmutable);
                }

                match operator.as_str() {
                    "$set" => ops.push(UpdateOp::Set(path, value.clone())),
                    "$inc" => match value.as_number() {
                        Some(delta) => ops.push(UpdateOp::Inc(path, delta.clone())),
                        None => {
                            return Err(QueryParseError::InvalidOperand {
                                operator: "$inc".to_string(),
                                expected: "a numeric delta".to_string(),
                            })
                        }
                    },
                    "$unset" => ops.push(UpdateOp::Unset(path)),
                    other => return Err(QueryParseError::UnknownOperator(other.to_string())),
                }
            }
        }

        Ok(Self { ops })
    }

    /// Apply all operators to a document body. Returns whether the body
    /// actually changed.
    pub fn apply(&self, body: &mut Map<String, Value>) -> Result<bool, UpdateError> {
        let mut modified = false;

        for op in &self.ops {
            match op {
                UpdateOp::Set(path, value) => {
                    let slot = navigate_for_write(body, path)?;
                    let changed = match slot.get(last_segment(path)) {
                        Some(existing) => !values_equal(existing, value),
                        None => true,
                    };
                    if changed {
                        slot.insert(last_segment(path).to_string(), value.clone());
                        modified = true;
                    }
                }
                UpdateOp::Inc(path, delta) => {
                    let slot = navigate_for_write(body, path)?;
                    let current = match slot.get(last_segment(path)) {
                        None => Number::from(0),
                        Some(Value::Number(n)) => n.clone(),
                        Some(_) => {
                            return Err(UpdateError::NonNumericInc {
                                path: path.to_string(),
                            })
                        }
                    };

                    let incremented = add_numbers(&current, delta);
                    if !values_equal(
                        &Value::Number(current),
                        &Value::Number(incremented.clone()),
                    ) {
                        modified = true;
                    }
                    slot.insert(last_segment(path).to_string(), Value::Number(incremented));
                }
                UpdateOp::Unset(path) => {
                    if remove_at_path(body, path.segments()) {
                        modified = true;
                    }
                }
            }
        }

        Ok(modified)
    }
}

fn last_segment(path: &FieldPath) -> &str {
    path.segments()
        .last()
        .map(String::as_str)
        .unwrap_or_default()
}

/// Walk to the parent object of the path's final segment, creating
/// intermediate objects along the way.
fn navigate_for_write<'a>(
    body: &'a mut Map<String, Value>,
    path: &FieldPath,
) -> Result<&'a mut Map<String, Value>, UpdateError> {
    let segments = path.segments();
    let mut current = body;

    for segment in &segments[..segments.len() - 1] {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry
            .as_object_mut()
            .ok_or_else(|| UpdateError::PathConflict {
                path: path.to_string(),
                segment: segment.clone(),
            })?;
    }

    Ok(current)
}

fn remove_at_path(target: &mut Map<String, Value>, segments: &[String]) -> bool {
    match segments {
        [] => false,
        [last] => target.remove(last).is_some(),
        [head, rest @ ..] => match target.get_mut(head) {
            Some(Value::Object(nested)) => remove_at_path(nested, rest),
            _ => false,
        },
    }
}

/// Integer-preserving addition; falls back to floating point on overflow
/// or when either side is a float.
fn add_numbers(a: &Number, b: &Number) -> Number {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Number::from(sum);
        }
    }

    let x = a.as_f64().unwrap_or(0.0);
    let y = b.as_f64().unwrap_or(0.0);
    Number::from_f64(x + y).unwrap_or_else(|| Number::from(0))
}
