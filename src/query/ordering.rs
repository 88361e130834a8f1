//! Total order over JSON values, shared by filters, sorts, and index keys.
//!
//! Values order by type bracket first (Null < Bool < Number < String <
//! Array < Object), then within the bracket. Numbers compare numerically
//! across integer and float representations.

use std::cmp::Ordering;

use serde_json::Value;

/// Type bracket a value sorts into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeBracket {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

pub fn type_bracket(value: &Value) -> TypeBracket {
    match value {
        Value::Null => TypeBracket::Null,
        Value::Bool(_) => TypeBracket::Bool,
        Value::Number(_) => TypeBracket::Number,
        Value::String(_) => TypeBracket::String,
        Value::Array(_) => TypeBracket::Array,
        Value::Object(_) => TypeBracket::Object,
    }
}

pub fn same_bracket(a: &Value, b: &Value) -> bool {
    type_bracket(a) == type_bracket(b)
}

/// Compare two values under the store's total order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let bracket_cmp = type_bracket(a).cmp(&type_bracket(b));
    if bracket_cmp != Ordering::Equal {
        return bracket_cmp;
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                let cmp = compare_values(xi, yi);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            let mut x_entries: Vec<_> = x.iter().collect();
            let mut y_entries: Vec<_> = y.iter().collect();
            x_entries.sort_by_key(|(k, _)| k.as_str());
            y_entries.sort_by_key(|(k, _)| k.as_str());

            for ((xk, xv), (yk, yv)) in x_entries.iter().zip(y_entries.iter()) {
                let key_cmp = xk.cmp(yk);
                if key_cmp != Ordering::Equal {
                    return key_cmp;
                }
                let value_cmp = compare_values(xv, yv);
                if value_cmp != Ordering::Equal {
                    return value_cmp;
                }
            }
            x_entries.len().cmp(&y_entries.len())
        }
        // Brackets matched above, so the variants match too
        _ => Ordering::Equal,
    }
}

/// Numeric-aware equality: 1949 == 1949.0, otherwise structural.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    same_bracket(a, b) && compare_values(a, b) == Ordering::Equal
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => {
            let x = a.as_f64().unwrap_or(f64::MAX);
            let y = b.as_f64().unwrap_or(f64::MAX);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    }
}
