use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::value_objects::FieldPath;
use crate::query::errors::QueryParseError;

/// Errors raised while evaluating an expression against a document
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("{operator} only supports numeric operands, got {value}")]
    NonNumericOperand { operator: &'static str, value: String },

    #[error("Cannot $divide by zero")]
    DivisionByZero,
}

/// Aggregation expression: field references, literals, document literals,
/// and arithmetic operators
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Field(FieldPath),
    Literal(Value),
    Document(Vec<(String, Expression)>),
    Multiply(Vec<Expression>),
    Add(Vec<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Floor(Box<Expression>),
}

impl Expression {
    pub fn parse(expr_doc: &Value) -> Result<Self, QueryParseError> {
        match expr_doc {
            Value::String(s) if s.starts_with('$') => {
                Ok(Expression::Field(FieldPath::new(&s[1..])?))
            }
            Value::Object(entries) => parse_object(entries),
            other => Ok(Expression::Literal(other.clone())),
        }
    }

    /// Evaluate against a rendered document. Missing fields and null
    /// operands propagate as null through arithmetic.
    pub fn evaluate(&self, document: &Value) -> Result<Value, ExpressionError> {
        match self {
            Expression::Field(path) => Ok(path
                .resolve(document)
                .cloned()
                .unwrap_or(Value::Null)),
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Document(fields) => {
                let mut rendered = Map::with_capacity(fields.len());
                for (key, expr) in fields {
                    rendered.insert(key.clone(), expr.evaluate(document)?);
                }
                Ok(Value::Object(rendered))
            }
            Expression::Multiply(operands) => {
                fold_numeric(operands, document, "$multiply", 1.0, |acc, x| acc * x)
            }
            Expression::Add(operands) => {
                fold_numeric(operands, document, "$add", 0.0, |acc, x| acc + x)
            }
            Expression::Divide(dividend, divisor) => {
                let Some(x) = numeric_operand(dividend.evaluate(document)?, "$divide")? else {
                    return Ok(Value::Null);
                };
                let Some(y) = numeric_operand(divisor.evaluate(document)?, "$divide")? else {
                    return Ok(Value::Null);
                };
                if y == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                Ok(number_value(x / y))
            }
            Expression::Subtract(minuend, subtrahend) => {
                let Some(x) = numeric_operand(minuend.evaluate(document)?, "$subtract")? else {
                    return Ok(Value::Null);
                };
                let Some(y) = numeric_operand(subtrahend.evaluate(document)?, "$subtract")? else {
                    return Ok(Value::Null);
                };
                Ok(number_value(x - y))
            }
            Expression::Floor(operand) => {
                let Some(x) = numeric_operand(operand.evaluate(document)?, "$floor")? else {
                    return Ok(Value::Null);
                };
                Ok(number_value(x.floor()))
            }
        }
    }
}

fn parse_object(entries: &Map<String, Value>) -> Result<Expression, QueryParseError> {
    let operator_keys: Vec<&String> = entries.keys().filter(|k| k.starts_with('$')).collect();

    if operator_keys.is_empty() {
        // Document literal, e.g. {decade: {$multiply: [...]}}
        let mut fields = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            fields.push((key.clone(), Expression::parse(value)?));
        }
        return Ok(Expression::Document(fields));
    }

    if entries.len() != 1 {
        return Err(QueryParseError::InvalidExpression(
            "An operator expression must have exactly one $-operator key".to_string(),
        ));
    }

    let (operator, operand) = entries.iter().next().expect("len checked above");
    match operator.as_str() {
        "$multiply" => Ok(Expression::Multiply(parse_operand_list(operator, operand, 2)?)),
        "$add" => Ok(Expression::Add(parse_operand_list(operator, operand, 2)?)),
        "$divide" => {
            let (dividend, divisor) = parse_operand_pair(operator, operand)?;
            Ok(Expression::Divide(Box::new(dividend), Box::new(divisor)))
        }
        "$subtract" => {
            let (minuend, subtrahend) = parse_operand_pair(operator, operand)?;
            Ok(Expression::Subtract(Box::new(minuend), Box::new(subtrahend)))
        }
        "$floor" => Ok(Expression::Floor(Box::new(Expression::parse(operand)?))),
        other => Err(QueryParseError::UnknownExpressionOperator(other.to_string())),
    }
}

fn parse_operand_list(
    operator: &str,
    operand: &Value,
    min: usize,
) -> Result<Vec<Expression>, QueryParseError> {
    let items = operand
        .as_array()
        .ok_or_else(|| QueryParseError::InvalidOperand {
            operator: operator.to_string(),
            expected: "an array of expressions".to_string(),
        })?;

    if items.len() < min {
        return Err(QueryParseError::InvalidOperand {
            operator: operator.to_string(),
            expected: format!("at least {} operands", min),
        });
    }

    items.iter().map(Expression::parse).collect()
}

fn parse_operand_pair(
    operator: &str,
    operand: &Value,
) -> Result<(Expression, Expression), QueryParseError> {
    let items = parse_operand_list(operator, operand, 2)?;
    match <[Expression; 2]>::try_from(items) {
        Ok([first, second]) => Ok((first, second)),
        Err(_) => Err(QueryParseError::InvalidOperand {
            operator: operator.to_string(),
            expected: "exactly two operands".to_string(),
        }),
    }
}

fn fold_numeric(
    operands: &[Expression],
    document: &Value,
    operator: &'static str,
    identity: f64,
    combine: fn(f64, f64) -> f64,
) -> Result<Value, ExpressionError> {
    let mut acc = identity;
    for operand in operands {
        let Some(x) = numeric_operand(operand.evaluate(document)?, operator)? else {
            return Ok(Value::Null);
        };
        acc = combine(acc, x);
    }
    Ok(number_value(acc))
}

/// Null and missing evaluate to None (propagated as a null result);
/// any other non-number is an error.
fn numeric_operand(
    value: Value,
    operator: &'static str,
) -> Result<Option<f64>, ExpressionError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(ExpressionError::NonNumericOperand {
            operator,
            value: other.to_string(),
        }),
    }
}

/// Emit integral results as integers (1940.0 -> 1940), as the original
/// decade grouping expects.
fn number_value(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Value::Number(Number::from(x as i64))
    } else {
        Value::Number(Number::from_f64(x).unwrap_or_else(|| Number::from(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(expr: Value, doc: Value) -> Result<Value, ExpressionError> {
        Expression::parse(&expr).unwrap().evaluate(&doc)
    }

    #[test]
    fn test_expression_field_reference() {
        assert_eq!(
            eval(json!("$price"), json!({"price": 9.99})).unwrap(),
            json!(9.99)
        );
    }

    #[test]
    fn test_expression_missing_field_is_null() {
        assert_eq!(eval(json!("$price"), json!({})).unwrap(), json!(null));
    }

    #[test]
    fn test_expression_literal() {
        assert_eq!(eval(json!(1), json!({})).unwrap(), json!(1));
        assert_eq!(eval(json!("plain"), json!({})).unwrap(), json!("plain"));
    }

    #[test]
    fn test_expression_decade_computation() {
        // The canonical decade bucket: floor(year / 10) * 10
        let expr = json!({
            "$multiply": [
                {"$floor": {"$divide": ["$published_year", 10]}},
                10
            ]
        });

        assert_eq!(
            eval(expr.clone(), json!({"published_year": 1949})).unwrap(),
            json!(1940)
        );
        assert_eq!(
            eval(expr, json!({"published_year": 2003})).unwrap(),
            json!(2000)
        );
    }

    #[test]
    fn test_expression_document_literal() {
        let expr = json!({"decade": {"$multiply": [{"$floor": {"$divide": ["$y", 10]}}, 10]}});

        assert_eq!(
            eval(expr, json!({"y": 1988})).unwrap(),
            json!({"decade": 1980})
        );
    }

    #[test]
    fn test_expression_null_propagates_through_arithmetic() {
        assert_eq!(
            eval(json!({"$multiply": ["$missing", 10]}), json!({})).unwrap(),
            json!(null)
        );
    }

    #[test]
    fn test_expression_divide_by_zero_errors() {
        assert!(matches!(
            eval(json!({"$divide": ["$x", 0]}), json!({"x": 4})),
            Err(ExpressionError::DivisionByZero)
        ));
    }

    #[test]
    fn test_expression_non_numeric_arithmetic_errors() {
        assert!(matches!(
            eval(json!({"$add": ["$title", 1]}), json!({"title": "Dune"})),
            Err(ExpressionError::NonNumericOperand { .. })
        ));
    }

    #[test]
    fn test_expression_subtract_order() {
        assert_eq!(
            eval(json!({"$subtract": ["$a", "$b"]}), json!({"a": 10, "b": 4})).unwrap(),
            json!(6)
        );
    }

    #[test]
    fn test_expression_add_preserves_floats() {
        assert_eq!(
            eval(json!({"$add": ["$a", 0.5]}), json!({"a": 1})).unwrap(),
            json!(1.5)
        );
    }

    #[test]
    fn test_expression_parse_rejects_unknown_operator() {
        assert!(matches!(
            Expression::parse(&json!({"$concat": ["a", "b"]})),
            Err(QueryParseError::UnknownExpressionOperator(_))
        ));
    }

    #[test]
    fn test_expression_parse_rejects_mixed_operator_document() {
        assert!(Expression::parse(&json!({"$floor": "$x", "plain": 1})).is_err());
    }
}
