use serde_json::Value;

use crate::domain::value_objects::FieldPath;
use crate::query::errors::QueryParseError;
use crate::query::ordering::{compare_values, same_bracket, values_equal};

/// Single-field predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Exists(bool),
}

impl Predicate {
    /// Whether this predicate can drive an index scan on its field.
    pub fn is_index_usable(&self) -> bool {
        !matches!(self, Predicate::Ne(_) | Predicate::Exists(_))
    }
}

/// One field-path clause of a filter
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    path: FieldPath,
    predicate: Predicate,
}

impl Clause {
    pub fn new(path: FieldPath, predicate: Predicate) -> Self {
        Self { path, predicate }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    fn matches(&self, document: &Value) -> bool {
        let resolved = self.path.resolve(document);

        match &self.predicate {
            // Missing fields participate in equality as null
            Predicate::Eq(expected) => {
                values_equal(resolved.unwrap_or(&Value::Null), expected)
            }
            Predicate::Ne(expected) => {
                !values_equal(resolved.unwrap_or(&Value::Null), expected)
            }
            Predicate::In(candidates) => {
                let actual = resolved.unwrap_or(&Value::Null);
                candidates.iter().any(|c| values_equal(actual, c))
            }
            Predicate::Exists(expected) => resolved.is_some() == *expected,
            // Ordered comparisons never match a missing field and only
            // compare within the same type bracket
            Predicate::Gt(bound) => ordered_matches(resolved, bound, |o| o.is_gt()),
            Predicate::Gte(bound) => ordered_matches(resolved, bound, |o| o.is_ge()),
            Predicate::Lt(bound) => ordered_matches(resolved, bound, |o| o.is_lt()),
            Predicate::Lte(bound) => ordered_matches(resolved, bound, |o| o.is_le()),
        }
    }
}

fn ordered_matches(
    resolved: Option<&Value>,
    bound: &Value,
    accept: fn(std::cmp::Ordering) -> bool,
) -> bool {
    match resolved {
        Some(actual) if same_bracket(actual, bound) => accept(compare_values(actual, bound)),
        _ => false,
    }
}

/// Parsed filter document: a conjunction of field clauses
///
/// Supports implicit equality (`{genre: "Fiction"}`) and the comparison
/// operators used in query documents (`{published_year: {"$gt": 2000}}`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(filter_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = filter_doc
            .as_object()
            .ok_or_else(|| QueryParseError::FilterNotAnObject(type_name(filter_doc)))?;

        let mut clauses = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            if key.starts_with('$') {
                return Err(QueryParseError::UnknownOperator(key.clone()));
            }

            let path = FieldPath::new(key)?;
            match value.as_object() {
                Some(operators) if operators.keys().any(|k| k.starts_with('$')) => {
                    for (operator, operand) in operators {
                        clauses.push(Clause::new(
                            path.clone(),
                            parse_predicate(operator, operand)?,
                        ));
                    }
                }
                _ => clauses.push(Clause::new(path, Predicate::Eq(value.clone()))),
            }
        }

        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Conjunction: every clause must hold. The empty filter matches all.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| clause.matches(document))
    }
}

fn parse_predicate(operator: &str, operand: &Value) -> Result<Predicate, QueryParseError> {
    match operator {
        "$eq" => Ok(Predicate::Eq(operand.clone())),
        "$ne" => Ok(Predicate::Ne(operand.clone())),
        "$gt" => Ok(Predicate::Gt(operand.clone())),
        "$gte" => Ok(Predicate::Gte(operand.clone())),
        "$lt" => Ok(Predicate::Lt(operand.clone())),
        "$lte" => Ok(Predicate::Lte(operand.clone())),
        "$in" => match operand.as_array() {
            Some(candidates) => Ok(Predicate::In(candidates.clone())),
            None => Err(QueryParseError::InvalidOperand {
                operator: "$in".to_string(),
                expected: "an array of candidate values".to_string(),
            }),
        },
        "$exists" => match operand.as_bool() {
            Some(expected) => Ok(Predicate::Exists(expected)),
            None => Err(QueryParseError::InvalidOperand {
                operator: "$exists".to_string(),
                expected: "a boolean".to_string(),
            }),
        },
        other => Err(QueryParseError::UnknownOperator(other.to_string())),
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}
