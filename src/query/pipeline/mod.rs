//! Aggregation pipeline: an ordered sequence of stages, each consuming the
//! prior stage's output sequence of documents.

mod expression;
mod stage;

pub use expression::{Expression, ExpressionError};
pub use stage::{Accumulator, GroupStage, Stage};

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::query::errors::QueryParseError;
use crate::query::ordering::compare_values;

/// Parsed aggregation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn parse(pipeline_doc: &Value) -> Result<Self, QueryParseError> {
        let stage_docs = pipeline_doc
            .as_array()
            .ok_or(QueryParseError::PipelineNotAnArray)?;

        let stages = stage_docs
            .iter()
            .map(Stage::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over the input sequence.
    pub fn execute(&self, documents: Vec<Value>) -> Result<Vec<Value>, ExpressionError> {
        let mut current = documents;

        for stage in &self.stages {
            current = match stage {
                Stage::Match(filter) => current
                    .into_iter()
                    .filter(|doc| filter.matches(doc))
                    .collect(),
                Stage::Sort(spec) => {
                    let mut sorted = current;
                    spec.sort(&mut sorted);
                    sorted
                }
                Stage::Limit(n) => {
                    let mut limited = current;
                    limited.truncate(*n);
                    limited
                }
                Stage::Skip(n) => current.into_iter().skip(*n).collect(),
                Stage::Group(group) => execute_group(group, &current)?,
            };
        }

        Ok(current)
    }
}

/// Running state for one accumulator in one bucket
enum AccumulatorState {
    Sum { int: i64, float: f64, is_float: bool },
    Avg { sum: f64, count: u64 },
    Min(Option<Value>),
    Max(Option<Value>),
}

impl AccumulatorState {
    fn new(accumulator: &Accumulator) -> Self {
        match accumulator {
            Accumulator::Sum(_) => AccumulatorState::Sum {
                int: 0,
                float: 0.0,
                is_float: false,
            },
            Accumulator::Avg(_) => AccumulatorState::Avg { sum: 0.0, count: 0 },
            Accumulator::Min(_) => AccumulatorState::Min(None),
            Accumulator::Max(_) => AccumulatorState::Max(None),
        }
    }

    fn observe(&mut self, value: Value) {
        match self {
            // $sum and $avg ignore non-numeric values
            AccumulatorState::Sum {
                int,
                float,
                is_float,
            } => {
                if let Value::Number(n) = &value {
                    match (n.as_i64(), *is_float) {
                        (Some(x), false) => match int.checked_add(x) {
                            Some(sum) => *int = sum,
                            None => {
                                *is_float = true;
                                *float = *int as f64 + x as f64;
                            }
                        },
                        _ => {
                            if !*is_float {
                                *is_float = true;
                                *float = *int as f64;
                            }
                            *float += n.as_f64().unwrap_or(0.0);
                        }
                    }
                }
            }
            AccumulatorState::Avg { sum, count } => {
                if let Value::Number(n) = &value {
                    *sum += n.as_f64().unwrap_or(0.0);
                    *count += 1;
                }
            }
            // $min and $max ignore null and missing
            AccumulatorState::Min(best) => {
                if !value.is_null()
                    && best
                        .as_ref()
                        .map_or(true, |b| compare_values(&value, b).is_lt())
                {
                    *best = Some(value);
                }
            }
            AccumulatorState::Max(best) => {
                if !value.is_null()
                    && best
                        .as_ref()
                        .map_or(true, |b| compare_values(&value, b).is_gt())
                {
                    *best = Some(value);
                }
            }
        }
    }

    fn finalize(self) -> Value {
        match self {
            AccumulatorState::Sum {
                int,
                float,
                is_float,
            } => {
                if is_float {
                    Value::Number(Number::from_f64(float).unwrap_or_else(|| Number::from(0)))
                } else {
                    Value::Number(Number::from(int))
                }
            }
            AccumulatorState::Avg { sum, count } => {
                if count == 0 {
                    Value::Null
                } else {
                    Value::Number(
                        Number::from_f64(sum / count as f64).unwrap_or_else(|| Number::from(0)),
                    )
                }
            }
            AccumulatorState::Min(best) | AccumulatorState::Max(best) => {
                best.unwrap_or(Value::Null)
            }
        }
    }
}

struct Bucket {
    key: Value,
    states: Vec<AccumulatorState>,
}

fn execute_group(group: &GroupStage, documents: &[Value]) -> Result<Vec<Value>, ExpressionError> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();

    for document in documents {
        let key = group.key().evaluate(document)?;
        let lookup = key.to_string();

        let index = match bucket_index.get(&lookup) {
            Some(&i) => i,
            None => {
                buckets.push(Bucket {
                    key,
                    states: group
                        .accumulators()
                        .iter()
                        .map(|(_, acc)| AccumulatorState::new(acc))
                        .collect(),
                });
                bucket_index.insert(lookup, buckets.len() - 1);
                buckets.len() - 1
            }
        };

        for ((_, accumulator), state) in group
            .accumulators()
            .iter()
            .zip(buckets[index].states.iter_mut())
        {
            let expr = match accumulator {
                Accumulator::Sum(e) | Accumulator::Avg(e) | Accumulator::Min(e)
                | Accumulator::Max(e) => e,
            };
            state.observe(expr.evaluate(document)?);
        }
    }

    Ok(buckets
        .into_iter()
        .map(|bucket| {
            let mut rendered = Map::with_capacity(group.accumulators().len() + 1);
            rendered.insert("_id".to_string(), bucket.key);
            for ((field, _), state) in group.accumulators().iter().zip(bucket.states) {
                rendered.insert(field.clone(), state.finalize());
            }
            Value::Object(rendered)
        })
        .collect())
}
