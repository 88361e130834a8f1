use serde_json::Value;

use crate::query::errors::QueryParseError;
use crate::query::filter::Filter;
use crate::query::pipeline::expression::Expression;
use crate::query::sort::SortSpec;

/// Accumulator applied per group bucket
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    Sum(Expression),
    Avg(Expression),
    Min(Expression),
    Max(Expression),
}

impl Accumulator {
    fn parse(accumulator_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = accumulator_doc.as_object().ok_or_else(|| {
            QueryParseError::InvalidExpression(
                "An accumulator must be a single-operator document".to_string(),
            )
        })?;

        if entries.len() != 1 {
            return Err(QueryParseError::InvalidExpression(
                "An accumulator must have exactly one operator key".to_string(),
            ));
        }

        let (operator, operand) = entries.iter().next().expect("len checked above");
        let expr = Expression::parse(operand)?;

        match operator.as_str() {
            "$sum" => Ok(Accumulator::Sum(expr)),
            "$avg" => Ok(Accumulator::Avg(expr)),
            "$min" => Ok(Accumulator::Min(expr)),
            "$max" => Ok(Accumulator::Max(expr)),
            other => Err(QueryParseError::UnknownAccumulator(other.to_string())),
        }
    }
}

/// Parsed `$group` stage: the `_id` key expression plus named accumulators
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStage {
    key: Expression,
    accumulators: Vec<(String, Accumulator)>,
}

impl GroupStage {
    pub fn parse(group_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = group_doc.as_object().ok_or_else(|| {
            QueryParseError::InvalidStage("$group expects a document".to_string())
        })?;

        let key_doc = entries.get("_id").ok_or_else(|| {
            QueryParseError::InvalidStage("$group requires an _id key expression".to_string())
        })?;
        let key = Expression::parse(key_doc)?;

        let mut accumulators = Vec::new();
        for (field, accumulator_doc) in entries {
            if field == "_id" {
                continue;
            }
            if field.starts_with('$') {
                return Err(QueryParseError::InvalidStage(format!(
                    "$group output field cannot be an operator: {}",
                    field
                )));
            }
            accumulators.push((field.clone(), Accumulator::parse(accumulator_doc)?));
        }

        Ok(Self { key, accumulators })
    }

    pub fn key(&self) -> &Expression {
        &self.key
    }

    pub fn accumulators(&self) -> &[(String, Accumulator)] {
        &self.accumulators
    }
}

/// One pipeline stage; each stage consumes the prior stage's output
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    Group(GroupStage),
    Sort(SortSpec),
    Limit(usize),
    Skip(usize),
}

impl Stage {
    pub fn parse(stage_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = stage_doc
            .as_object()
            .ok_or_else(|| QueryParseError::InvalidStage(stage_doc.to_string()))?;

        if entries.len() != 1 {
            return Err(QueryParseError::InvalidStage(stage_doc.to_string()));
        }

        let (stage_name, body) = entries.iter().next().expect("len checked above");
        match stage_name.as_str() {
            "$match" => Ok(Stage::Match(Filter::parse(body)?)),
            "$group" => Ok(Stage::Group(GroupStage::parse(body)?)),
            "$sort" => Ok(Stage::Sort(SortSpec::parse(body)?)),
            "$limit" => Ok(Stage::Limit(parse_count(stage_name, body, 1)?)),
            "$skip" => Ok(Stage::Skip(parse_count(stage_name, body, 0)?)),
            other => Err(QueryParseError::UnknownStage(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Group(_) => "$group",
            Stage::Sort(_) => "$sort",
            Stage::Limit(_) => "$limit",
            Stage::Skip(_) => "$skip",
        }
    }
}

fn parse_count(stage: &str, body: &Value, min: u64) -> Result<usize, QueryParseError> {
    match body.as_u64() {
        Some(n) if n >= min => Ok(n as usize),
        _ => Err(QueryParseError::InvalidOperand {
            operator: stage.to_string(),
            expected: format!("an integer >= {}", min),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_parse_match() {
        let stage = Stage::parse(&json!({"$match": {"genre": "Fiction"}})).unwrap();
        assert!(matches!(stage, Stage::Match(_)));
    }

    #[test]
    fn test_stage_parse_group_with_accumulators() {
        let stage = Stage::parse(&json!({
            "$group": {
                "_id": "$genre",
                "average_price": {"$avg": "$price"},
                "total_books": {"$sum": 1}
            }
        }))
        .unwrap();

        let Stage::Group(group) = stage else {
            panic!("expected $group stage");
        };
        assert_eq!(group.accumulators().len(), 2);
    }

    #[test]
    fn test_stage_parse_group_requires_id() {
        assert!(Stage::parse(&json!({"$group": {"total": {"$sum": 1}}})).is_err());
    }

    #[test]
    fn test_stage_parse_sort_limit_skip() {
        assert!(matches!(
            Stage::parse(&json!({"$sort": {"total_books": -1}})).unwrap(),
            Stage::Sort(_)
        ));
        assert!(matches!(
            Stage::parse(&json!({"$limit": 1})).unwrap(),
            Stage::Limit(1)
        ));
        assert!(matches!(
            Stage::parse(&json!({"$skip": 5})).unwrap(),
            Stage::Skip(5)
        ));
    }

    #[test]
    fn test_stage_parse_rejects_zero_limit() {
        assert!(Stage::parse(&json!({"$limit": 0})).is_err());
    }

    #[test]
    fn test_stage_parse_rejects_unknown_stage() {
        assert!(matches!(
            Stage::parse(&json!({"$lookup": {}})),
            Err(QueryParseError::UnknownStage(_))
        ));
    }

    #[test]
    fn test_stage_parse_rejects_multi_key_stage() {
        assert!(Stage::parse(&json!({"$limit": 1, "$skip": 2})).is_err());
    }

    #[test]
    fn test_accumulator_parse_rejects_unknown() {
        assert!(matches!(
            Stage::parse(&json!({"$group": {"_id": null, "x": {"$median": "$price"}}})),
            Err(QueryParseError::UnknownAccumulator(_))
        ));
    }
}
