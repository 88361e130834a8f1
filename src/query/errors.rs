use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors raised while parsing filter, update, projection, sort, or
/// pipeline documents into their typed forms
#[derive(Debug, Error)]
pub enum QueryParseError {
    #[error("Filter must be a JSON object, got {0}")]
    FilterNotAnObject(String),

    #[error("Expected a JSON object for the {0}")]
    NotADocument(&'static str),

    #[error("Unknown query operator: {0}")]
    UnknownOperator(String),

    #[error("Operator {operator} expects {expected}")]
    InvalidOperand {
        operator: String,
        expected: String,
    },

    #[error("Update document must use update operators ($set, $inc, $unset)")]
    UpdateWithoutOperators,

    #[error("Update document is empty")]
    EmptyUpdate,

    #[error("The _id field cannot be updated")]
    IdImmutable,

    #[error("Projection cannot mix included and excluded fields (except _id)")]
    MixedProjection,

    #[error("Projection value for {0} must be 0 or 1")]
    InvalidProjectionValue(String),

    #[error("Pipeline must be a JSON array of stage documents")]
    PipelineNotAnArray,

    #[error("Pipeline stage must be a document with a single $-stage key, got {0}")]
    InvalidStage(String),

    #[error("Unknown pipeline stage: {0}")]
    UnknownStage(String),

    #[error("Unknown accumulator: {0}")]
    UnknownAccumulator(String),

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Unknown expression operator: {0}")]
    UnknownExpressionOperator(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
