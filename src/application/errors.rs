//! Common error types for use cases to reduce duplication
//!
//! This module provides standardized error types shared across the
//! query, write, and index use cases instead of nearly identical
//! per-use-case enums.

use thiserror::Error;

use crate::application::ports::StoreError;
use crate::domain::errors::DomainError;
use crate::query::QueryParseError;

/// Common error type for read-side use cases (find, aggregate, explain)
#[derive(Debug, Error)]
pub enum QueryUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Query parse error: {0}")]
    Parse(#[from] QueryParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Common error type for write-side use cases (insert, update, delete)
#[derive(Debug, Error)]
pub enum WriteUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Query parse error: {0}")]
    Parse(#[from] QueryParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Common error type for index management use cases
#[derive(Debug, Error)]
pub enum IndexUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Query parse error: {0}")]
    Parse(#[from] QueryParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
