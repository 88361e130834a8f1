use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::application::dto::{ExplainMode, ExplainReport, IndexDescription};
use crate::domain::entities::Document;
use crate::domain::value_objects::{CollectionName, DocumentId, IndexSpec};
use crate::query::{ExpressionError, Filter, FindQuery, Pipeline, UpdateDocument, UpdateError};
#[cfg(test)]
use mockall::{automock, predicate::*};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique key violation on index {index}: {key}")]
    UniqueKeyViolation { index: String, key: String },

    #[error("An index named {0} already exists with a different specification")]
    IndexConflict(String),

    #[error("Collection {collection} is full ({limit} documents)")]
    DocumentLimitExceeded { collection: String, limit: usize },

    #[error("Collection {collection} cannot hold more than {limit} indexes")]
    IndexLimitExceeded { collection: String, limit: usize },

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of an updateOne call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of a deleteOne call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// Port for document storage and query execution
///
/// Reads over a collection that does not exist return empty results,
/// the way the source shell behaves.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a batch of documents; the whole batch is validated against
    /// unique indexes before anything is stored
    async fn insert_many(
        &self,
        collection: &CollectionName,
        documents: Vec<Document>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// Matching documents, shaped by the query's sort/skip/limit
    async fn find(
        &self,
        collection: &CollectionName,
        query: &FindQuery,
    ) -> Result<Vec<Value>, StoreError>;

    /// Apply an update to the first match in insertion order; zero
    /// matches is a no-op
    async fn update_one(
        &self,
        collection: &CollectionName,
        filter: &Filter,
        update: &UpdateDocument,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Remove the first match in insertion order; zero matches is a no-op
    async fn delete_one(
        &self,
        collection: &CollectionName,
        filter: &Filter,
    ) -> Result<DeleteOutcome, StoreError>;

    /// Execute an aggregation pipeline over the collection
    async fn aggregate(
        &self,
        collection: &CollectionName,
        pipeline: &Pipeline,
    ) -> Result<Vec<Value>, StoreError>;

    /// Declare and synchronously build an index; idempotent for an
    /// identical spec
    async fn create_index(
        &self,
        collection: &CollectionName,
        spec: &IndexSpec,
    ) -> Result<IndexDescription, StoreError>;

    /// Indexes currently declared on the collection
    async fn list_indexes(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<IndexDescription>, StoreError>;

    /// Execution-plan metadata for a query; no side effects
    async fn explain(
        &self,
        collection: &CollectionName,
        query: &FindQuery,
        mode: ExplainMode,
    ) -> Result<ExplainReport, StoreError>;
}
