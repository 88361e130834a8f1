use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    #[error("Invalid field path: {0}")]
    InvalidFieldPath(String),

    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Invalid index specification: {0}")]
    InvalidIndexSpec(String),

    #[error("Document body must be a JSON object, got {0}")]
    NotAnObject(String),
}
