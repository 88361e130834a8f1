use std::sync::Arc;

use crate::application::dto::{DeleteRequest, DeleteResponse};
use crate::application::errors::WriteUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection_for_write;
use crate::query::Filter;

/// Use case: Delete the first matching document
pub struct DeleteDocumentUseCase {
    store: Arc<dyn DocumentStore>,
}

impl DeleteDocumentUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute deleteOne
    pub async fn execute(
        &self,
        request: DeleteRequest,
    ) -> Result<DeleteResponse, WriteUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection_for_write(&request.collection)?;
        let filter = Filter::parse(&request.filter)?;

        // 2. Delete through the store
        let outcome = self.store.delete_one(&collection, &filter).await?;

        tracing::debug!(
            collection = %collection,
            deleted = outcome.deleted_count,
            "deleteOne"
        );

        Ok(DeleteResponse {
            deleted_count: outcome.deleted_count,
        })
    }
}
