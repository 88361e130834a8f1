use std::sync::Arc;

use crate::application::dto::{CreateIndexRequest, CreateIndexResponse};
use crate::application::errors::IndexUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection_for_index;
use crate::domain::value_objects::IndexSpec;
use crate::query::SortSpec;

/// Use case: Declare and build an index
pub struct CreateIndexUseCase {
    store: Arc<dyn DocumentStore>,
}

impl CreateIndexUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute createIndex
    pub async fn execute(
        &self,
        request: CreateIndexRequest,
    ) -> Result<CreateIndexResponse, IndexUseCaseError> {
        // 1. Parse and validate; the keys document has the same shape as
        // a sort document (field -> 1/-1, in declaration order)
        let collection = validate_collection_for_index(&request.collection)?;
        let keys = SortSpec::parse(&request.keys)?;
        let spec = IndexSpec::new(keys.keys().to_vec(), request.unique)?;

        // 2. Build through the store
        let description = self.store.create_index(&collection, &spec).await?;

        tracing::info!(
            collection = %collection,
            index = %description.name,
            unique = spec.is_unique(),
            "Index created"
        );

        Ok(description.into())
    }
}
