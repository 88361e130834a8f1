use std::sync::Arc;

use crate::application::dto::{ExplainMode, ExplainReport, ExplainRequest};
use crate::application::errors::QueryUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection;
use crate::query::{Filter, FindQuery};

/// Use case: Explain how a find would execute
pub struct ExplainQueryUseCase {
    store: Arc<dyn DocumentStore>,
}

impl ExplainQueryUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute explain
    pub async fn execute(
        &self,
        request: ExplainRequest,
    ) -> Result<ExplainReport, QueryUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection(&request.collection)?;

        let filter = match &request.filter {
            Some(doc) => Filter::parse(doc)?,
            None => Filter::empty(),
        };

        let mode = match request.mode.as_deref() {
            None => ExplainMode::QueryPlanner,
            Some(raw) => raw
                .parse()
                .map_err(QueryUseCaseError::InvalidRequest)?,
        };

        // 2. Ask the store for its plan
        let report = self
            .store
            .explain(&collection, &FindQuery::new(filter), mode)
            .await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AccessPath;
    use crate::application::ports::MockDocumentStore;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    fn planner_report(mode: ExplainMode) -> ExplainReport {
        ExplainReport {
            collection: "books".to_string(),
            mode,
            access_path: AccessPath::IndexScan {
                index_name: "title_1".to_string(),
            },
            execution_stats: None,
            executed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_explain_query_execution_stats_mode() {
        // Arrange
        let mut mock_store = MockDocumentStore::new();
        mock_store
            .expect_explain()
            .withf(|collection, _, mode| {
                collection.as_str() == "books" && *mode == ExplainMode::ExecutionStats
            })
            .times(1)
            .returning(|_, _, mode| Ok(planner_report(mode)));

        let use_case = ExplainQueryUseCase::new(Arc::new(mock_store));
        let request = ExplainRequest {
            collection: "books".to_string(),
            filter: Some(json!({"title": "1984"})),
            mode: Some("executionStats".to_string()),
        };

        // Act
        let result = use_case.execute(request).await;

        // Assert
        let report = result.unwrap();
        assert_eq!(report.mode, ExplainMode::ExecutionStats);
        assert!(matches!(report.access_path, AccessPath::IndexScan { .. }));
    }

    #[tokio::test]
    async fn test_explain_query_defaults_to_query_planner() {
        let mut mock_store = MockDocumentStore::new();
        mock_store
            .expect_explain()
            .withf(|_, _, mode| *mode == ExplainMode::QueryPlanner)
            .times(1)
            .returning(|_, _, mode| Ok(planner_report(mode)));

        let use_case = ExplainQueryUseCase::new(Arc::new(mock_store));
        let result = use_case
            .execute(ExplainRequest {
                collection: "books".to_string(),
                filter: None,
                mode: None,
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_explain_query_rejects_unknown_mode() {
        let mock_store = MockDocumentStore::new();
        let use_case = ExplainQueryUseCase::new(Arc::new(mock_store));

        let result = use_case
            .execute(ExplainRequest {
                collection: "books".to_string(),
                filter: None,
                mode: Some("allPlansExecution".to_string()),
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            QueryUseCaseError::InvalidRequest(_)
        ));
    }
}
