use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::application::dto::{ExplainMode, ExplainReport, ExecutionStats, IndexDescription};
use crate::application::ports::{
    DeleteOutcome, DocumentStore, StoreError, UpdateOutcome,
};
use crate::config::Config;
use crate::domain::entities::Document;
use crate::domain::value_objects::{CollectionName, DocumentId, IndexSpec};
use crate::infrastructure::memory::collection::CollectionData;
use crate::query::{Filter, FindQuery, Pipeline, UpdateDocument};

/// In-memory document store: a concurrent map of collections, each behind
/// its own read-write lock. Statements are individually atomic; there are
/// no cross-statement semantics.
pub struct MemoryDocumentStore {
    config: Config,
    collections: DashMap<CollectionName, Arc<RwLock<CollectionData>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            collections: DashMap::new(),
        }
    }

    /// Collections spring into existence on first write
    fn collection_for_write(&self, name: &CollectionName) -> Arc<RwLock<CollectionData>> {
        self.collections
            .entry(name.clone())
            .or_insert_with(|| Arc::new(RwLock::new(CollectionData::new(name.clone()))))
            .clone()
    }

    /// Reads over a missing collection see nothing rather than erroring
    fn collection_for_read(&self, name: &CollectionName) -> Option<Arc<RwLock<CollectionData>>> {
        self.collections.get(name).map(|entry| entry.clone())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_many(
        &self,
        collection: &CollectionName,
        documents: Vec<Document>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let data = self.collection_for_write(collection);
        let mut data = data.write();

        let inserted = data.insert_batch(documents, &self.config)?;
        tracing::debug!(
            collection = %collection,
            inserted = inserted.len(),
            total = data.len(),
            "insert_many"
        );
        Ok(inserted)
    }

    async fn find(
        &self,
        collection: &CollectionName,
        query: &FindQuery,
    ) -> Result<Vec<Value>, StoreError> {
        let Some(data) = self.collection_for_read(collection) else {
            return Ok(Vec::new());
        };
        let data = data.read();

        let (results, counters) = data.execute_find(query)?;
        tracing::debug!(
            collection = %collection,
            access_path = ?counters.access_path,
            examined = counters.documents_examined,
            returned = counters.documents_returned,
            "find"
        );
        Ok(results)
    }

    async fn update_one(
        &self,
        collection: &CollectionName,
        filter: &Filter,
        update: &UpdateDocument,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(data) = self.collection_for_read(collection) else {
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            });
        };
        let mut data = data.write();

        let outcome = data.update_one(filter, update);
        if let Err(ref error) = outcome {
            tracing::error!(collection = %collection, %error, "update_one failed");
        }
        outcome
    }

    async fn delete_one(
        &self,
        collection: &CollectionName,
        filter: &Filter,
    ) -> Result<DeleteOutcome, StoreError> {
        let Some(data) = self.collection_for_read(collection) else {
            return Ok(DeleteOutcome { deleted_count: 0 });
        };
        let mut data = data.write();

        data.delete_one(filter)
    }

    async fn aggregate(
        &self,
        collection: &CollectionName,
        pipeline: &Pipeline,
    ) -> Result<Vec<Value>, StoreError> {
        let Some(data) = self.collection_for_read(collection) else {
            // A pipeline over nothing yields nothing
            return Ok(Vec::new());
        };
        let data = data.read();

        let input = data.rendered_in_insertion_order();
        let results = pipeline.execute(input)?;
        tracing::debug!(
            collection = %collection,
            stages = pipeline.len(),
            results = results.len(),
            "aggregate"
        );
        Ok(results)
    }

    async fn create_index(
        &self,
        collection: &CollectionName,
        spec: &IndexSpec,
    ) -> Result<IndexDescription, StoreError> {
        let data = self.collection_for_write(collection);
        let mut data = data.write();

        let name = data.create_index(spec, &self.config)?;
        tracing::info!(collection = %collection, index = %name, "create_index");

        Ok(IndexDescription {
            name,
            spec: spec.clone(),
        })
    }

    async fn list_indexes(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<IndexDescription>, StoreError> {
        let Some(data) = self.collection_for_read(collection) else {
            return Ok(Vec::new());
        };
        let data = data.read();

        Ok(data
            .indexes()
            .map(|index| IndexDescription {
                name: index.name().to_string(),
                spec: index.spec().clone(),
            })
            .collect())
    }

    async fn explain(
        &self,
        collection: &CollectionName,
        query: &FindQuery,
        mode: ExplainMode,
    ) -> Result<ExplainReport, StoreError> {
        let started = Instant::now();

        let counters = match self.collection_for_read(collection) {
            Some(data) => {
                let data = data.read();
                let (_, counters) = data.execute_find(query)?;
                counters
            }
            None => crate::infrastructure::memory::collection::ExecutionCounters {
                access_path: crate::application::dto::AccessPath::CollectionScan,
                documents_examined: 0,
                keys_examined: 0,
                documents_returned: 0,
            },
        };

        let execution_stats = match mode {
            ExplainMode::QueryPlanner => None,
            ExplainMode::ExecutionStats => Some(ExecutionStats {
                documents_examined: counters.documents_examined,
                keys_examined: counters.keys_examined,
                documents_returned: counters.documents_returned,
                execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            }),
        };

        Ok(ExplainReport {
            collection: collection.to_string(),
            mode,
            access_path: counters.access_path,
            execution_stats,
            executed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AccessPath;
    use crate::domain::value_objects::{FieldPath, SortOrder};
    use crate::query::SortSpec;
    use serde_json::json;
    use std::str::FromStr;

    fn books() -> CollectionName {
        CollectionName::from_str("books").unwrap()
    }

    fn doc(value: serde_json::Value) -> Document {
        Document::new(value.as_object().unwrap().clone()).unwrap()
    }

    async fn seeded_store() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        store
            .insert_many(
                &books(),
                vec![
                    doc(json!({"title": "1984", "author": "George Orwell",
                               "genre": "Fiction", "published_year": 1949,
                               "price": 9.99, "in_stock": true})),
                    doc(json!({"title": "The Alchemist", "author": "Paulo Coelho",
                               "genre": "Fiction", "published_year": 1988,
                               "price": 12.5, "in_stock": true})),
                    doc(json!({"title": "Moby Dick", "author": "Herman Melville",
                               "genre": "Adventure", "published_year": 1851,
                               "price": 11.0, "in_stock": false})),
                ],
            )
            .await
            .unwrap();
        store
    }

    fn filter(value: serde_json::Value) -> Filter {
        Filter::parse(&value).unwrap()
    }

    #[tokio::test]
    async fn test_store_find_on_missing_collection_is_empty() {
        let store = MemoryDocumentStore::new();

        let results = store
            .find(&books(), &FindQuery::new(Filter::empty()))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_store_insert_then_find_by_genre() {
        let store = seeded_store().await;

        let results = store
            .find(&books(), &FindQuery::new(filter(json!({"genre": "Fiction"}))))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_store_update_then_read_back() {
        let store = seeded_store().await;

        let outcome = store
            .update_one(
                &books(),
                &filter(json!({"title": "The Alchemist"})),
                &UpdateDocument::parse(&json!({"$set": {"price": 15.99}})).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.modified_count, 1);

        let results = store
            .find(
                &books(),
                &FindQuery::new(filter(json!({"title": "The Alchemist"}))),
            )
            .await
            .unwrap();
        assert_eq!(results[0].get("price").unwrap(), &json!(15.99));
    }

    #[tokio::test]
    async fn test_store_delete_then_find_is_empty() {
        let store = seeded_store().await;

        let outcome = store
            .delete_one(&books(), &filter(json!({"title": "Moby Dick"})))
            .await
            .unwrap();
        assert_eq!(outcome.deleted_count, 1);

        let results = store
            .find(
                &books(),
                &FindQuery::new(filter(json!({"title": "Moby Dick"}))),
            )
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_store_sorted_find_with_pagination() {
        let store = seeded_store().await;

        let query = FindQuery::new(Filter::empty())
            .with_sort(SortSpec::parse(&json!({"price": 1})).unwrap())
            .with_skip(1)
            .with_limit(1);
        let results = store.find(&books(), &query).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get("title").unwrap(), &json!("Moby Dick"));
    }

    #[tokio::test]
    async fn test_store_aggregate_missing_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        let pipeline =
            Pipeline::parse(&json!([{"$group": {"_id": "$genre", "n": {"$sum": 1}}}])).unwrap();

        let results = store.aggregate(&books(), &pipeline).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_store_explain_reports_index_scan_after_create_index() {
        let store = seeded_store().await;

        let spec = IndexSpec::new(
            vec![(FieldPath::from_str("title").unwrap(), SortOrder::Ascending)],
            false,
        )
        .unwrap();
        store.create_index(&books(), &spec).await.unwrap();

        let report = store
            .explain(
                &books(),
                &FindQuery::new(filter(json!({"title": "1984"}))),
                ExplainMode::ExecutionStats,
            )
            .await
            .unwrap();

        assert_eq!(
            report.access_path,
            AccessPath::IndexScan {
                index_name: "title_1".to_string()
            }
        );
        let stats = report.execution_stats.unwrap();
        assert_eq!(stats.documents_returned, 1);
        assert!(stats.documents_examined < 3, "index scan narrows the fetch");
    }

    #[tokio::test]
    async fn test_store_explain_query_planner_mode_has_no_stats() {
        let store = seeded_store().await;

        let report = store
            .explain(
                &books(),
                &FindQuery::new(filter(json!({"title": "1984"}))),
                ExplainMode::QueryPlanner,
            )
            .await
            .unwrap();

        assert_eq!(report.access_path, AccessPath::CollectionScan);
        assert!(report.execution_stats.is_none());
    }

    #[tokio::test]
    async fn test_store_list_indexes() {
        let store = seeded_store().await;
        assert!(store.list_indexes(&books()).await.unwrap().is_empty());

        let spec = IndexSpec::new(
            vec![
                (FieldPath::from_str("author").unwrap(), SortOrder::Ascending),
                (
                    FieldPath::from_str("published_year").unwrap(),
                    SortOrder::Descending,
                ),
            ],
            false,
        )
        .unwrap();
        store.create_index(&books(), &spec).await.unwrap();

        let indexes = store.list_indexes(&books()).await.unwrap();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].name, "author_1_published_year_-1");
    }

    #[tokio::test]
    async fn test_store_update_on_missing_collection_is_noop() {
        let store = MemoryDocumentStore::new();

        let outcome = store
            .update_one(
                &books(),
                &filter(json!({"title": "x"})),
                &UpdateDocument::parse(&json!({"$set": {"a": 1}})).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.matched_count, 0);
    }
}
