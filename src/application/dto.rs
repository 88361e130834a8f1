use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::IndexSpec;

/// DTO for insert request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRequest {
    pub collection: String,
    pub documents: Vec<Value>,
}

/// DTO for insert response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertResponse {
    pub inserted_ids: Vec<String>,
    pub inserted_count: usize,
}

/// DTO for find request; filter, projection and sort carry the raw JSON
/// query documents
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FindRequest {
    pub collection: String,
    pub filter: Option<Value>,
    pub projection: Option<Value>,
    pub sort: Option<Value>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

/// DTO for find response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindResponse {
    pub documents: Vec<Value>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

/// DTO for updateOne request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub collection: String,
    pub filter: Value,
    pub update: Value,
}

/// DTO for updateOne response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// DTO for deleteOne request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub collection: String,
    pub filter: Value,
}

/// DTO for deleteOne response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// DTO for aggregate request; the pipeline is the raw JSON stage array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub collection: String,
    pub pipeline: Value,
}

/// DTO for aggregate response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub documents: Vec<Value>,
}

/// DTO for createIndex request; keys is the raw field-to-direction document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndexRequest {
    pub collection: String,
    pub keys: Value,
    #[serde(default)]
    pub unique: bool,
}

/// DTO for createIndex response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndexResponse {
    pub name: String,
    pub keys: Value,
    pub unique: bool,
}

/// DTO for explain request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub collection: String,
    pub filter: Option<Value>,
    /// "queryPlanner" or "executionStats"
    pub mode: Option<String>,
}

/// Explain verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExplainMode {
    QueryPlanner,
    ExecutionStats,
}

impl std::str::FromStr for ExplainMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queryPlanner" => Ok(ExplainMode::QueryPlanner),
            "executionStats" => Ok(ExplainMode::ExecutionStats),
            other => Err(format!("Invalid explain mode: {}", other)),
        }
    }
}

/// Access path the store chose for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage")]
pub enum AccessPath {
    #[serde(rename = "COLLSCAN")]
    CollectionScan,
    #[serde(rename = "IXSCAN")]
    IndexScan { index_name: String },
}

/// Execution counters, reported in executionStats mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub documents_examined: u64,
    pub keys_examined: u64,
    pub documents_returned: u64,
    pub execution_time_ms: f64,
}

/// Diagnostic execution-plan metadata for a query; inspection only,
/// no side effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainReport {
    pub collection: String,
    pub mode: ExplainMode,
    pub access_path: AccessPath,
    pub execution_stats: Option<ExecutionStats>,
    pub executed_at: DateTime<Utc>,
}

/// Index metadata returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub spec: IndexSpec,
}

impl From<IndexDescription> for CreateIndexResponse {
    fn from(description: IndexDescription) -> Self {
        let keys = description
            .spec
            .keys()
            .iter()
            .map(|(path, order)| (path.to_string(), Value::from(order.as_signum())))
            .collect::<serde_json::Map<String, Value>>();

        Self {
            name: description.name,
            keys: Value::Object(keys),
            unique: description.spec.is_unique(),
        }
    }
}
