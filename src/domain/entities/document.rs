use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::DocumentId;

/// Document aggregate root - a schema-flexible JSON object with a
/// store-assigned identity and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    body: Map<String, Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document. Ids are store-assigned; a body carrying the
    /// reserved `_id` field is rejected.
    pub fn new(body: Map<String, Value>) -> Result<Self, DomainError> {
        if body.contains_key("_id") {
            return Err(DomainError::InvalidDocumentId(
                "The _id field is assigned by the store and cannot be supplied".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: DocumentId::new(),
            body,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct from stored state
    pub fn reconstruct(
        id: DocumentId,
        body: Map<String, Value>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            body,
            created_at,
            updated_at,
        }
    }

    /// Replace the body after an update, bumping `updated_at`
    pub fn replace_body(&mut self, body: Map<String, Value>) {
        self.body = body;
        self.updated_at = Utc::now();
    }

    /// Render as a plain JSON document with `_id` as the first field,
    /// the shape filters, sorts and pipelines operate on
    pub fn to_value(&self) -> Value {
        let mut rendered = Map::with_capacity(self.body.len() + 1);
        rendered.insert("_id".to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.body {
            rendered.insert(key.clone(), value.clone());
        }
        Value::Object(rendered)
    }

    // Getters
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
