use std::collections::HashMap;

use serde_json::Value;

use crate::application::dto::AccessPath;
use crate::application::ports::{DeleteOutcome, StoreError, UpdateOutcome};
use crate::config::Config;
use crate::domain::entities::Document;
use crate::domain::value_objects::{CollectionName, DocumentId, IndexSpec};
use crate::infrastructure::memory::index::{Index, IndexKey};
use crate::query::{Filter, FindQuery, UpdateDocument};

struct Slot {
    seq: u64,
    document: Document,
}

/// Counters gathered while executing a find
pub(crate) struct ExecutionCounters {
    pub(crate) access_path: AccessPath,
    pub(crate) documents_examined: u64,
    pub(crate) keys_examined: u64,
    pub(crate) documents_returned: u64,
}

/// All state for one collection: documents in insertion order plus
/// secondary indexes. Callers hold the collection lock.
pub(crate) struct CollectionData {
    name: CollectionName,
    next_seq: u64,
    slots: HashMap<DocumentId, Slot>,
    indexes: Vec<Index>,
}

impl CollectionData {
    pub(crate) fn new(name: CollectionName) -> Self {
        Self {
            name,
            next_seq: 0,
            slots: HashMap::new(),
            indexes: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Documents in insertion order, rendered with `_id`.
    pub(crate) fn rendered_in_insertion_order(&self) -> Vec<Value> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
            .iter()
            .map(|slot| slot.document.to_value())
            .collect()
    }

    /// Insert a batch atomically: the whole batch is validated against
    /// capacity and unique indexes before anything is stored.
    pub(crate) fn insert_batch(
        &mut self,
        documents: Vec<Document>,
        config: &Config,
    ) -> Result<Vec<DocumentId>, StoreError> {
        if self.slots.len() + documents.len() > config.max_documents_per_collection {
            return Err(StoreError::DocumentLimitExceeded {
                collection: self.name.to_string(),
                limit: config.max_documents_per_collection,
            });
        }

        // Validate unique constraints, including collisions inside the batch
        let rendered: Vec<Value> = documents.iter().map(Document::to_value).collect();
        for index in &self.indexes {
            let mut staged: Vec<IndexKey> = Vec::new();
            for document in &rendered {
                let key = index.key_for(document);
                if index.violates_unique(&key, None)
                    || (index.spec().is_unique() && staged.contains(&key))
                {
                    return Err(index.unique_violation_error(&key));
                }
                staged.push(key);
            }
        }

        let mut inserted_ids = Vec::with_capacity(documents.len());
        for (document, rendered) in documents.into_iter().zip(rendered) {
            let id = *document.id();
            for index in &mut self.indexes {
                let key = index.key_for(&rendered);
                index.add(key, id);
            }
            self.slots.insert(
                id,
                Slot {
                    seq: self.next_seq,
                    document,
                },
            );
            self.next_seq += 1;
            inserted_ids.push(id);
        }

        Ok(inserted_ids)
    }

    /// Execute a find, reporting which access path ran and what it touched.
    pub(crate) fn execute_find(
        &self,
        query: &FindQuery,
    ) -> Result<(Vec<Value>, ExecutionCounters), StoreError> {
        let filter = query.filter();
        let mut keys_examined = 0u64;

        // Access path: the first index whose leading key carries a
        // usable clause; everything else is a full scan
        let selected = self.select_index(filter);

        let (mut matches, documents_examined, access_path) = match selected {
            Some((index, clause_index)) => {
                let predicate = filter.clauses()[clause_index].predicate();
                let scan = index.scan(predicate);
                keys_examined = scan.keys_examined;

                let mut fetched: Vec<&Slot> = scan
                    .candidates
                    .iter()
                    .filter_map(|id| self.slots.get(id))
                    .collect();
                // Candidates come back in index order; results keep the
                // store's insertion ordering
                fetched.sort_by_key(|slot| slot.seq);

                let examined = fetched.len() as u64;
                let matches: Vec<Value> = fetched
                    .iter()
                    .map(|slot| slot.document.to_value())
                    .filter(|doc| filter.matches(doc))
                    .collect();

                (
                    matches,
                    examined,
                    AccessPath::IndexScan {
                        index_name: index.name().to_string(),
                    },
                )
            }
            None => {
                let rendered = self.rendered_in_insertion_order();
                let examined = rendered.len() as u64;
                let matches: Vec<Value> = rendered
                    .into_iter()
                    .filter(|doc| filter.matches(doc))
                    .collect();

                (matches, examined, AccessPath::CollectionScan)
            }
        };

        if let Some(sort) = query.sort() {
            sort.sort(&mut matches);
        }

        let results: Vec<Value> = matches
            .into_iter()
            .skip(query.skip())
            .take(query.limit().unwrap_or(usize::MAX))
            .collect();

        let counters = ExecutionCounters {
            access_path,
            documents_examined,
            keys_examined,
            documents_returned: results.len() as u64,
        };

        Ok((results, counters))
    }

    /// Apply an update to the first match in insertion order.
    pub(crate) fn update_one(
        &mut self,
        filter: &Filter,
        update: &UpdateDocument,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(id) = self.first_match(filter) else {
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            });
        };

        let slot = self
            .slots
            .get(&id)
            .ok_or_else(|| StoreError::Internal("matched document vanished".to_string()))?;

        let old_rendered = slot.document.to_value();
        let mut body = slot.document.body().clone();
        let modified = update.apply(&mut body)?;

        if !modified {
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: 0,
            });
        }

        // Validate unique constraints against the post-update rendering
        // before committing anything
        let new_rendered = {
            let mut preview = serde_json::Map::with_capacity(body.len() + 1);
            preview.insert("_id".to_string(), Value::String(id.to_string()));
            for (key, value) in &body {
                preview.insert(key.clone(), value.clone());
            }
            Value::Object(preview)
        };

        for index in &self.indexes {
            let new_key = index.key_for(&new_rendered);
            if index.violates_unique(&new_key, Some(&id)) {
                return Err(index.unique_violation_error(&new_key));
            }
        }

        for index in &mut self.indexes {
            let old_key = index.key_for(&old_rendered);
            let new_key = index.key_for(&new_rendered);
            index.remove(&old_key, &id);
            index.add(new_key, id);
        }

        let slot = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| StoreError::Internal("matched document vanished".to_string()))?;
        slot.document.replace_body(body);

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: 1,
        })
    }

    /// Remove the first match in insertion order.
    pub(crate) fn delete_one(&mut self, filter: &Filter) -> Result<DeleteOutcome, StoreError> {
        let Some(id) = self.first_match(filter) else {
            return Ok(DeleteOutcome { deleted_count: 0 });
        };

        if let Some(slot) = self.slots.remove(&id) {
            let rendered = slot.document.to_value();
            for index in &mut self.indexes {
                let key = index.key_for(&rendered);
                index.remove(&key, &id);
            }
        }

        Ok(DeleteOutcome { deleted_count: 1 })
    }

    /// Declare an index, building it synchronously over existing
    /// documents. Identical re-declarations are idempotent.
    pub(crate) fn create_index(
        &mut self,
        spec: &IndexSpec,
        config: &Config,
    ) -> Result<String, StoreError> {
        let name = spec.derived_name();

        if let Some(existing) = self.indexes.iter().find(|i| i.name() == name) {
            if existing.spec() == spec {
                return Ok(name);
            }
            return Err(StoreError::IndexConflict(name));
        }

        if self.indexes.len() >= config.max_indexes_per_collection {
            return Err(StoreError::IndexLimitExceeded {
                collection: self.name.to_string(),
                limit: config.max_indexes_per_collection,
            });
        }

        let mut index = Index::new(spec.clone());

        // Backfill, validating unique constraints before registration
        let mut slots: Vec<(&DocumentId, &Slot)> = self.slots.iter().collect();
        slots.sort_by_key(|(_, slot)| slot.seq);
        for (id, slot) in slots {
            let rendered = slot.document.to_value();
            let key = index.key_for(&rendered);
            if index.violates_unique(&key, None) {
                return Err(index.unique_violation_error(&key));
            }
            index.add(key, *id);
        }

        self.indexes.push(index);
        Ok(name)
    }

    pub(crate) fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter()
    }

    fn first_match(&self, filter: &Filter) -> Option<DocumentId> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
            .iter()
            .find(|slot| filter.matches(&slot.document.to_value()))
            .map(|slot| *slot.document.id())
    }

    /// First index whose leading key field carries an index-usable clause.
    fn select_index(&self, filter: &Filter) -> Option<(&Index, usize)> {
        for index in &self.indexes {
            let leading = index.spec().leading_key();
            let usable = filter
                .clauses()
                .iter()
                .position(|clause| clause.path() == leading && index.supports(clause.predicate()));
            if let Some(clause_index) = usable {
                return Some((index, clause_index));
            }
        }
        None
    }
}
