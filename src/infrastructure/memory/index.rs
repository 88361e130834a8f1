use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use serde_json::Value;

use crate::application::ports::StoreError;
use crate::domain::value_objects::{DocumentId, IndexSpec};
use crate::query::ordering::{compare_values, same_bracket};
use crate::query::Predicate;

/// Composite index key: one value per indexed field, missing fields
/// keyed as null. Ordering follows the store's value order per element.
#[derive(Debug, Clone)]
pub(crate) struct IndexKey(Vec<Value>);

impl IndexKey {
    pub(crate) fn for_document(spec: &IndexSpec, document: &Value) -> Self {
        Self(
            spec.keys()
                .iter()
                .map(|(path, _)| path.resolve(document).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }

    fn leading(&self) -> &Value {
        // Specs guarantee at least one key
        &self.0[0]
    }

    fn render(&self) -> String {
        Value::Array(self.0.clone()).to_string()
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let cmp = compare_values(a, b);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// One secondary index: ordered entries mapping composite keys to the
/// documents that carry them
#[derive(Debug)]
pub(crate) struct Index {
    name: String,
    spec: IndexSpec,
    entries: BTreeMap<IndexKey, Vec<DocumentId>>,
}

/// Result of probing an index for candidates
pub(crate) struct IndexScanResult {
    pub(crate) candidates: Vec<DocumentId>,
    pub(crate) keys_examined: u64,
}

impl Index {
    pub(crate) fn new(spec: IndexSpec) -> Self {
        Self {
            name: spec.derived_name(),
            spec,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    pub(crate) fn key_for(&self, document: &Value) -> IndexKey {
        IndexKey::for_document(&self.spec, document)
    }

    /// Whether adding `key` would violate a unique constraint.
    /// `exclude` carves out the document being rewritten in place.
    pub(crate) fn violates_unique(&self, key: &IndexKey, exclude: Option<&DocumentId>) -> bool {
        if !self.spec.is_unique() {
            return false;
        }

        match self.entries.get(key) {
            None => false,
            Some(ids) => ids.iter().any(|id| Some(id) != exclude),
        }
    }

    pub(crate) fn unique_violation_error(&self, key: &IndexKey) -> StoreError {
        StoreError::UniqueKeyViolation {
            index: self.name.clone(),
            key: key.render(),
        }
    }

    pub(crate) fn add(&mut self, key: IndexKey, id: DocumentId) {
        self.entries.entry(key).or_default().push(id);
    }

    pub(crate) fn remove(&mut self, key: &IndexKey, id: &DocumentId) {
        if let Some(ids) = self.entries.get_mut(key) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    /// Whether a predicate on the index's leading field can drive a scan.
    pub(crate) fn supports(&self, predicate: &Predicate) -> bool {
        predicate.is_index_usable()
    }

    /// Probe for candidate documents whose leading key satisfies the
    /// predicate. The full filter is re-checked against the fetched
    /// documents by the caller.
    pub(crate) fn scan(&self, predicate: &Predicate) -> IndexScanResult {
        match predicate {
            Predicate::Eq(value) => self.scan_from(value, |first, bound| {
                compare_values(first, bound) == Ordering::Equal
            }),
            Predicate::Gte(value) => {
                self.scan_from(value, |first, bound| compare_values(first, bound).is_ge())
            }
            Predicate::Gt(value) => {
                self.scan_from(value, |first, bound| compare_values(first, bound).is_gt())
            }
            Predicate::Lt(value) => self.scan_below(value, |first, bound| {
                compare_values(first, bound).is_lt()
            }),
            Predicate::Lte(value) => self.scan_below(value, |first, bound| {
                compare_values(first, bound).is_le()
            }),
            Predicate::In(values) => {
                let mut candidates = Vec::new();
                let mut keys_examined = 0;
                for value in values {
                    let partial = self.scan_from(value, |first, bound| {
                        compare_values(first, bound) == Ordering::Equal
                    });
                    keys_examined += partial.keys_examined;
                    for id in partial.candidates {
                        if !candidates.contains(&id) {
                            candidates.push(id);
                        }
                    }
                }
                IndexScanResult {
                    candidates,
                    keys_examined,
                }
            }
            // $ne and $exists cannot bound an ordered scan
            Predicate::Ne(_) | Predicate::Exists(_) => IndexScanResult {
                candidates: Vec::new(),
                keys_examined: 0,
            },
        }
    }

    /// Forward scan starting at the bound's key prefix, stopping once the
    /// leading element leaves the bound's type bracket.
    fn scan_from(&self, bound: &Value, accept: fn(&Value, &Value) -> bool) -> IndexScanResult {
        let start = IndexKey(vec![bound.clone()]);
        let mut candidates = Vec::new();
        let mut keys_examined = 0;

        for (key, ids) in self
            .entries
            .range((Bound::Included(start), Bound::Unbounded))
        {
            keys_examined += 1;
            let first = key.leading();
            if !same_bracket(first, bound) {
                break;
            }
            if accept(first, bound) {
                candidates.extend(ids.iter().copied());
            } else if compare_values(first, bound) == Ordering::Greater && !accept(first, bound) {
                // Past an equality run; nothing further can match
                break;
            }
        }

        IndexScanResult {
            candidates,
            keys_examined,
        }
    }

    /// Forward scan from the start of the map, stopping at the bound.
    fn scan_below(&self, bound: &Value, accept: fn(&Value, &Value) -> bool) -> IndexScanResult {
        let mut candidates = Vec::new();
        let mut keys_examined = 0;

        for (key, ids) in &self.entries {
            keys_examined += 1;
            let first = key.leading();
            if compare_values(first, bound) == Ordering::Greater {
                break;
            }
            if same_bracket(first, bound) && accept(first, bound) {
                candidates.extend(ids.iter().copied());
            }
        }

        IndexScanResult {
            candidates,
            keys_examined,
        }
    }
}
