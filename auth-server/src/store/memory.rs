use super::{DocumentStore, StoreError};
use crate::path;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-process document store evaluating the same selector grammar the
/// external store is consumed with: field equality (dot-paths allowed),
/// `$or` over sub-selectors, and `$gt`/`$gte`/`$lt` comparisons.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_selector(document: &Value, select: &Value) -> bool {
    let Some(conditions) = select.as_object() else {
        return false;
    };

    conditions.iter().all(|(field, expected)| {
        if field == "$or" {
            return expected
                .as_array()
                .is_some_and(|branches| branches.iter().any(|b| matches_selector(document, b)));
        }

        let actual = path::resolve(document, field);
        match expected {
            Value::Object(ops) if ops.keys().all(|k| k.starts_with('$')) && !ops.is_empty() => {
                let Some(actual) = actual else { return false };
                ops.iter().all(|(op, bound)| compare(actual, op, bound))
            }
            _ => actual == Some(expected),
        }
    })
}

fn compare(actual: &Value, op: &str, bound: &Value) -> bool {
    let (Some(actual), Some(bound)) = (actual.as_f64(), bound.as_f64()) else {
        return false;
    };
    match op {
        "$gt" => actual > bound,
        "$gte" => actual >= bound,
        "$lt" => actual < bound,
        _ => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, documents: Vec<Value>) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(())
    }

    async fn read(&self, collection: &str, select: &Value) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().expect("store lock poisoned");
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_selector(doc, select))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        collection: &str,
        select: &Value,
        document: &Value,
    ) -> Result<(), StoreError> {
        let Some(patch) = document.as_object() else {
            return Ok(());
        };
        let mut collections = self.collections.lock().expect("store lock poisoned");
        if let Some(docs) = collections.get_mut(collection) {
            for doc in docs.iter_mut().filter(|doc| matches_selector(doc, select)) {
                if let Some(target) = doc.as_object_mut() {
                    for (key, value) in patch {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, select: &Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| !matches_selector(doc, select));
        }
        Ok(())
    }
}
