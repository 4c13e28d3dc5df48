//! CRUD boundary - the opaque object-service collaborator.
//!
//! Default hooks talk to persistence through [`ObjectService`] only: list,
//! create, update, delete over JSON records keyed by a resource name. The
//! transport behind the trait (HTTP backend, file store) is not this crate's
//! concern; [`MemoryObjectService`] is an in-process implementation with the
//! backend's mock-database semantics, enough for demos and tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Error produced at the object-service boundary.
///
/// Hooks catch these, log them, and leave the store in last-good state.
#[derive(Debug, Error)]
pub enum CrudError {
    #[error("unknown object type {0:?}")]
    UnknownObjectType(String),
    #[error("no {object_type} record with id {id}")]
    NotFound { object_type: String, id: Value },
    #[error("object service transport failed: {0}")]
    Transport(String),
}

/// The CRUD collaborator consumed by default hook implementations.
pub trait ObjectService {
    /// All records of a resource. Unknown resources list as empty.
    fn list(&self, object_type: &str) -> Result<Vec<Value>, CrudError>;
    /// Store a new record, assigning an `id`, and return it.
    fn create(&self, object_type: &str, item: Value) -> Result<Value, CrudError>;
    /// Shallow-merge `patch` into the record with `id` and return the result.
    fn update(&self, object_type: &str, id: &Value, patch: Value) -> Result<Value, CrudError>;
    /// Remove and return the record with `id`.
    fn delete(&self, object_type: &str, id: &Value) -> Result<Value, CrudError>;
}

// =============================================================================
// In-Memory Service
// =============================================================================

/// In-process [`ObjectService`] over a map of resource name to records.
///
/// Ids are integers assigned as `last id + 1` per resource; updates merge at
/// the top key level, mirroring the demo backend this replaces.
#[derive(Default)]
pub struct MemoryObjectService {
    records: RefCell<HashMap<String, Vec<Value>>>,
}

impl MemoryObjectService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records of one resource, e.g. to seed demo data.
    pub fn seed(&self, object_type: impl Into<String>, items: Vec<Value>) {
        self.records.borrow_mut().insert(object_type.into(), items);
    }
}

impl ObjectService for MemoryObjectService {
    fn list(&self, object_type: &str) -> Result<Vec<Value>, CrudError> {
        Ok(self
            .records
            .borrow()
            .get(object_type)
            .cloned()
            .unwrap_or_default())
    }

    fn create(&self, object_type: &str, mut item: Value) -> Result<Value, CrudError> {
        let mut records = self.records.borrow_mut();
        let objects = records.entry(object_type.to_string()).or_default();

        let next_id = objects
            .last()
            .and_then(|last| last.get("id"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
            + 1;
        if let Some(map) = item.as_object_mut() {
            map.insert("id".into(), next_id.into());
        }
        objects.push(item.clone());
        Ok(item)
    }

    fn update(&self, object_type: &str, id: &Value, patch: Value) -> Result<Value, CrudError> {
        let mut records = self.records.borrow_mut();
        let objects = records
            .get_mut(object_type)
            .ok_or_else(|| CrudError::UnknownObjectType(object_type.to_string()))?;

        let record = objects
            .iter_mut()
            .find(|record| record.get("id") == Some(id))
            .ok_or_else(|| CrudError::NotFound {
                object_type: object_type.to_string(),
                id: id.clone(),
            })?;

        if let (Some(target), Some(source)) = (record.as_object_mut(), patch.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    fn delete(&self, object_type: &str, id: &Value) -> Result<Value, CrudError> {
        let mut records = self.records.borrow_mut();
        let objects = records
            .get_mut(object_type)
            .ok_or_else(|| CrudError::UnknownObjectType(object_type.to_string()))?;

        let position = objects
            .iter()
            .position(|record| record.get("id") == Some(id))
            .ok_or_else(|| CrudError::NotFound {
                object_type: object_type.to_string(),
                id: id.clone(),
            })?;
        Ok(objects.remove(position))
    }
}

// =============================================================================
// Tests
// =============================================================================
