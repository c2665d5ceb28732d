//! In-process slot storage, used by tests and dry runs.

use std::cell::RefCell;
use std::collections::HashMap;

use super::KvStore;
use crate::error::DatabaseError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn kv_remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
