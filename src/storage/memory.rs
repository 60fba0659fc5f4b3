//! In-memory repository
//!
//! Ordered map behind a `RwLock` with a monotonic identity counter.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::schema::Technology;

use super::errors::{StorageError, StorageResult};
use super::repository::TechnologyRepository;

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i64, Technology>,
    next_id: i64,
}

/// Volatile technology store, used by tests and the `memory` backend.
#[derive(Debug)]
pub struct InMemoryTechnologyRepository {
    table: RwLock<Table>,
}

impl InMemoryTechnologyRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTechnologyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnologyRepository for InMemoryTechnologyRepository {
    fn save(&self, mut technology: Technology) -> StorageResult<Technology> {
        let mut table = self.table.write().map_err(|_| StorageError::lock_poisoned())?;

        // an id with no stored row is treated like no id at all
        let id = match technology.id {
            Some(id) if table.rows.contains_key(&id) => id,
            _ => {
                let id = table.next_id;
                table.next_id += 1;
                id
            }
        };

        technology.id = Some(id);
        table.rows.insert(id, technology.clone());
        Ok(technology)
    }

    fn find_by_id(&self, id: i64) -> StorageResult<Option<Technology>> {
        let table = self.table.read().map_err(|_| StorageError::lock_poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }

    fn find_all(&self) -> StorageResult<Vec<Technology>> {
        let table = self.table.read().map_err(|_| StorageError::lock_poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    fn delete_by_id(&self, id: i64) -> StorageResult<()> {
        let mut table = self.table.write().map_err(|_| StorageError::lock_poisoned())?;
        table.rows.remove(&id);
        Ok(())
    }
}
