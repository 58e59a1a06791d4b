//! In-memory record table backed by one JSON file
//!
//! Each repository wraps a `Table` and adds its own queries. The table
//! guards its map with an `RwLock`; a poisoned lock surfaces as a storage
//! error.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{SplitbookError, SplitbookResult};

use super::file_io::{read_json, write_json_atomic};

/// A persisted entity with a stable key
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash;

    fn record_id(&self) -> Self::Id;
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
struct TableFile<T: Record> {
    #[serde(default)]
    records: Vec<T>,
}

impl<T: Record> Default for TableFile<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

pub struct Table<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Table<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub(super) fn read(&self) -> SplitbookResult<RwLockReadGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .read()
            .map_err(|e| SplitbookError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    pub(super) fn write(&self) -> SplitbookResult<RwLockWriteGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .write()
            .map_err(|e| SplitbookError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory contents with the file's
    pub fn load(&self) -> SplitbookResult<()> {
        let file: TableFile<T> = read_json(&self.path)?;
        let mut data = self.write()?;
        data.clear();
        data.extend(file.records.into_iter().map(|r| (r.record_id(), r)));
        Ok(())
    }

    /// Write all records, ordered by `order`, to the file
    pub fn save_sorted<F>(&self, order: F) -> SplitbookResult<()>
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let file = TableFile {
            records: self.sorted(order)?,
        };
        write_json_atomic(&self.path, &file)
    }

    pub fn get(&self, id: T::Id) -> SplitbookResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records sorted with `order`
    pub fn sorted<F>(&self, order: F) -> SplitbookResult<Vec<T>>
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let mut records: Vec<T> = self.read()?.values().cloned().collect();
        records.sort_by(order);
        Ok(records)
    }

    /// First record matching `pred`, in no particular order
    pub fn find<P>(&self, mut pred: P) -> SplitbookResult<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.read()?.values().find(|r| pred(r)).cloned())
    }

    pub fn upsert(&self, record: T) -> SplitbookResult<()> {
        self.write()?.insert(record.record_id(), record);
        Ok(())
    }

    pub fn delete(&self, id: T::Id) -> SplitbookResult<Option<T>> {
        Ok(self.write()?.remove(&id))
    }

    pub fn count(&self) -> SplitbookResult<usize> {
        Ok(self.read()?.len())
    }
}
