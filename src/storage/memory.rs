//! In-memory day storage for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::Result;
use crate::storage::DayStore;

/// In-memory day store for testing.
///
/// Thread-safe implementation using `RwLock<HashMap>`. Also counts writes so
/// tests can assert that read-only commands leave storage untouched.
#[derive(Debug, Default)]
pub struct MemoryDayStore {
    documents: RwLock<HashMap<NaiveDate, String>>,
    writes: RwLock<usize>,
}

impl MemoryDayStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with documents.
    pub fn with_documents(documents: impl IntoIterator<Item = (NaiveDate, String)>) -> Self {
        Self {
            documents: RwLock::new(documents.into_iter().collect()),
            writes: RwLock::new(0),
        }
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }
}

impl DayStore for MemoryDayStore {
    fn read(&self, date: NaiveDate) -> Result<String> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(&date).cloned().unwrap_or_default())
    }

    fn write(&self, date: NaiveDate, content: &str) -> Result<()> {
        self.documents
            .write()
            .unwrap()
            .insert(date, content.to_string());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn location(&self, date: NaiveDate) -> String {
        format!("memory://{}", date.format("%Y-%m-%d"))
    }
}
