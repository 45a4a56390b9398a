//! In-process blob store. Contents vanish with the process.

use crate::domain::error::JournalError;
use crate::ports::blob_port::BlobPort;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryBlobAdapter {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryBlobAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. a legacy or corrupted ledger.
    pub fn with_blob(self, key: &str, value: &str) -> Self {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobPort for MemoryBlobAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, JournalError> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), JournalError> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
