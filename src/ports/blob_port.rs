//! Key-value blob storage port.
//!
//! The ledger lives in a single named blob; implementations only need whole
//! value reads and writes.

use crate::domain::error::JournalError;

pub trait BlobPort {
    /// Stored value for `key`, or `None` when nothing has been written yet.
    fn get(&self, key: &str) -> Result<Option<String>, JournalError>;

    /// Replace the value under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), JournalError>;
}

impl<B: BlobPort + ?Sized> BlobPort for &B {
    fn get(&self, key: &str) -> Result<Option<String>, JournalError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), JournalError> {
        (**self).put(key, value)
    }
}

impl<B: BlobPort + ?Sized> BlobPort for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>, JournalError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), JournalError> {
        (**self).put(key, value)
    }
}
