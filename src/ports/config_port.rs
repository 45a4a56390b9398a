//! Configuration access port trait.

use crate::domain::error::JournalError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// Like [`get_string`](Self::get_string) but a missing or blank value is
    /// a [`JournalError::ConfigMissing`].
    fn require_string(&self, section: &str, key: &str) -> Result<String, JournalError> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| JournalError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
