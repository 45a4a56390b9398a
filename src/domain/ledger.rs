//! Ledger store: sole owner of the trade collection.
//!
//! The whole ledger is one JSON array in one blob. Every mutation reads the
//! full collection, changes it and writes it back; concurrent writers are
//! last-writer-wins.

use super::error::JournalError;
use super::trade::{TradeDraft, TradeRecord};
use crate::ports::blob_port::BlobPort;
use chrono::Utc;
use tracing::{debug, info, warn};

pub const DEFAULT_LEDGER_KEY: &str = "trades";

pub struct LedgerStore<B: BlobPort> {
    port: B,
    key: String,
}

impl<B: BlobPort> LedgerStore<B> {
    pub fn new(port: B) -> Self {
        Self::with_key(port, DEFAULT_LEDGER_KEY)
    }

    pub fn with_key(port: B, key: impl Into<String>) -> Self {
        Self {
            port,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn port(&self) -> &B {
        &self.port
    }

    /// Current ledger. Missing, malformed or unreadable data is an empty ledger.
    pub fn load(&self) -> Vec<TradeRecord> {
        match self.port.get(&self.key) {
            Ok(Some(raw)) => decode(&self.key, &raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "ledger read failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Read step of a mutation. Malformed content is still an empty ledger,
    /// but a transport failure aborts so the stored ledger is not clobbered.
    fn load_for_update(&self) -> Result<Vec<TradeRecord>, JournalError> {
        match self.port.get(&self.key)? {
            Some(raw) => Ok(decode(&self.key, &raw)),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the persisted ledger with `records`.
    pub fn save(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        let blob = serde_json::to_string(records)?;
        self.port.put(&self.key, &blob)?;
        debug!(key = %self.key, count = records.len(), "ledger saved");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<TradeRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Append a new trade under a fresh id.
    pub fn insert(&self, draft: TradeDraft) -> Result<TradeRecord, JournalError> {
        draft.validate()?;
        let mut records = self.load_for_update()?;
        let id = next_id(&records, Utc::now().timestamp_millis());
        let record = TradeRecord::from_draft(id, draft);
        records.push(record.clone());
        self.save(&records)?;
        info!(id = %record.id, symbol = %record.symbol, result = record.result, "trade recorded");
        Ok(record)
    }

    /// Append several trades with a single write.
    pub fn import(&self, drafts: Vec<TradeDraft>) -> Result<Vec<TradeRecord>, JournalError> {
        for draft in &drafts {
            draft.validate()?;
        }
        let mut records = self.load_for_update()?;
        let now = Utc::now().timestamp_millis();
        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let record = TradeRecord::from_draft(next_id(&records, now), draft);
            records.push(record.clone());
            added.push(record);
        }
        if !added.is_empty() {
            self.save(&records)?;
            info!(count = added.len(), "trades imported");
        }
        Ok(added)
    }

    /// Swap the whole record with id `id`. Returns `false`, writing nothing,
    /// when there is no such record.
    pub fn replace(&self, id: &str, draft: TradeDraft) -> Result<bool, JournalError> {
        draft.validate()?;
        let mut records = self.load_for_update()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
            debug!(id, "replace: no such trade");
            return Ok(false);
        };
        *slot = TradeRecord::from_draft(id.to_string(), draft);
        self.save(&records)?;
        info!(id, "trade updated");
        Ok(true)
    }

    /// Overwrite the stored result with the formula value.
    pub fn recompute(&self, id: &str) -> Result<Option<TradeRecord>, JournalError> {
        let mut records = self.load_for_update()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
            debug!(id, "recompute: no such trade");
            return Ok(None);
        };
        slot.result = slot.formula_result();
        let updated = slot.clone();
        self.save(&records)?;
        info!(id, result = updated.result, "trade result recomputed");
        Ok(Some(updated))
    }

    /// Drop the record with id `id`. Returns `false` when it was not present.
    pub fn remove(&self, id: &str) -> Result<bool, JournalError> {
        let mut records = self.load_for_update()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            debug!(id, "remove: no such trade");
            return Ok(false);
        }
        self.save(&records)?;
        info!(id, "trade removed");
        Ok(true)
    }
}

fn decode(key: &str, raw: &str) -> Vec<TradeRecord> {
    match serde_json::from_str::<Vec<TradeRecord>>(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key, error = %e, "malformed ledger blob, treating as empty");
            Vec::new()
        }
    }
}

/// Millisecond timestamp id, bumped past any id already in use.
pub fn next_id(records: &[TradeRecord], now_millis: i64) -> String {
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if !records.iter().any(|r| r.id == id) {
            return id;
        }
        candidate += 1;
    }
}
