use super::LedgerError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Backing store for dedup ledger records.
///
/// The representation is opaque; correctness only requires that individual
/// `put`/`remove` operations are atomic enough that a crash never leaves state
/// which both parses and lies.
pub trait LedgerStore {
    fn get(&self, key: &str) -> Option<DateTime<Utc>>;

    fn put(&mut self, key: &str, time: DateTime<Utc>) -> Result<(), LedgerError>;

    fn remove(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Last-alert timestamps of every record whose key starts with `prefix`.
    fn scan_prefix(&self, prefix: &str) -> Vec<DateTime<Utc>>;

    /// Purge records with a timestamp strictly older than `older_than`,
    /// returning how many were removed.
    fn sweep(&mut self, older_than: DateTime<Utc>) -> Result<usize, LedgerError>;
}

/// Volatile in-memory [`LedgerStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: HashMap<String, DateTime<Utc>>,
}

impl LedgerStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.records.get(key).copied()
    }

    fn put(&mut self, key: &str, time: DateTime<Utc>) -> Result<(), LedgerError> {
        self.records.insert(key.to_owned(), time);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        self.records.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Vec<DateTime<Utc>> {
        self.records
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, &time)| time)
            .collect()
    }

    fn sweep(&mut self, older_than: DateTime<Utc>) -> Result<usize, LedgerError> {
        let before = self.records.len();
        self.records.retain(|_, &mut time| time >= older_than);
        Ok(before - self.records.len())
    }
}
