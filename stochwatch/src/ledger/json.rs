use super::{LedgerError, store::LedgerStore};
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// [`LedgerStore`] persisted as a JSON map of key to last-alert timestamp.
///
/// Every mutation rewrites the whole file via write-temp-then-rename, so a crash
/// mid-write leaves either the previous or the next complete state on disk. A
/// file that fails to parse on open is discarded with a warning - a reset ledger
/// at worst re-sends one alert per condition, whereas refusing to start would
/// silence everything.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: HashMap<String, DateTime<Utc>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        %error,
                        "ledger file corrupt, resetting to empty ledger"
                    );
                    HashMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(LedgerError::Io(error.to_string())),
        };

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| LedgerError::Io(error.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(&self.records)
            .map_err(|error| LedgerError::Serialise(error.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents).map_err(|error| LedgerError::Io(error.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|error| LedgerError::Io(error.to_string()))
    }
}

impl LedgerStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.records.get(key).copied()
    }

    fn put(&mut self, key: &str, time: DateTime<Utc>) -> Result<(), LedgerError> {
        self.records.insert(key.to_owned(), time);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        if self.records.remove(key).is_some() {
            self.persist()?;
        }
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

        let removed = before - self.records.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }
}
