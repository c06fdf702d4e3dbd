use crate::{
    config::{DedupConfig, DedupMode},
    signal::Signal,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use stochwatch_data::Timeframe;
use thiserror::Error;
use tracing::debug;

/// JSON-file backed [`store::LedgerStore`].
pub mod json;

/// Ledger storage abstraction.
pub mod store;

pub use json::JsonFileStore;
pub use store::{InMemoryStore, LedgerStore};

/// Errors produced by ledger persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
pub enum LedgerError {
    #[error("ledger io: {0}")]
    Io(String),

    #[error("ledger serialisation: {0}")]
    Serialise(String),
}

/// Composite key identifying one market condition.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Deserialize, Serialize)]
pub struct AlertKey {
    pub symbol: SmolStr,
    pub timeframe: Timeframe,
    pub signal: Signal,
    /// Triggering candle close timestamp, present in the per-candle dedup mode.
    pub candle_time: Option<DateTime<Utc>>,
}

impl AlertKey {
    pub fn new(symbol: SmolStr, timeframe: Timeframe, signal: Signal) -> Self {
        Self {
            symbol,
            timeframe,
            signal,
            candle_time: None,
        }
    }

    /// Attach the triggering candle timestamp, truncated to its minute boundary
    /// so repeated runs observe the identical key.
    pub fn with_candle_time(mut self, time: DateTime<Utc>) -> Self {
        self.candle_time = Some(Timeframe::truncate_to_minute(time));
        self
    }

    /// Storage key shared by every alert for this market condition.
    pub fn condition_key(&self) -> String {
        format!("{}_{}_{}", self.symbol, self.timeframe, self.signal)
    }

    /// Full storage key, unique per candle when a candle timestamp is attached.
    pub fn storage_key(&self) -> String {
        match self.candle_time {
            Some(time) => format!(
                "{}_{}",
                self.condition_key(),
                time.format("%Y-%m-%dT%H:%M:00")
            ),
            None => self.condition_key(),
        }
    }

    /// Key for the opposite extreme signal on the same symbol/timeframe.
    pub fn opposite(&self) -> Option<Self> {
        self.signal.opposite().map(|signal| Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            signal,
            candle_time: self.candle_time,
        })
    }
}

/// Deduplication ledger enforcing at-most-one-alert-per-condition.
///
/// The ledger is the single shared mutable resource of the engine; store access
/// is serialized behind a mutex, and the scanner additionally confines
/// `can_alert`/`record` to its single fan-in phase so concurrent workers can
/// never both observe "no record" for the same key.
#[derive(Debug)]
pub struct DedupLedger<Store> {
    store: Mutex<Store>,
    config: DedupConfig,
}

impl<Store> DedupLedger<Store>
where
    Store: LedgerStore,
{
    pub fn new(store: Store, config: DedupConfig) -> Self {
        Self {
            store: Mutex::new(store),
            config,
        }
    }

    /// Whether an alert for this key may fire at `now`.
    ///
    /// Cooldown mode: true iff no record exists or the per-timeframe cooldown
    /// has fully elapsed (boundary inclusive). Per-candle mode: the identical
    /// candle must never have been alerted, and no alert for the same condition
    /// may be younger than the freshness window - both checks must pass.
    pub fn can_alert(&self, key: &AlertKey, now: DateTime<Utc>) -> bool {
        let store = self.store.lock();

        match self.config.mode {
            DedupMode::Cooldown => match store.get(&key.condition_key()) {
                None => true,
                Some(last) => now - last >= self.config.cooldown(key.timeframe),
            },
            DedupMode::PerCandle { freshness_minutes } => {
                if store.get(&key.storage_key()).is_some() {
                    debug!(key = %key.storage_key(), "candle already alerted");
                    return false;
                }

                let freshness = chrono::Duration::minutes(freshness_minutes);
                let fresh_exists = store
                    .scan_prefix(&key.condition_key())
                    .into_iter()
                    .any(|last| now - last < freshness);
                if fresh_exists {
                    debug!(key = %key.condition_key(), "inside freshness window");
                }
                !fresh_exists
            }
        }
    }

    /// Record an accepted alert at `now`, optionally clearing the opposite
    /// signal's standing record to re-arm immediately on reversal.
    pub fn record(&self, key: &AlertKey, now: DateTime<Utc>) -> Result<(), LedgerError> {
        let mut store = self.store.lock();
        store.put(&key.storage_key(), now)?;

        if self.config.clear_opposite
            && let Some(opposite) = key.opposite()
        {
            store.remove(&opposite.condition_key())?;
        }

        Ok(())
    }

    /// Purge records older than the configured retention window.
    pub fn sweep(&self, now: DateTime<Utc>) -> Result<usize, LedgerError> {
        let older_than = now - chrono::Duration::days(self.config.retention_days);
        self.store.lock().sweep(older_than)
    }
}
