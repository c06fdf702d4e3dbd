use crate::{ledger::LedgerError, notify::DeliveryError};
use stochwatch_data::DataError;
use thiserror::Error;

/// Top-level Stochwatch error taxonomy.
///
/// Every variant is recoverable at the scan-cycle level: failure paths degrade
/// to "no alert this cycle" rather than aborting the batch, and the swallowed
/// errors travel in [`crate::scanner::ScanSummary::errors`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StochwatchError {
    #[error("market data: {0}")]
    Data(#[from] DataError),

    #[error("dedup ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("notification delivery: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("JoinError: {0}")]
    JoinError(String),
}

impl From<tokio::task::JoinError> for StochwatchError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::JoinError(format!("{value:?}"))
    }
}
