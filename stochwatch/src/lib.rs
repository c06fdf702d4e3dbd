#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Stochwatch
//! Oscillator alert engine for OHLCV candle series. Classifies StochRSI or SMI
//! oscillator state into discrete `OVERBOUGHT`/`OVERSOLD`/`NEUTRAL` signals and
//! enforces at-most-one-alert-per-condition through a crash-tolerant dedup
//! ledger.
//!
//! At a high level the pipeline is:
//! candles -> oscillator engine ([`stochwatch_ta`]) -> classification policy
//! ([`signal`]) -> per-symbol aggregation ([`aggregate`]) -> [`ledger`]
//! accept/reject -> [`notify`] delivery.
//!
//! The [`scanner`] drives the pipeline with a bounded-concurrency fan-out over
//! independent symbols and an explicit join barrier before the serialized
//! aggregation/ledger phase, so the ledger has a single writer per cycle.

/// Per-symbol aggregation applying the "primary timeframe gates the alert" policy.
pub mod aggregate;

/// Canonical engine configuration record.
pub mod config;

/// Top-level error taxonomy.
pub mod error;

/// Persistent alert deduplication ledger.
pub mod ledger;

/// Logging initialisation.
pub mod logging;

/// Notification sink seam.
pub mod notify;

/// Bounded-concurrency symbol scanner.
pub mod scanner;

/// Signal classification and alert payloads.
pub mod signal;

pub use config::ScannerConfig;
pub use error::StochwatchError;
pub use scanner::{ScanSummary, Scanner};
pub use signal::{Alert, Signal};
