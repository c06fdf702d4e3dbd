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

//! # Stochwatch-TA
//! Oscillator math for the Stochwatch alert engine, reproducing the reference
//! charting platform's numeric semantics:
//! * [`smooth`]: Wilder RMA (SMA-seeded, alpha = 1/length) and span EMA
//!   (alpha = 2/(length+1)) smoothing primitives, plus rolling window helpers.
//! * [`rsi`]: Wilder relative strength index.
//! * [`stoch_rsi`]: stochastic transform of the RSI, double-smoothed into %K/%D.
//! * [`smi`]: Stochastic Momentum Index with double-EMA smoothing.
//! * [`cross`]: zone-gated %K/%D crossover detection over a bounded recent window.
//!
//! All series are index-aligned with their input candles. Positions before an
//! engine's warm-up boundary are `f64::NAN`, never zero - consumers must treat
//! non-finite values as "undefined", not as a level.

/// Zone-gated crossover detection between the %K and %D lines.
pub mod cross;

/// Wilder relative strength index.
pub mod rsi;

/// Index-aligned %K/%D series model.
pub mod series;

/// Stochastic Momentum Index engine.
pub mod smi;

/// Recursive smoothing primitives and rolling window helpers.
pub mod smooth;

/// Stochastic-of-RSI engine.
pub mod stoch_rsi;

pub use cross::{CrossDirection, CrossEvent, CrossScan, Zone, ZoneThresholds};
pub use series::OscillatorSeries;
pub use smi::Smi;
pub use stoch_rsi::StochRsi;
