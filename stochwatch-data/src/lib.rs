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

//! # Stochwatch-Data
//! Market data model and candle source abstractions for the Stochwatch oscillator
//! alert engine.
//!
//! Provides the normalised [`Candle`](candle::Candle) and validated
//! [`CandleSeries`](candle::CandleSeries) models, the [`Timeframe`](timeframe::Timeframe)
//! enumeration, and the [`CandleSource`](source::CandleSource) capability trait with a
//! prioritised [`FallbackSource`](source::FallbackSource) strategy for multi-venue
//! deployments.

/// Normalised OHLCV candle model and the validated series wrapper.
pub mod candle;

/// Errors produced when sourcing or validating market data.
pub mod error;

/// In-memory [`CandleSource`](source::CandleSource) backed by pre-loaded series.
pub mod historic;

/// Candle source capability trait and prioritised fallback strategy.
pub mod source;

/// Chart timeframe enumeration.
pub mod timeframe;

pub use candle::{Candle, CandleSeries};
pub use error::DataError;
pub use source::{CandleSource, FallbackSource};
pub use timeframe::Timeframe;
