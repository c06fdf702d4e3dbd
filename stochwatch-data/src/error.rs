use crate::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Errors produced when sourcing or validating market data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
pub enum DataError {
    #[error("no data returned for {symbol} {timeframe}")]
    NoData {
        symbol: SmolStr,
        timeframe: Timeframe,
    },

    #[error("symbol unavailable on this venue: {0}")]
    SymbolUnavailable(SmolStr),

    #[error("network failure: {0}")]
    Network(String),

    #[error("invalid candle series: {0}")]
    InvalidSeries(String),

    #[error("all candle sources exhausted for {symbol} {timeframe}")]
    AllSourcesExhausted {
        symbol: SmolStr,
        timeframe: Timeframe,
    },
}
