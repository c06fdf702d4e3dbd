use crate::{candle::CandleSeries, error::DataError, timeframe::Timeframe};
use async_trait::async_trait;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability trait implemented by anything that can serve OHLCV candles.
///
/// Implementations normalise venue specific payloads into a validated
/// [`CandleSeries`]. A fetch that yields fewer candles than a consumer's warm-up
/// requirement is not a [`DataError`] - downstream analysis degrades to "no signal"
/// for that timeframe.
#[async_trait]
pub trait CandleSource {
    /// Venue name used for logging and diagnostics.
    fn name(&self) -> &str;

    /// Returns true if this venue lists the provided symbol.
    async fn has_symbol(&self, symbol: &SmolStr) -> bool;

    /// Fetch the most recent `limit` candles for the symbol and timeframe.
    async fn fetch(
        &self,
        symbol: &SmolStr,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, DataError>;
}

/// Prioritised list of [`CandleSource`] backends.
///
/// Backends are tried in configuration order; a venue that does not list the
/// symbol, returns no data, or fails on the network is skipped and the next one
/// attempted. Fallback order is configuration, not inheritance.
pub struct FallbackSource {
    sources: Vec<Arc<dyn CandleSource + Send + Sync>>,
}

impl std::fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSource")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name().to_owned()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FallbackSource {
    pub fn new(sources: Vec<Arc<dyn CandleSource + Send + Sync>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl CandleSource for FallbackSource {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn has_symbol(&self, symbol: &SmolStr) -> bool {
        for source in &self.sources {
            if source.has_symbol(symbol).await {
                return true;
            }
        }
        false
    }

    async fn fetch(
        &self,
        symbol: &SmolStr,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, DataError> {
        for source in &self.sources {
            if !source.has_symbol(symbol).await {
                debug!(
                    venue = source.name(),
                    %symbol,
                    "symbol not listed, trying next venue"
                );
                continue;
            }

            match source.fetch(symbol, timeframe, limit).await {
                Ok(series) if !series.is_empty() => {
                    debug!(
                        venue = source.name(),
                        %symbol,
                        %timeframe,
                        candles = series.len(),
                        "fetched candles"
                    );
                    return Ok(series);
                }
                Ok(_) => {
                    warn!(venue = source.name(), %symbol, %timeframe, "venue returned empty series");
                }
                Err(error) => {
                    warn!(
                        venue = source.name(),
                        %symbol,
                        %timeframe,
                        %error,
                        "venue fetch failed, trying next venue"
                    );
                }
            }
        }

        Err(DataError::AllSourcesExhausted {
            symbol: symbol.clone(),
            timeframe,
        })
    }
}
