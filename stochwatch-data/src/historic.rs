use crate::{candle::CandleSeries, error::DataError, source::CandleSource, timeframe::Timeframe};
use async_trait::async_trait;
use smol_str::SmolStr;
use std::collections::HashMap;

/// [`CandleSource`] backed by pre-loaded in-memory series.
///
/// Useful for integration tests and historic replays where live venue
/// connectivity is undesirable.
#[derive(Debug, Default)]
pub struct HistoricSource {
    series: HashMap<(SmolStr, Timeframe), CandleSeries>,
}

impl HistoricSource {
    pub fn insert(&mut self, symbol: SmolStr, timeframe: Timeframe, series: CandleSeries) {
        self.series.insert((symbol, timeframe), series);
    }
}

#[async_trait]
impl CandleSource for HistoricSource {
    fn name(&self) -> &str {
        "historic"
    }

    async fn has_symbol(&self, symbol: &SmolStr) -> bool {
        self.series.keys().any(|(s, _)| s == symbol)
    }

    async fn fetch(
        &self,
        symbol: &SmolStr,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, DataError> {
        self.series
            .get(&(symbol.clone(), timeframe))
            .map(|series| series.tail(limit))
            .ok_or_else(|| DataError::NoData {
                symbol: symbol.clone(),
                timeframe,
            })
    }
}
