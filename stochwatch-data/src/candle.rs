use crate::error::DataError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Normalised Stochwatch OHLCV [`Candle`] model.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Construct a [`Candle`] from a raw exchange OHLCV row keyed by a
    /// millisecond epoch timestamp.
    pub fn from_ohlcv_row(
        time_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, DataError> {
        let time = Utc
            .timestamp_millis_opt(time_ms)
            .single()
            .ok_or_else(|| DataError::InvalidSeries(format!("invalid timestamp: {time_ms}")))?;

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Ordered, immutable OHLCV sequence.
///
/// Construction validates that candle timestamps are strictly increasing, so every
/// consumer can rely on index `i` being strictly older than index `i + 1`.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct CandleSeries(Vec<Candle>);

impl CandleSeries {
    /// Construct a validated [`CandleSeries`], failing if timestamps are not
    /// strictly increasing.
    pub fn new(candles: Vec<Candle>) -> Result<Self, DataError> {
        for window in candles.windows(2) {
            if window[1].time <= window[0].time {
                return Err(DataError::InvalidSeries(format!(
                    "candle timestamps not strictly increasing: {} -> {}",
                    window[0].time, window[1].time
                )));
            }
        }

        Ok(Self(candles))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.0
    }

    pub fn last(&self) -> Option<&Candle> {
        self.0.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|candle| candle.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.0.iter().map(|candle| candle.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.0.iter().map(|candle| candle.low).collect()
    }

    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.0.iter().map(|candle| candle.time).collect()
    }

    /// Series containing only the most recent `limit` candles.
    pub fn tail(&self, limit: usize) -> Self {
        let skip = self.0.len().saturating_sub(limit);
        Self(self.0[skip..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time_ms: i64, close: f64) -> Candle {
        Candle::from_ohlcv_row(time_ms, close, close, close, close, 0.0).unwrap()
    }

    #[test]
    fn test_candle_series_rejects_unordered_timestamps() {
        let result = CandleSeries::new(vec![candle(2_000, 1.0), candle(1_000, 2.0)]);
        assert!(matches!(result, Err(DataError::InvalidSeries(_))));
    }

    #[test]
    fn test_candle_series_rejects_duplicate_timestamps() {
        let result = CandleSeries::new(vec![candle(1_000, 1.0), candle(1_000, 2.0)]);
        assert!(matches!(result, Err(DataError::InvalidSeries(_))));
    }

    #[test]
    fn test_candle_series_tail() {
        let series =
            CandleSeries::new(vec![candle(1_000, 1.0), candle(2_000, 2.0), candle(3_000, 3.0)])
                .unwrap();

        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.closes(), vec![2.0, 3.0]);

        // Tail larger than the series is the identity
        assert_eq!(series.tail(10).len(), 3);
    }
}
