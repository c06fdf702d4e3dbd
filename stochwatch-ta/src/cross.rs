//! Zone-gated crossover detection between the %K and %D lines.

use crate::series::OscillatorSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a %K/%D crossover.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize, derive_more::Display)]
pub enum CrossDirection {
    #[display("BULLISH")]
    Bullish,
    #[display("BEARISH")]
    Bearish,
}

/// Extreme zone membership of a crossing point.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize, derive_more::Display)]
pub enum Zone {
    #[display("OVERBOUGHT")]
    Overbought,
    #[display("OVERSOLD")]
    Oversold,
}

/// Overbought/oversold thresholds on the engine's own scale.
///
/// StochRSI zones live on 0-100 (eg/ 80/20); SMI zones are asymmetric around
/// zero (eg/ +40/-40). The detector never assumes a scale.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize, derive_more::Constructor)]
pub struct ZoneThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

/// Configuration of one crossover scan.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct CrossScan {
    /// Number of most recent candles inspected (eg/ 3 = two closed candles plus
    /// the in-progress one).
    pub window: usize,
    /// Whether the final, in-progress candle participates in the scan.
    pub include_open: bool,
    pub zones: ZoneThresholds,
}

/// Zone-qualified crossover between the %K and %D lines. Immutable and
/// transient - events are re-derived on every scan, never persisted.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct CrossEvent {
    pub candle_index: usize,
    pub candle_time: DateTime<Utc>,
    pub direction: CrossDirection,
    pub zone: Zone,
    pub k_prev: f64,
    pub d_prev: f64,
    pub k_curr: f64,
    pub d_curr: f64,
    /// Crossing point approximated as the midpoint `(k_prev + k_curr) / 2`,
    /// preserved for numeric parity with the reference implementation.
    pub k_at_cross: f64,
}

impl CrossScan {
    /// Scan the most recent window of the series for zone-qualified crossovers.
    ///
    /// For each adjacent pair: bullish when `k[i-1] <= d[i-1] && k[i] > d[i]`,
    /// bearish when `k[i-1] >= d[i-1] && k[i] < d[i]`. Pairs with an undefined
    /// operand are skipped. A crossing qualifies only when its midpoint lies in
    /// the oversold zone (bullish) or the overbought zone (bearish); crossings
    /// between the zones are discarded.
    pub fn detect(
        &self,
        series: &OscillatorSeries,
        times: &[DateTime<Utc>],
    ) -> Vec<CrossEvent> {
        let n = series.len().min(times.len());
        let mut events = Vec::new();
        if n < 2 || self.window < 2 {
            return events;
        }

        let first = (n + 1 - self.window.min(n)).max(1);
        let last = if self.include_open { n } else { n - 1 };

        let (k, d) = (series.k(), series.d());
        for i in first..last {
            let (k_prev, d_prev, k_curr, d_curr) = (k[i - 1], d[i - 1], k[i], d[i]);
            if !(k_prev.is_finite() && d_prev.is_finite() && k_curr.is_finite() && d_curr.is_finite())
            {
                continue;
            }

            let bullish = k_prev <= d_prev && k_curr > d_curr;
            let bearish = k_prev >= d_prev && k_curr < d_curr;
            if !bullish && !bearish {
                continue;
            }

            let k_at_cross = (k_prev + k_curr) / 2.0;
            let zone = if bullish && k_at_cross <= self.zones.oversold {
                Zone::Oversold
            } else if bearish && k_at_cross >= self.zones.overbought {
                Zone::Overbought
            } else {
                continue;
            };

            events.push(CrossEvent {
                candle_index: i,
                candle_time: times[i],
                direction: if bullish {
                    CrossDirection::Bullish
                } else {
                    CrossDirection::Bearish
                },
                zone,
                k_prev,
                d_prev,
                k_curr,
                d_curr,
                k_at_cross,
            });
        }

        events
    }
}
