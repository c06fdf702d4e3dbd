//! Stochastic-of-RSI engine.

use crate::{
    rsi::rsi,
    series::OscillatorSeries,
    smooth::{rolling_max, rolling_min, rolling_sma},
};
use serde::{Deserialize, Serialize};
use stochwatch_data::CandleSeries;

/// Stochastic RSI engine parameters.
///
/// Reproduces the reference platform's
/// `k = sma(stoch(rsi, rsi, rsi, length_stoch), smooth_k)` /
/// `d = sma(k, smooth_d)` pipeline: the RSI series acts simultaneously as
/// source, high and low of the stochastic transform.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct StochRsi {
    pub length_rsi: usize,
    pub length_stoch: usize,
    pub smooth_k: usize,
    pub smooth_d: usize,
}

impl Default for StochRsi {
    fn default() -> Self {
        Self {
            length_rsi: 14,
            length_stoch: 14,
            smooth_k: 3,
            smooth_d: 3,
        }
    }
}

impl StochRsi {
    /// Index of the first fully-defined %D value, assuming no flat RSI windows.
    pub fn warmup(&self) -> usize {
        self.length_rsi + self.length_stoch + self.smooth_k + self.smooth_d - 3
    }

    /// Compute the %K/%D lines, index-aligned with the input candles.
    ///
    /// A rolling window where `max(rsi) == min(rsi)` yields an undefined raw
    /// stochastic value, never a fabricated 0 or infinity - flat RSI must not
    /// produce false zone triggers.
    pub fn compute(&self, candles: &CandleSeries) -> OscillatorSeries {
        let closes = candles.closes();
        let rsi = rsi(&closes, self.length_rsi);

        let lo = rolling_min(&rsi, self.length_stoch);
        let hi = rolling_max(&rsi, self.length_stoch);

        let raw: Vec<f64> = rsi
            .iter()
            .zip(lo.iter().zip(hi.iter()))
            .map(|(&value, (&lo, &hi))| {
                if value.is_finite() && lo.is_finite() && hi.is_finite() && hi > lo {
                    100.0 * (value - lo) / (hi - lo)
                } else {
                    f64::NAN
                }
            })
            .collect();

        let k = rolling_sma(&raw, self.smooth_k);
        let d = rolling_sma(&k, self.smooth_d);

        OscillatorSeries::new(k, d)
    }
}
