//! Stochastic Momentum Index engine.

use crate::{
    series::OscillatorSeries,
    smooth::{ema, rolling_max, rolling_min},
};
use serde::{Deserialize, Serialize};
use stochwatch_data::CandleSeries;

/// Denominator magnitude below which %K is undefined rather than exploding.
const DENOMINATOR_EPSILON: f64 = 1e-10;

/// Stochastic Momentum Index engine parameters.
///
/// `%K = 200 * ema(ema(close - (hh+ll)/2, length_d), length_d)
///            / ema(ema(hh - ll, length_d), length_d)`
/// with `hh`/`ll` the rolling highest-high/lowest-low over `length_k` (window
/// includes the current bar), and `%D = ema(%K, length_ema)`.
///
/// The SMI oscillates around zero with asymmetric extreme zones (typically
/// +40/-40), unlike the StochRSI's 0-100 scale.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct Smi {
    pub length_k: usize,
    pub length_d: usize,
    pub length_ema: usize,
}

impl Default for Smi {
    fn default() -> Self {
        Self {
            length_k: 10,
            length_d: 3,
            length_ema: 3,
        }
    }
}

impl Smi {
    /// Index of the first defined %K value.
    pub fn warmup(&self) -> usize {
        self.length_k.saturating_sub(1)
    }

    /// Compute the %K/%D lines, index-aligned with the input candles.
    ///
    /// Bars where the smoothed range denominator is within
    /// [`DENOMINATOR_EPSILON`] of zero are undefined, never zero.
    pub fn compute(&self, candles: &CandleSeries) -> OscillatorSeries {
        let highs = candles.highs();
        let lows = candles.lows();
        let closes = candles.closes();

        let hh = rolling_max(&highs, self.length_k);
        let ll = rolling_min(&lows, self.length_k);

        let (relative, range): (Vec<f64>, Vec<f64>) = closes
            .iter()
            .zip(hh.iter().zip(ll.iter()))
            .map(|(&close, (&hh, &ll))| (close - (hh + ll) / 2.0, hh - ll))
            .unzip();

        let numerator = ema(&ema(&relative, self.length_d), self.length_d);
        let denominator = ema(&ema(&range, self.length_d), self.length_d);

        let k: Vec<f64> = numerator
            .iter()
            .zip(denominator.iter())
            .map(|(&num, &den)| {
                if num.is_finite() && den.is_finite() && den.abs() > DENOMINATOR_EPSILON {
                    200.0 * num / den
                } else {
                    f64::NAN
                }
            })
            .collect();

        let d = ema(&k, self.length_ema);

        OscillatorSeries::new(k, d)
    }
}
