//! Wilder relative strength index.

use crate::smooth::rma;

/// Wilder RSI over a close-price sequence.
///
/// Per-step `gain = max(delta, 0)` and `loss = max(-delta, 0)` are each smoothed
/// with the SMA-seeded [`rma`] at `length`, then
/// `RSI = 100 - 100/(1 + avgGain/avgLoss)`.
///
/// The output is index-aligned with `closes`; the first defined value sits at
/// index `length` (one delta is consumed by differencing). Edge cases:
/// * `avgLoss == 0`, `avgGain > 0` -> 100 (never infinity).
/// * both averages zero (flat price) -> 50.
pub fn rsi(closes: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if length == 0 || closes.len() <= length {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = rma(&gains, length);
    let avg_loss = rma(&losses, length);

    for i in (length - 1)..deltas.len() {
        let (gain, loss) = (avg_gain[i], avg_loss[i]);
        // Delta index i corresponds to close index i + 1
        out[i + 1] = if loss == 0.0 && gain == 0.0 {
            50.0
        } else if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        };
    }

    out
}
