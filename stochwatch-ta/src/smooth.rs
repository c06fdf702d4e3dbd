//! Recursive smoothing primitives and rolling window helpers.
//!
//! Two distinct recursive smoothers are provided and must not be conflated:
//! * [`rma`]: Wilder's Running Moving Average, `alpha = 1/length`, seeded with the
//!   simple mean of the first `length` inputs.
//! * [`ema`]: span EMA, `alpha = 2/(length+1)`, seeded with the first finite input.

/// Wilder's Running Moving Average.
///
/// Output `i` is `NaN` for `i < length - 1`, the simple mean of the first `length`
/// inputs at `i == length - 1`, and `prev*(length-1)/length + x/length` after.
/// Inputs are expected to be finite.
pub fn rma(values: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if length == 0 || values.len() < length {
        return out;
    }

    let seed = values[..length].iter().sum::<f64>() / length as f64;
    out[length - 1] = seed;

    let alpha = 1.0 / length as f64;
    let mut prev = seed;
    for (i, &value) in values.iter().enumerate().skip(length) {
        prev = prev * (1.0 - alpha) + value * alpha;
        out[i] = prev;
    }

    out
}

/// Span EMA, `alpha = 2/(length + 1)`, causal and non-adjusted.
///
/// The recursion seeds at the first finite input; leading `NaN`s stay `NaN`. An
/// interior `NaN` holds the previous smoothed value rather than poisoning the
/// remainder of the series.
pub fn ema(values: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if length == 0 {
        return out;
    }

    let alpha = 2.0 / (length as f64 + 1.0);
    let mut prev: Option<f64> = None;
    for (i, &value) in values.iter().enumerate() {
        match prev {
            None if value.is_finite() => {
                prev = Some(value);
                out[i] = value;
            }
            None => {}
            Some(p) if value.is_finite() => {
                let next = p + alpha * (value - p);
                prev = Some(next);
                out[i] = next;
            }
            Some(p) => out[i] = p,
        }
    }

    out
}

/// Rolling simple moving average with min-periods equal to the window.
///
/// Output `i` is `NaN` until the window is full, or whenever any window member is
/// non-finite.
pub fn rolling_sma(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |slice| {
        slice.iter().sum::<f64>() / slice.len() as f64
    })
}

/// Rolling maximum with min-periods equal to the window.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |slice| {
        slice.iter().copied().fold(f64::MIN, f64::max)
    })
}

/// Rolling minimum with min-periods equal to the window.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |slice| {
        slice.iter().copied().fold(f64::MAX, f64::min)
    })
}

fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|value| value.is_finite()) {
            out[i] = f(slice);
        }
    }

    out
}
