use serde::{Deserialize, Serialize};

/// Pair of index-aligned oscillator lines.
///
/// Invariant: `k.len() == d.len() ==` the length of the candle series the lines
/// were derived from. Positions before the engine's warm-up boundary are `NaN`.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct OscillatorSeries {
    k: Vec<f64>,
    d: Vec<f64>,
}

impl OscillatorSeries {
    /// Construct from equal-length %K/%D lines.
    ///
    /// # Panics
    /// Panics if the lines differ in length - engines construct both lines from
    /// the same input, so a mismatch is a programming error, not a data error.
    pub fn new(k: Vec<f64>, d: Vec<f64>) -> Self {
        assert_eq!(k.len(), d.len(), "%K and %D lines must be index-aligned");
        Self { k, d }
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    pub fn k(&self) -> &[f64] {
        &self.k
    }

    pub fn d(&self) -> &[f64] {
        &self.d
    }

    /// Latest `(%K, %D)` pair, or `None` if either line is undefined on the
    /// final bar.
    pub fn latest(&self) -> Option<(f64, f64)> {
        match (self.k.last(), self.d.last()) {
            (Some(&k), Some(&d)) if k.is_finite() && d.is_finite() => Some((k, d)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_requires_both_lines_defined() {
        let series = OscillatorSeries::new(vec![1.0, 2.0], vec![1.0, f64::NAN]);
        assert_eq!(series.latest(), None);

        let series = OscillatorSeries::new(vec![1.0, 2.0], vec![1.0, 3.0]);
        assert_eq!(series.latest(), Some((2.0, 3.0)));
    }

    #[test]
    #[should_panic(expected = "index-aligned")]
    fn test_mismatched_lines_panic() {
        OscillatorSeries::new(vec![1.0], vec![1.0, 2.0]);
    }
}
