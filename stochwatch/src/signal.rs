use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use stochwatch_data::Timeframe;
use stochwatch_ta::{CrossEvent, Zone, ZoneThresholds};

/// Discrete classification of an oscillator state.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize,
    derive_more::Display,
)]
pub enum Signal {
    #[display("OVERBOUGHT")]
    Overbought,
    #[display("OVERSOLD")]
    Oversold,
    #[display("NEUTRAL")]
    Neutral,
}

impl Signal {
    /// True for the alert-worthy extreme states.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Neutral)
    }

    /// Opposite extreme signal, if any.
    pub fn opposite(&self) -> Option<Signal> {
        match self {
            Signal::Overbought => Some(Signal::Oversold),
            Signal::Oversold => Some(Signal::Overbought),
            Signal::Neutral => None,
        }
    }
}

impl From<Zone> for Signal {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Overbought => Signal::Overbought,
            Zone::Oversold => Signal::Oversold,
        }
    }
}

/// Threshold-level classification of the latest `(%K, %D)` pair.
///
/// Fires only when both lines are simultaneously beyond the threshold; a single
/// line poking into a zone is not an extreme state.
pub fn classify(k: f64, d: f64, zones: &ZoneThresholds) -> Signal {
    if k >= zones.overbought && d >= zones.overbought {
        Signal::Overbought
    } else if k <= zones.oversold && d <= zones.oversold {
        Signal::Oversold
    } else {
        Signal::Neutral
    }
}

/// Latest oscillator state of one timeframe, carried with alerts for context.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize, derive_more::Constructor)]
pub struct TimeframeReading {
    pub timeframe: Timeframe,
    pub k: f64,
    pub d: f64,
    pub signal: Signal,
}

/// Structured signal result handed to the notification sink.
///
/// Formatting and transport are entirely the sink's concern.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Alert {
    pub symbol: SmolStr,
    pub timeframe: Timeframe,
    pub signal: Signal,
    pub price: Option<f64>,
    pub time: DateTime<Utc>,
    /// Closing timestamp of the triggering candle, set by the cross-gated
    /// policy and used by the per-candle dedup mode.
    pub candle_time: Option<DateTime<Utc>>,
    pub readings: Vec<TimeframeReading>,
    pub cross: Option<CrossEvent>,
}
