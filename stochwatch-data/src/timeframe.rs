use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

/// Chart timeframe of a candle series.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize,
    derive_more::Display,
)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    #[display("15m")]
    M15,
    #[serde(rename = "1h")]
    #[display("1h")]
    H1,
    #[serde(rename = "4h")]
    #[display("4h")]
    H4,
    #[serde(rename = "1d")]
    #[display("1d")]
    D1,
}

impl Timeframe {
    /// Exchange notation for this [`Timeframe`] (eg/ `"15m"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// Duration of one candle on this [`Timeframe`].
    pub fn interval(&self) -> Duration {
        match self {
            Timeframe::M15 => Duration::minutes(15),
            Timeframe::H1 => Duration::hours(1),
            Timeframe::H4 => Duration::hours(4),
            Timeframe::D1 => Duration::days(1),
        }
    }

    /// Truncate a timestamp to its minute boundary.
    ///
    /// Per-candle dedup keys carry the triggering candle timestamp in this
    /// truncated form so repeated runs observe the identical key.
    pub fn truncate_to_minute(time: DateTime<Utc>) -> DateTime<Utc> {
        time.duration_trunc(Duration::minutes(1)).unwrap_or(time)
    }
}
