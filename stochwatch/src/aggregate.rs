use crate::{
    config::{ScannerConfig, SignalPolicy},
    ledger::AlertKey,
    signal::{Alert, Signal, TimeframeReading},
};
use chrono::{DateTime, Utc};
use smol_str::SmolStr;
use stochwatch_data::DataError;
use stochwatch_ta::CrossEvent;

/// Outcome of analysing one symbol across every configured timeframe.
#[derive(Clone, PartialEq, Debug)]
pub struct SymbolAnalysis {
    pub symbol: SmolStr,
    pub time: DateTime<Utc>,
    pub readings: Vec<TimeframeReading>,
    /// Zone-qualified crossovers on the primary timeframe (cross-gated policy only).
    pub crosses: Vec<CrossEvent>,
    /// Latest close on the primary timeframe.
    pub latest_close: Option<f64>,
    /// Fetch failures, one per skipped timeframe.
    pub errors: Vec<DataError>,
}

impl SymbolAnalysis {
    fn primary_reading(&self, config: &ScannerConfig) -> Option<&TimeframeReading> {
        self.readings
            .iter()
            .find(|reading| reading.timeframe == config.primary_timeframe)
    }
}

/// Turn one symbol's analysis into zero or more alert candidates.
///
/// The primary timeframe gates the alert: a NEUTRAL (or undefined) primary
/// state yields nothing regardless of the other timeframes, which only travel
/// with the alert as context.
pub fn aggregate(analysis: &SymbolAnalysis, config: &ScannerConfig) -> Vec<Alert> {
    match config.policy {
        SignalPolicy::ThresholdLevel => {
            let Some(primary) = analysis.primary_reading(config) else {
                return Vec::new();
            };
            if !primary.signal.is_actionable() {
                return Vec::new();
            }

            vec![Alert {
                symbol: analysis.symbol.clone(),
                timeframe: config.primary_timeframe,
                signal: primary.signal,
                price: analysis.latest_close,
                time: analysis.time,
                candle_time: None,
                readings: analysis.readings.clone(),
                cross: None,
            }]
        }
        SignalPolicy::CrossGated { .. } => analysis
            .crosses
            .iter()
            .map(|cross| Alert {
                symbol: analysis.symbol.clone(),
                timeframe: config.primary_timeframe,
                signal: Signal::from(cross.zone),
                price: analysis.latest_close,
                time: analysis.time,
                candle_time: Some(cross.candle_time),
                readings: analysis.readings.clone(),
                cross: Some(*cross),
            })
            .collect(),
    }
}

/// Dedup ledger key for an alert candidate.
pub fn alert_key(alert: &Alert) -> AlertKey {
    let key = AlertKey::new(alert.symbol.clone(), alert.timeframe, alert.signal);
    match alert.candle_time {
        Some(time) => key.with_candle_time(time),
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stochwatch_data::Timeframe;
    use stochwatch_ta::{CrossDirection, Zone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn analysis(readings: Vec<TimeframeReading>, crosses: Vec<CrossEvent>) -> SymbolAnalysis {
        SymbolAnalysis {
            symbol: SmolStr::new("ETH/USDT"),
            time: t0(),
            readings,
            crosses,
            latest_close: Some(2500.0),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_threshold_policy_gated_by_primary_timeframe() {
        let config = ScannerConfig::default();

        // Extreme 4h state alone does not fire: primary (15m) is neutral.
        let gated = analysis(
            vec![
                TimeframeReading::new(Timeframe::M15, 50.0, 55.0, Signal::Neutral),
                TimeframeReading::new(Timeframe::H4, 95.0, 92.0, Signal::Overbought),
            ],
            Vec::new(),
        );
        assert!(aggregate(&gated, &config).is_empty());

        let firing = analysis(
            vec![
                TimeframeReading::new(Timeframe::M15, 12.0, 15.0, Signal::Oversold),
                TimeframeReading::new(Timeframe::H4, 50.0, 55.0, Signal::Neutral),
            ],
            Vec::new(),
        );
        let alerts = aggregate(&firing, &config);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].signal, Signal::Oversold);
        assert_eq!(alerts[0].timeframe, Timeframe::M15);
        assert_eq!(alerts[0].readings.len(), 2);
        assert_eq!(alerts[0].candle_time, None);
    }

    #[test]
    fn test_threshold_policy_requires_primary_reading() {
        let config = ScannerConfig::default();
        let missing_primary = analysis(
            vec![TimeframeReading::new(Timeframe::H1, 95.0, 92.0, Signal::Overbought)],
            Vec::new(),
        );
        assert!(aggregate(&missing_primary, &config).is_empty());
    }

    #[test]
    fn test_cross_policy_emits_one_alert_per_event() {
        let config = ScannerConfig::smi_crossover();
        let cross = CrossEvent {
            candle_index: 98,
            candle_time: t0() + chrono::Duration::seconds(30),
            direction: CrossDirection::Bullish,
            zone: Zone::Oversold,
            k_prev: -55.0,
            d_prev: -50.0,
            k_curr: -42.0,
            d_curr: -48.0,
            k_at_cross: -48.5,
        };

        let alerts = aggregate(&analysis(Vec::new(), vec![cross]), &config);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].signal, Signal::Oversold);
        assert_eq!(alerts[0].cross, Some(cross));

        // The ledger key carries the candle timestamp, truncated to the minute.
        let key = alert_key(&alerts[0]);
        assert_eq!(key.candle_time, Some(t0()));
    }
}
