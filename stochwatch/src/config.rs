use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stochwatch_data::{CandleSeries, Timeframe};
use stochwatch_ta::{OscillatorSeries, Smi, StochRsi, ZoneThresholds};

/// Oscillator engine selection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Engine {
    StochRsi(StochRsi),
    Smi(Smi),
}

impl Engine {
    pub fn compute(&self, candles: &CandleSeries) -> OscillatorSeries {
        match self {
            Engine::StochRsi(params) => params.compute(candles),
            Engine::Smi(params) => params.compute(candles),
        }
    }

    pub fn warmup(&self) -> usize {
        match self {
            Engine::StochRsi(params) => params.warmup(),
            Engine::Smi(params) => params.warmup(),
        }
    }
}

/// How an actionable signal is derived from the oscillator lines.
///
/// The two policies are alternatives selected per deployment, never fused.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalPolicy {
    /// Fire whenever both lines sit beyond a threshold on the latest bar.
    ThresholdLevel,
    /// Fire only on a zone-qualified %K/%D crossover inside the scan window.
    CrossGated { window: usize, include_open: bool },
}

/// Dedup ledger operating mode.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DedupMode {
    /// Fixed per-timeframe cooldown window keyed by (symbol, timeframe, signal).
    Cooldown,
    /// Per-candle dedup plus a freshness window over the same signal condition.
    PerCandle { freshness_minutes: i64 },
}

/// Dedup ledger configuration.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct DedupConfig {
    pub mode: DedupMode,
    /// Whether recording an alert clears the standing record for the opposite
    /// signal on the same symbol/timeframe, re-arming immediately on reversal.
    pub clear_opposite: bool,
    /// Records older than this are purged by the retention sweep, independent
    /// of the cooldown length itself.
    pub retention_days: i64,
    pub cooldown_minutes: HashMap<Timeframe, i64>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            mode: DedupMode::Cooldown,
            clear_opposite: false,
            retention_days: 7,
            cooldown_minutes: default_cooldown_minutes(),
        }
    }
}

impl DedupConfig {
    /// Cooldown duration for a timeframe, falling back to one candle interval
    /// when unconfigured.
    pub fn cooldown(&self, timeframe: Timeframe) -> chrono::Duration {
        self.cooldown_minutes
            .get(&timeframe)
            .map(|&minutes| chrono::Duration::minutes(minutes))
            .unwrap_or_else(|| timeframe.interval())
    }
}

fn default_cooldown_minutes() -> HashMap<Timeframe, i64> {
    HashMap::from([
        (Timeframe::M15, 15),
        (Timeframe::H1, 60),
        (Timeframe::H4, 240),
        (Timeframe::D1, 1440),
    ])
}

/// Canonical Stochwatch configuration record.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct ScannerConfig {
    pub engine: Engine,
    pub policy: SignalPolicy,
    /// Extreme zone thresholds on the selected engine's scale.
    pub zones: ZoneThresholds,
    pub timeframes: Vec<Timeframe>,
    /// The timeframe that gates whether an alert fires at all.
    pub primary_timeframe: Timeframe,
    /// Candles requested from the source per fetch.
    pub candles_limit: usize,
    /// Fetches yielding fewer candles degrade to "no signal", not an error.
    pub min_candles: usize,
    /// Upper bound on concurrently analysed symbols.
    pub max_concurrency: usize,
    pub dedup: DedupConfig,
}

impl Default for ScannerConfig {
    /// Multi-timeframe StochRSI threshold deployment: 14/14/3/3 lines with
    /// 80/20 zones, gated by the 15m timeframe.
    fn default() -> Self {
        Self {
            engine: Engine::StochRsi(StochRsi::default()),
            policy: SignalPolicy::ThresholdLevel,
            zones: ZoneThresholds::new(80.0, 20.0),
            timeframes: vec![Timeframe::M15, Timeframe::H1, Timeframe::H4, Timeframe::D1],
            primary_timeframe: Timeframe::M15,
            candles_limit: 100,
            min_candles: 50,
            max_concurrency: 8,
            dedup: DedupConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Single-timeframe SMI crossover deployment: 10/3/3 lines with +40/-40
    /// zones, scanning the last three 15m candles (two closed plus the
    /// in-progress one) and deduplicating per candle with a 90 minute
    /// freshness window.
    pub fn smi_crossover() -> Self {
        Self {
            engine: Engine::Smi(Smi::default()),
            policy: SignalPolicy::CrossGated {
                window: 3,
                include_open: true,
            },
            zones: ZoneThresholds::new(40.0, -40.0),
            timeframes: vec![Timeframe::M15],
            primary_timeframe: Timeframe::M15,
            candles_limit: 100,
            min_candles: 30,
            max_concurrency: 8,
            dedup: DedupConfig {
                mode: DedupMode::PerCandle {
                    freshness_minutes: 90,
                },
                ..DedupConfig::default()
            },
        }
    }
}
