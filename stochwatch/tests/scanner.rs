use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use smol_str::SmolStr;
use std::sync::Arc;
use stochwatch::config::ScannerConfig;
use stochwatch::error::StochwatchError;
use stochwatch::ledger::{DedupLedger, InMemoryStore, LedgerError, LedgerStore};
use stochwatch::notify::{ChannelNotifier, DeliveryError, Notifier};
use stochwatch::signal::{Alert, Signal};
use stochwatch::scanner::Scanner;
use stochwatch_data::{Candle, CandleSeries, Timeframe, historic::HistoricSource};
use stochwatch_ta::{CrossDirection, Zone};

/// Mild down-drift followed by a steep sell-off: the RSI makes a new low on
/// every late bar, pinning the StochRSI %K/%D at 0 - an unambiguous OVERSOLD
/// state on the latest candle.
fn sell_off_series() -> CandleSeries {
    let mut closes: Vec<f64> = (0..60)
        .map(|i| 100.0 - i as f64 * 0.1 + if i % 2 == 0 { 0.5 } else { 0.0 })
        .collect();
    let mut last = *closes.last().unwrap();
    for _ in 0..25 {
        last -= 1.0;
        closes.push(last);
    }

    let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    CandleSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                time: base + chrono::Duration::minutes(15 * i as i64),
                open: close,
                high: close + 0.1,
                low: close - 0.1,
                close,
                volume: 1.0,
            })
            .collect(),
    )
    .unwrap()
}

fn config() -> ScannerConfig {
    ScannerConfig {
        timeframes: vec![Timeframe::M15],
        ..ScannerConfig::default()
    }
}

fn source_with(symbol: &SmolStr) -> Arc<HistoricSource> {
    let mut source = HistoricSource::default();
    source.insert(symbol.clone(), Timeframe::M15, sell_off_series());
    Arc::new(source)
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _: &Alert) -> Result<(), DeliveryError> {
        Err(DeliveryError("telegram unreachable".into()))
    }
}

/// Store whose writes always fail, as if the backing disk were full.
#[derive(Debug)]
struct FailingStore;

impl LedgerStore for FailingStore {
    fn get(&self, _: &str) -> Option<DateTime<Utc>> {
        None
    }

    fn put(&mut self, _: &str, _: DateTime<Utc>) -> Result<(), LedgerError> {
        Err(LedgerError::Io("disk full".to_owned()))
    }

    fn remove(&mut self, _: &str) -> Result<(), LedgerError> {
        Ok(())
    }

    fn scan_prefix(&self, _: &str) -> Vec<DateTime<Utc>> {
        Vec::new()
    }

    fn sweep(&mut self, _: DateTime<Utc>) -> Result<usize, LedgerError> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_scan_delivers_oversold_alert_once() {
    let symbol = SmolStr::new("BTC/USDT");
    let (notifier, mut rx) = ChannelNotifier::new();
    let scanner = Scanner::new(
        source_with(&symbol),
        DedupLedger::new(InMemoryStore::default(), config().dedup),
        notifier,
        config(),
    );

    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.symbols, 1);
    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.suppressed, 0);
    assert!(summary.errors.is_empty());

    let alert = rx.try_recv().unwrap();
    assert_eq!(alert.symbol, symbol);
    assert_eq!(alert.timeframe, Timeframe::M15);
    assert_eq!(alert.signal, Signal::Oversold);
    assert!(alert.price.is_some());
    assert_eq!(alert.readings.len(), 1);

    // Same condition immediately afterwards: suppressed by the cooldown.
    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.suppressed, 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_delivery_failure_is_not_recorded() {
    let symbol = SmolStr::new("BTC/USDT");
    let scanner = Scanner::new(
        source_with(&symbol),
        DedupLedger::new(InMemoryStore::default(), config().dedup),
        FailingNotifier,
        config(),
    );

    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivery_failures, 1);
    assert_eq!(summary.delivered, 0);
    assert!(matches!(
        summary.errors.as_slice(),
        [StochwatchError::Delivery(_)]
    ));

    // The failed alert was never recorded, so the next cycle retries it rather
    // than finding a cooldown record.
    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivery_failures, 1);
    assert_eq!(summary.suppressed, 0);
}

#[tokio::test]
async fn test_insufficient_candles_degrade_to_no_signal() {
    let symbol = SmolStr::new("DOGE/USDT");
    let mut source = HistoricSource::default();
    source.insert(symbol.clone(), Timeframe::M15, sell_off_series().tail(10));

    let (notifier, mut rx) = ChannelNotifier::new();
    let scanner = Scanner::new(
        Arc::new(source),
        DedupLedger::new(InMemoryStore::default(), config().dedup),
        notifier,
        config(),
    );

    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.suppressed, 0);
    assert!(summary.errors.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unknown_symbol_does_not_abort_batch() {
    let known = SmolStr::new("BTC/USDT");
    let unknown = SmolStr::new("NOPE/USDT");

    let (notifier, mut rx) = ChannelNotifier::new();
    let scanner = Scanner::new(
        source_with(&known),
        DedupLedger::new(InMemoryStore::default(), config().dedup),
        notifier,
        config(),
    );

    let summary = scanner.scan(&[unknown, known.clone()]).await;
    assert_eq!(summary.symbols, 2);
    assert_eq!(summary.delivered, 1);
    assert!(matches!(
        summary.errors.as_slice(),
        [StochwatchError::Data(_)]
    ));
    assert_eq!(rx.try_recv().unwrap().symbol, known);
}

#[tokio::test]
async fn test_ledger_write_failure_does_not_abort_batch() {
    let first = SmolStr::new("AAA/USDT");
    let second = SmolStr::new("BBB/USDT");
    let mut source = HistoricSource::default();
    source.insert(first.clone(), Timeframe::M15, sell_off_series());
    source.insert(second.clone(), Timeframe::M15, sell_off_series());

    let (notifier, mut rx) = ChannelNotifier::new();
    let scanner = Scanner::new(
        Arc::new(source),
        DedupLedger::new(FailingStore, config().dedup),
        notifier,
        config(),
    );

    // Both symbols still deliver even though every ledger write fails.
    let summary = scanner.scan(&[first.clone(), second.clone()]).await;
    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.ledger_failures, 2);
    assert!(matches!(
        summary.errors.as_slice(),
        [StochwatchError::Ledger(_), StochwatchError::Ledger(_)]
    ));

    assert_eq!(rx.try_recv().unwrap().symbol, first);
    assert_eq!(rx.try_recv().unwrap().symbol, second);
}

/// A long linear decline pins the SMI %K and %D to the identical constant; a
/// sharp bounce on the final candle lifts %K through %D while the midpoint
/// stays deep in the oversold zone.
///
/// High/low offsets are 0.5 so every rolling and smoothed intermediate is
/// exact in binary floating point: during the decline relative = -4.5 and
/// range = 10.0 on every defined bar, giving %K = %D = -90 exactly.
fn smi_bounce_series() -> CandleSeries {
    let mut closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    closes.push(64.0);

    let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    CandleSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                time: base + chrono::Duration::minutes(15 * i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1.0,
            })
            .collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_smi_crossover_scan_end_to_end() {
    let symbol = SmolStr::new("SOL/USDT");
    let mut source = HistoricSource::default();
    source.insert(symbol.clone(), Timeframe::M15, smi_bounce_series());

    let config = ScannerConfig::smi_crossover();
    let (notifier, mut rx) = ChannelNotifier::new();
    let scanner = Scanner::new(
        Arc::new(source),
        DedupLedger::new(InMemoryStore::default(), config.dedup.clone()),
        notifier,
        config,
    );

    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.suppressed, 0);
    assert!(summary.errors.is_empty());

    let alert = rx.try_recv().unwrap();
    assert_eq!(alert.symbol, symbol);
    assert_eq!(alert.signal, Signal::Oversold);
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(
        alert.candle_time,
        Some(base + chrono::Duration::minutes(40 * 15))
    );

    // Bounce bar: relative = -1.0, range = 9.0, so after the double EMA
    // (alpha = 1/2) %K = 200 * -3.625 / 9.75 and %D lags halfway behind.
    let cross = alert.cross.unwrap();
    assert_eq!(cross.direction, CrossDirection::Bullish);
    assert_eq!(cross.zone, Zone::Oversold);
    assert_eq!(cross.k_prev, -90.0);
    assert_eq!(cross.d_prev, -90.0);
    assert!((cross.k_curr - (-200.0 * 3.625 / 9.75)).abs() < 1e-9);
    assert!((cross.d_curr - (cross.k_curr - 90.0) / 2.0).abs() < 1e-9);
    assert_eq!(cross.k_at_cross, (cross.k_prev + cross.k_curr) / 2.0);

    // Identical candle on the next cycle: rejected by the per-candle ledger.
    let summary = scanner.scan(std::slice::from_ref(&symbol)).await;
    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.suppressed, 1);
    assert!(rx.try_recv().is_err());
}
