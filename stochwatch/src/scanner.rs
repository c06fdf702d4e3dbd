use crate::{
    aggregate::{SymbolAnalysis, aggregate, alert_key},
    config::{ScannerConfig, SignalPolicy},
    error::StochwatchError,
    ledger::{DedupLedger, LedgerStore},
    notify::Notifier,
    signal::{TimeframeReading, classify},
};
use chrono::Utc;
use smol_str::SmolStr;
use std::sync::Arc;
use stochwatch_ta::CrossScan;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Counters and non-fatal failures summarising one scan cycle.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ScanSummary {
    pub symbols: usize,
    pub delivered: usize,
    pub suppressed: usize,
    pub delivery_failures: usize,
    /// Ledger writes that failed after a confirmed delivery: the alert went
    /// out but may repeat next cycle because no record suppresses it.
    pub ledger_failures: usize,
    /// Every failure swallowed during the cycle, for callers that report more
    /// than counters.
    pub errors: Vec<StochwatchError>,
}

/// Drives the full pipeline for a batch of symbols.
///
/// Symbols are analysed concurrently (bounded by `max_concurrency`); the
/// oscillator engines are pure functions over immutable candles, so the fan-out
/// shares nothing mutable. After an explicit join barrier, aggregation, ledger
/// checks and delivery run serially - the ledger has exactly one writer.
#[derive(Debug)]
pub struct Scanner<Source, Store, Sink> {
    source: Arc<Source>,
    ledger: DedupLedger<Store>,
    notifier: Sink,
    config: ScannerConfig,
}

impl<Source, Store, Sink> Scanner<Source, Store, Sink>
where
    Source: stochwatch_data::CandleSource + Send + Sync + 'static,
    Store: LedgerStore + Send,
    Sink: Notifier,
{
    pub fn new(
        source: Arc<Source>,
        ledger: DedupLedger<Store>,
        notifier: Sink,
        config: ScannerConfig,
    ) -> Self {
        Self {
            source,
            ledger,
            notifier,
            config,
        }
    }

    pub fn ledger(&self) -> &DedupLedger<Store> {
        &self.ledger
    }

    /// Run one scan cycle over the provided symbols.
    ///
    /// Delivery is attempted before the ledger write, and the write happens
    /// only on confirmed delivery: a failed delivery re-arms on the next cycle
    /// instead of being silently suppressed forever.
    ///
    /// Never fails: every failure inside the cycle degrades to "no alert" (or
    /// "no record") for the affected item and is reported in the summary.
    pub async fn scan(&self, symbols: &[SmolStr]) -> ScanSummary {
        let now = Utc::now();
        let mut summary = ScanSummary {
            symbols: symbols.len(),
            ..ScanSummary::default()
        };

        match self.ledger.sweep(now) {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "swept stale ledger records"),
            Err(error) => {
                warn!(%error, "ledger sweep failed, continuing cycle");
                summary.errors.push(error.into());
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let tasks: Vec<_> = symbols
            .iter()
            .cloned()
            .map(|symbol| {
                let source = Arc::clone(&self.source);
                let config = self.config.clone();
                let semaphore = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    analyse_symbol(source, config, symbol).await
                })
            })
            .collect();

        // Join barrier: every worker completes before any ledger access.
        let analyses = futures::future::join_all(tasks).await;

        for joined in analyses {
            let analysis = match joined {
                Ok(analysis) => analysis,
                Err(error) => {
                    warn!(%error, "symbol analysis task panicked, skipping");
                    summary.errors.push(error.into());
                    continue;
                }
            };

            for alert in aggregate(&analysis, &self.config) {
                let key = alert_key(&alert);
                if !self.ledger.can_alert(&key, now) {
                    debug!(
                        symbol = %alert.symbol,
                        signal = %alert.signal,
                        "alert suppressed by dedup ledger"
                    );
                    summary.suppressed += 1;
                    continue;
                }

                match self.notifier.notify(&alert).await {
                    Ok(()) => {
                        if let Err(error) = self.ledger.record(&key, now) {
                            // Delivery already happened; the missing record
                            // only risks a repeat, never a lost alert.
                            warn!(
                                symbol = %alert.symbol,
                                %error,
                                "ledger write failed, alert may repeat next cycle"
                            );
                            summary.ledger_failures += 1;
                            summary.errors.push(error.into());
                        }
                        info!(
                            symbol = %alert.symbol,
                            timeframe = %alert.timeframe,
                            signal = %alert.signal,
                            "alert delivered"
                        );
                        summary.delivered += 1;
                    }
                    Err(error) => {
                        // Not recorded: eligible for retry on the next cycle.
                        warn!(symbol = %alert.symbol, %error, "alert delivery failed");
                        summary.delivery_failures += 1;
                        summary.errors.push(error.into());
                    }
                }
            }

            summary
                .errors
                .extend(analysis.errors.into_iter().map(StochwatchError::from));
        }

        summary
    }
}

/// Analyse one symbol across every configured timeframe.
///
/// All failure paths degrade to "no signal" for the affected timeframe; nothing
/// here aborts the batch.
async fn analyse_symbol<Source>(
    source: Arc<Source>,
    config: ScannerConfig,
    symbol: SmolStr,
) -> SymbolAnalysis
where
    Source: stochwatch_data::CandleSource + Send + Sync,
{
    let mut analysis = SymbolAnalysis {
        symbol: symbol.clone(),
        time: Utc::now(),
        readings: Vec::new(),
        crosses: Vec::new(),
        latest_close: None,
        errors: Vec::new(),
    };

    for &timeframe in &config.timeframes {
        let series = match source.fetch(&symbol, timeframe, config.candles_limit).await {
            Ok(series) => series,
            Err(error) => {
                warn!(%symbol, %timeframe, %error, "fetch failed, skipping timeframe");
                analysis.errors.push(error);
                continue;
            }
        };

        if series.len() < config.min_candles.max(config.engine.warmup() + 1) {
            debug!(
                %symbol,
                %timeframe,
                candles = series.len(),
                "insufficient candles, no signal"
            );
            continue;
        }

        let oscillator = config.engine.compute(&series);

        if timeframe == config.primary_timeframe {
            analysis.latest_close = series.last().map(|candle| candle.close);
        }

        if let Some((k, d)) = oscillator.latest() {
            analysis
                .readings
                .push(TimeframeReading::new(timeframe, k, d, classify(k, d, &config.zones)));
        } else {
            debug!(%symbol, %timeframe, "latest oscillator state undefined, no signal");
        }

        if let SignalPolicy::CrossGated {
            window,
            include_open,
        } = config.policy
            && timeframe == config.primary_timeframe
        {
            let scan = CrossScan {
                window,
                include_open,
                zones: config.zones,
            };
            analysis
                .crosses
                .extend(scan.detect(&oscillator, &series.times()));
        }
    }

    analysis
}
