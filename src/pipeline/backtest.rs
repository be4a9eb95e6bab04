//! The backtest driver: feeds a historical event stream through a [`Pipeline`] one event at a
//! time and records everything it emits.
use tracing::info;

use crate::error::BacktestError;
use crate::event::TimedEvent;
use crate::exchange::ExchangeRegistry;

use super::{BacktestSummary, Pipeline};

/// Owns the [`Pipeline`] and [`ExchangeRegistry`] for one run and drives events through them.
pub struct Backtest {
    pipeline: Pipeline,
    registry: ExchangeRegistry,
}

impl Backtest {
    pub fn new(pipeline: Pipeline, registry: ExchangeRegistry) -> Self {
        Self { pipeline, registry }
    }

    /// Runs every input event through the pipeline in order, one at a time, and returns a
    /// [`BacktestSummary`] over everything produced.
    pub fn execute(
        &mut self,
        inputs: impl IntoIterator<Item = TimedEvent>,
    ) -> Result<BacktestSummary, BacktestError> {
        let mut outputs = Vec::new();
        let mut start_ts_ns = None;
        let mut end_ts_ns = None;

        for input in inputs {
            let ts = input.unix_ts_ns;
            start_ts_ns = Some(start_ts_ns.map_or(ts, |s: i64| s.min(ts)));
            end_ts_ns = Some(end_ts_ns.map_or(ts, |e: i64| e.max(ts)));

            let produced = self.pipeline.run(&mut self.registry, vec![input])?;
            outputs.extend(produced);
        }

        info!(events = outputs.len(), "backtest complete");

        Ok(BacktestSummary {
            start_ts_ns: start_ts_ns.unwrap_or(0),
            end_ts_ns: end_ts_ns.unwrap_or(0),
            outputs,
        })
    }

    pub fn registry(&self) -> &ExchangeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ExchangeRegistry {
        &mut self.registry
    }
}

/// Extension point for running multiple [`Backtest`]s over a parameter grid. Parallel or
/// distributed execution over a grid is out of scope for this crate, so this type marks the
/// extension point without performing any execution itself.
#[derive(Debug, Default)]
pub struct Ensemble;

impl Ensemble {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BookUpdate, Event};
    use crate::exchange::fees::StaticFeeSchedule;
    use crate::exchange::{Exchange, SizeLimits};
    use crate::stage::NoopGenerator;

    #[test]
    fn execute_tracks_start_and_end_timestamps() {
        let mut registry = ExchangeRegistry::new();
        registry.register(Exchange::new(
            "kraken",
            Box::new(StaticFeeSchedule::new(0.0)),
            SizeLimits::new(),
        ));
        let pipeline = Pipeline::standard("kraken", "btc_usd", NoopGenerator);
        let mut backtest = Backtest::new(pipeline, registry);

        let inputs = vec![
            TimedEvent::new(
                10,
                Event::BestBid(BookUpdate {
                    exchange_name: "kraken".into(),
                    market_id: "btc_usd".into(),
                    price: 99.0,
                    liquidity: 1.0,
                }),
            ),
            TimedEvent::new(
                20,
                Event::BestAsk(BookUpdate {
                    exchange_name: "kraken".into(),
                    market_id: "btc_usd".into(),
                    price: 101.0,
                    liquidity: 1.0,
                }),
            ),
        ];

        let summary = backtest.execute(inputs).unwrap();
        assert_eq!(summary.start_ts_ns, 10);
        assert_eq!(summary.end_ts_ns, 20);
        assert!(!summary.outputs.is_empty());
    }
}
