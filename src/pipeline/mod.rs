//! The composed six-stage pipeline.
//!
//! A [`Pipeline`] is a left-fold over a fixed list of stages: each stage consumes the event
//! list the previous stage produced, in order. `Pipeline::run` implements exactly that fold
//! over [`Stage`] trait objects.
pub mod backtest;
pub mod summary;

use crate::error::BacktestError;
use crate::event::TimedEvent;
use crate::exchange::ExchangeRegistry;
use crate::stage::signal::SignalGenerator;
use crate::stage::{DataStage, EntryStage, ExitStage, PositionStage, RiskStage, SignalStage, Stage};

pub use backtest::{Backtest, Ensemble};
pub use summary::BacktestSummary;

/// An ordered sequence of [`Stage`]s. `Pipeline::run` folds one input event through every
/// stage in turn, flattening each stage's output list before handing it to the next.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Assembles the six built-in stages in fixed order — Data, Signal, Risk, Entry, Position,
    /// Exit — for a single `(exchange_name, market_id)` pair.
    pub fn standard<G>(
        exchange_name: impl Into<String>,
        market_id: impl Into<String>,
        signal_generator: G,
    ) -> Self
    where
        G: SignalGenerator + 'static,
    {
        let exchange_name = exchange_name.into();
        let market_id = market_id.into();
        Self::new(vec![
            Box::new(DataStage::new()),
            Box::new(SignalStage::new(signal_generator)),
            Box::new(RiskStage::new()),
            Box::new(EntryStage::new(exchange_name.clone(), market_id.clone())),
            Box::new(PositionStage::new()),
            Box::new(ExitStage::new(exchange_name, market_id)),
        ])
    }

    pub fn run(
        &mut self,
        registry: &mut ExchangeRegistry,
        events: Vec<TimedEvent>,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        let mut current = events;
        for stage in &mut self.stages {
            let mut next = Vec::with_capacity(current.len());
            for event in current {
                next.extend(stage.process(registry, event)?);
            }
            current = next;
        }
        Ok(current)
    }
}
