//! Signal Stage: the one stage whose logic is entirely user-supplied.
//!
//! Grounded on `barter`'s `SignalGenerator` trait (`src/strategy/mod.rs`), which a strategy
//! implements to turn a `MarketEvent` into an advisory `SignalEvent`. Here a
//! [`SignalGenerator`] inspects whatever event just passed through Data Stage and optionally
//! emits a `long`/`short` [`Event`] alongside it.
use crate::error::BacktestError;
use crate::event::TimedEvent;
use crate::exchange::ExchangeRegistry;

use super::Stage;

/// Implemented by a user's trading strategy. Called once per event that reaches the Signal
/// Stage; returns `Some(event)` (expected to be [`crate::event::Event::Long`] or
/// [`crate::event::Event::Short`]) to advise a trade, or `None` to pass the input through
/// untouched.
pub trait SignalGenerator {
    fn generate_signal(&mut self, event: &TimedEvent) -> Option<crate::event::Event>;
}

/// Wraps a [`SignalGenerator`] as a [`Stage`]: the original event is always passed through,
/// with the generator's signal (if any) appended.
pub struct SignalStage<G> {
    generator: G,
}

impl<G: SignalGenerator> SignalStage<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

impl<G: SignalGenerator> Stage for SignalStage<G> {
    fn process(
        &mut self,
        _registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        let signal = self.generator.generate_signal(&event);
        let mut out = vec![event.clone()];
        if let Some(signal_event) = signal {
            out.push(TimedEvent::new(event.unix_ts_ns, signal_event));
        }
        Ok(out)
    }
}

/// A [`Stage`] that never generates a signal — pure passthrough. Useful when exercising the
/// rest of the pipeline in isolation, or as the default before a strategy is wired in.
#[derive(Debug, Default)]
pub struct PassthroughSignalStage;

impl Stage for PassthroughSignalStage {
    fn process(
        &mut self,
        _registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        super::passthrough(event)
    }
}

/// A [`SignalGenerator`] that never signals, for wiring [`SignalStage`] (and hence
/// [`super::super::pipeline::Pipeline::standard`]) up with no strategy attached.
#[derive(Debug, Default)]
pub struct NoopGenerator;

impl SignalGenerator for NoopGenerator {
    fn generate_signal(&mut self, _event: &TimedEvent) -> Option<crate::event::Event> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    struct AlwaysLong;
    impl SignalGenerator for AlwaysLong {
        fn generate_signal(&mut self, event: &TimedEvent) -> Option<Event> {
            match &event.event {
                Event::MidMarketPrice(m) => Some(Event::Long(crate::event::Signal {
                    market_id: m.market_id.clone(),
                    exchange_name: m.exchange_name.clone(),
                    base_currency: "BTC".into(),
                    quote_currency: "USD".into(),
                    price: m.mid_market_price,
                    confidence_pct: 0.6,
                    stop_loss_pct: 0.01,
                    take_profit_pct: 0.02,
                })),
                _ => None,
            }
        }
    }

    #[test]
    fn generator_appends_signal_after_passthrough() {
        let mut registry = ExchangeRegistry::new();
        let mut stage = SignalStage::new(AlwaysLong);
        let event = TimedEvent::new(
            1,
            Event::MidMarketPrice(crate::event::MidMarketPrice {
                market_id: "btc_usd".into(),
                exchange_name: "kraken".into(),
                mid_market_price: 100.0,
            }),
        );
        let out = stage.process(&mut registry, event).unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1].event, Event::Long(_)));
    }
}
