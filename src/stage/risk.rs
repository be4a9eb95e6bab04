//! Risk Stage: sizes `long`/`short` signals via the Kelly criterion and rejects what the
//! exchange can't support. A sized order that fails a bounds check is dropped silently rather
//! than raising.
use tracing::debug;

use crate::error::BacktestError;
use crate::event::{Event, SizedSignal, TimedEvent};
use crate::exchange::ExchangeRegistry;

use super::Stage;

/// Kelly-criterion position fraction: `(p/a - (1-p)/b) / 100`, where `p` is `confidence_pct`,
/// `a` is `stop_loss_pct`, and `b` is `take_profit_pct`, all expressed as fractions in `(0, 1)`
/// (e.g. `0.7` confidence, `0.015` stop-loss) rather than percentage points.
pub fn kelly_fraction(confidence_pct: f64, stop_loss_pct: f64, take_profit_pct: f64) -> f64 {
    (confidence_pct / stop_loss_pct - (1.0 - confidence_pct) / take_profit_pct) / 100.0
}

#[derive(Debug, Default)]
pub struct RiskStage;

impl RiskStage {
    pub fn new() -> Self {
        Self
    }

    fn size(
        &self,
        registry: &mut ExchangeRegistry,
        signal: &crate::event::Signal,
    ) -> Result<Option<f64>, BacktestError> {
        let fraction = kelly_fraction(
            signal.confidence_pct,
            signal.stop_loss_pct,
            signal.take_profit_pct,
        );
        if fraction <= 0.0 || signal.price <= 0.0 {
            return Ok(None);
        }

        let exchange = registry.get(&signal.exchange_name)?;
        let balance = exchange.bank_roll().get(&signal.quote_currency);
        let notional = fraction * balance;

        if notional <= 0.0 || !exchange.check_size(&signal.market_id, notional) {
            return Ok(None);
        }

        let fee = exchange.taker_quoted_fee(notional);
        if notional + fee > balance {
            return Ok(None);
        }

        Ok(Some(notional))
    }
}

impl Stage for RiskStage {
    fn process(
        &mut self,
        registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        let (signal, is_long) = match &event.event {
            Event::Long(signal) => (signal.clone(), true),
            Event::Short(signal) => (signal.clone(), false),
            _ => return super::passthrough(event),
        };

        let Some(amount) = self.size(registry, &signal)? else {
            debug!(market_id = %signal.market_id, is_long, "risk stage rejected signal");
            return Ok(vec![]);
        };

        let sized = SizedSignal {
            signal,
            position_ts: event.unix_ts_ns,
            amount,
        };

        let (executed, take_from) = if is_long {
            (
                Event::LongExecuted(sized.clone()),
                Event::TakeFromAsks(sized),
            )
        } else {
            (
                Event::ShortExecuted(sized.clone()),
                Event::TakeFromBids(sized),
            )
        };

        Ok(vec![
            TimedEvent::new(event.unix_ts_ns, executed),
            TimedEvent::new(event.unix_ts_ns, take_from),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Signal;
    use crate::test_support::registry_with_exchange;

    fn registry_with_balance(balance: f64) -> ExchangeRegistry {
        registry_with_exchange("kraken", 0.001, balance)
    }

    fn long_signal() -> Signal {
        Signal {
            market_id: "btc_usd".into(),
            exchange_name: "kraken".into(),
            base_currency: "BTC".into(),
            quote_currency: "USD".into(),
            price: 100.0,
            confidence_pct: 0.7,
            stop_loss_pct: 0.01,
            take_profit_pct: 0.02,
        }
    }

    #[test]
    fn accepted_signal_emits_executed_and_take_from() {
        let mut registry = registry_with_balance(10_000.0);
        let mut stage = RiskStage::new();
        let event = TimedEvent::new(1, Event::Long(long_signal()));
        let out = stage.process(&mut registry, event).unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].event, Event::LongExecuted(_)));
        assert!(matches!(out[1].event, Event::TakeFromAsks(_)));
    }

    #[test]
    fn zero_balance_is_rejected_silently() {
        let mut registry = registry_with_balance(0.0);
        let mut stage = RiskStage::new();
        let event = TimedEvent::new(1, Event::Long(long_signal()));
        let out = stage.process(&mut registry, event).unwrap();
        assert!(out.is_empty());
    }
}
