//! Position Stage: tracks open longs/shorts, keyed by `position_ts`, and closes them against
//! the incoming mid-market price. Every `mid_market_price` event triggers a check that emits
//! one `give_to_bids`/`give_to_asks` exit order per fill of any position that has crossed its
//! stop-loss or take-profit threshold.
use std::collections::HashMap;

use crate::error::BacktestError;
use crate::event::{Event, PositionExit, TimedEvent};
use crate::exchange::ExchangeRegistry;
use crate::position::{Direction, Position};

use super::Stage;

#[derive(Debug, Default)]
pub struct PositionStage {
    open_longs: HashMap<i64, Position>,
    open_shorts: HashMap<i64, Position>,
}

impl PositionStage {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_closes(&mut self, market_id: &str, current_mid: f64, ts: i64) -> Vec<TimedEvent> {
        let mut out = Vec::new();

        let closing_ts: Vec<i64> = self
            .open_longs
            .values()
            .filter(|p| p.market_id == market_id && p.should_close(current_mid))
            .map(|p| p.position_ts)
            .collect();
        for position_ts in closing_ts {
            if let Some(position) = self.open_longs.remove(&position_ts) {
                out.extend(exit_events(&position, ts, Event::GiveToBids));
            }
        }

        let closing_ts: Vec<i64> = self
            .open_shorts
            .values()
            .filter(|p| p.market_id == market_id && p.should_close(current_mid))
            .map(|p| p.position_ts)
            .collect();
        for position_ts in closing_ts {
            if let Some(position) = self.open_shorts.remove(&position_ts) {
                out.extend(exit_events(&position, ts, Event::GiveToAsks));
            }
        }

        out
    }
}

fn exit_events(
    position: &Position,
    ts: i64,
    wrap: fn(PositionExit) -> Event,
) -> Vec<TimedEvent> {
    position
        .fills
        .iter()
        .map(|fill| {
            TimedEvent::new(
                ts,
                wrap(PositionExit {
                    position_ts: position.position_ts,
                    market_id: position.market_id.clone(),
                    exchange_name: position.exchange_name.clone(),
                    base_currency: position.base_currency.clone(),
                    quote_currency: position.quote_currency.clone(),
                    stop_loss_pct: position.stop_loss_pct,
                    take_profit_pct: position.take_profit_pct,
                    price: fill.limit_price,
                    amount: fill.amount,
                }),
            )
        })
        .collect()
}

impl Stage for PositionStage {
    fn process(
        &mut self,
        _registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        match &event.event {
            Event::LongExecuted(sized) => {
                let sized = sized.clone();
                self.open_longs.insert(
                    sized.position_ts,
                    Position::new(
                        sized.position_ts,
                        Direction::Long,
                        sized.signal.market_id,
                        sized.signal.exchange_name,
                        sized.signal.base_currency,
                        sized.signal.quote_currency,
                        sized.signal.stop_loss_pct,
                        sized.signal.take_profit_pct,
                    ),
                );
                super::passthrough(event)
            }
            Event::ShortExecuted(sized) => {
                let sized = sized.clone();
                self.open_shorts.insert(
                    sized.position_ts,
                    Position::new(
                        sized.position_ts,
                        Direction::Short,
                        sized.signal.market_id,
                        sized.signal.exchange_name,
                        sized.signal.base_currency,
                        sized.signal.quote_currency,
                        sized.signal.stop_loss_pct,
                        sized.signal.take_profit_pct,
                    ),
                );
                super::passthrough(event)
            }
            Event::AskFill(fill) => {
                let position = self
                    .open_longs
                    .get_mut(&fill.position_ts)
                    .ok_or(BacktestError::UnknownPosition {
                        position_ts: fill.position_ts,
                    })?;
                position.fills.push(fill.clone());
                super::passthrough(event)
            }
            Event::BidFill(fill) => {
                let position = self
                    .open_shorts
                    .get_mut(&fill.position_ts)
                    .ok_or(BacktestError::UnknownPosition {
                        position_ts: fill.position_ts,
                    })?;
                position.fills.push(fill.clone());
                super::passthrough(event)
            }
            Event::MidMarketPrice(m) => {
                let mut out = vec![event.clone()];
                out.extend(self.check_closes(&m.market_id, m.mid_market_price, event.unix_ts_ns));
                Ok(out)
            }
            _ => super::passthrough(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Fill, MidMarketPrice, Signal, SizedSignal};

    fn sized_signal() -> SizedSignal {
        SizedSignal {
            signal: Signal {
                market_id: "btc_usd".into(),
                exchange_name: "kraken".into(),
                base_currency: "BTC".into(),
                quote_currency: "USD".into(),
                price: 100.0,
                confidence_pct: 0.7,
                stop_loss_pct: 0.01,
                take_profit_pct: 0.02,
            },
            position_ts: 1,
            amount: 1.0,
        }
    }

    #[test]
    fn closes_long_on_take_profit_and_emits_give_to_bids() {
        let mut registry = ExchangeRegistry::new();
        let mut stage = PositionStage::new();

        stage
            .process(&mut registry, TimedEvent::new(1, Event::LongExecuted(sized_signal())))
            .unwrap();
        stage
            .process(
                &mut registry,
                TimedEvent::new(
                    1,
                    Event::AskFill(Fill {
                        position_ts: 1,
                        market_id: "btc_usd".into(),
                        exchange_name: "kraken".into(),
                        base_currency: "BTC".into(),
                        quote_currency: "USD".into(),
                        limit_price: 100.0,
                        amount: 1.0,
                        fee: 0.0,
                    }),
                ),
            )
            .unwrap();

        let out = stage
            .process(
                &mut registry,
                TimedEvent::new(
                    2,
                    Event::MidMarketPrice(MidMarketPrice {
                        market_id: "btc_usd".into(),
                        exchange_name: "kraken".into(),
                        mid_market_price: 103.0,
                    }),
                ),
            )
            .unwrap();

        assert_eq!(out.len(), 2);
        assert!(matches!(out[1].event, Event::GiveToBids(_)));
    }

    #[test]
    fn fill_for_unknown_position_is_fatal() {
        let mut registry = ExchangeRegistry::new();
        let mut stage = PositionStage::new();
        let result = stage.process(
            &mut registry,
            TimedEvent::new(
                1,
                Event::AskFill(Fill {
                    position_ts: 999,
                    market_id: "btc_usd".into(),
                    exchange_name: "kraken".into(),
                    base_currency: "BTC".into(),
                    quote_currency: "USD".into(),
                    limit_price: 100.0,
                    amount: 1.0,
                    fee: 0.0,
                }),
            ),
        );
        assert!(result.is_err());
    }
}
