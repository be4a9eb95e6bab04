//! Data Stage: maintains each market's order book and derives mid-market price/returns from
//! `best_bid`/`best_ask` updates, emitting a derived event once both sides of a book, and then
//! two successive mid-market prices, are known.
use std::collections::HashMap;

use tracing::debug;

use crate::error::BacktestError;
use crate::event::{Event, MidMarketPrice, MidMarketPriceReturns, TimedEvent};
use crate::exchange::ExchangeRegistry;

use super::Stage;

/// `(exchange_name, market_id)` key into the previous-mid-price table.
type MarketKey = (String, String);

#[derive(Debug, Default)]
pub struct DataStage {
    prev_mid: HashMap<MarketKey, f64>,
}

impl DataStage {
    pub fn new() -> Self {
        Self::default()
    }

    fn on_quote_update(
        &mut self,
        registry: &mut ExchangeRegistry,
        exchange_name: &str,
        market_id: &str,
        passthrough: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        let mut out = vec![passthrough.clone()];

        let exchange = registry.get(exchange_name)?;
        let Some(book) = exchange.order_book(market_id) else {
            return Ok(out);
        };
        let Some(mid) = book.mid_market_price() else {
            return Ok(out);
        };

        out.push(TimedEvent::new(
            passthrough.unix_ts_ns,
            Event::MidMarketPrice(MidMarketPrice {
                market_id: market_id.to_string(),
                exchange_name: exchange_name.to_string(),
                mid_market_price: mid,
            }),
        ));

        let key = (exchange_name.to_string(), market_id.to_string());
        if let Some(&prev) = self.prev_mid.get(&key) {
            if prev != 0.0 {
                let lin = (mid - prev) / prev;
                let log = (mid / prev).ln();
                out.push(TimedEvent::new(
                    passthrough.unix_ts_ns,
                    Event::MidMarketPriceReturns(MidMarketPriceReturns {
                        market_id: market_id.to_string(),
                        exchange_name: exchange_name.to_string(),
                        lin,
                        log,
                    }),
                ));
            } else {
                debug!(market_id, "skipping returns: previous mid-market price was zero");
            }
        }
        self.prev_mid.insert(key, mid);

        Ok(out)
    }
}

impl Stage for DataStage {
    fn process(
        &mut self,
        registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        match &event.event {
            Event::BestBid(update) => {
                let (exchange_name, market_id) = (update.exchange_name.clone(), update.market_id.clone());
                registry
                    .get_mut(&exchange_name)?
                    .set_best_bid(&market_id, update.price, update.liquidity);
                self.on_quote_update(registry, &exchange_name, &market_id, event)
            }
            Event::BestAsk(update) => {
                let (exchange_name, market_id) = (update.exchange_name.clone(), update.market_id.clone());
                registry
                    .get_mut(&exchange_name)?
                    .set_best_ask(&market_id, update.price, update.liquidity);
                self.on_quote_update(registry, &exchange_name, &market_id, event)
            }
            _ => super::passthrough(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{best_ask, best_bid, registry_with_exchange};

    fn registry_with_kraken() -> ExchangeRegistry {
        registry_with_exchange("kraken", 0.0, 0.0)
    }

    fn bid(ts: i64, price: f64, liquidity: f64) -> TimedEvent {
        best_bid(ts, "kraken", "btc_usd", price, liquidity)
    }

    fn ask(ts: i64, price: f64, liquidity: f64) -> TimedEvent {
        best_ask(ts, "kraken", "btc_usd", price, liquidity)
    }

    #[test]
    fn emits_mid_market_price_once_both_sides_known() {
        let mut registry = registry_with_kraken();
        let mut stage = DataStage::new();

        let out = stage.process(&mut registry, bid(1, 99.0, 1.0)).unwrap();
        assert_eq!(out.len(), 1);

        let out = stage.process(&mut registry, ask(2, 101.0, 1.0)).unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1].event, Event::MidMarketPrice(ref m) if m.mid_market_price == 100.0));
    }

    #[test]
    fn emits_returns_on_second_mid_price() {
        let mut registry = registry_with_kraken();
        let mut stage = DataStage::new();

        stage.process(&mut registry, bid(1, 99.0, 1.0)).unwrap();
        stage.process(&mut registry, ask(2, 101.0, 1.0)).unwrap();
        let out = stage.process(&mut registry, bid(3, 100.0, 1.0)).unwrap();

        assert_eq!(out.len(), 3);
        match &out[2].event {
            Event::MidMarketPriceReturns(r) => {
                assert!((r.lin - 0.005).abs() < 1e-9);
            }
            other => panic!("expected returns event, got {other:?}"),
        }
    }
}
