//! Test-only builder helpers for exchanges and events, mirroring the `test_util::order_event()`
//! convention referenced from `barter`'s own `src/execution/simulated.rs`.
use crate::event::{BookUpdate, Event, TimedEvent};
use crate::exchange::fees::StaticFeeSchedule;
use crate::exchange::{Exchange, ExchangeRegistry, SizeLimits};

pub fn registry_with_exchange(exchange_name: &str, taker_pct: f64, balance: f64) -> ExchangeRegistry {
    let mut registry = ExchangeRegistry::new();
    let mut exchange = Exchange::new(
        exchange_name,
        Box::new(StaticFeeSchedule::new(taker_pct)),
        SizeLimits::new(),
    );
    exchange.bank_roll_mut().set("USD", balance);
    registry.register(exchange);
    registry
}

pub fn best_bid(ts: i64, exchange_name: &str, market_id: &str, price: f64, liquidity: f64) -> TimedEvent {
    TimedEvent::new(
        ts,
        Event::BestBid(BookUpdate {
            exchange_name: exchange_name.to_string(),
            market_id: market_id.to_string(),
            price,
            liquidity,
        }),
    )
}

pub fn best_ask(ts: i64, exchange_name: &str, market_id: &str, price: f64, liquidity: f64) -> TimedEvent {
    TimedEvent::new(
        ts,
        Event::BestAsk(BookUpdate {
            exchange_name: exchange_name.to_string(),
            market_id: market_id.to_string(),
            price,
            liquidity,
        }),
    )
}
