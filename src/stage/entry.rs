//! Entry Stage: queues sized entry orders and matches them against the book.
//!
//! `take_from_asks`/`take_from_bids` events append to the ask/bid queues; the matching loop
//! fires on every `best_ask`/`best_bid` update. One `EntryStage` instance is scoped to a single
//! `(exchange_name, market_id)`, mirroring `barter`'s one-`Trader`-per-market architecture
//! (`src/engine/trader.rs`); events for other markets pass through untouched.
use crate::error::BacktestError;
use crate::event::{Event, EntryQueueAppend, TimedEvent};
use crate::exchange::ExchangeRegistry;
use crate::queue::{PriceQueue, QueueOrder};

use super::execution::run_matches;
use super::Stage;

/// Holds the long (buy, matched against asks) and short (sell, matched against bids) entry
/// queues for one market.
pub struct EntryStage {
    exchange_name: String,
    market_id: String,
    buy_queue: PriceQueue<crate::event::SizedSignal>,
    sell_queue: PriceQueue<crate::event::SizedSignal>,
}

impl EntryStage {
    pub fn new(exchange_name: impl Into<String>, market_id: impl Into<String>) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            market_id: market_id.into(),
            buy_queue: PriceQueue::new(QueueOrder::Min),
            sell_queue: PriceQueue::new(QueueOrder::Max),
        }
    }

    fn is_our_market(&self, exchange_name: &str, market_id: &str) -> bool {
        self.exchange_name == exchange_name && self.market_id == market_id
    }
}

impl Stage for EntryStage {
    fn process(
        &mut self,
        registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        match &event.event {
            Event::TakeFromAsks(sized) if self.is_our_market(&sized.signal.exchange_name, &sized.signal.market_id) => {
                let sized = sized.clone();
                self.buy_queue.push(sized.signal.price, sized.amount, sized.clone());
                Ok(vec![TimedEvent::new(
                    event.unix_ts_ns,
                    Event::EntryAskQueueAppend(EntryQueueAppend {
                        initial_amount: sized.amount,
                        order: sized,
                    }),
                )])
            }
            Event::TakeFromBids(sized) if self.is_our_market(&sized.signal.exchange_name, &sized.signal.market_id) => {
                let sized = sized.clone();
                self.sell_queue.push(sized.signal.price, sized.amount, sized.clone());
                Ok(vec![TimedEvent::new(
                    event.unix_ts_ns,
                    Event::EntryBidQueueAppend(EntryQueueAppend {
                        initial_amount: sized.amount,
                        order: sized,
                    }),
                )])
            }
            Event::BestAsk(update) if self.is_our_market(&update.exchange_name, &update.market_id) => {
                let (market_id, price, liquidity) =
                    (update.market_id.clone(), update.price, update.liquidity);
                let ts = event.unix_ts_ns;
                let mut out = vec![event];
                let exchange = registry.get_mut(&self.exchange_name)?;
                let fills = run_matches(
                    &mut self.buy_queue,
                    exchange,
                    &market_id,
                    price,
                    liquidity,
                    |limit| price <= limit,
                    true,
                )?;
                out.extend(fills.into_iter().map(|fill| TimedEvent::new(ts, Event::AskFill(fill))));
                Ok(out)
            }
            Event::BestBid(update) if self.is_our_market(&update.exchange_name, &update.market_id) => {
                let (market_id, price, liquidity) =
                    (update.market_id.clone(), update.price, update.liquidity);
                let ts = event.unix_ts_ns;
                let mut out = vec![event];
                let exchange = registry.get_mut(&self.exchange_name)?;
                let fills = run_matches(
                    &mut self.sell_queue,
                    exchange,
                    &market_id,
                    price,
                    liquidity,
                    |limit| price >= limit,
                    false,
                )?;
                out.extend(fills.into_iter().map(|fill| TimedEvent::new(ts, Event::BidFill(fill))));
                Ok(out)
            }
            _ => super::passthrough(event),
        }
    }
}
