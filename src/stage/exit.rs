//! Exit Stage: queues position-close orders (from the Position Stage) and matches them against
//! the book.
//!
//! `give_to_bids`/`give_to_asks` events append to their own bid/ask queues, reusing the same
//! matching-loop shape as the Entry Stage but against independent queue state. A long position
//! closes by *selling* to the bid side; a short position closes by *buying* from the ask side.
use crate::error::BacktestError;
use crate::event::{Event, ExitQueueAppend, PositionExit, TimedEvent};
use crate::exchange::ExchangeRegistry;
use crate::queue::{PriceQueue, QueueOrder};

use super::execution::run_matches;
use super::Stage;

/// Holds the sell-to-bid (closing longs) and buy-from-ask (closing shorts) exit queues for one
/// market.
pub struct ExitStage {
    exchange_name: String,
    market_id: String,
    sell_queue: PriceQueue<PositionExit>,
    buy_queue: PriceQueue<PositionExit>,
}

impl ExitStage {
    pub fn new(exchange_name: impl Into<String>, market_id: impl Into<String>) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            market_id: market_id.into(),
            sell_queue: PriceQueue::new(QueueOrder::Max),
            buy_queue: PriceQueue::new(QueueOrder::Min),
        }
    }

    fn is_our_market(&self, exchange_name: &str, market_id: &str) -> bool {
        self.exchange_name == exchange_name && self.market_id == market_id
    }
}

impl Stage for ExitStage {
    fn process(
        &mut self,
        registry: &mut ExchangeRegistry,
        event: TimedEvent,
    ) -> Result<Vec<TimedEvent>, BacktestError> {
        match &event.event {
            Event::GiveToBids(exit) if self.is_our_market(&exit.exchange_name, &exit.market_id) => {
                let exit = exit.clone();
                self.sell_queue.push(exit.price, exit.amount, exit.clone());
                Ok(vec![TimedEvent::new(
                    event.unix_ts_ns,
                    Event::ExitBidQueueAppend(ExitQueueAppend {
                        initial_amount: exit.amount,
                        exit,
                    }),
                )])
            }
            Event::GiveToAsks(exit) if self.is_our_market(&exit.exchange_name, &exit.market_id) => {
                let exit = exit.clone();
                self.buy_queue.push(exit.price, exit.amount, exit.clone());
                Ok(vec![TimedEvent::new(
                    event.unix_ts_ns,
                    Event::ExitAskQueueAppend(ExitQueueAppend {
                        initial_amount: exit.amount,
                        exit,
                    }),
                )])
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
            _ => super::passthrough(event),
        }
    }
}
