//! The matching loop shared by the Entry and Exit Stages.
//!
//! Walks a price queue against the current best bid/ask and emits one `bid_fill`/`ask_fill` per
//! match, decrementing book liquidity and bank-roll balances as it goes. Both the Entry Stage
//! (`take_from_bids`/`take_from_asks` orders) and the Exit Stage (`give_to_bids`/`give_to_asks`
//! orders) reuse this loop against their own, independently-owned queues.
use crate::error::BacktestError;
use crate::event::{Fill, PositionExit, SizedSignal};
use crate::exchange::Exchange;
use crate::queue::PriceQueue;

/// Common identity fields every queued order (entry or exit) carries, needed to settle a fill.
pub trait OrderSource: Clone + PartialEq {
    fn position_ts(&self) -> i64;
    fn market_id(&self) -> &str;
    fn exchange_name(&self) -> &str;
    fn base_currency(&self) -> &str;
    fn quote_currency(&self) -> &str;
}

impl OrderSource for SizedSignal {
    fn position_ts(&self) -> i64 {
        self.position_ts
    }
    fn market_id(&self) -> &str {
        &self.signal.market_id
    }
    fn exchange_name(&self) -> &str {
        &self.signal.exchange_name
    }
    fn base_currency(&self) -> &str {
        &self.signal.base_currency
    }
    fn quote_currency(&self) -> &str {
        &self.signal.quote_currency
    }
}

impl OrderSource for PositionExit {
    fn position_ts(&self) -> i64 {
        self.position_ts
    }
    fn market_id(&self) -> &str {
        &self.market_id
    }
    fn exchange_name(&self) -> &str {
        &self.exchange_name
    }
    fn base_currency(&self) -> &str {
        &self.base_currency
    }
    fn quote_currency(&self) -> &str {
        &self.quote_currency
    }
}

/// Drains `queue` in priority order, matching eligible orders against `liquidity` at
/// `quote_price`, settling the bank roll and book liquidity for each match, and requeues
/// whatever wasn't matched (ineligible orders, or the unfilled remainder of one that ran out of
/// liquidity). Returns the fills produced, in match order.
pub fn run_matches<T: OrderSource>(
    queue: &mut PriceQueue<T>,
    exchange: &mut Exchange,
    market_id: &str,
    quote_price: f64,
    mut liquidity: f64,
    eligible: impl Fn(f64) -> bool,
    is_buy: bool,
) -> Result<Vec<Fill>, BacktestError> {
    let mut drained = Vec::with_capacity(queue.len());
    while let Some(order) = queue.pop() {
        drained.push(order);
    }

    let mut fills = Vec::new();
    for mut order in drained {
        if liquidity <= 0.0 || !eligible(order.limit_price) {
            queue.push_back(order);
            continue;
        }

        // `order.remaining` is quote-currency notional; book liquidity is base-currency, so
        // convert it to quote terms before comparing.
        let available_quote = liquidity * quote_price;
        let match_amount = order.remaining.min(available_quote);
        if match_amount <= 0.0 {
            queue.push_back(order);
            continue;
        }
        let match_base = match_amount / quote_price;

        let fee = exchange.taker_quoted_fee(match_amount);

        if is_buy {
            exchange
                .order_book_mut(market_id)?
                .remove_ask_liquidity(market_id, match_base)?;
            exchange
                .bank_roll_mut()
                .subtract(order.payload.quote_currency(), match_amount + fee)?;
            exchange
                .bank_roll_mut()
                .add(order.payload.base_currency(), match_base);
        } else {
            exchange
                .order_book_mut(market_id)?
                .remove_bid_liquidity(market_id, match_base)?;
            exchange
                .bank_roll_mut()
                .subtract(order.payload.base_currency(), match_base)?;
            exchange
                .bank_roll_mut()
                .add(order.payload.quote_currency(), match_amount - fee);
        }

        liquidity -= match_base;
        order.remaining -= match_amount;

        fills.push(Fill {
            position_ts: order.payload.position_ts(),
            market_id: market_id.to_string(),
            exchange_name: order.payload.exchange_name().to_string(),
            base_currency: order.payload.base_currency().to_string(),
            quote_currency: order.payload.quote_currency().to_string(),
            limit_price: order.limit_price,
            amount: match_amount,
            fee,
        });

        if order.remaining > 1e-12 {
            queue.push_back(order);
        }
    }

    Ok(fills)
}
