//! The Exchange Registry: named exchanges, each owning order books, a bank roll, a fee
//! schedule, and size limits.
pub mod balance;
pub mod book;
pub mod fees;
pub mod limits;
pub mod presets;

use std::collections::HashMap;
use std::fmt;

use crate::error::BacktestError;

pub use balance::BankRoll;
pub use book::OrderBook;
pub use fees::FeeSchedule;
pub use limits::{SizeLimit, SizeLimits};
pub use presets::ExchangePreset;

/// A single named exchange: one [`BankRoll`], one [`FeeSchedule`], one [`SizeLimits`] table,
/// and an order book per market created lazily on first quote.
pub struct Exchange {
    name: String,
    fee_schedule: Box<dyn FeeSchedule + Send + Sync>,
    size_limits: SizeLimits,
    bank_roll: BankRoll,
    order_books: HashMap<String, OrderBook>,
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("name", &self.name)
            .field("bank_roll", &self.bank_roll)
            .field("order_books", &self.order_books)
            .finish()
    }
}

impl Exchange {
    pub fn new(
        name: impl Into<String>,
        fee_schedule: Box<dyn FeeSchedule + Send + Sync>,
        size_limits: SizeLimits,
    ) -> Self {
        Self {
            name: name.into(),
            fee_schedule,
            size_limits,
            bank_roll: BankRoll::new(),
            order_books: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bank_roll(&self) -> &BankRoll {
        &self.bank_roll
    }

    pub fn bank_roll_mut(&mut self) -> &mut BankRoll {
        &mut self.bank_roll
    }

    pub fn taker_quoted_fee(&self, amount: f64) -> f64 {
        self.fee_schedule.taker_quoted_fee(amount)
    }

    pub fn check_size(&self, market_id: &str, amount: f64) -> bool {
        self.size_limits.check(market_id, amount)
    }

    pub fn order_book(&self, market_id: &str) -> Option<&OrderBook> {
        self.order_books.get(market_id)
    }

    pub fn order_book_mut(&mut self, market_id: &str) -> Result<&mut OrderBook, BacktestError> {
        self.order_books
            .get_mut(market_id)
            .ok_or_else(|| BacktestError::UnknownMarket {
                exchange_name: self.name.clone(),
                market_id: market_id.to_string(),
            })
    }

    pub fn set_best_bid(&mut self, market_id: &str, price: f64, liquidity: f64) {
        self.order_books
            .entry(market_id.to_string())
            .or_insert_with(OrderBook::new)
            .set_best_bid(price, liquidity);
    }

    pub fn set_best_ask(&mut self, market_id: &str, price: f64, liquidity: f64) {
        self.order_books
            .entry(market_id.to_string())
            .or_insert_with(OrderBook::new)
            .set_best_ask(price, liquidity);
    }
}

/// Maps exchange names to [`Exchange`] instances, the single source of truth for book/balance
/// state that stages mutate as events arrive.
#[derive(Default)]
pub struct ExchangeRegistry {
    exchanges: HashMap<String, Exchange>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self {
            exchanges: HashMap::new(),
        }
    }

    pub fn register(&mut self, exchange: Exchange) {
        self.exchanges.insert(exchange.name().to_string(), exchange);
    }

    pub fn get(&self, exchange_name: &str) -> Result<&Exchange, BacktestError> {
        self.exchanges
            .get(exchange_name)
            .ok_or_else(|| BacktestError::UnknownExchange(exchange_name.to_string()))
    }

    pub fn get_mut(&mut self, exchange_name: &str) -> Result<&mut Exchange, BacktestError> {
        self.exchanges
            .get_mut(exchange_name)
            .ok_or_else(|| BacktestError::UnknownExchange(exchange_name.to_string()))
    }
}
