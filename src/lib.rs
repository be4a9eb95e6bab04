//! # barter-replay
//! An event-driven backtesting engine for discretionary and algorithmic trading strategies
//! over top-of-book market data.
//!
//! A [`pipeline::Pipeline`] is a composable six-stage sequence — Data, Signal, Risk, Entry,
//! Position, Exit — that a [`pipeline::Backtest`] drives one historical [`event::TimedEvent`]
//! at a time against an [`exchange::ExchangeRegistry`]. Each stage consumes the event list its
//! predecessor produced, dispatching by event name and passing anything it doesn't handle
//! straight through.
//!
//! ## Getting started
//! ```
//! use barter_replay::event::{BookUpdate, Event, TimedEvent};
//! use barter_replay::exchange::fees::StaticFeeSchedule;
//! use barter_replay::exchange::{Exchange, ExchangeRegistry, SizeLimits};
//! use barter_replay::pipeline::{Backtest, Pipeline};
//! use barter_replay::stage::NoopGenerator;
//!
//! let mut registry = ExchangeRegistry::new();
//! registry.register(Exchange::new(
//!     "kraken",
//!     Box::new(StaticFeeSchedule::new(0.001)),
//!     SizeLimits::new(),
//! ));
//!
//! let pipeline = Pipeline::standard("kraken", "btc_usd", NoopGenerator);
//! let mut backtest = Backtest::new(pipeline, registry);
//!
//! let inputs = vec![TimedEvent::new(
//!     1,
//!     Event::BestBid(BookUpdate {
//!         exchange_name: "kraken".into(),
//!         market_id: "btc_usd".into(),
//!         price: 99.0,
//!         liquidity: 1.0,
//!     }),
//! )];
//!
//! let summary = backtest.execute(inputs).unwrap();
//! assert_eq!(summary.start_ts_ns, 1);
//! ```

#![warn(missing_copy_implementations)]

/// The backtest error taxonomy.
pub mod error;

/// The closed event vocabulary flowing through a [`pipeline::Pipeline`].
pub mod event;

/// Named exchanges: order books, bank rolls, fee schedules, and size limits.
pub mod exchange;

/// The six built-in pipeline stages and the [`stage::Stage`] trait they implement.
pub mod stage;

/// Open positions and the VWAP-based closing rule.
pub mod position;

/// [`pipeline::Pipeline`] composition and the [`pipeline::Backtest`] driver.
pub mod pipeline;

/// A stable priority queue of pending orders, used by the Entry/Exit Stages' matching loops.
pub mod queue;

/// Time-bounded FIFO sampling windows, for feature-engineering strategies to build on.
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::BacktestError;
pub use event::{Event, TimedEvent};
pub use exchange::{Exchange, ExchangeRegistry};
pub use pipeline::{Backtest, BacktestSummary, Pipeline};
