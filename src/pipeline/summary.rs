//! The backtest result shape.
//!
//! Wraps a run's start/end timestamps and the full output event list behind thin chronological
//! accessors. Performance statistics (Sharpe, drawdown, ...) are out of scope here; only the
//! data-shape accessors are implemented, and computing statistics over them is left to the
//! caller.
use crate::event::{Event, Fill, SizedSignal, TimedEvent};

/// Everything a [`super::Backtest::execute`] run produced, in emission order.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktestSummary {
    pub start_ts_ns: i64,
    pub end_ts_ns: i64,
    pub outputs: Vec<TimedEvent>,
}

impl BacktestSummary {
    /// Every accepted long entry, in emission order.
    pub fn longs(&self) -> impl Iterator<Item = &SizedSignal> {
        self.outputs.iter().filter_map(|e| match &e.event {
            Event::LongExecuted(sized) => Some(sized),
            _ => None,
        })
    }

    /// Every accepted short entry, in emission order.
    pub fn shorts(&self) -> impl Iterator<Item = &SizedSignal> {
        self.outputs.iter().filter_map(|e| match &e.event {
            Event::ShortExecuted(sized) => Some(sized),
            _ => None,
        })
    }

    /// Every fill (entry or exit, bid or ask side), in emission order.
    pub fn fills(&self) -> impl Iterator<Item = &Fill> {
        self.outputs.iter().filter_map(|e| match &e.event {
            Event::BidFill(fill) | Event::AskFill(fill) => Some(fill),
            _ => None,
        })
    }

    /// Total fees paid across every fill.
    pub fn fees(&self) -> f64 {
        self.fills().map(|f| f.fee).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BookUpdate;

    #[test]
    fn fees_sums_across_fills() {
        let summary = BacktestSummary {
            start_ts_ns: 0,
            end_ts_ns: 1,
            outputs: vec![
                TimedEvent::new(
                    0,
                    Event::AskFill(Fill {
                        position_ts: 1,
                        market_id: "btc_usd".into(),
                        exchange_name: "kraken".into(),
                        base_currency: "BTC".into(),
                        quote_currency: "USD".into(),
                        limit_price: 100.0,
                        amount: 1.0,
                        fee: 0.1,
                    }),
                ),
                TimedEvent::new(
                    0,
                    Event::BestBid(BookUpdate {
                        exchange_name: "kraken".into(),
                        market_id: "btc_usd".into(),
                        price: 99.0,
                        liquidity: 1.0,
                    }),
                ),
            ],
        };
        assert_eq!(summary.fees(), 0.1);
        assert_eq!(summary.fills().count(), 1);
    }
}
