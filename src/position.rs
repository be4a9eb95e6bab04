//! An open position: the running set of fills accumulated for one `long`/`short` entry. Its
//! VWAP averages fill prices weighted by amount, and `should_close` compares the current
//! mid-market price against that VWAP to decide whether the stop-loss or take-profit threshold
//! has been crossed.
use crate::event::Fill;

/// Long or short, mirroring `barter`'s `portfolio::position::Direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

/// An accumulating position: identity plus every fill received toward it so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub position_ts: i64,
    pub direction: Direction,
    pub market_id: String,
    pub exchange_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub fills: Vec<Fill>,
}

impl Position {
    pub fn new(
        position_ts: i64,
        direction: Direction,
        market_id: impl Into<String>,
        exchange_name: impl Into<String>,
        base_currency: impl Into<String>,
        quote_currency: impl Into<String>,
        stop_loss_pct: f64,
        take_profit_pct: f64,
    ) -> Self {
        Self {
            position_ts,
            direction,
            market_id: market_id.into(),
            exchange_name: exchange_name.into(),
            base_currency: base_currency.into(),
            quote_currency: quote_currency.into(),
            stop_loss_pct,
            take_profit_pct,
            fills: Vec::new(),
        }
    }

    pub fn total_amount(&self) -> f64 {
        self.fills.iter().map(|f| f.amount).sum()
    }

    /// Volume-weighted average entry price across every fill received so far. `None` if no
    /// fills have arrived yet.
    pub fn vwap(&self) -> Option<f64> {
        let total = self.total_amount();
        if total <= 0.0 {
            return None;
        }
        let weighted: f64 = self.fills.iter().map(|f| f.price_weighted()).sum();
        Some(weighted / total)
    }

    /// Fractional price move from VWAP to `current_mid`, signed so that a favourable move for
    /// this position's direction is positive.
    fn pct_change(&self, current_mid: f64) -> Option<f64> {
        let vwap = self.vwap()?;
        if vwap == 0.0 {
            return None;
        }
        let change = match self.direction {
            Direction::Long => (current_mid - vwap) / vwap,
            Direction::Short => (vwap - current_mid) / vwap,
        };
        Some(change)
    }

    /// Whether this position should close at `current_mid`: true once the favourable move has
    /// reached `take_profit_pct`, or the adverse move has reached `stop_loss_pct`.
    pub fn should_close(&self, current_mid: f64) -> bool {
        match self.pct_change(current_mid) {
            Some(change) => change >= self.take_profit_pct || change <= -self.stop_loss_pct,
            None => false,
        }
    }
}

impl Fill {
    fn price_weighted(&self) -> f64 {
        self.limit_price * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(price: f64, amount: f64) -> Fill {
        Fill {
            position_ts: 1,
            market_id: "btc_usd".into(),
            exchange_name: "kraken".into(),
            base_currency: "BTC".into(),
            quote_currency: "USD".into(),
            limit_price: price,
            amount,
            fee: 0.0,
        }
    }

    #[test]
    fn vwap_is_weighted_by_amount() {
        let mut position = Position::new(1, Direction::Long, "btc_usd", "kraken", "BTC", "USD", 0.01, 0.02);
        position.fills.push(fill(100.0, 1.0));
        position.fills.push(fill(102.0, 3.0));
        assert!((position.vwap().unwrap() - 101.5).abs() < 1e-9);
    }

    #[test]
    fn long_closes_on_take_profit() {
        let mut position = Position::new(1, Direction::Long, "btc_usd", "kraken", "BTC", "USD", 0.01, 0.02);
        position.fills.push(fill(100.0, 1.0));
        assert!(!position.should_close(101.0));
        assert!(position.should_close(102.0));
        assert!(position.should_close(98.9));
    }

    #[test]
    fn short_closes_on_take_profit() {
        let mut position = Position::new(1, Direction::Short, "btc_usd", "kraken", "BTC", "USD", 0.01, 0.02);
        position.fills.push(fill(100.0, 1.0));
        assert!(position.should_close(98.0));
        assert!(position.should_close(101.1));
    }
}
