//! Minimum/maximum order size limits, keyed by market.
use std::collections::HashMap;

/// Exclusive `(min, max)` order size bounds for one market.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeLimit {
    pub min: f64,
    pub max: f64,
}

impl SizeLimit {
    pub fn contains(&self, amount: f64) -> bool {
        amount > self.min && amount < self.max
    }
}

/// Per-market size limits for an exchange. Markets with no registered limit are treated as
/// unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SizeLimits {
    limits: HashMap<String, SizeLimit>,
}

impl SizeLimits {
    pub fn new() -> Self {
        Self {
            limits: HashMap::new(),
        }
    }

    pub fn set(&mut self, market_id: impl Into<String>, limit: SizeLimit) {
        self.limits.insert(market_id.into(), limit);
    }

    pub fn check(&self, market_id: &str, amount: f64) -> bool {
        self.limits
            .get(market_id)
            .map(|limit| limit.contains(amount))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_market_is_unconstrained() {
        let limits = SizeLimits::new();
        assert!(limits.check("btc_usdt", 1_000_000.0));
    }

    #[test]
    fn registered_market_enforces_bounds() {
        let mut limits = SizeLimits::new();
        limits.set(
            "btc_usdt",
            SizeLimit {
                min: 0.001,
                max: 10.0,
            },
        );
        assert!(!limits.check("btc_usdt", 0.0001));
        assert!(limits.check("btc_usdt", 1.0));
        assert!(!limits.check("btc_usdt", 11.0));
        assert!(!limits.check("btc_usdt", 0.001), "exact min is excluded");
        assert!(!limits.check("btc_usdt", 10.0), "exact max is excluded");
    }
}
