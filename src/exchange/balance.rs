//! Per-currency cash balances for one exchange.
use std::collections::HashMap;

use crate::error::BacktestError;

/// Tracks a balance per currency. Balances never go negative — [`BankRoll::subtract`] enforces
/// the invariant rather than allowing an overdraft.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BankRoll {
    balances: HashMap<String, f64>,
}

impl BankRoll {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    pub fn get(&self, currency: &str) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, currency: impl Into<String>, amount: f64) {
        self.balances.insert(currency.into(), amount);
    }

    pub fn add(&mut self, currency: &str, amount: f64) {
        *self.balances.entry(currency.to_string()).or_insert(0.0) += amount;
    }

    pub fn subtract(&mut self, currency: &str, amount: f64) -> Result<(), BacktestError> {
        let balance = self.get(currency);
        if amount > balance {
            return Err(BacktestError::NegativeBalance {
                currency: currency.to_string(),
                balance,
                requested: amount,
            });
        }
        self.balances.insert(currency.to_string(), balance - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_currency_defaults_to_zero() {
        let bank_roll = BankRoll::new();
        assert_eq!(bank_roll.get("USD"), 0.0);
    }

    #[test]
    fn subtract_rejects_overdraft() {
        let mut bank_roll = BankRoll::new();
        bank_roll.set("USD", 100.0);
        assert!(bank_roll.subtract("USD", 150.0).is_err());
        bank_roll.subtract("USD", 40.0).unwrap();
        assert_eq!(bank_roll.get("USD"), 60.0);
    }
}
