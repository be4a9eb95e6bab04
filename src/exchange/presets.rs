//! Named exchange presets.
//!
//! A fixed list of named exchanges (Binance, Bitfinex, Bitflyer, BitMEX, ...) that all
//! construct the same underlying `Exchange` shape. These presets are identifiers only — their
//! parameters are configuration, not core logic — so each one below is just a name plus a
//! constructor taking the fee schedule and size limits the caller wants that exchange to run
//! with.
use super::fees::FeeSchedule;
use super::limits::SizeLimits;
use super::Exchange;

/// The closed set of preset exchange identifiers kept from the original helper module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangePreset {
    Binance,
    Bitfinex,
    Bitflyer,
    BitMex,
    Bitstamp,
    Bybit,
    Coinbase,
    Ftx,
    Gemini,
    HitBtc,
    Kraken,
    Poloniex,
}

impl ExchangePreset {
    pub fn name(&self) -> &'static str {
        match self {
            ExchangePreset::Binance => "binance",
            ExchangePreset::Bitfinex => "bitfinex",
            ExchangePreset::Bitflyer => "bitflyer",
            ExchangePreset::BitMex => "bitmex",
            ExchangePreset::Bitstamp => "bitstamp",
            ExchangePreset::Bybit => "bybit",
            ExchangePreset::Coinbase => "coinbase",
            ExchangePreset::Ftx => "ftx",
            ExchangePreset::Gemini => "gemini",
            ExchangePreset::HitBtc => "hitbtc",
            ExchangePreset::Kraken => "kraken",
            ExchangePreset::Poloniex => "poloniex",
        }
    }

    /// Builds an [`Exchange`] named after this preset, with the given fee schedule, size
    /// limits, and starting bank roll.
    pub fn build(
        &self,
        fee_schedule: Box<dyn FeeSchedule + Send + Sync>,
        size_limits: SizeLimits,
    ) -> Exchange {
        Exchange::new(self.name(), fee_schedule, size_limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::fees::StaticFeeSchedule;

    #[test]
    fn preset_name_matches_build() {
        let exchange = ExchangePreset::Kraken.build(
            Box::new(StaticFeeSchedule::new(0.001)),
            SizeLimits::new(),
        );
        assert_eq!(exchange.name(), "kraken");
    }
}
