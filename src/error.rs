use thiserror::Error;

/// All errors a [`crate::pipeline::Backtest`] can raise. Every variant here is fatal: a run
/// aborts entirely rather than attempting local recovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("balance for {currency} would go negative (have {balance}, requested {requested})")]
    NegativeBalance {
        currency: String,
        balance: f64,
        requested: f64,
    },

    #[error("liquidity on {market_id} would go negative (have {liquidity}, requested {requested})")]
    NegativeLiquidity {
        market_id: String,
        liquidity: f64,
        requested: f64,
    },

    #[error("popped from an empty queue")]
    EmptyQueue,

    #[error("unknown market {market_id} on exchange {exchange_name}")]
    UnknownMarket {
        exchange_name: String,
        market_id: String,
    },

    #[error("unknown exchange {0}")]
    UnknownExchange(String),

    #[error("fill referenced position_ts {position_ts} with no open position")]
    UnknownPosition { position_ts: i64 },

    #[error("event {event} missing required field {field}")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    #[error("numeric domain error in {context}: {detail}")]
    NumericDomain { context: &'static str, detail: String },
}
