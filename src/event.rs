//! The event vocabulary that flows through a [`crate::pipeline::Pipeline`].
//!
//! Every event is a `(name, unix_ts_ns, payload)` triple. Rather than carrying payloads as an
//! open map, this crate models the closed set of event names as an [`Event`] enum, one variant
//! per name, each carrying a typed payload struct holding exactly its required fields.
//! Unknown/extra fields are rejected by construction rather than carried through a spread.
use serde::{Deserialize, Serialize};

/// Top-of-book update for one side of a market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub exchange_name: String,
    pub market_id: String,
    pub price: f64,
    pub liquidity: f64,
}

/// Emitted by the Data Stage whenever both sides of a book are present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MidMarketPrice {
    pub market_id: String,
    pub exchange_name: String,
    pub mid_market_price: f64,
}

/// Emitted by the Data Stage once a current and previous mid-market price both exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MidMarketPriceReturns {
    pub market_id: String,
    pub exchange_name: String,
    pub lin: f64,
    pub log: f64,
}

/// A user-supplied `long`/`short` entry signal, before the Risk Stage has sized it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub market_id: String,
    pub exchange_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub price: f64,
    pub confidence_pct: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

/// A [`Signal`] the Risk Stage has accepted and sized. Used for `long_executed`,
/// `short_executed`, `take_from_asks`, and `take_from_bids` — all four share this payload shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizedSignal {
    pub signal: Signal,
    pub position_ts: i64,
    pub amount: f64,
}

/// Diagnostic emitted by the Entry Stage whenever an order joins a queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryQueueAppend {
    pub order: SizedSignal,
    pub initial_amount: f64,
}

/// An exit order generated by the Position Stage when a position closes. Carries the closing
/// position's identity plus the price/amount of the fill being unwound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionExit {
    pub position_ts: i64,
    pub market_id: String,
    pub exchange_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub price: f64,
    pub amount: f64,
}

/// Diagnostic emitted by the Exit Stage whenever an exit order joins a queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitQueueAppend {
    pub exit: PositionExit,
    pub initial_amount: f64,
}

/// A (possibly partial) fill against the book, emitted by the matching loop in either the Entry
/// or the Exit Stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub position_ts: i64,
    pub market_id: String,
    pub exchange_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub limit_price: f64,
    pub amount: f64,
    pub fee: f64,
}

/// The closed set of events that can flow through the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Event {
    #[serde(rename = "best_bid")]
    BestBid(BookUpdate),
    #[serde(rename = "best_ask")]
    BestAsk(BookUpdate),
    #[serde(rename = "mid_market_price")]
    MidMarketPrice(MidMarketPrice),
    #[serde(rename = "mid_market_price_returns")]
    MidMarketPriceReturns(MidMarketPriceReturns),
    #[serde(rename = "long")]
    Long(Signal),
    #[serde(rename = "short")]
    Short(Signal),
    #[serde(rename = "long_executed")]
    LongExecuted(SizedSignal),
    #[serde(rename = "short_executed")]
    ShortExecuted(SizedSignal),
    #[serde(rename = "take_from_asks")]
    TakeFromAsks(SizedSignal),
    #[serde(rename = "take_from_bids")]
    TakeFromBids(SizedSignal),
    #[serde(rename = "entry_bid_queue_append")]
    EntryBidQueueAppend(EntryQueueAppend),
    #[serde(rename = "entry_ask_queue_append")]
    EntryAskQueueAppend(EntryQueueAppend),
    #[serde(rename = "give_to_bids")]
    GiveToBids(PositionExit),
    #[serde(rename = "give_to_asks")]
    GiveToAsks(PositionExit),
    #[serde(rename = "exit_bid_queue_append")]
    ExitBidQueueAppend(ExitQueueAppend),
    #[serde(rename = "exit_ask_queue_append")]
    ExitAskQueueAppend(ExitQueueAppend),
    #[serde(rename = "bid_fill")]
    BidFill(Fill),
    #[serde(rename = "ask_fill")]
    AskFill(Fill),
}

impl Event {
    /// The wire name for this event's variant.
    pub fn name(&self) -> &'static str {
        match self {
            Event::BestBid(_) => "best_bid",
            Event::BestAsk(_) => "best_ask",
            Event::MidMarketPrice(_) => "mid_market_price",
            Event::MidMarketPriceReturns(_) => "mid_market_price_returns",
            Event::Long(_) => "long",
            Event::Short(_) => "short",
            Event::LongExecuted(_) => "long_executed",
            Event::ShortExecuted(_) => "short_executed",
            Event::TakeFromAsks(_) => "take_from_asks",
            Event::TakeFromBids(_) => "take_from_bids",
            Event::EntryBidQueueAppend(_) => "entry_bid_queue_append",
            Event::EntryAskQueueAppend(_) => "entry_ask_queue_append",
            Event::GiveToBids(_) => "give_to_bids",
            Event::GiveToAsks(_) => "give_to_asks",
            Event::ExitBidQueueAppend(_) => "exit_bid_queue_append",
            Event::ExitAskQueueAppend(_) => "exit_ask_queue_append",
            Event::BidFill(_) => "bid_fill",
            Event::AskFill(_) => "ask_fill",
        }
    }
}

/// A timestamped [`Event`] — the `(name, unix_ts_ns, payload)` triple, with `name` recoverable
/// from the payload variant via [`Event::name`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub unix_ts_ns: i64,
    pub event: Event,
}

impl TimedEvent {
    pub fn new(unix_ts_ns: i64, event: Event) -> Self {
        Self { unix_ts_ns, event }
    }
}
