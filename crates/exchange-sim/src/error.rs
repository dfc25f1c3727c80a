use agora_core::{Price, Quantity, Side, Ticker};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Unknown ticker: {0}")]
    UnknownTicker(Ticker),

    #[error("Ticker already listed: {0}")]
    DuplicateTicker(Ticker),

    /// Quotes and midprice need both sides of the book
    #[error("No resting {side} orders in {ticker}")]
    EmptyBook { ticker: Ticker, side: Side },

    #[error("Invalid price: {0}")]
    InvalidPrice(Price),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Quantity),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
