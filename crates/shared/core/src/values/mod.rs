use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
/// Rounded to the exchange's price scale at submission time
pub type Price = Decimal;

/// Cash balance or cash flow
pub type Cash = Decimal;

/// Order and trade size, in whole units
pub type Quantity = u64;

/// Largest accepted order size; every trade quantity must fit a ledger row
pub const MAX_QUANTITY: Quantity = i64::MAX as Quantity;

/// Ledger quantity (positive = bought, negative = sold)
pub type SignedQuantity = i64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier for a tradeable asset
pub type Ticker = String;
