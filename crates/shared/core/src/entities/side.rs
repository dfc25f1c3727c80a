use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::Price;

/// Order side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether an incoming order on this side at `incoming` can trade against
    /// a resting order priced at `resting`
    pub fn crosses(&self, incoming: Price, resting: Price) -> bool {
        match self {
            Side::Buy => incoming >= resting,
            Side::Sell => incoming <= resting,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_crossing_is_inclusive() {
        assert!(Side::Buy.crosses(dec!(100), dec!(100)));
        assert!(Side::Buy.crosses(dec!(101), dec!(100)));
        assert!(!Side::Buy.crosses(dec!(99.99), dec!(100)));

        assert!(Side::Sell.crosses(dec!(100), dec!(100)));
        assert!(Side::Sell.crosses(dec!(99), dec!(100)));
        assert!(!Side::Sell.crosses(dec!(100.01), dec!(100)));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
