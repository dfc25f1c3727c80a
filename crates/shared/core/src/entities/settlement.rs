use serde::{Deserialize, Serialize};

use super::{Participant, Trade};
use crate::values::{Cash, SignedQuantity, Ticker, Timestamp};

/// A cash/position effect queued by the exchange and applied by the simulator
/// when it drains the queue at the end of a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub participant: Participant,
    pub ticker: Ticker,
    /// Negative for the buyer, positive for the seller
    pub cash_flow: Cash,
    /// Positive for the buyer, negative for the seller
    pub qty: SignedQuantity,
    pub timestamp: Timestamp,
}

impl Settlement {
    /// The two offsetting legs of a trade: buyer pays, seller receives
    pub fn legs(trade: &Trade) -> [Settlement; 2] {
        let notional = trade.notional();
        // the exchange never accepts more than MAX_QUANTITY
        let qty = SignedQuantity::try_from(trade.qty).unwrap_or(SignedQuantity::MAX);
        [
            Settlement {
                participant: trade.buyer,
                ticker: trade.ticker.clone(),
                cash_flow: -notional,
                qty,
                timestamp: trade.timestamp,
            },
            Settlement {
                participant: trade.seller,
                ticker: trade.ticker.clone(),
                cash_flow: notional,
                qty: -qty,
                timestamp: trade.timestamp,
            },
        ]
    }

    /// The ledger row this settlement produces for its agent
    pub fn to_ledger_entry(&self) -> LedgerEntry {
        LedgerEntry {
            timestamp: self.timestamp,
            cash_flow: self.cash_flow,
            ticker: self.ticker.clone(),
            qty: self.qty,
        }
    }
}

/// One row of an agent's append-only transaction ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: Timestamp,
    pub cash_flow: Cash,
    pub ticker: Ticker,
    pub qty: SignedQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentId;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_legs_are_cash_neutral() {
        let trade = Trade::new(
            "X",
            3,
            dec!(101.25),
            Participant::Agent(AgentId::new(1)),
            Participant::Agent(AgentId::new(2)),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );

        let [buy, sell] = Settlement::legs(&trade);

        assert_eq!(buy.cash_flow, dec!(-303.75));
        assert_eq!(sell.cash_flow, dec!(303.75));
        assert_eq!(buy.cash_flow + sell.cash_flow, Decimal::ZERO);
        assert_eq!(buy.qty, 3);
        assert_eq!(sell.qty, -3);
        assert_eq!(buy.participant, Participant::Agent(AgentId::new(1)));
        assert_eq!(sell.participant, Participant::Agent(AgentId::new(2)));
    }

    #[test]
    fn test_ledger_entry_copies_fields() {
        let trade = Trade::new(
            "X",
            1,
            dec!(10),
            Participant::Seed,
            Participant::Agent(AgentId::new(0)),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        );
        let [_, sell] = Settlement::legs(&trade);
        let entry = sell.to_ledger_entry();

        assert_eq!(entry.ticker, "X");
        assert_eq!(entry.cash_flow, dec!(10));
        assert_eq!(entry.qty, -1);
        assert_eq!(entry.timestamp, trade.timestamp);
    }

    #[test]
    fn test_legs_saturate_instead_of_overflowing() {
        let trade = Trade::new(
            "X",
            u64::MAX,
            dec!(0),
            Participant::Agent(AgentId::new(1)),
            Participant::Agent(AgentId::new(2)),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        let [buy, sell] = Settlement::legs(&trade);
        assert_eq!(buy.qty, i64::MAX);
        assert_eq!(sell.qty, -i64::MAX);
    }
}
