//! Post-hoc portfolio valuation
//!
//! Rebuilds an agent's account value at each elapsed tick from the immutable
//! ledger and trade log. A bar covers `[tick, tick + step)`; holdings are
//! marked at the last trade price seen before the bar closes, carried
//! forward across bars without trades.

use agora_core::{Cash, LedgerEntry, Price, Ticker, Timestamp, Trade};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::account::AgentAccount;

/// Account value at the close of one bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    /// Bar start (the tick timestamp)
    pub timestamp: Timestamp,
    pub cash: Cash,
    /// Marked-to-market value per ticker
    pub holdings: BTreeMap<Ticker, Decimal>,
    pub total: Decimal,
}

/// Value `account` at every tick in `ticks`
///
/// `ticks` must be increasing. The ledger and trade log are ordered by
/// occurrence, which need not follow timestamps when the clock was set by
/// hand, so both are visited in timestamp order. A ticker is marked at the
/// last trade in log order stamped before the bar closes.
pub fn portfolio_history(
    account: &AgentAccount,
    trade_log: &[Trade],
    ticks: &[Timestamp],
    step: Duration,
) -> Vec<PortfolioPoint> {
    let mut ledger: Vec<&LedgerEntry> = account.ledger().iter().collect();
    ledger.sort_by_key(|entry| entry.timestamp);
    let mut trades: Vec<(usize, &Trade)> = trade_log.iter().enumerate().collect();
    trades.sort_by_key(|(_, trade)| trade.timestamp);

    let mut next_entry = 0;
    let mut next_trade = 0;

    let mut cash = account.initial_cash();
    let mut positions: BTreeMap<Ticker, i64> = account
        .tickers()
        .iter()
        .map(|ticker| (ticker.clone(), 0))
        .collect();
    // (log position, price) of the latest-logged trade seen so far
    let mut last_close: HashMap<&str, (usize, Price)> = HashMap::new();

    let mut points = Vec::with_capacity(ticks.len());
    for &tick in ticks {
        let bar_end = tick + step;

        while let Some(entry) = ledger.get(next_entry) {
            if entry.timestamp >= bar_end {
                break;
            }
            cash += entry.cash_flow;
            *positions.entry(entry.ticker.clone()).or_insert(0) += entry.qty;
            next_entry += 1;
        }

        while let Some(&(seq, trade)) = trades.get(next_trade) {
            if trade.timestamp >= bar_end {
                break;
            }
            let close = last_close
                .entry(trade.ticker.as_str())
                .or_insert((seq, trade.price));
            if seq >= close.0 {
                *close = (seq, trade.price);
            }
            next_trade += 1;
        }

        let holdings: BTreeMap<Ticker, Decimal> = positions
            .iter()
            .map(|(ticker, qty)| {
                let price = last_close
                    .get(ticker.as_str())
                    .map(|&(_, price)| price)
                    .unwrap_or(Decimal::ZERO);
                (ticker.clone(), Decimal::from(*qty) * price)
            })
            .collect();
        let total = cash + holdings.values().copied().sum::<Decimal>();

        points.push(PortfolioPoint {
            timestamp: tick,
            cash,
            holdings,
            total,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{AgentId, Participant, Settlement};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn day(n: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn trade(n: i64, price: Price, buyer: Participant, seller: Participant) -> Trade {
        Trade::new("X", 1, price, buyer, seller, day(n))
    }

    #[test]
    fn test_marks_with_forward_filled_close() {
        let me = Participant::Agent(AgentId::new(0));
        let mut account = AgentAccount::new(AgentId::new(0), "a", vec!["X".into()], dec!(1000));

        let trades = vec![
            trade(0, dec!(100), Participant::Seed, Participant::Seed),
            trade(1, dec!(102), me, Participant::Seed),
            trade(3, dec!(110), Participant::Seed, Participant::Seed),
        ];
        for leg in Settlement::legs(&trades[1]) {
            if leg.participant == me {
                account.apply(&leg);
            }
        }

        let ticks: Vec<_> = (0..5).map(day).collect();
        let history = portfolio_history(&account, &trades, &ticks, Duration::days(1));

        assert_eq!(history.len(), 5);
        // before the purchase
        assert_eq!(history[0].cash, dec!(1000));
        assert_eq!(history[0].holdings["X"], dec!(0));
        assert_eq!(history[0].total, dec!(1000));
        // bought one at 102
        assert_eq!(history[1].cash, dec!(898));
        assert_eq!(history[1].total, dec!(1000));
        // no trade on day 2: close carried forward
        assert_eq!(history[2].holdings["X"], dec!(102));
        // repriced at 110 from day 3 on
        assert_eq!(history[3].total, dec!(1008));
        assert_eq!(history[4].total, dec!(1008));
    }

    #[test]
    fn test_marks_by_log_order_when_stamps_are_out_of_order() {
        let me = Participant::Agent(AgentId::new(0));
        let mut account = AgentAccount::new(AgentId::new(0), "a", vec!["X".into()], dec!(1000));

        // a setup trade stamped far in the future, logged before the purchases
        let mut trades = vec![
            trade(0, dec!(100), Participant::Seed, Participant::Seed),
            trade(30, dec!(150), Participant::Seed, Participant::Seed),
        ];
        for n in 0..3 {
            let bought = trade(n, dec!(120), me, Participant::Seed);
            for leg in Settlement::legs(&bought) {
                if leg.participant == me {
                    account.apply(&leg);
                }
            }
            trades.push(bought);
        }

        let ticks: Vec<_> = (0..3).map(day).collect();
        let history = portfolio_history(&account, &trades, &ticks, Duration::days(1));

        let holdings: Vec<Decimal> = history.iter().map(|p| p.holdings["X"]).collect();
        assert_eq!(holdings, vec![dec!(120), dec!(240), dec!(360)]);
        assert!(history.iter().all(|p| p.total == dec!(1000)));
    }

    #[test]
    fn test_empty_ticks() {
        let account = AgentAccount::new(AgentId::new(0), "a", vec![], dec!(5));
        assert!(portfolio_history(&account, &[], &[], Duration::days(1)).is_empty());
    }
}
