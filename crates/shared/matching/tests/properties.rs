//! Property tests for the order book invariants under random order flow.

use agora_core::{AgentId, LimitOrder, Participant, Quantity, Side};
use agora_matching::OrderBook;
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Limit { buy: bool, price: u32, qty: Quantity },
    Market { buy: bool, qty: Quantity },
    CancelAll { agent: u32 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (any::<bool>(), 90u32..110, 1u64..20)
            .prop_map(|(buy, price, qty)| Op::Limit { buy, price, qty }),
        3 => (any::<bool>(), 1u64..30).prop_map(|(buy, qty)| Op::Market { buy, qty }),
        1 => (0u32..4).prop_map(|agent| Op::CancelAll { agent }),
    ]
}

fn side(buy: bool) -> Side {
    if buy { Side::Buy } else { Side::Sell }
}

fn check_book(book: &OrderBook) -> Result<(), TestCaseError> {
    for side in [Side::Buy, Side::Sell] {
        let orders: Vec<_> = book.side(side).iter().collect();
        for order in &orders {
            prop_assert!(order.qty > 0);
            prop_assert_eq!(order.side, side);
        }
        for pair in orders.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match side {
                Side::Buy => prop_assert!(a.price >= b.price),
                Side::Sell => prop_assert!(a.price <= b.price),
            }
            if a.price == b.price {
                prop_assert!(a.timestamp <= b.timestamp);
            }
        }
    }
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        prop_assert!(bid.price < ask.price);
    }
    Ok(())
}

proptest! {
    #[test]
    fn book_stays_sorted_and_uncrossed(ops in prop::collection::vec(op(), 1..200)) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut book = OrderBook::new("X");

        for (i, op) in ops.into_iter().enumerate() {
            let now = start + Duration::seconds(i as i64);
            let agent = Participant::Agent(AgentId::new(i as u32 % 4));
            match op {
                Op::Limit { buy, price, qty } => {
                    let order = LimitOrder::new("X", side(buy), Decimal::from(price), qty, agent, now);
                    let before = book.side(side(buy).opposite()).total_qty();
                    let outcome = book.submit_limit(order);
                    let after = book.side(side(buy).opposite()).total_qty();

                    prop_assert_eq!(outcome.filled() + outcome.order.qty, qty);
                    prop_assert_eq!(before - after, outcome.filled());
                    for fill in &outcome.fills {
                        prop_assert!(side(buy).crosses(Decimal::from(price), fill.price));
                    }
                }
                Op::Market { buy, qty } => {
                    let before = book.side(side(buy).opposite()).total_qty();
                    let outcome = book.submit_market(side(buy), qty);
                    let after = book.side(side(buy).opposite()).total_qty();

                    prop_assert_eq!(before - after, outcome.filled());
                    prop_assert_eq!(outcome.filled(), qty.min(before));
                }
                Op::CancelAll { agent } => {
                    let who = Participant::Agent(AgentId::new(agent));
                    book.cancel_all(who);
                    prop_assert!(book.bids().iter().all(|o| o.creator != who));
                    prop_assert!(book.asks().iter().all(|o| o.creator != who));
                }
            }
            check_book(&book)?;
        }
    }
}
