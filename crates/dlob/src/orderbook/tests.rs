// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Scenario tests driving the full book through ingestion, matching, and projection.

use rstest::rstest;

use crate::{
    accounts::{MarketAccount, StateAccount, EXCHANGE_STATUS_FILL_PAUSED, EXCHANGE_STATUS_PAUSED},
    enums::{Direction, MarketStatus, MarketType, OrderTriggerCondition, OrderType},
    orderbook::Dlob,
    stubs::{limit_order_stub, market_order_stub, oracle_stub, trigger_order_stub, user_stub},
    types::{Price, Quantity},
};

fn state() -> StateAccount {
    StateAccount::default()
}

fn perp_market() -> MarketAccount {
    MarketAccount::new(0, MarketType::Perp, MarketStatus::Active)
}

fn spot_market() -> MarketAccount {
    MarketAccount::new(0, MarketType::Spot, MarketStatus::Active)
}

#[rstest]
fn test_self_cross_rejected() {
    let mut dlob = Dlob::new();
    let user = user_stub(1);
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "10", 0), user, 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "101", "10", 0), user, 1);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 1, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert!(fills.is_empty());
}

#[rstest]
fn test_price_time_priority() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Long, "100", "10", 1), user_stub(1), 5);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "100", "10", 2), user_stub(2), 5);
    dlob.insert_order(&limit_order_stub(3, Direction::Short, "100", "5", 0), user_stub(3), 5);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 5, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 3);
    assert_eq!(fills[0].maker_nodes.len(), 1);
    // The older bid at the same price makes first
    assert_eq!(fills[0].maker_nodes[0].order.order_id, 1);
}

#[rstest]
fn test_post_only_side_is_maker() {
    let mut dlob = Dlob::new();
    let mut ask = limit_order_stub(1, Direction::Short, "100", "5", 3);
    ask.post_only = true;
    // The bid's auction ends earlier, so without post-only it would make
    let bid = limit_order_stub(2, Direction::Long, "101", "5", 1);
    dlob.insert_order(&ask, user_stub(1), 5);
    dlob.insert_order(&bid, user_stub(2), 5);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 5, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 2);
    assert_eq!(fills[0].maker_nodes[0].order.order_id, 1);
}

#[rstest]
fn test_both_post_only_unmatched() {
    let mut dlob = Dlob::new();
    let mut ask = limit_order_stub(1, Direction::Short, "100", "5", 0);
    ask.post_only = true;
    let mut bid = limit_order_stub(2, Direction::Long, "101", "5", 0);
    bid.post_only = true;
    dlob.insert_order(&ask, user_stub(1), 1);
    dlob.insert_order(&bid, user_stub(2), 1);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 1, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert!(fills.is_empty());
}

#[rstest]
fn test_crossing_tie_defaults_ask_to_maker() {
    let mut dlob = Dlob::new();
    // Identical slot + auction_duration on both sides
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "5", 2), user_stub(1), 5);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "100", "5", 2), user_stub(2), 5);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 5, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 2);
    assert_eq!(fills[0].maker_nodes[0].order.order_id, 1);
}

#[rstest]
fn test_fallback_cross_emits_empty_maker_nodes() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "98", "5", 0), user_stub(1), 1);

    let fills = dlob
        .find_nodes_to_fill(
            0,
            Some(Price::from("99")),
            None,
            1,
            0,
            MarketType::Perp,
            None,
            &state(),
            &perp_market(),
        )
        .unwrap();

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 1);
    assert!(fills[0].maker_nodes.is_empty());
}

#[rstest]
fn test_fallback_cross_skipped_when_amm_paused() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "98", "5", 0), user_stub(1), 1);

    let market = MarketAccount::new(0, MarketType::Perp, MarketStatus::AmmPaused);
    let fills = dlob
        .find_nodes_to_fill(
            0,
            Some(Price::from("99")),
            None,
            1,
            0,
            MarketType::Perp,
            None,
            &state(),
            &market,
        )
        .unwrap();

    assert!(fills.is_empty());
}

#[rstest]
fn test_taking_bid_fills_against_makers_in_price_order() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "1", 0), user_stub(1), 5);
    dlob.insert_order(&limit_order_stub(2, Direction::Short, "101", "2", 0), user_stub(2), 5);
    let taker = market_order_stub(3, Direction::Long, "3", 5, 10, "0", "0");
    dlob.insert_order(&taker, user_stub(3), 5);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 5, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    // Perp merges both maker pairings into one entry for the taker
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 3);
    let maker_ids: Vec<u32> = fills[0]
        .maker_nodes
        .iter()
        .map(|n| n.order.order_id)
        .collect();
    assert_eq!(maker_ids, vec![1, 2]);
}

#[rstest]
fn test_spot_does_not_merge_taker_entries() {
    let mut dlob = Dlob::new();
    let oracle = oracle_stub("100", 12);

    let mut maker_a = limit_order_stub(1, Direction::Short, "100", "1", 0);
    maker_a.market_type = MarketType::Spot;
    let mut maker_b = limit_order_stub(2, Direction::Short, "101", "2", 0);
    maker_b.market_type = MarketType::Spot;
    // A taking limit bid still inside its auction window
    let mut taker = limit_order_stub(3, Direction::Long, "105", "3", 10);
    taker.market_type = MarketType::Spot;
    taker.auction_duration = 5;

    dlob.insert_order(&maker_a, user_stub(1), 12);
    dlob.insert_order(&maker_b, user_stub(2), 12);
    dlob.insert_order(&taker, user_stub(3), 12);

    let fills = dlob
        .find_nodes_to_fill(
            0,
            None,
            None,
            12,
            0,
            MarketType::Spot,
            Some(&oracle),
            &state(),
            &spot_market(),
        )
        .unwrap();

    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].node.order.order_id, 3);
    assert_eq!(fills[0].maker_nodes[0].order.order_id, 1);
    assert_eq!(fills[1].node.order.order_id, 3);
    assert_eq!(fills[1].maker_nodes[0].order.order_id, 2);
}

#[rstest]
fn test_spot_market_order_without_price_never_crosses() {
    let mut dlob = Dlob::new();
    let oracle = oracle_stub("100", 5);

    let mut maker = limit_order_stub(1, Direction::Short, "100", "1", 0);
    maker.market_type = MarketType::Spot;
    let mut taker = market_order_stub(2, Direction::Long, "1", 5, 0, "0", "0");
    taker.market_type = MarketType::Spot;

    dlob.insert_order(&maker, user_stub(1), 5);
    dlob.insert_order(&taker, user_stub(2), 5);

    let fills = dlob
        .find_nodes_to_fill(
            0,
            None,
            None,
            5,
            0,
            MarketType::Spot,
            Some(&oracle),
            &state(),
            &spot_market(),
        )
        .unwrap();

    assert!(fills.is_empty());
}

#[rstest]
fn test_taking_pass_breaks_on_first_non_cross() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Long, "110", "1", 0), user_stub(1), 20);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "105", "1", 0), user_stub(2), 20);

    // Older taker priced through only the best bid
    let taker_a = market_order_stub(3, Direction::Short, "2", 10, 8, "107", "107");
    // Newer taker priced through both bids
    let taker_b = market_order_stub(4, Direction::Short, "2", 11, 8, "103", "103");
    dlob.insert_order(&taker_a, user_stub(3), 20);
    dlob.insert_order(&taker_b, user_stub(4), 20);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 16, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    // Taker A stops at the second bid (105 < 107); taker B crosses the remaining bid
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].node.order.order_id, 3);
    assert_eq!(
        fills[0]
            .maker_nodes
            .iter()
            .map(|n| n.order.order_id)
            .collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(fills[1].node.order.order_id, 4);
    assert_eq!(
        fills[1]
            .maker_nodes
            .iter()
            .map(|n| n.order.order_id)
            .collect::<Vec<_>>(),
        vec![2]
    );
}

#[rstest]
fn test_taker_crosses_fallback_after_min_auction_duration() {
    let mut dlob = Dlob::new();
    let taker = market_order_stub(1, Direction::Short, "1", 10, 5, "98", "98");
    dlob.insert_order(&taker, user_stub(1), 10);

    let mut state_account = state();
    state_account.min_perp_auction_duration = 20;

    // Inside the market's minimum auction window: fallback unavailable
    let fills = dlob
        .find_nodes_to_fill(
            0,
            Some(Price::from("99")),
            None,
            15,
            0,
            MarketType::Perp,
            None,
            &state_account,
            &perp_market(),
        )
        .unwrap();
    assert!(fills.is_empty());

    // Past the window the fallback picks the taker up
    let fills = dlob
        .find_nodes_to_fill(
            0,
            Some(Price::from("99")),
            None,
            31,
            0,
            MarketType::Perp,
            None,
            &state_account,
            &perp_market(),
        )
        .unwrap();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 1);
    assert!(fills[0].maker_nodes.is_empty());
}

#[rstest]
fn test_fill_paused_returns_empty() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "98", "5", 0), user_stub(1), 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "102", "5", 0), user_stub(2), 1);

    let state_account = StateAccount {
        exchange_status: EXCHANGE_STATUS_FILL_PAUSED,
        min_perp_auction_duration: 0,
    };
    let fills = dlob
        .find_nodes_to_fill(
            0,
            None,
            None,
            1,
            0,
            MarketType::Perp,
            None,
            &state_account,
            &perp_market(),
        )
        .unwrap();

    assert!(fills.is_empty());
}

#[rstest]
fn test_expired_orders_emitted_with_empty_makers() {
    let mut dlob = Dlob::new();
    let mut order = limit_order_stub(1, Direction::Long, "100", "5", 0);
    order.max_ts = 50;
    dlob.insert_order(&order, user_stub(1), 1);

    let at_expiry = dlob
        .find_nodes_to_fill(0, None, None, 1, 50, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();
    assert!(at_expiry.is_empty());

    let past_expiry = dlob
        .find_nodes_to_fill(0, None, None, 1, 51, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();
    assert_eq!(past_expiry.len(), 1);
    assert_eq!(past_expiry[0].node.order.order_id, 1);
    assert!(past_expiry[0].maker_nodes.is_empty());
}

#[rstest]
fn test_trigger_firing_thresholds() {
    let mut dlob = Dlob::new();
    let order = trigger_order_stub(1, Direction::Long, OrderTriggerCondition::Above, "1000", "1");
    dlob.insert_order(&order, user_stub(1), 1);

    let below = dlob.find_nodes_to_trigger(0, 1, Price::from("999"), MarketType::Perp, &state());
    assert!(below.is_empty());

    let at = dlob.find_nodes_to_trigger(0, 1, Price::from("1000"), MarketType::Perp, &state());
    assert!(at.is_empty());

    let above = dlob.find_nodes_to_trigger(0, 1, Price::from("1001"), MarketType::Perp, &state());
    assert_eq!(above.len(), 1);
    assert_eq!(above[0].node.order.order_id, 1);
}

#[rstest]
fn test_trigger_scan_stops_at_boundary() {
    let mut dlob = Dlob::new();
    dlob.insert_order(
        &trigger_order_stub(1, Direction::Long, OrderTriggerCondition::Above, "1000", "1"),
        user_stub(1),
        1,
    );
    dlob.insert_order(
        &trigger_order_stub(2, Direction::Long, OrderTriggerCondition::Above, "1010", "1"),
        user_stub(2),
        1,
    );
    dlob.insert_order(
        &trigger_order_stub(3, Direction::Short, OrderTriggerCondition::Below, "900", "1"),
        user_stub(3),
        1,
    );
    dlob.insert_order(
        &trigger_order_stub(4, Direction::Short, OrderTriggerCondition::Below, "890", "1"),
        user_stub(4),
        1,
    );

    let fired = dlob.find_nodes_to_trigger(0, 1, Price::from("1005"), MarketType::Perp, &state());
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].node.order.order_id, 1);

    let fired = dlob.find_nodes_to_trigger(0, 1, Price::from("895"), MarketType::Perp, &state());
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].node.order.order_id, 3);
}

#[rstest]
fn test_trigger_empty_when_exchange_paused() {
    let mut dlob = Dlob::new();
    dlob.insert_order(
        &trigger_order_stub(1, Direction::Long, OrderTriggerCondition::Above, "1000", "1"),
        user_stub(1),
        1,
    );

    let state_account = StateAccount {
        exchange_status: EXCHANGE_STATUS_PAUSED,
        min_perp_auction_duration: 0,
    };
    let fired =
        dlob.find_nodes_to_trigger(0, 1, Price::from("2000"), MarketType::Perp, &state_account);
    assert!(fired.is_empty());
}

#[rstest]
fn test_jit_auction_nodes() {
    let mut dlob = Dlob::new();
    let in_auction = market_order_stub(1, Direction::Long, "1", 10, 5, "100", "101");
    let mut taking_limit = limit_order_stub(2, Direction::Short, "102", "1", 11);
    taking_limit.auction_duration = 5;
    dlob.insert_order(&in_auction, user_stub(1), 12);
    dlob.insert_order(&taking_limit, user_stub(2), 12);

    let jit = dlob.find_jit_auction_nodes_to_fill(0, 12, MarketType::Perp);
    assert_eq!(jit.len(), 2);

    // Past both auction windows nothing is left in JIT
    let jit = dlob.find_jit_auction_nodes_to_fill(0, 30, MarketType::Perp);
    assert!(jit.is_empty());
}

#[rstest]
fn test_floating_orders_merge_by_effective_price() {
    let mut dlob = Dlob::new();
    let oracle = oracle_stub("99", 1);
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "1", 0), user_stub(1), 1);
    let mut floating = limit_order_stub(2, Direction::Short, "0", "1", 0);
    floating.oracle_price_offset = Price::from("0.5").raw;
    dlob.insert_order(&floating, user_stub(2), 1);

    let asks: Vec<u32> = dlob
        .get_resting_limit_asks(0, 1, MarketType::Perp, Some(&oracle))
        .unwrap()
        .map(|n| n.order.order_id)
        .collect();

    // Floating ask at 99.5 beats the fixed ask at 100
    assert_eq!(asks, vec![2, 1]);
}

#[rstest]
fn test_get_asks_taking_before_resting_and_vamm_by_price() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "1", 0), user_stub(1), 5);
    dlob.insert_order(&limit_order_stub(2, Direction::Short, "102", "1", 0), user_stub(2), 5);
    let taking = market_order_stub(3, Direction::Short, "1", 4, 10, "101", "103");
    dlob.insert_order(&taking, user_stub(3), 5);

    let asks: Vec<Option<u32>> = dlob
        .get_asks(0, Some(Price::from("101")), 5, MarketType::Perp, None)
        .unwrap()
        .map(|node| node.order_node().map(|n| n.order.order_id))
        .collect();

    // Taking node first, then resting and the vAMM node by price
    assert_eq!(asks, vec![Some(3), Some(1), None, Some(2)]);
}

#[rstest]
fn test_best_bid_and_ask() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "101", "1", 0), user_stub(1), 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "99", "1", 0), user_stub(2), 1);

    let best_ask = dlob.best_ask(0, None, 1, MarketType::Perp, None).unwrap();
    let best_bid = dlob.best_bid(0, None, 1, MarketType::Perp, None).unwrap();
    assert_eq!(best_ask, Some(Price::from("101")));
    assert_eq!(best_bid, Some(Price::from("99")));

    // A better fallback quote becomes the best level
    let best_ask = dlob
        .best_ask(0, Some(Price::from("100.5")), 1, MarketType::Perp, None)
        .unwrap();
    assert_eq!(best_ask, Some(Price::from("100.5")));
}

#[rstest]
fn test_queries_do_not_mutate_the_book() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Short, "100", "5", 0), user_stub(1), 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "101", "5", 1), user_stub(2), 1);

    let first = dlob
        .find_nodes_to_fill(0, None, None, 1, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();
    let second = dlob
        .find_nodes_to_fill(0, None, None, 1, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    assert_eq!(first, second);
    // Stored fill amounts are untouched by the simulated fills
    assert_eq!(
        dlob.get_order(1, user_stub(1)).unwrap().base_asset_amount_filled,
        Quantity::zero()
    );
    assert_eq!(
        dlob.get_order(2, user_stub(2)).unwrap().base_asset_amount_filled,
        Quantity::zero()
    );
}

#[rstest]
fn test_simulated_fills_visible_within_one_call() {
    let mut dlob = Dlob::new();
    // One maker bid large enough for only the first ask
    dlob.insert_order(&limit_order_stub(1, Direction::Long, "100", "1", 1), user_stub(1), 5);
    dlob.insert_order(&limit_order_stub(2, Direction::Short, "100", "1", 0), user_stub(2), 5);
    dlob.insert_order(&limit_order_stub(3, Direction::Short, "100", "1", 0), user_stub(3), 5);

    let fills = dlob
        .find_nodes_to_fill(0, None, None, 5, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();

    // The bid is consumed by the first ask; the second ask finds no liquidity
    assert_eq!(fills.len(), 1);
}

#[rstest]
fn test_triggered_order_participates_in_matching() {
    let mut dlob = Dlob::new();
    let trigger = trigger_order_stub(1, Direction::Long, OrderTriggerCondition::Above, "100", "1");
    dlob.insert_order(&trigger, user_stub(1), 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Short, "101", "1", 0), user_stub(2), 1);

    // Untriggered: nothing crosses
    let fills = dlob
        .find_nodes_to_fill(0, None, None, 1, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();
    assert!(fills.is_empty());

    dlob.trigger(&trigger, user_stub(1), 2);

    // The now-market bid takes against the resting ask
    let fills = dlob
        .find_nodes_to_fill(0, None, None, 2, 0, MarketType::Perp, None, &state(), &perp_market())
        .unwrap();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].node.order.order_id, 1);
    assert_eq!(fills[0].node.order.order_type, OrderType::TriggerMarket);
    assert_eq!(fills[0].maker_nodes[0].order.order_id, 2);
}

#[rstest]
fn test_maker_limit_bids_exclude_levels_crossing_fallback() {
    let mut dlob = Dlob::new();
    dlob.insert_order(&limit_order_stub(1, Direction::Long, "102", "1", 0), user_stub(1), 1);
    dlob.insert_order(&limit_order_stub(2, Direction::Long, "99", "1", 0), user_stub(2), 1);

    let makers: Vec<u32> = dlob
        .get_maker_limit_bids(0, 1, MarketType::Perp, None, Some(Price::from("101")))
        .unwrap()
        .map(|n| n.order.order_id)
        .collect();

    // The bid at 102 crosses the fallback ask and is left to the fallback path
    assert_eq!(makers, vec![2]);
}
