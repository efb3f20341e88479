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

//! Order classification, trigger, and expiry predicates.
//!
//! These predicates define the book's classification state machine. They are pure
//! functions of an order and the current slot or timestamp; the book never caches
//! their results across slots.

use crate::{
    accounts::OraclePriceData,
    enums::{OrderStatus, OrderTriggerCondition, OrderType},
    orders::{auction::get_auction_price, Order},
    types::Price,
};

/// Returns `true` if the order is a fixed or floating limit order.
#[must_use]
pub fn is_limit_order(order: &Order) -> bool {
    matches!(order.order_type, OrderType::Limit | OrderType::TriggerLimit)
}

/// Returns `true` if the order is a market-style order.
#[must_use]
pub fn is_market_order(order: &Order) -> bool {
    matches!(
        order.order_type,
        OrderType::Market | OrderType::TriggerMarket | OrderType::Oracle
    )
}

/// Returns `true` if the order is conditional on a trigger.
#[must_use]
pub fn must_be_triggered(order: &Order) -> bool {
    matches!(
        order.order_type,
        OrderType::TriggerMarket | OrderType::TriggerLimit
    )
}

/// Returns `true` if the order's trigger condition has fired.
#[must_use]
pub fn is_triggered(order: &Order) -> bool {
    matches!(
        order.trigger_condition,
        OrderTriggerCondition::TriggeredAbove | OrderTriggerCondition::TriggeredBelow
    )
}

/// Returns `true` if the order is conditional and has not yet triggered.
#[must_use]
pub fn is_inactive_trigger_order(order: &Order) -> bool {
    must_be_triggered(order) && !is_triggered(order)
}

/// Returns `true` if the order's auction window has elapsed at `slot`.
#[must_use]
pub fn is_auction_complete(order: &Order, slot: u64) -> bool {
    if order.auction_duration == 0 {
        return true;
    }
    slot.saturating_sub(order.slot) > u64::from(order.auction_duration)
}

/// Returns `true` if the order currently prices off its auction.
#[must_use]
pub fn has_auction_price(order: &Order, slot: u64) -> bool {
    !is_auction_complete(order, slot)
        && (!order.auction_start_price.is_zero() || !order.auction_end_price.is_zero())
}

/// Returns `true` if the order rests in the book at `slot`.
///
/// A post-only limit order rests from insertion; any other limit order rests once its
/// auction window elapses.
#[must_use]
pub fn is_resting_limit_order(order: &Order, slot: u64) -> bool {
    if !is_limit_order(order) {
        return false;
    }
    order.post_only || is_auction_complete(order, slot)
}

/// Returns `true` if the order takes liquidity at `slot`.
#[must_use]
pub fn is_taking_order(order: &Order, slot: u64) -> bool {
    is_market_order(order) || (is_limit_order(order) && !is_resting_limit_order(order, slot))
}

/// Returns `true` if the order has expired at unix time `ts`.
///
/// Untriggered conditional orders and orders without a `max_ts` never expire here.
#[must_use]
pub fn is_order_expired(order: &Order, ts: i64) -> bool {
    if must_be_triggered(order) && !is_triggered(order) {
        return false;
    }
    if order.status != OrderStatus::Open || order.max_ts == 0 {
        return false;
    }
    ts > order.max_ts
}

/// Returns `true` if fallback liquidity may fill the order at `slot`.
///
/// With a zero minimum auction duration fallback is always available; otherwise the
/// order must have outlived the market's minimum auction window.
#[must_use]
pub fn is_fallback_available_liquidity_source(
    order: &Order,
    min_auction_duration: u8,
    slot: u64,
) -> bool {
    if min_auction_duration == 0 {
        return true;
    }
    slot.saturating_sub(order.slot) > u64::from(min_auction_duration)
}

/// Returns the order's current limit price, if it has one.
///
/// Inside an active auction the auction price governs. Otherwise a floating order
/// prices off the oracle plus its offset, and a fixed order prices at its limit price;
/// a zero limit price means the order has no price (it crosses at any price).
#[must_use]
pub fn get_limit_price(order: &Order, oracle: Option<&OraclePriceData>, slot: u64) -> Option<Price> {
    if has_auction_price(order, slot) {
        get_auction_price(order, slot, oracle)
    } else if order.oracle_price_offset != 0 {
        oracle.map(|o| o.price.saturating_add_offset(order.oracle_price_offset))
    } else if order.price.is_zero() {
        None
    } else {
        Some(order.price)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::stubs::{oracle_stub, order_stub};

    #[rstest]
    #[case(10, 5, 15, false)] // inside the window
    #[case(10, 5, 16, true)] // one past the window
    #[case(10, 0, 10, true)] // no auction
    fn test_is_auction_complete(
        #[case] order_slot: u64,
        #[case] duration: u8,
        #[case] slot: u64,
        #[case] expected: bool,
    ) {
        let mut order = order_stub();
        order.slot = order_slot;
        order.auction_duration = duration;
        assert_eq!(is_auction_complete(&order, slot), expected);
    }

    #[rstest]
    fn test_post_only_rests_from_insertion() {
        let mut order = order_stub();
        order.post_only = true;
        order.auction_duration = 100;
        order.slot = 10;
        assert!(is_resting_limit_order(&order, 10));
        assert!(!is_taking_order(&order, 10));
    }

    #[rstest]
    fn test_limit_order_rests_after_auction() {
        let mut order = order_stub();
        order.auction_duration = 5;
        order.slot = 10;
        assert!(!is_resting_limit_order(&order, 14));
        assert!(is_taking_order(&order, 14));
        assert!(is_resting_limit_order(&order, 16));
        assert!(!is_taking_order(&order, 16));
    }

    #[rstest]
    fn test_market_order_never_rests() {
        let mut order = order_stub();
        order.order_type = OrderType::Market;
        assert!(!is_resting_limit_order(&order, 1_000));
        assert!(is_taking_order(&order, 1_000));
    }

    #[rstest]
    #[case(OrderTriggerCondition::Above, true)]
    #[case(OrderTriggerCondition::TriggeredAbove, false)]
    fn test_inactive_trigger_order(
        #[case] condition: OrderTriggerCondition,
        #[case] expected: bool,
    ) {
        let mut order = order_stub();
        order.order_type = OrderType::TriggerMarket;
        order.trigger_condition = condition;
        assert_eq!(is_inactive_trigger_order(&order), expected);
    }

    #[rstest]
    #[case(0, 100, false)] // max_ts zero never expires
    #[case(50, 49, false)]
    #[case(50, 50, false)] // expiry is strict
    #[case(50, 51, true)]
    fn test_is_order_expired(#[case] max_ts: i64, #[case] ts: i64, #[case] expected: bool) {
        let mut order = order_stub();
        order.max_ts = max_ts;
        assert_eq!(is_order_expired(&order, ts), expected);
    }

    #[rstest]
    fn test_untriggered_order_never_expires() {
        let mut order = order_stub();
        order.order_type = OrderType::TriggerMarket;
        order.trigger_condition = OrderTriggerCondition::Above;
        order.max_ts = 10;
        assert!(!is_order_expired(&order, 100));
    }

    #[rstest]
    #[case(0, 100, true)] // zero minimum: always available
    #[case(10, 15, false)]
    #[case(10, 21, true)]
    fn test_fallback_availability(
        #[case] min_auction_duration: u8,
        #[case] slot: u64,
        #[case] expected: bool,
    ) {
        let mut order = order_stub();
        order.slot = 10;
        assert_eq!(
            is_fallback_available_liquidity_source(&order, min_auction_duration, slot),
            expected
        );
    }

    #[rstest]
    fn test_limit_price_fixed() {
        let mut order = order_stub();
        order.price = Price::from("100");
        assert_eq!(get_limit_price(&order, None, 50), Some(Price::from("100")));
    }

    #[rstest]
    fn test_limit_price_floating() {
        let mut order = order_stub();
        order.oracle_price_offset = Price::from("0.5").raw;
        let oracle = oracle_stub("100", 50);
        assert_eq!(
            get_limit_price(&order, Some(&oracle), 50),
            Some(Price::from("100.5"))
        );
        assert_eq!(get_limit_price(&order, None, 50), None);
    }

    #[rstest]
    fn test_limit_price_auction_governs() {
        let mut order = order_stub();
        order.price = Price::from("90");
        order.auction_start_price = Price::from("100");
        order.auction_end_price = Price::from("110");
        order.auction_duration = 10;
        order.slot = 10;
        assert_eq!(get_limit_price(&order, None, 15), Some(Price::from("105")));
        // Past the window the fixed price governs again
        assert_eq!(get_limit_price(&order, None, 21), Some(Price::from("90")));
    }

    #[rstest]
    fn test_limit_price_none_for_priceless_market_order() {
        let mut order = order_stub();
        order.order_type = OrderType::Market;
        order.price = Price::zero();
        assert_eq!(get_limit_price(&order, None, 50), None);
    }
}
