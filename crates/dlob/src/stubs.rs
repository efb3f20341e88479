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

//! Type stubs to facilitate testing.

use crate::{
    accounts::OraclePriceData,
    enums::{Direction, MarketType, OrderStatus, OrderTriggerCondition, OrderType},
    identifiers::UserAccountId,
    orders::Order,
    types::{Price, Quantity},
};

/// Returns a deterministic account identifier derived from `seed`.
#[must_use]
pub fn user_stub(seed: u8) -> UserAccountId {
    UserAccountId::new([seed; 32])
}

/// Returns an open fixed-price perp limit order with one unit of size.
#[must_use]
pub fn order_stub() -> Order {
    Order {
        order_id: 1,
        market_type: MarketType::Perp,
        market_index: 0,
        direction: Direction::Long,
        order_type: OrderType::Limit,
        status: OrderStatus::Open,
        base_asset_amount: Quantity::from("1"),
        base_asset_amount_filled: Quantity::zero(),
        price: Price::from("100"),
        oracle_price_offset: 0,
        auction_start_price: Price::zero(),
        auction_end_price: Price::zero(),
        auction_duration: 0,
        slot: 0,
        max_ts: 0,
        trigger_price: Price::zero(),
        trigger_condition: OrderTriggerCondition::Above,
        post_only: false,
        reduce_only: false,
        immediate_or_cancel: false,
    }
}

/// Returns an open resting limit order on the given side.
#[must_use]
pub fn limit_order_stub(
    order_id: u32,
    direction: Direction,
    price: &str,
    size: &str,
    slot: u64,
) -> Order {
    let mut order = order_stub();
    order.order_id = order_id;
    order.direction = direction;
    order.price = Price::from(price);
    order.base_asset_amount = Quantity::from(size);
    order.slot = slot;
    order
}

/// Returns an open market order with an auction window.
#[must_use]
pub fn market_order_stub(
    order_id: u32,
    direction: Direction,
    size: &str,
    slot: u64,
    auction_duration: u8,
    auction_start: &str,
    auction_end: &str,
) -> Order {
    let mut order = order_stub();
    order.order_id = order_id;
    order.direction = direction;
    order.order_type = OrderType::Market;
    order.price = Price::zero();
    order.base_asset_amount = Quantity::from(size);
    order.slot = slot;
    order.auction_duration = auction_duration;
    order.auction_start_price = Price::from(auction_start);
    order.auction_end_price = Price::from(auction_end);
    order
}

/// Returns an untriggered conditional market order.
#[must_use]
pub fn trigger_order_stub(
    order_id: u32,
    direction: Direction,
    condition: OrderTriggerCondition,
    trigger_price: &str,
    size: &str,
) -> Order {
    let mut order = order_stub();
    order.order_id = order_id;
    order.direction = direction;
    order.order_type = OrderType::TriggerMarket;
    order.price = Price::zero();
    order.trigger_condition = condition;
    order.trigger_price = Price::from(trigger_price);
    order.base_asset_amount = Quantity::from(size);
    order
}

/// Returns an oracle observation at the given price and slot.
#[must_use]
pub fn oracle_stub(price: &str, slot: u64) -> OraclePriceData {
    OraclePriceData::new(Price::from(price), slot, 0, true)
}
