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

//! Auction price interpolation for orders inside their auction window.

use crate::{
    accounts::OraclePriceData,
    enums::OrderType,
    orders::Order,
    types::Price,
};

/// Returns the current auction price for `order` at `slot`.
///
/// Fixed auctions interpolate linearly between the auction start and end prices over
/// the auction duration. Oracle orders treat the start and end prices as offsets from
/// the live oracle price; without an oracle their auction price is undefined.
#[must_use]
pub fn get_auction_price(
    order: &Order,
    slot: u64,
    oracle: Option<&OraclePriceData>,
) -> Option<Price> {
    match order.order_type {
        OrderType::Oracle => {
            let offset = interpolate(order, slot);
            oracle.map(|o| o.price.saturating_add_offset(offset))
        }
        _ => Some(Price::from_raw(interpolate(order, slot).max(0))),
    }
}

/// Linearly interpolates the raw auction value for `order` at `slot`.
///
/// Elapsed slots are clamped to the auction duration, so a completed auction holds at
/// the end price.
fn interpolate(order: &Order, slot: u64) -> i64 {
    let duration = i128::from(order.auction_duration);
    if duration == 0 {
        return order.auction_start_price.raw;
    }
    let elapsed = i128::from(slot.saturating_sub(order.slot)).min(duration);
    let start = i128::from(order.auction_start_price.raw);
    let end = i128::from(order.auction_end_price.raw);
    let value = start + (end - start) * elapsed / duration;
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
