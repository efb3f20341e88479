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

//! Represents a single open order on the exchange.

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    enums::{Direction, MarketType, OrderStatus, OrderTriggerCondition, OrderType},
    types::{Price, Quantity},
};

/// Represents a single open order.
///
/// An order is immutable per update: mutation flows through the book as whole-value
/// replacement, never field surgery on a shared instance. The owning account is carried
/// alongside the order by the book, not inside it; `(order_id, user_account)` is the
/// order's identity.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The order ID, unique within the owning account.
    pub order_id: u32,
    /// The market class the order trades in.
    pub market_type: MarketType,
    /// The market the order trades in.
    pub market_index: u16,
    /// The direction of the order's exposure (long ⇒ bid, short ⇒ ask).
    pub direction: Direction,
    /// The execution style of the order.
    pub order_type: OrderType,
    /// The lifecycle status of the order.
    pub status: OrderStatus,
    /// The total base asset amount of the order.
    pub base_asset_amount: Quantity,
    /// The base asset amount filled so far.
    pub base_asset_amount_filled: Quantity,
    /// The fixed limit price; zero means "no price".
    pub price: Price,
    /// The signed raw price offset from the oracle; nonzero makes the order floating.
    pub oracle_price_offset: i64,
    /// The auction starting price (an oracle offset for oracle orders).
    pub auction_start_price: Price,
    /// The auction ending price (an oracle offset for oracle orders).
    pub auction_end_price: Price,
    /// The auction length in slots; zero means no auction.
    pub auction_duration: u8,
    /// The slot the order was submitted in.
    pub slot: u64,
    /// The unix timestamp the order expires at; zero means never.
    pub max_ts: i64,
    /// The conditional trigger price.
    pub trigger_price: Price,
    /// The conditional trigger condition.
    pub trigger_condition: OrderTriggerCondition,
    /// Whether the order may only provide liquidity.
    pub post_only: bool,
    /// Whether the order may only reduce an existing position.
    pub reduce_only: bool,
    /// Whether the unfilled remainder cancels after the first fill attempt.
    pub immediate_or_cancel: bool,
}

impl Order {
    /// Returns the unfilled base asset amount.
    #[must_use]
    pub fn remaining_base(&self) -> Quantity {
        self.base_asset_amount
            .saturating_sub(self.base_asset_amount_filled)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(id={}, {} {} {}-{}, {} @ {}, filled={}, slot={})",
            stringify!(Order),
            self.order_id,
            self.order_type,
            self.direction,
            self.market_type,
            self.market_index,
            self.base_asset_amount,
            self.price,
            self.base_asset_amount_filled,
            self.slot,
        )
    }
}

impl Debug for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{stubs::order_stub, types::Quantity};

    #[rstest]
    fn test_remaining_base() {
        let mut order = order_stub();
        order.base_asset_amount = Quantity::from("10");
        order.base_asset_amount_filled = Quantity::from("4");
        assert_eq!(order.remaining_base(), Quantity::from("6"));
    }

    #[rstest]
    fn test_remaining_base_saturates() {
        let mut order = order_stub();
        order.base_asset_amount = Quantity::from("1");
        order.base_asset_amount_filled = Quantity::from("2");
        assert_eq!(order.remaining_base(), Quantity::zero());
    }
}
