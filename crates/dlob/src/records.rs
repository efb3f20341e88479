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

//! Event records and snapshot types the book ingests.

use serde::{Deserialize, Serialize};

use crate::{
    enums::{MarketType, OrderAction},
    identifiers::UserAccountId,
    orders::Order,
    types::Quantity,
};

/// An order paired with its owning account.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlobOrder {
    /// The owning account.
    pub user: UserAccountId,
    /// The order.
    pub order: Order,
}

/// A point-in-time snapshot of one user's open orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    /// The account the orders belong to.
    pub user: UserAccountId,
    /// The account's order array.
    pub orders: Vec<Order>,
}

/// An event record for a newly placed order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// The owning account.
    pub user: UserAccountId,
    /// The order as placed.
    pub order: Order,
}

/// An event record for an action on up to two sides of a match.
///
/// Either side may be absent: a fallback fill has no maker, and maker-only actions
/// carry no taker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderActionRecord {
    /// The unix timestamp of the action.
    pub ts: i64,
    /// The action kind.
    pub action: OrderAction,
    /// The market the action occurred in.
    pub market_index: u16,
    /// The market class the action occurred in.
    pub market_type: MarketType,
    /// The taker account, if a taker side is present.
    pub taker: Option<UserAccountId>,
    /// The taker's order ID.
    pub taker_order_id: Option<u32>,
    /// The taker order's cumulative filled amount after this action.
    pub taker_order_cumulative_base_asset_amount_filled: Option<Quantity>,
    /// The maker account, if a maker side is present.
    pub maker: Option<UserAccountId>,
    /// The maker's order ID.
    pub maker_order_id: Option<u32>,
    /// The maker order's cumulative filled amount after this action.
    pub maker_order_cumulative_base_asset_amount_filled: Option<Quantity>,
}

impl OrderActionRecord {
    /// Returns the taker side key parts, if the record carries a taker.
    #[must_use]
    pub fn taker_side(&self) -> Option<(UserAccountId, u32)> {
        match (self.taker, self.taker_order_id) {
            (Some(user), Some(order_id)) => Some((user, order_id)),
            _ => None,
        }
    }

    /// Returns the maker side key parts, if the record carries a maker.
    #[must_use]
    pub fn maker_side(&self) -> Option<(UserAccountId, u32)> {
        match (self.maker, self.maker_order_id) {
            (Some(user), Some(order_id)) => Some((user, order_id)),
            _ => None,
        }
    }
}
