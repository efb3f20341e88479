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

//! An order node: an order bound to its owner and classification within the book.

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    accounts::OraclePriceData,
    enums::NodeCategory,
    identifiers::{OrderKey, UserAccountId},
    orders::{
        predicates::{get_limit_price, is_inactive_trigger_order, is_market_order,
            is_resting_limit_order},
        Order,
    },
    types::{Price, Quantity},
};

/// Classifies `order` into the node category it belongs to at `slot`.
#[must_use]
pub fn classify(order: &Order, slot: u64) -> NodeCategory {
    if is_inactive_trigger_order(order) {
        NodeCategory::Trigger
    } else if is_market_order(order) {
        NodeCategory::Market
    } else if order.oracle_price_offset != 0 {
        NodeCategory::FloatingLimit
    } else if is_resting_limit_order(order, slot) {
        NodeCategory::RestingLimit
    } else {
        NodeCategory::TakingLimit
    }
}

/// Returns the static sort value a node of `category` is keyed by.
///
/// Floating orders are keyed by their oracle offset and taking orders by their
/// submission slot, so the keys never change as the oracle or clock moves; cross-list
/// ordering is resolved by the merge step at query time.
#[must_use]
pub fn sort_value(category: NodeCategory, order: &Order) -> i64 {
    match category {
        NodeCategory::RestingLimit => order.price.raw,
        NodeCategory::FloatingLimit => order.oracle_price_offset,
        NodeCategory::TakingLimit | NodeCategory::Market => {
            i64::try_from(order.slot).unwrap_or(i64::MAX)
        }
        NodeCategory::Trigger => order.trigger_price.raw,
    }
}

/// An order bound to its owning account and its classification within the book.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNode {
    /// The order.
    pub order: Order,
    /// The owning account.
    pub user: UserAccountId,
    /// The node's classification; always matches the containing list.
    pub category: NodeCategory,
    pub(crate) sequence: u64,
}

impl OrderNode {
    /// Creates a new [`OrderNode`] instance.
    #[must_use]
    pub(crate) const fn new(
        order: Order,
        user: UserAccountId,
        category: NodeCategory,
        sequence: u64,
    ) -> Self {
        Self {
            order,
            user,
            category,
            sequence,
        }
    }

    /// Returns the node's `(order_id, user_account)` key.
    #[must_use]
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.order.order_id, self.user)
    }

    /// Returns the node's effective price at the given oracle and slot.
    ///
    /// Trigger nodes are matched against the oracle price only, so their effective
    /// price is the trigger price. Market nodes without a limit price return `None`
    /// (they match at any price).
    #[must_use]
    pub fn effective_price(&self, oracle: Option<&OraclePriceData>, slot: u64) -> Option<Price> {
        match self.category {
            NodeCategory::Trigger => Some(self.order.trigger_price),
            _ => get_limit_price(&self.order, oracle, slot),
        }
    }

    /// Returns the node's unfilled base asset amount.
    #[must_use]
    pub fn remaining_base(&self) -> Quantity {
        self.order.remaining_base()
    }

    /// Returns `true` if the node's order is fully filled.
    #[must_use]
    pub fn is_base_filled(&self) -> bool {
        self.order.base_asset_amount_filled >= self.order.base_asset_amount
    }
}

impl Display for OrderNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}, {}, {})",
            stringify!(OrderNode),
            self.key(),
            self.category,
            self.order,
        )
    }
}

impl Debug for OrderNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// A taker node paired with the maker nodes it can fill against.
///
/// Empty `maker_nodes` means "filled by fallback liquidity or expired". Nodes are
/// owned copies taken at emission time: earlier simulated fills from the same query
/// are applied, and the book itself is never mutated by a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeToFill {
    /// The taker node.
    pub node: OrderNode,
    /// The maker nodes the taker crosses, best first.
    pub maker_nodes: Vec<OrderNode>,
}

impl NodeToFill {
    /// Creates a new [`NodeToFill`] instance.
    #[must_use]
    pub fn new(node: OrderNode, maker_nodes: Vec<OrderNode>) -> Self {
        Self { node, maker_nodes }
    }
}

/// A conditional node whose trigger condition has fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeToTrigger {
    /// The triggered node.
    pub node: OrderNode,
}

/// A node yielded by the merged bid/ask getters: a book order or synthetic
/// fallback liquidity at the vAMM price.
#[derive(Copy, Clone, Debug)]
pub enum BookNode<'a> {
    /// A node resting in (or taking through) this book.
    Order(&'a OrderNode),
    /// Synthetic single-level vAMM liquidity at the fallback price.
    Vamm {
        /// The fallback price.
        price: Price,
    },
}

impl BookNode<'_> {
    /// Returns the node's price at the given oracle and slot.
    #[must_use]
    pub fn price(&self, oracle: Option<&OraclePriceData>, slot: u64) -> Option<Price> {
        match self {
            Self::Order(node) => node.effective_price(oracle, slot),
            Self::Vamm { price } => Some(*price),
        }
    }

    /// Returns the underlying order node, if any.
    #[must_use]
    pub fn order_node(&self) -> Option<&OrderNode> {
        match self {
            Self::Order(node) => Some(node),
            Self::Vamm { .. } => None,
        }
    }
}
