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

//! An ordered multiset of order nodes of one classification and side.

use std::{cmp::Ordering, collections::BTreeMap, fmt::Display};

use indexmap::IndexMap;

use crate::{
    enums::{NodeCategory, SortDirection},
    identifiers::{OrderKey, UserAccountId},
    orderbook::node::{sort_value, OrderNode},
    orders::Order,
};

/// A static sort key with a side-dependent ordering.
#[derive(Clone, Copy, Debug, Eq)]
pub(crate) struct SortKey {
    pub value: i64,
    pub direction: SortDirection,
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.direction {
            SortDirection::Asc => self.value.cmp(&other.value),
            SortDirection::Desc => other.value.cmp(&self.value),
        }
    }
}

/// An ordered multiset of order nodes of one classification and side.
///
/// Nodes are stored keyed by `(order_id, user_account)` for O(1) lookup, with a sorted
/// index over static sort values. Equal sort values tie-break by insertion order
/// (FIFO), so equal-price orders match price-time.
#[derive(Clone, Debug)]
pub struct NodeList {
    category: NodeCategory,
    direction: SortDirection,
    index: BTreeMap<(SortKey, u64), OrderKey>,
    nodes: IndexMap<OrderKey, OrderNode, ahash::RandomState>,
    next_sequence: u64,
}

impl NodeList {
    /// Creates a new [`NodeList`] instance.
    #[must_use]
    pub fn new(category: NodeCategory, direction: SortDirection) -> Self {
        Self {
            category,
            direction,
            index: BTreeMap::new(),
            nodes: IndexMap::default(),
            next_sequence: 0,
        }
    }

    /// Returns the list's classification.
    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        self.category
    }

    /// Returns the number of nodes in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the list has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes all nodes from the list.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
    }

    /// Inserts an order at the position defined by the list's comparator.
    ///
    /// Inserting an order whose key is already present is equivalent to a single
    /// insert of the new order.
    pub fn insert(&mut self, order: Order, user: UserAccountId) {
        let key = OrderKey::new(order.order_id, user);
        if self.nodes.contains_key(&key) {
            self.remove(&key);
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let sort_key = self.sort_key_for(&order);
        self.index.insert((sort_key, sequence), key);
        self.nodes
            .insert(key, OrderNode::new(order, user, self.category, sequence));
    }

    /// Removes the node with the given key; a missing key is a no-op.
    pub fn remove(&mut self, key: &OrderKey) {
        if let Some(node) = self.nodes.swap_remove(key) {
            let sort_key = self.sort_key_for(&node.order);
            self.index.remove(&(sort_key, node.sequence));
        }
    }

    /// Replaces the stored order in place; the node's sort position does not change.
    ///
    /// Callers guarantee the order's sort value is unchanged (fill-amount updates
    /// never alter position). A missing key is a no-op.
    pub fn update(&mut self, order: Order, user: UserAccountId) {
        let key = OrderKey::new(order.order_id, user);
        if let Some(node) = self.nodes.get_mut(&key) {
            node.order = order;
        }
    }

    /// Returns the node with the given key, if present.
    #[must_use]
    pub fn get(&self, key: &OrderKey) -> Option<&OrderNode> {
        self.nodes.get(key)
    }

    /// Returns `true` if a node with the given key is present.
    #[must_use]
    pub fn contains(&self, key: &OrderKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Returns a forward iterator over the nodes in sort order.
    ///
    /// The iterator is finite and restartable by calling again. The book is
    /// single-threaded, so mutation during iteration cannot occur; the borrow rules
    /// enforce it.
    pub fn iter(&self) -> impl Iterator<Item = &OrderNode> + '_ {
        self.index.values().filter_map(move |key| self.nodes.get(key))
    }

    fn sort_key_for(&self, order: &Order) -> SortKey {
        SortKey {
            value: sort_value(self.category, order),
            direction: self.direction,
        }
    }
}

impl Display for NodeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(category={}, direction={}, len={})",
            stringify!(NodeList),
            self.category,
            self.direction,
            self.len(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::Direction,
        stubs::{limit_order_stub, user_stub},
        types::{Price, Quantity},
    };

    fn prices(list: &NodeList) -> Vec<Price> {
        list.iter().map(|n| n.order.price).collect()
    }

    #[rstest]
    fn test_ascending_order() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc);
        let user = user_stub(1);
        list.insert(limit_order_stub(1, Direction::Short, "101", "1", 0), user);
        list.insert(limit_order_stub(2, Direction::Short, "99", "1", 0), user);
        list.insert(limit_order_stub(3, Direction::Short, "100", "1", 0), user);

        assert_eq!(
            prices(&list),
            vec![Price::from("99"), Price::from("100"), Price::from("101")]
        );
    }

    #[rstest]
    fn test_descending_order() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Desc);
        let user = user_stub(1);
        list.insert(limit_order_stub(1, Direction::Long, "101", "1", 0), user);
        list.insert(limit_order_stub(2, Direction::Long, "99", "1", 0), user);
        list.insert(limit_order_stub(3, Direction::Long, "100", "1", 0), user);

        assert_eq!(
            prices(&list),
            vec![Price::from("101"), Price::from("100"), Price::from("99")]
        );
    }

    #[rstest]
    fn test_fifo_within_equal_prices() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Desc);
        list.insert(limit_order_stub(1, Direction::Long, "100", "1", 1), user_stub(1));
        list.insert(limit_order_stub(2, Direction::Long, "100", "1", 2), user_stub(2));
        list.insert(limit_order_stub(3, Direction::Long, "100", "1", 3), user_stub(3));

        let order_ids: Vec<u32> = list.iter().map(|n| n.order.order_id).collect();
        assert_eq!(order_ids, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_duplicate_insert_is_single_insert() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc);
        let user = user_stub(1);
        list.insert(limit_order_stub(1, Direction::Short, "100", "1", 0), user);
        list.insert(limit_order_stub(1, Direction::Short, "100", "2", 0), user);

        assert_eq!(list.len(), 1);
        let key = OrderKey::new(1, user);
        assert_eq!(
            list.get(&key).unwrap().order.base_asset_amount,
            Quantity::from("2")
        );
    }

    #[rstest]
    fn test_remove_missing_is_noop() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc);
        list.remove(&OrderKey::new(1, user_stub(1)));
        assert!(list.is_empty());
    }

    #[rstest]
    fn test_update_keeps_position() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc);
        let user = user_stub(1);
        list.insert(limit_order_stub(1, Direction::Short, "100", "10", 0), user);
        list.insert(limit_order_stub(2, Direction::Short, "100", "10", 0), user);

        let mut updated = limit_order_stub(1, Direction::Short, "100", "10", 0);
        updated.base_asset_amount_filled = Quantity::from("4");
        list.update(updated, user);

        let first = list.iter().next().unwrap();
        assert_eq!(first.order.order_id, 1);
        assert_eq!(first.order.base_asset_amount_filled, Quantity::from("4"));
    }

    #[rstest]
    fn test_iterator_restartable() {
        let mut list = NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc);
        let user = user_stub(1);
        list.insert(limit_order_stub(1, Direction::Short, "100", "1", 0), user);
        list.insert(limit_order_stub(2, Direction::Short, "101", "1", 0), user);

        assert_eq!(list.iter().count(), 2);
        assert_eq!(list.iter().count(), 2);
    }

    #[rstest]
    fn test_slot_sorted_list() {
        let mut list = NodeList::new(NodeCategory::Market, SortDirection::Asc);
        let user = user_stub(1);
        let mut a = limit_order_stub(1, Direction::Long, "0", "1", 7);
        a.order_type = crate::enums::OrderType::Market;
        let mut b = limit_order_stub(2, Direction::Long, "0", "1", 3);
        b.order_type = crate::enums::OrderType::Market;
        list.insert(a, user);
        list.insert(b, user);

        let slots: Vec<u64> = list.iter().map(|n| n.order.slot).collect();
        assert_eq!(slots, vec![3, 7]);
    }
}
