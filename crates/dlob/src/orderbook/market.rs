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

//! The per-market bundle of node lists.

use std::fmt::Display;

use crate::{
    enums::{BookSide, MarketType, NodeCategory, OrderTriggerCondition, SortDirection},
    identifiers::OrderKey,
    orderbook::{list::NodeList, node::classify, node::OrderNode},
    orders::{predicates::is_resting_limit_order, Order},
};

/// The node lists for one `(market_type, market_index)`: four classifications per
/// side plus the two trigger lists.
#[derive(Clone, Debug)]
pub struct MarketBook {
    /// The market class.
    pub market_type: MarketType,
    /// The market index.
    pub market_index: u16,
    pub(crate) resting_limit_bids: NodeList,
    pub(crate) resting_limit_asks: NodeList,
    pub(crate) floating_limit_bids: NodeList,
    pub(crate) floating_limit_asks: NodeList,
    pub(crate) taking_limit_bids: NodeList,
    pub(crate) taking_limit_asks: NodeList,
    pub(crate) market_bids: NodeList,
    pub(crate) market_asks: NodeList,
    pub(crate) trigger_above: NodeList,
    pub(crate) trigger_below: NodeList,
}

impl MarketBook {
    /// Creates a new [`MarketBook`] instance with all lists empty.
    #[must_use]
    pub fn new(market_type: MarketType, market_index: u16) -> Self {
        Self {
            market_type,
            market_index,
            resting_limit_bids: NodeList::new(NodeCategory::RestingLimit, SortDirection::Desc),
            resting_limit_asks: NodeList::new(NodeCategory::RestingLimit, SortDirection::Asc),
            floating_limit_bids: NodeList::new(NodeCategory::FloatingLimit, SortDirection::Desc),
            floating_limit_asks: NodeList::new(NodeCategory::FloatingLimit, SortDirection::Asc),
            taking_limit_bids: NodeList::new(NodeCategory::TakingLimit, SortDirection::Asc),
            taking_limit_asks: NodeList::new(NodeCategory::TakingLimit, SortDirection::Asc),
            market_bids: NodeList::new(NodeCategory::Market, SortDirection::Asc),
            market_asks: NodeList::new(NodeCategory::Market, SortDirection::Asc),
            trigger_above: NodeList::new(NodeCategory::Trigger, SortDirection::Asc),
            trigger_below: NodeList::new(NodeCategory::Trigger, SortDirection::Desc),
        }
    }

    /// Returns every list in the book.
    #[must_use]
    pub(crate) fn node_lists(&self) -> [&NodeList; 10] {
        [
            &self.resting_limit_bids,
            &self.resting_limit_asks,
            &self.floating_limit_bids,
            &self.floating_limit_asks,
            &self.taking_limit_bids,
            &self.taking_limit_asks,
            &self.market_bids,
            &self.market_asks,
            &self.trigger_above,
            &self.trigger_below,
        ]
    }

    /// Returns every non-trigger list in the book.
    #[must_use]
    pub(crate) fn non_trigger_lists(&self) -> [&NodeList; 8] {
        [
            &self.resting_limit_bids,
            &self.resting_limit_asks,
            &self.floating_limit_bids,
            &self.floating_limit_asks,
            &self.taking_limit_bids,
            &self.taking_limit_asks,
            &self.market_bids,
            &self.market_asks,
        ]
    }

    /// Returns the list hosting `order` under classification at `slot`.
    pub(crate) fn list_for_order_mut(&mut self, order: &Order, slot: u64) -> &mut NodeList {
        match classify(order, slot) {
            NodeCategory::Trigger => match order.trigger_condition {
                OrderTriggerCondition::Above | OrderTriggerCondition::TriggeredAbove => {
                    &mut self.trigger_above
                }
                OrderTriggerCondition::Below | OrderTriggerCondition::TriggeredBelow => {
                    &mut self.trigger_below
                }
            },
            category => {
                let side = order.direction.book_side();
                match (category, side) {
                    (NodeCategory::RestingLimit, BookSide::Bid) => &mut self.resting_limit_bids,
                    (NodeCategory::RestingLimit, BookSide::Ask) => &mut self.resting_limit_asks,
                    (NodeCategory::FloatingLimit, BookSide::Bid) => &mut self.floating_limit_bids,
                    (NodeCategory::FloatingLimit, BookSide::Ask) => &mut self.floating_limit_asks,
                    (NodeCategory::TakingLimit, BookSide::Bid) => &mut self.taking_limit_bids,
                    (NodeCategory::TakingLimit, BookSide::Ask) => &mut self.taking_limit_asks,
                    (_, BookSide::Bid) => &mut self.market_bids,
                    (_, BookSide::Ask) => &mut self.market_asks,
                }
            }
        }
    }

    /// Returns the node with the given key from whichever list hosts it.
    #[must_use]
    pub(crate) fn get_node(&self, key: &OrderKey) -> Option<&OrderNode> {
        self.node_lists().into_iter().find_map(|list| list.get(key))
    }

    /// Moves taking-limit nodes whose auction has elapsed at `slot` into the resting
    /// limit lists. Returns the number of nodes promoted.
    ///
    /// The scan collects first and promotes second, so list iteration is never
    /// invalidated mid-pass.
    pub(crate) fn promote_resting(&mut self, slot: u64) -> usize {
        promote_side(&mut self.taking_limit_bids, &mut self.resting_limit_bids, slot)
            + promote_side(&mut self.taking_limit_asks, &mut self.resting_limit_asks, slot)
    }
}

fn promote_side(taking: &mut NodeList, resting: &mut NodeList, slot: u64) -> usize {
    let newly_resting: Vec<OrderNode> = taking
        .iter()
        .filter(|node| is_resting_limit_order(&node.order, slot))
        .copied()
        .collect();

    for node in &newly_resting {
        taking.remove(&node.key());
        resting.insert(node.order, node.user);
    }

    newly_resting.len()
}

impl Display for MarketBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open: usize = self.node_lists().into_iter().map(NodeList::len).sum();
        write!(
            f,
            "{}({}-{}, nodes={})",
            stringify!(MarketBook),
            self.market_type,
            self.market_index,
            open,
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
        stubs::{limit_order_stub, trigger_order_stub, user_stub},
    };

    #[rstest]
    fn test_routing_resting_limit() {
        let mut book = MarketBook::new(MarketType::Perp, 0);
        let bid = limit_order_stub(1, Direction::Long, "100", "1", 0);
        let ask = limit_order_stub(2, Direction::Short, "101", "1", 0);

        assert_eq!(
            book.list_for_order_mut(&bid, 0).category(),
            NodeCategory::RestingLimit
        );
        book.list_for_order_mut(&bid, 0).insert(bid, user_stub(1));
        book.list_for_order_mut(&ask, 0).insert(ask, user_stub(1));

        assert_eq!(book.resting_limit_bids.len(), 1);
        assert_eq!(book.resting_limit_asks.len(), 1);
    }

    #[rstest]
    fn test_routing_trigger_sides() {
        let mut book = MarketBook::new(MarketType::Perp, 0);
        let above = trigger_order_stub(
            1,
            Direction::Long,
            crate::enums::OrderTriggerCondition::Above,
            "1000",
            "1",
        );
        let below = trigger_order_stub(
            2,
            Direction::Short,
            crate::enums::OrderTriggerCondition::Below,
            "900",
            "1",
        );
        book.list_for_order_mut(&above, 0).insert(above, user_stub(1));
        book.list_for_order_mut(&below, 0).insert(below, user_stub(1));

        assert_eq!(book.trigger_above.len(), 1);
        assert_eq!(book.trigger_below.len(), 1);
    }

    #[rstest]
    fn test_promote_resting_moves_elapsed_auctions() {
        let mut book = MarketBook::new(MarketType::Perp, 0);
        let user = user_stub(1);
        let mut order = limit_order_stub(1, Direction::Long, "100", "1", 10);
        order.auction_duration = 5;

        book.list_for_order_mut(&order, 12).insert(order, user);
        assert_eq!(book.taking_limit_bids.len(), 1);

        assert_eq!(book.promote_resting(14), 0);
        assert_eq!(book.promote_resting(16), 1);
        assert_eq!(book.taking_limit_bids.len(), 0);
        assert_eq!(book.resting_limit_bids.len(), 1);
    }

    #[rstest]
    fn test_promotion_preserves_price_time() {
        let mut book = MarketBook::new(MarketType::Perp, 0);
        let mut first = limit_order_stub(1, Direction::Long, "100", "1", 10);
        first.auction_duration = 5;
        let mut second = limit_order_stub(2, Direction::Long, "100", "1", 11);
        second.auction_duration = 5;

        book.list_for_order_mut(&first, 12).insert(first, user_stub(1));
        book.list_for_order_mut(&second, 12).insert(second, user_stub(2));
        book.promote_resting(20);

        let order_ids: Vec<u32> = book
            .resting_limit_bids
            .iter()
            .map(|n| n.order.order_id)
            .collect();
        assert_eq!(order_ids, vec![1, 2]);
    }
}
