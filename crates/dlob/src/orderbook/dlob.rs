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

//! The top-level order book container: ingestion, classification, and lifecycle.

use std::{collections::BTreeMap, fmt::Display};

use ahash::{AHashMap, AHashSet};

use crate::{
    enums::{MarketType, OrderAction, OrderStatus, OrderTriggerCondition},
    identifiers::{OrderKey, UserAccountId},
    orderbook::market::MarketBook,
    orders::{predicates::is_triggered, Order},
    records::{DlobOrder, OrderActionRecord, OrderRecord, UserSnapshot},
    types::Quantity,
};

/// An in-memory mirror of the exchange's open-order state.
///
/// The book owns all node lists and nodes exclusively; owner identifiers are copied by
/// value. It is rebuilt at startup from a user snapshot and kept current by applying
/// event records in their observed order.
#[derive(Debug)]
pub struct Dlob {
    pub(crate) books: BTreeMap<(MarketType, u16), MarketBook>,
    open_orders: AHashMap<MarketType, AHashSet<OrderKey>>,
    max_slot_for_resting_limit_orders: u64,
    initialized: bool,
}

impl Default for Dlob {
    fn default() -> Self {
        Self::new()
    }
}

impl Dlob {
    /// Creates a new empty [`Dlob`] instance.
    #[must_use]
    pub fn new() -> Self {
        let mut open_orders = AHashMap::new();
        open_orders.insert(MarketType::Perp, AHashSet::new());
        open_orders.insert(MarketType::Spot, AHashSet::new());
        Self {
            books: BTreeMap::new(),
            open_orders,
            max_slot_for_resting_limit_orders: 0,
            initialized: false,
        }
    }

    /// Returns `true` if the book has been initialized from a snapshot.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the watermark below which taking-limit promotion has already run.
    #[must_use]
    pub const fn max_slot_for_resting_limit_orders(&self) -> u64 {
        self.max_slot_for_resting_limit_orders
    }

    /// Returns the number of open order keys indexed for `market_type`.
    #[must_use]
    pub fn open_order_count(&self, market_type: MarketType) -> usize {
        self.open_orders
            .get(&market_type)
            .map_or(0, |s| s.len())
    }

    /// Returns `true` if the key is indexed as open for `market_type`.
    #[must_use]
    pub fn has_open_order(&self, market_type: MarketType, key: &OrderKey) -> bool {
        self.open_orders
            .get(&market_type)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Initializes the book from per-user order snapshots.
    ///
    /// Returns `false` without touching the book if it is already initialized.
    pub fn init_from_snapshot(
        &mut self,
        users: impl IntoIterator<Item = UserSnapshot>,
        slot: u64,
    ) -> bool {
        if self.initialized {
            return false;
        }
        for snapshot in users {
            for order in snapshot.orders {
                self.insert_order(&order, snapshot.user, slot);
            }
        }
        self.initialized = true;
        log::info!("Initialized DLOB from user snapshot at slot {slot}");
        true
    }

    /// Initializes the book from a flat order list.
    ///
    /// Returns `false` without touching the book if it is already initialized.
    pub fn init_from_orders(
        &mut self,
        orders: impl IntoIterator<Item = DlobOrder>,
        slot: u64,
    ) -> bool {
        if self.initialized {
            return false;
        }
        for entry in orders {
            self.insert_order(&entry.order, entry.user, slot);
        }
        self.initialized = true;
        log::info!("Initialized DLOB from order list at slot {slot}");
        true
    }

    /// Applies a record for a newly placed order.
    pub fn handle_order_record(&mut self, record: &OrderRecord, slot: u64) {
        self.insert_order(&record.order, record.user, slot);
    }

    /// Applies an order action record to both sides it carries.
    ///
    /// `Place` has already been ingested through the order record, and expiry is
    /// discovered on query, so both are ignored. Records referencing orders not in
    /// the book are ignored.
    pub fn handle_order_action_record(&mut self, record: &OrderActionRecord, slot: u64) {
        log::debug!("Processing {} action at slot {slot}", record.action);
        match record.action {
            OrderAction::Place | OrderAction::Expire => {}
            OrderAction::Trigger => {
                for (user, order_id) in record.taker_side().into_iter().chain(record.maker_side())
                {
                    if let Some(order) = self.get_order(order_id, user) {
                        self.trigger(&order, user, slot);
                    }
                }
            }
            OrderAction::Fill => {
                if let Some((user, order_id)) = record.taker_side() {
                    self.apply_fill(
                        user,
                        order_id,
                        record.taker_order_cumulative_base_asset_amount_filled,
                        slot,
                    );
                }
                if let Some((user, order_id)) = record.maker_side() {
                    self.apply_fill(
                        user,
                        order_id,
                        record.maker_order_cumulative_base_asset_amount_filled,
                        slot,
                    );
                }
            }
            OrderAction::Cancel => {
                for (user, order_id) in record.taker_side().into_iter().chain(record.maker_side())
                {
                    if let Some(order) = self.get_order(order_id, user) {
                        self.delete_order(&order, user, slot);
                    }
                }
            }
        }
    }

    fn apply_fill(
        &mut self,
        user: UserAccountId,
        order_id: u32,
        cumulative_filled: Option<Quantity>,
        slot: u64,
    ) {
        let Some(cumulative_filled) = cumulative_filled else {
            return;
        };
        if let Some(order) = self.get_order(order_id, user) {
            self.update_order(&order, user, slot, cumulative_filled);
        }
    }

    /// Inserts an order into the list its classification selects.
    ///
    /// Orders with `Init` status are ignored. Open orders are indexed in the
    /// open-order key set for their market type.
    pub fn insert_order(&mut self, order: &Order, user: UserAccountId, slot: u64) {
        if order.status == OrderStatus::Init {
            return;
        }
        self.update_resting_limit_orders(slot);

        let key = OrderKey::new(order.order_id, user);
        if order.status == OrderStatus::Open {
            self.open_orders
                .entry(order.market_type)
                .or_default()
                .insert(key);
        }

        let book = self
            .books
            .entry((order.market_type, order.market_index))
            .or_insert_with(|| MarketBook::new(order.market_type, order.market_index));
        book.list_for_order_mut(order, slot).insert(*order, user);
        log::debug!("Inserted {key} into {}-{}", order.market_type, order.market_index);
    }

    /// Updates the order's cumulative filled amount in place.
    ///
    /// A fill to the full base amount deletes the order; a fill equal to the stored
    /// amount is a no-op. Position within the hosting list never changes.
    pub fn update_order(
        &mut self,
        order: &Order,
        user: UserAccountId,
        slot: u64,
        cumulative_filled: Quantity,
    ) {
        self.update_resting_limit_orders(slot);

        if cumulative_filled == order.base_asset_amount {
            self.delete_order(order, user, slot);
            return;
        }
        if cumulative_filled == order.base_asset_amount_filled {
            return;
        }

        let Some(book) = self.books.get_mut(&(order.market_type, order.market_index)) else {
            log::warn!("No book for {}-{} on update", order.market_type, order.market_index);
            return;
        };
        let mut updated = *order;
        updated.base_asset_amount_filled = cumulative_filled;
        book.list_for_order_mut(order, slot).update(updated, user);
    }

    /// Fires the order's trigger: the node leaves its trigger list and re-enters the
    /// book under its active classification.
    pub fn trigger(&mut self, order: &Order, user: UserAccountId, slot: u64) {
        if order.status == OrderStatus::Init {
            return;
        }
        self.update_resting_limit_orders(slot);
        if is_triggered(order) {
            return;
        }

        let key = OrderKey::new(order.order_id, user);
        let Some(book) = self.books.get_mut(&(order.market_type, order.market_index)) else {
            log::warn!("No book for {}-{} on trigger", order.market_type, order.market_index);
            return;
        };
        match order.trigger_condition {
            OrderTriggerCondition::Above => book.trigger_above.remove(&key),
            OrderTriggerCondition::Below => book.trigger_below.remove(&key),
            _ => {}
        }

        let mut triggered = *order;
        triggered.trigger_condition = match order.trigger_condition {
            OrderTriggerCondition::Above => OrderTriggerCondition::TriggeredAbove,
            OrderTriggerCondition::Below => OrderTriggerCondition::TriggeredBelow,
            other => other,
        };
        book.list_for_order_mut(&triggered, slot).insert(triggered, user);
        log::debug!("Triggered {key}");
    }

    /// Removes the order from the book and the open-order index.
    pub fn delete_order(&mut self, order: &Order, user: UserAccountId, slot: u64) {
        if order.status == OrderStatus::Init {
            return;
        }
        self.update_resting_limit_orders(slot);

        let key = OrderKey::new(order.order_id, user);
        self.open_orders
            .entry(order.market_type)
            .or_default()
            .remove(&key);

        let Some(book) = self.books.get_mut(&(order.market_type, order.market_index)) else {
            log::warn!("No book for {}-{} on delete", order.market_type, order.market_index);
            return;
        };
        let list = book.list_for_order_mut(order, slot);
        if list.contains(&key) {
            list.remove(&key);
            log::debug!("Deleted {key}");
        } else {
            log::warn!("Order {key} not found in its classified list on delete");
        }
    }

    /// Removes every order and resets the book to its initial empty state.
    pub fn clear(&mut self) {
        self.books.clear();
        for keys in self.open_orders.values_mut() {
            keys.clear();
        }
        self.max_slot_for_resting_limit_orders = 0;
        self.initialized = false;
        log::info!("Cleared DLOB");
    }

    /// Returns the current stored order for `(order_id, user)`, if present.
    #[must_use]
    pub fn get_order(&self, order_id: u32, user: UserAccountId) -> Option<Order> {
        let key = OrderKey::new(order_id, user);
        self.books
            .values()
            .find_map(|book| book.get_node(&key))
            .map(|node| node.order)
    }

    /// Returns every order in the book with its owning account.
    #[must_use]
    pub fn get_dlob_orders(&self) -> Vec<DlobOrder> {
        self.books
            .values()
            .flat_map(|book| book.node_lists())
            .flat_map(|list| list.iter())
            .map(|node| DlobOrder {
                user: node.user,
                order: node.order,
            })
            .collect()
    }

    /// Promotes taking-limit nodes whose auction has elapsed at `slot` into the
    /// resting limit lists.
    ///
    /// A no-op unless `slot` advances the watermark, so at most one promotion pass
    /// runs per slot increment. Invoked on the leading edge of every ingestion or
    /// query that carries a new slot.
    pub fn update_resting_limit_orders(&mut self, slot: u64) {
        if slot <= self.max_slot_for_resting_limit_orders {
            return;
        }
        self.max_slot_for_resting_limit_orders = slot;

        let mut promoted = 0;
        for book in self.books.values_mut() {
            promoted += book.promote_resting(slot);
        }
        if promoted > 0 {
            log::debug!("Promoted {promoted} taking limit orders to resting at slot {slot}");
        }
    }

    /// Returns the market book for `(market_type, market_index)`, if present.
    #[must_use]
    pub(crate) fn book(&self, market_type: MarketType, market_index: u16) -> Option<&MarketBook> {
        self.books.get(&(market_type, market_index))
    }
}

impl Display for Dlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(markets={}, open_perp={}, open_spot={})",
            stringify!(Dlob),
            self.books.len(),
            self.open_order_count(MarketType::Perp),
            self.open_order_count(MarketType::Spot),
        )
    }
}
