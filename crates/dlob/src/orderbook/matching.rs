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

//! Matching, trigger, and expiry discovery queries over the book.
//!
//! All queries are total functions: for any valid inputs they return an empty
//! sequence rather than failing, except that spot queries pricing orders off the
//! oracle require oracle data. Queries never mutate publicly observable state;
//! within a single call, simulated fills are tracked in a local overlay so later
//! pairings see correct remaining amounts.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::{
    accounts::{amm_paused, exchange_paused, fill_paused, MarketAccount, OraclePriceData,
        StateAccount},
    enums::MarketType,
    identifiers::OrderKey,
    orderbook::{
        dlob::Dlob,
        error::DlobError,
        merge::{merge_best, Generator},
        node::{BookNode, NodeToFill, NodeToTrigger, OrderNode},
    },
    orders::predicates::{
        is_auction_complete, is_fallback_available_liquidity_source, is_order_expired,
        is_taking_order,
    },
    types::{Price, Quantity},
};

pub(crate) type NodeIter<'a> = Generator<'a, &'a OrderNode>;

/// Fill amounts simulated during a single matching query.
///
/// The overlay keeps the book itself untouched while letting later pairings in the
/// same call observe earlier simulated fills.
#[derive(Debug, Default)]
struct SimulatedFills {
    filled: AHashMap<OrderKey, Quantity>,
}

impl SimulatedFills {
    fn filled_of(&self, node: &OrderNode) -> Quantity {
        self.filled
            .get(&node.key())
            .copied()
            .unwrap_or(node.order.base_asset_amount_filled)
    }

    fn remaining(&self, node: &OrderNode) -> Quantity {
        node.order.base_asset_amount.saturating_sub(self.filled_of(node))
    }

    fn apply(&mut self, node: &OrderNode, amount: Quantity) {
        let filled = self.filled_of(node) + amount;
        self.filled.insert(node.key(), filled);
    }

    /// Returns an owned copy of the node with prior simulated fills applied.
    fn snapshot(&self, node: &OrderNode) -> OrderNode {
        let mut copy = *node;
        copy.order.base_asset_amount_filled = self.filled_of(node);
        copy
    }
}

/// Decides the maker and taker roles for a pair of crossing resting orders.
///
/// Returns `(taker, maker)`, or `None` when both sides are post-only. With exactly
/// one post-only side, that side is the maker. Otherwise the side whose auction ends
/// first takes; on a tie the ask makes. Callers must not rely on the tie-break.
fn determine_maker_and_taker<'a>(
    ask: &'a OrderNode,
    bid: &'a OrderNode,
) -> Option<(&'a OrderNode, &'a OrderNode)> {
    match (ask.order.post_only, bid.order.post_only) {
        (true, true) => None,
        (true, false) => Some((bid, ask)),
        (false, true) => Some((ask, bid)),
        (false, false) => {
            let ask_end = ask.order.slot + u64::from(ask.order.auction_duration);
            let bid_end = bid.order.slot + u64::from(bid.order.auction_duration);
            if ask_end < bid_end {
                Some((ask, bid))
            } else {
                Some((bid, ask))
            }
        }
    }
}

/// Returns `true` if a taking ask at `taker_price` crosses a maker bid.
///
/// Spot market orders require a limit price, and spot makers priced worse than the
/// fallback bid are left to the fallback venue.
fn taker_ask_crosses(
    taker_price: Option<Price>,
    maker_bid: Price,
    market_type: MarketType,
    fallback_bid: Option<Price>,
) -> bool {
    if market_type == MarketType::Spot {
        if taker_price.is_none() {
            return false;
        }
        if let Some(fallback_bid) = fallback_bid {
            if maker_bid < fallback_bid {
                return false;
            }
        }
    }
    taker_price.map_or(true, |price| price <= maker_bid)
}

/// Returns `true` if a taking bid at `taker_price` crosses a maker ask.
fn taker_bid_crosses(
    taker_price: Option<Price>,
    maker_ask: Price,
    market_type: MarketType,
    fallback_ask: Option<Price>,
) -> bool {
    if market_type == MarketType::Spot {
        if taker_price.is_none() {
            return false;
        }
        if let Some(fallback_ask) = fallback_ask {
            if maker_ask > fallback_ask {
                return false;
            }
        }
    }
    taker_price.map_or(true, |price| price >= maker_ask)
}

fn price_raw_or(
    node: &OrderNode,
    oracle: Option<&OraclePriceData>,
    slot: u64,
    default: i64,
) -> i64 {
    node.effective_price(oracle, slot).map_or(default, |p| p.raw)
}

impl Dlob {
    // -------------------------------------------------------------------------------------------
    // Side getters
    // -------------------------------------------------------------------------------------------

    fn empty_nodes<'a>(&'a self) -> NodeIter<'a> {
        Box::new(std::iter::empty())
    }

    pub(crate) fn taking_asks_inner<'a>(&'a self, market_type: MarketType, market_index: u16) -> NodeIter<'a> {
        let Some(book) = self.book(market_type, market_index) else {
            return self.empty_nodes();
        };
        let generators: Vec<NodeIter<'a>> = vec![
            Box::new(book.market_asks.iter().filter(|n| !n.is_base_filled())),
            Box::new(book.taking_limit_asks.iter().filter(|n| !n.is_base_filled())),
        ];
        Box::new(merge_best(generators, |a, b| a.order.slot < b.order.slot))
    }

    pub(crate) fn taking_bids_inner<'a>(&'a self, market_type: MarketType, market_index: u16) -> NodeIter<'a> {
        let Some(book) = self.book(market_type, market_index) else {
            return self.empty_nodes();
        };
        let generators: Vec<NodeIter<'a>> = vec![
            Box::new(book.market_bids.iter().filter(|n| !n.is_base_filled())),
            Box::new(book.taking_limit_bids.iter().filter(|n| !n.is_base_filled())),
        ];
        Box::new(merge_best(generators, |a, b| a.order.slot < b.order.slot))
    }

    pub(crate) fn resting_limit_asks_inner<'a>(
        &'a self,
        market_type: MarketType,
        market_index: u16,
        slot: u64,
        oracle: Option<&'a OraclePriceData>,
    ) -> NodeIter<'a> {
        let Some(book) = self.book(market_type, market_index) else {
            return self.empty_nodes();
        };
        let mut generators: Vec<NodeIter<'a>> = vec![Box::new(
            book.resting_limit_asks.iter().filter(|n| !n.is_base_filled()),
        )];
        if oracle.is_some() {
            generators.push(Box::new(
                book.floating_limit_asks.iter().filter(|n| !n.is_base_filled()),
            ));
        } else if !book.floating_limit_asks.is_empty() {
            log::warn!("No oracle supplied; skipping floating limit asks for {market_type}-{market_index}");
        }
        Box::new(merge_best(generators, move |a, b| {
            price_raw_or(a, oracle, slot, i64::MAX) < price_raw_or(b, oracle, slot, i64::MAX)
        }))
    }

    pub(crate) fn resting_limit_bids_inner<'a>(
        &'a self,
        market_type: MarketType,
        market_index: u16,
        slot: u64,
        oracle: Option<&'a OraclePriceData>,
    ) -> NodeIter<'a> {
        let Some(book) = self.book(market_type, market_index) else {
            return self.empty_nodes();
        };
        let mut generators: Vec<NodeIter<'a>> = vec![Box::new(
            book.resting_limit_bids.iter().filter(|n| !n.is_base_filled()),
        )];
        if oracle.is_some() {
            generators.push(Box::new(
                book.floating_limit_bids.iter().filter(|n| !n.is_base_filled()),
            ));
        } else if !book.floating_limit_bids.is_empty() {
            log::warn!("No oracle supplied; skipping floating limit bids for {market_type}-{market_index}");
        }
        Box::new(merge_best(generators, move |a, b| {
            price_raw_or(a, oracle, slot, i64::MIN) > price_raw_or(b, oracle, slot, i64::MIN)
        }))
    }

    /// Maker asks priced at or below the fallback bid are excluded (perp only):
    /// fallback liquidity consumes them through the resting-versus-fallback path.
    pub(crate) fn maker_limit_asks_inner<'a>(
        &'a self,
        market_type: MarketType,
        market_index: u16,
        slot: u64,
        oracle: Option<&'a OraclePriceData>,
        fallback_bid: Option<Price>,
    ) -> NodeIter<'a> {
        let asks = self.resting_limit_asks_inner(market_type, market_index, slot, oracle);
        match (market_type, fallback_bid) {
            (MarketType::Perp, Some(fallback_bid)) => Box::new(asks.filter(move |node| {
                node.effective_price(oracle, slot)
                    .is_some_and(|price| price > fallback_bid)
            })),
            _ => asks,
        }
    }

    pub(crate) fn maker_limit_bids_inner<'a>(
        &'a self,
        market_type: MarketType,
        market_index: u16,
        slot: u64,
        oracle: Option<&'a OraclePriceData>,
        fallback_ask: Option<Price>,
    ) -> NodeIter<'a> {
        let bids = self.resting_limit_bids_inner(market_type, market_index, slot, oracle);
        match (market_type, fallback_ask) {
            (MarketType::Perp, Some(fallback_ask)) => Box::new(bids.filter(move |node| {
                node.effective_price(oracle, slot)
                    .is_some_and(|price| price < fallback_ask)
            })),
            _ => bids,
        }
    }

    pub(crate) fn check_spot_oracle(
        &self,
        market_type: MarketType,
        market_index: u16,
        oracle: Option<&OraclePriceData>,
    ) -> Result<(), DlobError> {
        if market_type == MarketType::Spot && oracle.is_none() {
            return Err(DlobError::MissingOracle(market_type, market_index));
        }
        Ok(())
    }

    /// Returns the taking asks for a market, oldest submission slot first.
    ///
    /// Fully filled nodes are skipped.
    pub fn get_taking_asks(
        &mut self,
        market_index: u16,
        market_type: MarketType,
        slot: u64,
    ) -> NodeIter<'_> {
        self.update_resting_limit_orders(slot);
        self.taking_asks_inner(market_type, market_index)
    }

    /// Returns the taking bids for a market, oldest submission slot first.
    ///
    /// Fully filled nodes are skipped.
    pub fn get_taking_bids(
        &mut self,
        market_index: u16,
        market_type: MarketType,
        slot: u64,
    ) -> NodeIter<'_> {
        self.update_resting_limit_orders(slot);
        self.taking_bids_inner(market_type, market_index)
    }

    /// Returns the resting limit asks for a market, best (lowest) effective price
    /// first, merged across the fixed and floating lists.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_resting_limit_asks<'a>(
        &'a mut self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
    ) -> Result<NodeIter<'a>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);
        Ok(self.resting_limit_asks_inner(market_type, market_index, slot, oracle))
    }

    /// Returns the resting limit bids for a market, best (highest) effective price
    /// first, merged across the fixed and floating lists.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_resting_limit_bids<'a>(
        &'a mut self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
    ) -> Result<NodeIter<'a>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);
        Ok(self.resting_limit_bids_inner(market_type, market_index, slot, oracle))
    }

    /// Returns the maker asks eligible to fill takers, best first.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_maker_limit_asks<'a>(
        &'a mut self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
        fallback_bid: Option<Price>,
    ) -> Result<NodeIter<'a>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);
        Ok(self.maker_limit_asks_inner(market_type, market_index, slot, oracle, fallback_bid))
    }

    /// Returns the maker bids eligible to fill takers, best first.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_maker_limit_bids<'a>(
        &'a mut self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
        fallback_ask: Option<Price>,
    ) -> Result<NodeIter<'a>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);
        Ok(self.maker_limit_bids_inner(market_type, market_index, slot, oracle, fallback_ask))
    }

    /// Returns all asks for a market: taking nodes before resting nodes, older slots
    /// first within taking, best price first within resting, with a synthetic vAMM
    /// node at the fallback price for perp markets.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_asks<'a>(
        &'a mut self,
        market_index: u16,
        fallback_ask: Option<Price>,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
    ) -> Result<Generator<'a, BookNode<'a>>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);

        let mut generators: Vec<Generator<'a, BookNode<'a>>> = vec![
            Box::new(
                self.taking_asks_inner(market_type, market_index)
                    .map(BookNode::Order),
            ),
            Box::new(
                self.resting_limit_asks_inner(market_type, market_index, slot, oracle)
                    .map(BookNode::Order),
            ),
        ];
        if market_type == MarketType::Perp {
            if let Some(price) = fallback_ask {
                generators.push(Box::new(std::iter::once(BookNode::Vamm { price })));
            }
        }

        Ok(Box::new(merge_best(generators, move |a, b| {
            better_ask(a, b, oracle, slot)
        })))
    }

    /// Returns all bids for a market: taking nodes before resting nodes, older slots
    /// first within taking, best price first within resting, with a synthetic vAMM
    /// node at the fallback price for perp markets.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_bids<'a>(
        &'a mut self,
        market_index: u16,
        fallback_bid: Option<Price>,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&'a OraclePriceData>,
    ) -> Result<Generator<'a, BookNode<'a>>, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);

        let mut generators: Vec<Generator<'a, BookNode<'a>>> = vec![
            Box::new(
                self.taking_bids_inner(market_type, market_index)
                    .map(BookNode::Order),
            ),
            Box::new(
                self.resting_limit_bids_inner(market_type, market_index, slot, oracle)
                    .map(BookNode::Order),
            ),
        ];
        if market_type == MarketType::Perp {
            if let Some(price) = fallback_bid {
                generators.push(Box::new(std::iter::once(BookNode::Vamm { price })));
            }
        }

        Ok(Box::new(merge_best(generators, move |a, b| {
            better_bid(a, b, oracle, slot)
        })))
    }

    /// Returns the price of the best ask, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn best_ask(
        &mut self,
        market_index: u16,
        fallback_ask: Option<Price>,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
    ) -> Result<Option<Price>, DlobError> {
        let mut asks = self.get_asks(market_index, fallback_ask, slot, market_type, oracle)?;
        Ok(asks.next().and_then(|node| node.price(oracle, slot)))
    }

    /// Returns the price of the best bid, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn best_bid(
        &mut self,
        market_index: u16,
        fallback_bid: Option<Price>,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
    ) -> Result<Option<Price>, DlobError> {
        let mut bids = self.get_bids(market_index, fallback_bid, slot, market_type, oracle)?;
        Ok(bids.next().and_then(|node| node.price(oracle, slot)))
    }

    // -------------------------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------------------------

    /// Finds all nodes eligible to fill: crossing resting pairs, takers against
    /// makers or fallback liquidity, and expired orders.
    ///
    /// Empty `maker_nodes` on a result means "filled by fallback liquidity or
    /// expired". For perp markets, results for the same taker are merged with their
    /// maker lists unioned; spot markets do not support multiple makers per taker, so
    /// results are returned unmerged.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    #[allow(clippy::too_many_arguments)]
    pub fn find_nodes_to_fill(
        &mut self,
        market_index: u16,
        fallback_bid: Option<Price>,
        fallback_ask: Option<Price>,
        slot: u64,
        ts: i64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
        state: &StateAccount,
        market: &MarketAccount,
    ) -> Result<Vec<NodeToFill>, DlobError> {
        if fill_paused(state, market) {
            return Ok(Vec::new());
        }
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);

        let is_amm_paused = amm_paused(state, market);
        let min_auction_duration = if market_type == MarketType::Perp {
            state.min_perp_auction_duration
        } else {
            0
        };

        let mut sim = SimulatedFills::default();

        let mut resting =
            self.find_crossing_resting_limit_orders(market_index, slot, market_type, oracle, &mut sim);
        if !is_amm_paused {
            self.cross_resting_against_fallback(
                market_index,
                slot,
                market_type,
                oracle,
                fallback_bid,
                fallback_ask,
                &mut sim,
                &mut resting,
            );
        }

        let taking = self.find_taking_nodes_to_fill(
            market_index,
            slot,
            market_type,
            oracle,
            is_amm_paused,
            min_auction_duration,
            fallback_bid,
            fallback_ask,
            &mut sim,
        );

        let expired = self.find_expired_nodes_to_fill(market_index, ts, market_type);

        let result = match market_type {
            // Spot does not support multiple makers per taker: no merge
            MarketType::Spot => resting.into_iter().chain(taking).chain(expired).collect(),
            MarketType::Perp => {
                let mut merged: IndexMap<OrderKey, NodeToFill> = IndexMap::new();
                for node_to_fill in resting.into_iter().chain(taking) {
                    match merged.entry(node_to_fill.node.key()) {
                        indexmap::map::Entry::Occupied(mut entry) => {
                            entry.get_mut().maker_nodes.extend(node_to_fill.maker_nodes);
                        }
                        indexmap::map::Entry::Vacant(entry) => {
                            entry.insert(node_to_fill);
                        }
                    }
                }
                merged.into_values().chain(expired).collect()
            }
        };
        Ok(result)
    }

    /// Pairs crossing resting asks and bids, best prices first.
    ///
    /// Both merged generators are price-sorted, so the inner scan stops at the first
    /// bid below the ask. Self-trades are skipped, and a pair of post-only orders is
    /// left unmatched.
    fn find_crossing_resting_limit_orders(
        &self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
        sim: &mut SimulatedFills,
    ) -> Vec<NodeToFill> {
        let mut nodes_to_fill = Vec::new();

        for ask in self.resting_limit_asks_inner(market_type, market_index, slot, oracle) {
            if sim.remaining(ask).is_zero() {
                continue;
            }
            let Some(ask_price) = ask.effective_price(oracle, slot) else {
                continue;
            };

            for bid in self.resting_limit_bids_inner(market_type, market_index, slot, oracle) {
                if sim.remaining(bid).is_zero() {
                    continue;
                }
                let Some(bid_price) = bid.effective_price(oracle, slot) else {
                    continue;
                };
                if bid_price < ask_price {
                    break;
                }
                if bid.user == ask.user {
                    continue;
                }
                let Some((taker, maker)) = determine_maker_and_taker(ask, bid) else {
                    continue;
                };

                nodes_to_fill.push(NodeToFill::new(sim.snapshot(taker), vec![sim.snapshot(maker)]));

                let fill = sim.remaining(bid).min(sim.remaining(ask));
                sim.apply(bid, fill);
                sim.apply(ask, fill);

                if sim.remaining(ask).is_zero() {
                    break;
                }
            }
        }

        nodes_to_fill
    }

    /// Emits resting orders priced through the fallback quote, best first.
    #[allow(clippy::too_many_arguments)]
    fn cross_resting_against_fallback(
        &self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
        fallback_bid: Option<Price>,
        fallback_ask: Option<Price>,
        sim: &mut SimulatedFills,
        nodes_to_fill: &mut Vec<NodeToFill>,
    ) {
        if let Some(fallback_bid) = fallback_bid {
            for ask in self.resting_limit_asks_inner(market_type, market_index, slot, oracle) {
                if sim.remaining(ask).is_zero() {
                    continue;
                }
                let Some(price) = ask.effective_price(oracle, slot) else {
                    continue;
                };
                if price > fallback_bid {
                    break;
                }
                nodes_to_fill.push(NodeToFill::new(sim.snapshot(ask), Vec::new()));
            }
        }
        if let Some(fallback_ask) = fallback_ask {
            for bid in self.resting_limit_bids_inner(market_type, market_index, slot, oracle) {
                if sim.remaining(bid).is_zero() {
                    continue;
                }
                let Some(price) = bid.effective_price(oracle, slot) else {
                    continue;
                };
                if price < fallback_ask {
                    break;
                }
                nodes_to_fill.push(NodeToFill::new(sim.snapshot(bid), Vec::new()));
            }
        }
    }

    /// Pairs taking nodes against eligible makers, then against fallback liquidity.
    ///
    /// Taking nodes are slot-sorted rather than price-sorted, so the inner scan
    /// breaks on the first maker that does not cross; this mirrors the source
    /// behavior even though a later taker could still cross.
    #[allow(clippy::too_many_arguments)]
    fn find_taking_nodes_to_fill(
        &self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
        oracle: Option<&OraclePriceData>,
        is_amm_paused: bool,
        min_auction_duration: u8,
        fallback_bid: Option<Price>,
        fallback_ask: Option<Price>,
        sim: &mut SimulatedFills,
    ) -> Vec<NodeToFill> {
        let mut nodes_to_fill = Vec::new();

        // Taking asks cross maker bids
        for taker in self.taking_asks_inner(market_type, market_index) {
            if sim.remaining(taker).is_zero() {
                continue;
            }
            let taker_price = taker.effective_price(oracle, slot);

            for maker in
                self.maker_limit_bids_inner(market_type, market_index, slot, oracle, fallback_ask)
            {
                if sim.remaining(maker).is_zero() {
                    continue;
                }
                if maker.user == taker.user {
                    continue;
                }
                let Some(maker_price) = maker.effective_price(oracle, slot) else {
                    continue;
                };
                if !taker_ask_crosses(taker_price, maker_price, market_type, fallback_bid) {
                    break;
                }

                nodes_to_fill.push(NodeToFill::new(sim.snapshot(taker), vec![sim.snapshot(maker)]));

                let fill = sim.remaining(taker).min(sim.remaining(maker));
                sim.apply(taker, fill);
                sim.apply(maker, fill);

                if sim.remaining(taker).is_zero() {
                    break;
                }
            }
        }

        // Taking bids cross maker asks
        for taker in self.taking_bids_inner(market_type, market_index) {
            if sim.remaining(taker).is_zero() {
                continue;
            }
            let taker_price = taker.effective_price(oracle, slot);

            for maker in
                self.maker_limit_asks_inner(market_type, market_index, slot, oracle, fallback_bid)
            {
                if sim.remaining(maker).is_zero() {
                    continue;
                }
                if maker.user == taker.user {
                    continue;
                }
                let Some(maker_price) = maker.effective_price(oracle, slot) else {
                    continue;
                };
                if !taker_bid_crosses(taker_price, maker_price, market_type, fallback_ask) {
                    break;
                }

                nodes_to_fill.push(NodeToFill::new(sim.snapshot(taker), vec![sim.snapshot(maker)]));

                let fill = sim.remaining(taker).min(sim.remaining(maker));
                sim.apply(taker, fill);
                sim.apply(maker, fill);

                if sim.remaining(taker).is_zero() {
                    break;
                }
            }
        }

        // Takers cross the fallback quote once their auction obligation has passed
        if !is_amm_paused {
            if let Some(fallback_bid) = fallback_bid {
                for taker in self.taking_asks_inner(market_type, market_index) {
                    if sim.remaining(taker).is_zero() {
                        continue;
                    }
                    let taker_price = taker.effective_price(oracle, slot);
                    if market_type == MarketType::Spot && taker_price.is_none() {
                        continue;
                    }
                    let crosses = taker_price.map_or(true, |price| price <= fallback_bid);
                    let available = market_type == MarketType::Spot
                        || is_fallback_available_liquidity_source(
                            &taker.order,
                            min_auction_duration,
                            slot,
                        );
                    if crosses && available {
                        nodes_to_fill.push(NodeToFill::new(sim.snapshot(taker), Vec::new()));
                    }
                }
            }
            if let Some(fallback_ask) = fallback_ask {
                for taker in self.taking_bids_inner(market_type, market_index) {
                    if sim.remaining(taker).is_zero() {
                        continue;
                    }
                    let taker_price = taker.effective_price(oracle, slot);
                    if market_type == MarketType::Spot && taker_price.is_none() {
                        continue;
                    }
                    let crosses = taker_price.map_or(true, |price| price >= fallback_ask);
                    let available = market_type == MarketType::Spot
                        || is_fallback_available_liquidity_source(
                            &taker.order,
                            min_auction_duration,
                            slot,
                        );
                    if crosses && available {
                        nodes_to_fill.push(NodeToFill::new(sim.snapshot(taker), Vec::new()));
                    }
                }
            }
        }

        nodes_to_fill
    }

    /// Scans every non-trigger list of the market for expired orders.
    fn find_expired_nodes_to_fill(
        &self,
        market_index: u16,
        ts: i64,
        market_type: MarketType,
    ) -> Vec<NodeToFill> {
        let Some(book) = self.book(market_type, market_index) else {
            return Vec::new();
        };
        book.non_trigger_lists()
            .into_iter()
            .flat_map(|list| list.iter())
            .filter(|node| is_order_expired(&node.order, ts))
            .map(|node| NodeToFill::new(*node, Vec::new()))
            .collect()
    }

    /// Finds conditional nodes whose trigger condition has fired at `oracle_price`.
    ///
    /// Both trigger lists are price-sorted toward their trigger boundary, so each scan
    /// stops at the first node that has not fired. Returns nothing while the exchange
    /// is paused.
    pub fn find_nodes_to_trigger(
        &mut self,
        market_index: u16,
        slot: u64,
        oracle_price: Price,
        market_type: MarketType,
        state: &StateAccount,
    ) -> Vec<NodeToTrigger> {
        if exchange_paused(state) {
            return Vec::new();
        }
        self.update_resting_limit_orders(slot);

        let Some(book) = self.book(market_type, market_index) else {
            return Vec::new();
        };

        let mut nodes_to_trigger = Vec::new();
        for node in book.trigger_above.iter() {
            if oracle_price > node.order.trigger_price {
                nodes_to_trigger.push(NodeToTrigger { node: *node });
            } else {
                break;
            }
        }
        for node in book.trigger_below.iter() {
            if oracle_price < node.order.trigger_price {
                nodes_to_trigger.push(NodeToTrigger { node: *node });
            } else {
                break;
            }
        }
        nodes_to_trigger
    }

    /// Finds taking nodes still inside their JIT auction window.
    pub fn find_jit_auction_nodes_to_fill(
        &mut self,
        market_index: u16,
        slot: u64,
        market_type: MarketType,
    ) -> Vec<NodeToFill> {
        self.update_resting_limit_orders(slot);

        let mut nodes_to_fill = Vec::new();
        for node in self.taking_bids_inner(market_type, market_index) {
            if !is_auction_complete(&node.order, slot) {
                nodes_to_fill.push(NodeToFill::new(*node, Vec::new()));
            }
        }
        for node in self.taking_asks_inner(market_type, market_index) {
            if !is_auction_complete(&node.order, slot) {
                nodes_to_fill.push(NodeToFill::new(*node, Vec::new()));
            }
        }
        nodes_to_fill
    }
}

fn better_ask(
    a: &BookNode<'_>,
    b: &BookNode<'_>,
    oracle: Option<&OraclePriceData>,
    slot: u64,
) -> bool {
    let a_taking = is_taking_book_node(a, slot);
    let b_taking = is_taking_book_node(b, slot);
    match (a_taking, b_taking) {
        (true, true) => taking_slot(a) < taking_slot(b),
        (true, false) => true,
        (false, true) => false,
        (false, false) => {
            book_node_price_raw(a, oracle, slot, i64::MAX)
                < book_node_price_raw(b, oracle, slot, i64::MAX)
        }
    }
}

fn better_bid(
    a: &BookNode<'_>,
    b: &BookNode<'_>,
    oracle: Option<&OraclePriceData>,
    slot: u64,
) -> bool {
    let a_taking = is_taking_book_node(a, slot);
    let b_taking = is_taking_book_node(b, slot);
    match (a_taking, b_taking) {
        (true, true) => taking_slot(a) < taking_slot(b),
        (true, false) => true,
        (false, true) => false,
        (false, false) => {
            book_node_price_raw(a, oracle, slot, i64::MIN)
                > book_node_price_raw(b, oracle, slot, i64::MIN)
        }
    }
}

fn is_taking_book_node(node: &BookNode<'_>, slot: u64) -> bool {
    node.order_node()
        .is_some_and(|n| is_taking_order(&n.order, slot))
}

fn taking_slot(node: &BookNode<'_>) -> u64 {
    node.order_node().map_or(u64::MAX, |n| n.order.slot)
}

fn book_node_price_raw(
    node: &BookNode<'_>,
    oracle: Option<&OraclePriceData>,
    slot: u64,
    default: i64,
) -> i64 {
    node.price(oracle, slot).map_or(default, |p| p.raw)
}
