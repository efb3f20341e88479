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

//! L2/L3 order book projections and depth aggregation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    accounts::OraclePriceData,
    enums::{LiquiditySource, MarketType},
    identifiers::UserAccountId,
    orderbook::{dlob::Dlob, error::DlobError, merge::merge_best},
    types::{fixed::BASE_PRECISION, Price, Quantity},
};

/// An aggregated price level in an L2 book projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Level {
    /// The level price.
    pub price: Price,
    /// The total unfilled size at the level.
    pub size: Quantity,
    /// The venues contributing liquidity to the level.
    pub sources: BTreeSet<LiquiditySource>,
}

impl L2Level {
    /// Creates a new [`L2Level`] instance from a single source.
    #[must_use]
    pub fn new(price: Price, size: Quantity, source: LiquiditySource) -> Self {
        Self {
            price,
            size,
            sources: BTreeSet::from([source]),
        }
    }
}

/// A single maker order in an L3 book projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L3Level {
    /// The order's effective price.
    pub price: Price,
    /// The order's unfilled size.
    pub size: Quantity,
    /// The owning account.
    pub maker: UserAccountId,
    /// The order ID within the owning account.
    pub order_id: u32,
}

/// An aggregated L2 snapshot of one market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Book {
    /// Bid levels, best (highest) price first.
    pub bids: Vec<L2Level>,
    /// Ask levels, best (lowest) price first.
    pub asks: Vec<L2Level>,
    /// The slot the projection was taken at.
    pub slot: u64,
}

/// A per-order L3 snapshot of one market's resting liquidity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L3Book {
    /// Bid orders, best (highest) price first.
    pub bids: Vec<L3Level>,
    /// Ask orders, best (lowest) price first.
    pub asks: Vec<L3Level>,
    /// The slot the projection was taken at.
    pub slot: u64,
}

/// A source of fallback L2 liquidity merged into [`Dlob::get_l2`] projections.
pub trait L2LiquidityGenerator {
    /// Returns the source's bid levels, best (highest) price first.
    fn l2_bids(&self) -> Box<dyn Iterator<Item = L2Level> + '_>;

    /// Returns the source's ask levels, best (lowest) price first.
    fn l2_asks(&self) -> Box<dyn Iterator<Item = L2Level> + '_>;
}

impl Dlob {
    /// Builds an aggregated L2 snapshot of a market, merged with any fallback L2
    /// sources, collapsed by price and capped at `depth` levels per side.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    #[allow(clippy::too_many_arguments)]
    pub fn get_l2(
        &mut self,
        market_index: u16,
        market_type: MarketType,
        slot: u64,
        oracle: Option<&OraclePriceData>,
        depth: usize,
        fallback_bid: Option<Price>,
        fallback_ask: Option<Price>,
        fallback_l2_generators: &[&dyn L2LiquidityGenerator],
    ) -> Result<L2Book, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);

        let mut ask_generators: Vec<Box<dyn Iterator<Item = L2Level> + '_>> = vec![Box::new(
            self.maker_limit_asks_inner(market_type, market_index, slot, oracle, fallback_bid)
                .filter_map(move |node| {
                    node.effective_price(oracle, slot).map(|price| {
                        L2Level::new(price, node.remaining_base(), LiquiditySource::Dlob)
                    })
                }),
        )];
        for generator in fallback_l2_generators {
            ask_generators.push(generator.l2_asks());
        }
        let asks = collapse_levels(
            merge_best(ask_generators, |a, b| a.price < b.price),
            depth,
        );

        let mut bid_generators: Vec<Box<dyn Iterator<Item = L2Level> + '_>> = vec![Box::new(
            self.maker_limit_bids_inner(market_type, market_index, slot, oracle, fallback_ask)
                .filter_map(move |node| {
                    node.effective_price(oracle, slot).map(|price| {
                        L2Level::new(price, node.remaining_base(), LiquiditySource::Dlob)
                    })
                }),
        )];
        for generator in fallback_l2_generators {
            bid_generators.push(generator.l2_bids());
        }
        let bids = collapse_levels(
            merge_best(bid_generators, |a, b| a.price > b.price),
            depth,
        );

        Ok(L2Book { bids, asks, slot })
    }

    /// Builds a per-order L3 snapshot of a market's resting liquidity.
    ///
    /// No fallback sources and no depth cap; only resting and floating limit orders
    /// appear.
    ///
    /// # Errors
    ///
    /// Returns [`DlobError::MissingOracle`] for a spot market without oracle data.
    pub fn get_l3(
        &mut self,
        market_index: u16,
        market_type: MarketType,
        slot: u64,
        oracle: Option<&OraclePriceData>,
    ) -> Result<L3Book, DlobError> {
        self.check_spot_oracle(market_type, market_index, oracle)?;
        self.update_resting_limit_orders(slot);

        let asks = self
            .resting_limit_asks_inner(market_type, market_index, slot, oracle)
            .filter_map(|node| {
                node.effective_price(oracle, slot).map(|price| L3Level {
                    price,
                    size: node.remaining_base(),
                    maker: node.user,
                    order_id: node.order.order_id,
                })
            })
            .collect();

        let bids = self
            .resting_limit_bids_inner(market_type, market_index, slot, oracle)
            .filter_map(|node| {
                node.effective_price(oracle, slot).map(|price| L3Level {
                    price,
                    size: node.remaining_base(),
                    maker: node.user,
                    order_id: node.order.order_id,
                })
            })
            .collect();

        Ok(L3Book { bids, asks, slot })
    }
}

/// Collapses consecutive same-price levels by summing sizes and unioning sources,
/// stopping once `depth` distinct levels are collected.
fn collapse_levels(levels: impl Iterator<Item = L2Level>, depth: usize) -> Vec<L2Level> {
    let mut collapsed: Vec<L2Level> = Vec::new();
    for level in levels {
        if let Some(last) = collapsed.last_mut() {
            if last.price == level.price {
                last.size += level.size;
                last.sources.extend(level.sources.iter().copied());
                continue;
            }
        }
        if collapsed.len() == depth {
            break;
        }
        collapsed.push(level);
    }
    collapsed
}

/// Estimates the quote cost of crossing `base_amount` against L2 `levels` in order.
///
/// Returns the cumulative quote amount at price precision; liquidity beyond the
/// provided levels is priced at nothing, so a short book understates the cost.
#[must_use]
pub fn estimate_quote_for_base(levels: &[L2Level], base_amount: Quantity) -> u64 {
    let mut remaining = base_amount;
    let mut quote: i128 = 0;
    for level in levels {
        if remaining.is_zero() {
            break;
        }
        let take = level.size.min(remaining);
        quote += i128::from(level.price.raw) * i128::from(take.raw) / i128::from(BASE_PRECISION);
        remaining = remaining.saturating_sub(take);
    }
    quote.clamp(0, i128::from(u64::MAX)) as u64
}
