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

//! Typed account data supplied by external collaborators.
//!
//! The book holds none of this state itself; callers pass the current oracle, exchange
//! state, and market accounts into each query.

use serde::{Deserialize, Serialize};

use crate::{
    enums::{MarketStatus, MarketType},
    types::Price,
};

/// Exchange status bit: deposits are paused.
pub const EXCHANGE_STATUS_DEPOSIT_PAUSED: u8 = 1;
/// Exchange status bit: withdraws are paused.
pub const EXCHANGE_STATUS_WITHDRAW_PAUSED: u8 = 2;
/// Exchange status bit: virtual AMM fills are paused.
pub const EXCHANGE_STATUS_AMM_PAUSED: u8 = 4;
/// Exchange status bit: all fills are paused.
pub const EXCHANGE_STATUS_FILL_PAUSED: u8 = 8;
/// Exchange status bit: liquidations are paused.
pub const EXCHANGE_STATUS_LIQ_PAUSED: u8 = 16;
/// Exchange status bit: funding settlement is paused.
pub const EXCHANGE_STATUS_FUNDING_PAUSED: u8 = 32;
/// Exchange status bit: PnL settlement is paused.
pub const EXCHANGE_STATUS_SETTLE_PNL_PAUSED: u8 = 64;
/// Exchange status value with every operation paused.
pub const EXCHANGE_STATUS_PAUSED: u8 = 127;

/// A point-in-time oracle price observation.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePriceData {
    /// The oracle price.
    pub price: Price,
    /// The slot the observation was taken in.
    pub slot: u64,
    /// The oracle's reported confidence interval, in raw price units.
    pub confidence: u64,
    /// Whether the observation aggregates enough publishers to be trusted.
    pub has_sufficient_number_of_data_points: bool,
}

impl OraclePriceData {
    /// Creates a new [`OraclePriceData`] instance.
    #[must_use]
    pub const fn new(
        price: Price,
        slot: u64,
        confidence: u64,
        has_sufficient_number_of_data_points: bool,
    ) -> Self {
        Self {
            price,
            slot,
            confidence,
            has_sufficient_number_of_data_points,
        }
    }
}

/// The exchange-wide state consumed by the book's queries.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAccount {
    /// A bitmask of `EXCHANGE_STATUS_*` flags; zero means fully active.
    pub exchange_status: u8,
    /// The minimum auction length for perp orders, in slots.
    pub min_perp_auction_duration: u8,
}

/// The per-market state consumed by the book's queries.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAccount {
    /// The market index.
    pub market_index: u16,
    /// The market class.
    pub market_type: MarketType,
    /// The operational status of the market.
    pub status: MarketStatus,
}

impl MarketAccount {
    /// Creates a new [`MarketAccount`] instance.
    #[must_use]
    pub const fn new(market_index: u16, market_type: MarketType, status: MarketStatus) -> Self {
        Self {
            market_index,
            market_type,
            status,
        }
    }
}

/// Returns `true` if the exchange is fully paused.
#[must_use]
pub fn exchange_paused(state: &StateAccount) -> bool {
    state.exchange_status == EXCHANGE_STATUS_PAUSED
}

/// Returns `true` if fills are paused for `market`.
#[must_use]
pub fn fill_paused(state: &StateAccount, market: &MarketAccount) -> bool {
    state.exchange_status & EXCHANGE_STATUS_FILL_PAUSED != 0
        || market.status == MarketStatus::FillPaused
}

/// Returns `true` if the virtual AMM is paused for `market`.
#[must_use]
pub fn amm_paused(state: &StateAccount, market: &MarketAccount) -> bool {
    state.exchange_status & EXCHANGE_STATUS_AMM_PAUSED != 0
        || market.status == MarketStatus::AmmPaused
}
