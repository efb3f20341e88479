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

//! Defines enumerations for the order book domain model.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, FromRepr};

/// The market class an order trades in.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    /// A perpetual futures market.
    Perp = 1,
    /// A spot market.
    Spot = 2,
}

/// The direction of an order's exposure.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Buys base exposure; rests on the bid side of the book.
    Long = 1,
    /// Sells base exposure; rests on the ask side of the book.
    Short = 2,
}

impl Direction {
    /// Returns the book side this direction rests on.
    #[must_use]
    pub const fn book_side(&self) -> BookSide {
        match self {
            Self::Long => BookSide::Bid,
            Self::Short => BookSide::Ask,
        }
    }
}

/// A side of the order book.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookSide {
    /// The buy side.
    Bid = 1,
    /// The sell side.
    Ask = 2,
}

/// The execution style of an order.
///
/// Any variant outside this set is unsupported and is ignored on ingestion.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Crosses the book at any price, optionally through a short auction window.
    Market = 1,
    /// Rests at a fixed limit price once its auction window elapses.
    Limit = 2,
    /// A market order inactive until its trigger condition fires.
    TriggerMarket = 3,
    /// A limit order inactive until its trigger condition fires.
    TriggerLimit = 4,
    /// A market-style order whose auction prices are offsets from the live oracle price.
    Oracle = 5,
}

/// The lifecycle status of an order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Not yet placed; ignored on ingestion.
    Init = 1,
    /// Open and eligible for matching.
    Open = 2,
    /// Fully filled.
    Filled = 3,
    /// Canceled by the owner or the protocol.
    Canceled = 4,
}

/// The trigger condition of a conditional order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderTriggerCondition {
    /// Fires when the oracle price exceeds the trigger price.
    Above = 1,
    /// Fires when the oracle price falls below the trigger price.
    Below = 2,
    /// An `Above` condition which has fired.
    TriggeredAbove = 3,
    /// A `Below` condition which has fired.
    TriggeredBelow = 4,
}

/// The classification of a node within the book.
///
/// Every node lives in exactly one list, and the list's classification matches the node's.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    /// A fixed-price limit order past its auction window; sorted by price.
    RestingLimit = 1,
    /// A limit order priced as an offset from the oracle; sorted by offset.
    FloatingLimit = 2,
    /// A fixed-price limit order still inside its auction window; sorted by submission slot.
    TakingLimit = 3,
    /// A market-style order; sorted by submission slot.
    Market = 4,
    /// A conditional order which has not yet triggered; sorted by trigger price.
    Trigger = 5,
}

/// The sort direction of a node list.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    /// Smallest sort value first.
    Asc = 1,
    /// Largest sort value first.
    Desc = 2,
}

/// The action carried by an order action record.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    /// The order was placed on-chain; the book has already ingested it.
    Place = 1,
    /// The order was canceled.
    Cancel = 2,
    /// The order was filled (partially or fully).
    Fill = 3,
    /// The order's trigger condition fired.
    Trigger = 4,
    /// The order expired; expiry is discovered on query, so the record is ignored.
    Expire = 5,
}

/// The venue a liquidity level originates from.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySource {
    /// Resting orders in this book.
    Dlob = 1,
    /// The market's virtual AMM.
    Vamm = 2,
    /// An external fallback venue.
    External = 3,
}

/// The operational status of a market.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    /// Created but not yet trading.
    Initialized = 1,
    /// Trading normally.
    Active = 2,
    /// Funding settlement is paused.
    FundingPaused = 3,
    /// The virtual AMM is paused; fallback liquidity is unavailable.
    AmmPaused = 4,
    /// Fills are paused.
    FillPaused = 5,
    /// Withdraws are paused.
    WithdrawPaused = 6,
    /// Only position-reducing orders are accepted.
    ReduceOnly = 7,
    /// The market is settling.
    Settlement = 8,
    /// The market has been delisted.
    Delisted = 9,
}
