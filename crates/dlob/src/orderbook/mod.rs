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

//! The order book: node lists, market books, matching, and projections.

pub mod depth;
pub mod display;
pub mod dlob;
pub mod error;
pub mod list;
pub mod market;
pub mod node;

pub(crate) mod merge;

mod matching;

#[cfg(test)]
mod tests;

// Re-exports
pub use crate::orderbook::{
    depth::{estimate_quote_for_base, L2Book, L2Level, L2LiquidityGenerator, L3Book, L3Level},
    display::pprint_l2,
    dlob::Dlob,
    error::DlobError,
    list::NodeList,
    market::MarketBook,
    node::{classify, BookNode, NodeToFill, NodeToTrigger, OrderNode},
};
