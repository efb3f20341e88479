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

//! An off-chain decentralized limit order book (DLOB) for perpetual futures and spot markets.
//!
//! The `dlob` crate reconstructs, classifies, and queries the open-order state of an
//! exchange from user snapshots and order event records. Downstream consumers (fillers,
//! market makers, liquidators, API servers) query the book to discover:
//!
//! - Pairs of orders that cross and can be matched.
//! - Conditional orders whose trigger has fired.
//! - Expired orders.
//! - Aggregated L2/L3 order book snapshots.
//!
//! The book issues no transactions and owns no transport; it answers queries. It is
//! single-threaded cooperative: exactly one logical actor mutates or queries at a time,
//! and every operation runs to completion. Consumers requiring parallelism place a
//! synchronizing shell around the book or operate on an owned snapshot.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accounts;
pub mod enums;
pub mod identifiers;
pub mod orderbook;
pub mod orders;
pub mod records;
pub mod types;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

pub use crate::orderbook::{Dlob, DlobError, L2Book, L3Book, NodeToFill, NodeToTrigger};
