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

//! Functions related to order book display.

use std::fmt::Write;

use crate::orderbook::depth::L2Book;

/// Return a formatted string representation of an L2 book, asks on top.
#[must_use]
pub fn pprint_l2(book: &L2Book, num_levels: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4} {:>16} {:>16}", "side", "price", "size");
    for level in book.asks.iter().take(num_levels).rev() {
        let _ = writeln!(out, "{:>4} {:>16} {:>16}", "ask", level.price, level.size);
    }
    for level in book.bids.iter().take(num_levels) {
        let _ = writeln!(out, "{:>4} {:>16} {:>16}", "bid", level.price, level.size);
    }
    out
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::LiquiditySource,
        orderbook::depth::L2Level,
        types::{Price, Quantity},
    };

    #[rstest]
    fn test_pprint_l2_orders_asks_above_bids() {
        let book = L2Book {
            bids: vec![L2Level::new(
                Price::from("99"),
                Quantity::from("1"),
                LiquiditySource::Dlob,
            )],
            asks: vec![
                L2Level::new(Price::from("100"), Quantity::from("1"), LiquiditySource::Dlob),
                L2Level::new(Price::from("101"), Quantity::from("2"), LiquiditySource::Dlob),
            ],
            slot: 1,
        };

        let rendered = pprint_l2(&book, 10);
        let ask_101 = rendered.find("101.000000").unwrap();
        let ask_100 = rendered.find("100.000000").unwrap();
        let bid_99 = rendered.find("99.000000").unwrap();
        assert!(ask_101 < ask_100);
        assert!(ask_100 < bid_99);
    }
}
