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

//! Fixed-point precision scalars and checked conversions.
//!
//! Prices carry 6 decimals of precision and base asset amounts carry 9, matching the
//! on-chain representation the book mirrors.

/// The number of decimal places in a fixed-point price.
pub const PRICE_DECIMALS: u32 = 6;

/// The scalar between a raw price integer and one whole unit of quote.
pub const PRICE_PRECISION: i64 = 1_000_000;

/// The number of decimal places in a fixed-point base asset amount.
pub const BASE_DECIMALS: u32 = 9;

/// The scalar between a raw base amount integer and one whole unit of base.
pub const BASE_PRECISION: u64 = 1_000_000_000;

/// A message prefix used with `expect` on correctness-checked constructors.
pub const FAILED: &str = "Condition failed";

/// Converts an `f64` value to a raw fixed-point price integer.
///
/// # Errors
///
/// Returns an error if `value` is not finite or overflows the raw representation.
pub fn f64_to_price_raw(value: f64) -> anyhow::Result<i64> {
    if !value.is_finite() {
        anyhow::bail!("invalid price value, was {value}");
    }
    let scaled = value * PRICE_PRECISION as f64;
    if scaled <= i64::MIN as f64 || scaled >= i64::MAX as f64 {
        anyhow::bail!("price value outside representable range, was {value}");
    }
    Ok(scaled.round() as i64)
}

/// Converts an `f64` value to a raw fixed-point base amount integer.
///
/// # Errors
///
/// Returns an error if `value` is not finite, negative, or overflows the raw representation.
pub fn f64_to_base_raw(value: f64) -> anyhow::Result<u64> {
    if !value.is_finite() {
        anyhow::bail!("invalid base amount, was {value}");
    }
    if value < 0.0 {
        anyhow::bail!("base amount cannot be negative, was {value}");
    }
    let scaled = value * BASE_PRECISION as f64;
    if scaled >= u64::MAX as f64 {
        anyhow::bail!("base amount outside representable range, was {value}");
    }
    Ok(scaled.round() as u64)
}
