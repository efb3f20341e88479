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

//! Represents a fixed-point price with 6 decimals of precision.

use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use super::fixed::{f64_to_price_raw, FAILED, PRICE_DECIMALS, PRICE_PRECISION};

/// Represents a price in a market as a signed fixed-point integer.
///
/// The raw value carries [`PRICE_DECIMALS`] decimals of precision. Prices are signed
/// because oracle offsets can push an effective price through zero; queries clamp at
/// zero where the domain requires an unsigned price. A raw value of zero means
/// "no price" wherever the order model allows it.
#[repr(C)]
#[derive(
    Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    /// The raw fixed-point value at [`PRICE_PRECISION`] scale.
    pub raw: i64,
}

impl Price {
    /// Creates a new [`Price`] from an `f64` value with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite or outside the representable range.
    pub fn new_checked(value: f64) -> anyhow::Result<Self> {
        Ok(Self {
            raw: f64_to_price_raw(value)?,
        })
    }

    /// Creates a new [`Price`] from an `f64` value.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Price::new_checked`] for more details.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self::new_checked(value).expect(FAILED)
    }

    /// Creates a new [`Price`] from the given raw fixed-point value.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Creates a new [`Price`] with a value of zero ("no price").
    #[must_use]
    pub const fn zero() -> Self {
        Self { raw: 0 }
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the value of this instance as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.raw as f64 / PRICE_PRECISION as f64
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.raw), PRICE_DECIMALS)
    }

    /// Returns this price shifted by a raw fixed-point `offset`, clamped at zero.
    #[must_use]
    pub fn saturating_add_offset(&self, offset: i64) -> Self {
        let shifted = i128::from(self.raw) + i128::from(offset);
        Self {
            raw: shifted.clamp(0, i128::from(i64::MAX)) as i64,
        }
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        value.parse().expect(FAILED)
    }
}

impl FromStr for Price {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal: Decimal = s
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid price string '{s}': {e}"))?;
        let scaled = decimal * Decimal::from(PRICE_PRECISION);
        let raw = scaled
            .round()
            .to_i64()
            .ok_or_else(|| anyhow::anyhow!("price string '{s}' outside representable range"))?;
        Ok(Self { raw })
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw + rhs.raw,
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw - rhs.raw,
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for Price {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Price))
    }
}
