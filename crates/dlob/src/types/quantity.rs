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

//! Represents a fixed-point base asset amount with 9 decimals of precision.

use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use super::fixed::{f64_to_base_raw, BASE_DECIMALS, BASE_PRECISION, FAILED};

/// Represents a base asset amount as an unsigned fixed-point integer.
///
/// The raw value carries [`BASE_DECIMALS`] decimals of precision.
#[repr(C)]
#[derive(
    Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity {
    /// The raw fixed-point value at [`BASE_PRECISION`] scale.
    pub raw: u64,
}

impl Quantity {
    /// Creates a new [`Quantity`] from an `f64` value with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite, negative, or outside the representable range.
    pub fn new_checked(value: f64) -> anyhow::Result<Self> {
        Ok(Self {
            raw: f64_to_base_raw(value)?,
        })
    }

    /// Creates a new [`Quantity`] from an `f64` value.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Quantity::new_checked`] for more details.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self::new_checked(value).expect(FAILED)
    }

    /// Creates a new [`Quantity`] from the given raw fixed-point value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { raw }
    }

    /// Creates a new [`Quantity`] with a value of zero.
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
        self.raw as f64 / BASE_PRECISION as f64
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.raw), BASE_DECIMALS)
    }

    /// Returns the difference between this and `other`, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self {
            raw: self.raw.saturating_sub(other.raw),
        }
    }

    /// Returns the smaller of this and `other`.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.raw <= other.raw {
            self
        } else {
            other
        }
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        value.parse().expect(FAILED)
    }
}

impl FromStr for Quantity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal: Decimal = s
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid quantity string '{s}': {e}"))?;
        let scaled = decimal * Decimal::from(BASE_PRECISION);
        let raw = scaled
            .round()
            .to_u64()
            .ok_or_else(|| anyhow::anyhow!("quantity string '{s}' outside representable range"))?;
        Ok(Self { raw })
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw + rhs.raw,
        }
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw - rhs.raw,
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Quantity))
    }
}
