//! # Money Module
//!
//! Provides the `Money` type for monetary values that have been settled to
//! two decimal places (paise), plus the single rounding rule used when live
//! values are committed to a payload.
//!
//! ## Two Kinds of Amount
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LIVE vs SETTLED                                                        │
//! │                                                                         │
//! │  Live (rust_decimal::Decimal)                                           │
//! │    Recomputed on every keystroke, full precision                        │
//! │    1234.5 × 18% = 222.21  /2 = 111.105  (CGST, unrounded)              │
//! │                                                                         │
//! │  Settled (Money, i64 paise)                                             │
//! │    Produced ONLY when building a payload or reading a stored record     │
//! │    111.105 → 11111 paise → 111.11                                      │
//! │                                                                         │
//! │  The command layer stores REAL columns, so Money crosses the IPC       │
//! │  boundary as a plain JSON number with two decimals.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gstbook_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let cgst = Money::from_decimal(Decimal::new(111105, 3)); // 111.105
//! assert_eq!(cgst.paise(), 11111);
//! assert_eq!(cgst.to_string(), "111.11");
//! ```

use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

/// Number of decimal places every settled amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a live amount to two decimals, half away from zero.
///
/// This is the only rounding rule in the engine. It is applied when a
/// payload is assembled and when a reconciled difference is reported,
/// never during live computation.
///
/// ## Example
/// ```rust
/// use gstbook_core::money::round2;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round2(Decimal::new(1005, 3)), Decimal::new(101, 2)); // 1.005 → 1.01
/// assert_eq!(round2(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: the manual difference can be negative
/// - **Settled only**: a `Money` always holds exactly two decimals; live
///   values stay as `Decimal` until [`Money::from_decimal`]
/// - **Serialized as a number**: `1180.5` on the wire, matching the
///   command layer's REAL columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use gstbook_core::money::Money;
    ///
    /// let amount = Money::from_paise(118050);
    /// assert_eq!(amount.rupees(), 1180);
    /// assert_eq!(amount.paise_part(), 50);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Settles a live amount: rounds to two decimals with [`round2`].
    ///
    /// Amounts outside the i64 paise range saturate. Addition and
    /// subtraction saturate the same way.
    pub fn from_decimal(value: Decimal) -> Self {
        let saturated = if value.is_sign_negative() {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        };
        round2(value)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|paise| paise.to_i64())
            .map(Money)
            .unwrap_or(saturated)
    }

    /// Settles a floating point amount read from the command layer.
    ///
    /// Non-finite input reads as zero.
    pub fn from_f64(value: f64) -> Self {
        Decimal::from_f64(value)
            .map(Money::from_decimal)
            .unwrap_or_default()
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the exact decimal value (scale 2).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Returns the value as f64 for the wire.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering with no currency symbol.
///
/// Narration text uses this form ("TDS amounted 20.00 ..."). For a
/// symbol-prefixed rendering use the entry crate's config.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Wire format: a JSON number in rupees (`1180.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Money::from_f64(value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
