// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::BPS_DENOMINATOR;
use crate::domain::currency::Currency;
use crate::domain::error::AppError;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: Currency,
    pub raw: U256,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: U256) -> Self {
        Self { currency, raw }
    }
}

/// A rational in `[0, 1]`, used for slippage tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percent {
    numerator: U256,
    denominator: U256,
}

impl Percent {
    pub fn new(numerator: U256, denominator: U256) -> Result<Self, AppError> {
        if denominator.is_zero() {
            return Err(AppError::validation("slippage", "denominator is zero"));
        }
        if numerator > denominator {
            return Err(AppError::validation("slippage", "tolerance exceeds 100%"));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn from_bps(bps: u64) -> Result<Self, AppError> {
        Self::new(U256::from(bps), U256::from(BPS_DENOMINATOR))
    }

    pub fn numerator(&self) -> U256 {
        self.numerator
    }

    pub fn denominator(&self) -> U256 {
        self.denominator
    }

    fn one_plus(&self) -> Result<U256, AppError> {
        self.denominator
            .checked_add(self.numerator)
            .ok_or_else(|| AppError::validation("slippage", "1 + tolerance overflows uint256"))
    }

    /// `floor(amount / (1 + self))`
    pub fn discount(&self, amount: U256) -> Result<U256, AppError> {
        let scaled = amount.checked_mul(self.denominator).ok_or_else(|| overflow(amount))?;
        Ok(scaled / self.one_plus()?)
    }

    /// `floor(amount * (1 + self))`
    pub fn premium(&self, amount: U256) -> Result<U256, AppError> {
        let scaled = amount.checked_mul(self.one_plus()?).ok_or_else(|| overflow(amount))?;
        Ok(scaled / self.denominator)
    }
}

fn overflow(amount: U256) -> AppError {
    AppError::validation("amount", format!("{amount} is too large to scale"))
}

/// Downward margin applied to minimums derived from vault previews.
///
/// Previews floor-round; a bound equal to the preview can fail on one wei of
/// noise. `bps == 0` disables the margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingBuffer {
    pub bps: u16,
}

impl RoundingBuffer {
    pub const DISABLED: RoundingBuffer = RoundingBuffer { bps: 0 };

    pub fn new(bps: u16) -> Result<Self, AppError> {
        if u64::from(bps) >= BPS_DENOMINATOR {
            return Err(AppError::validation(
                "rounding_buffer_bps",
                format!("{bps} bps would zero every bound"),
            ));
        }
        Ok(Self { bps })
    }

    pub fn apply(&self, amount: U256) -> Result<U256, AppError> {
        if self.bps == 0 {
            return Ok(amount);
        }
        let scaled = amount.checked_mul(U256::from(self.bps)).ok_or_else(|| overflow(amount))?;
        Ok(amount - scaled / U256::from(BPS_DENOMINATOR))
    }
}

impl Default for RoundingBuffer {
    fn default() -> Self {
        Self {
            bps: crate::domain::constants::DEFAULT_ROUNDING_BUFFER_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_tolerance_over_one() {
        assert!(Percent::new(U256::from(2u8), U256::from(1u8)).is_err());
        assert!(Percent::new(U256::from(1u8), U256::ZERO).is_err());
        assert!(Percent::from_bps(10_000).is_ok());
    }

    #[test]
    fn discount_and_premium_follow_one_plus_tolerance() {
        let half_percent = Percent::from_bps(50).unwrap();
        // 1_000_000 / 1.005 = 995_024.87
        assert_eq!(half_percent.discount(U256::from(1_000_000u64)).unwrap(), U256::from(995_024u64));
        // 1_000_000 * 1.005
        assert_eq!(half_percent.premium(U256::from(1_000_000u64)).unwrap(), U256::from(1_005_000u64));
        let zero = Percent::from_bps(0).unwrap();
        assert_eq!(zero.discount(U256::from(7u8)).unwrap(), U256::from(7u8));
    }

    #[test]
    fn scaling_overflow_is_an_error() {
        let half_percent = Percent::from_bps(50).unwrap();
        assert!(matches!(half_percent.premium(U256::MAX), Err(AppError::Validation { ref field, .. }) if field == "amount"));
        assert!(half_percent.discount(U256::MAX).is_err());
        assert!(RoundingBuffer::default().apply(U256::MAX).is_err());
        assert_eq!(RoundingBuffer::DISABLED.apply(U256::MAX).unwrap(), U256::MAX);
    }

    #[test]
    fn rounding_buffer_shaves_basis_points() {
        let buffer = RoundingBuffer::new(5).unwrap();
        assert_eq!(buffer.apply(U256::from(1_000_000u64)).unwrap(), U256::from(999_500u64));
        assert_eq!(RoundingBuffer::DISABLED.apply(U256::from(10u8)).unwrap(), U256::from(10u8));
        assert!(RoundingBuffer::new(10_000).is_err());
        assert_eq!(RoundingBuffer::default().bps, 5);
    }
}
