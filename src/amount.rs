use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::Volume;

/// Errors produced when turning operator input into an [`Amount`].
#[derive(Debug, Error)]
pub enum AmountError {
    #[error("not a number: {0}")]
    Parse(#[from] rust_decimal::Error),

    #[error("digit separators are not allowed: {0}")]
    DigitSeparator(String),

    #[error("amount must be positive, got {0}")]
    NotPositive(Amount),
}

/// Currency value backed by a decimal, displayed with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    const CENTS: u32 = 2;

    pub const fn new(value: Decimal) -> Self {
        Amount(value)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Parse a prepaid amount typed by the operator.
    ///
    /// Surrounding whitespace is ignored and the value is rounded half-up to
    /// whole cents before the positivity check, so `"0.004"` is rejected.
    /// Exponent forms such as `"1e2"` are accepted; `_` separators are not.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let text = text.trim();
        // the decimal parser silently skips underscores
        if text.contains('_') {
            return Err(AmountError::DigitSeparator(text.to_string()));
        }
        let value = Decimal::from_str(text)?;
        let amount = Amount(value).round_to_cents();
        if !amount.is_positive() {
            return Err(AmountError::NotPositive(amount));
        }
        Ok(amount)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn round_to_cents(self) -> Self {
        Amount(round_half_up(self.0, Self::CENTS))
    }

    /// Volume this amount buys at `unit_price`, unrounded.
    pub fn volume_at(self, unit_price: Amount) -> Volume {
        Volume::new(self.0 / unit_price.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = round_half_up(self.0, Self::CENTS);
        value.rescale(Self::CENTS);
        write!(f, "{value}")
    }
}

/// Round half-up to `dp` decimal places. Every value the pump handles is
/// non-negative, so midpoint-away-from-zero is half-up.
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
