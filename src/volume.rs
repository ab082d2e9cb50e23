use std::fmt;

use rust_decimal::Decimal;

use crate::Amount;
use crate::amount::round_half_up;

/// Dispensed fuel volume, displayed with three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Volume(Decimal);

impl Volume {
    const THOUSANDTHS: u32 = 3;

    pub const ZERO: Volume = Volume(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Volume(value)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn round_to_thousandths(self) -> Self {
        Volume(round_half_up(self.0, Self::THOUSANDTHS))
    }

    /// Price of this volume at `unit_price`, unrounded.
    pub fn cost_at(self, unit_price: Amount) -> Amount {
        Amount::new(self.0 * unit_price.value())
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = round_half_up(self.0, Self::THOUSANDTHS);
        value.rescale(Self::THOUSANDTHS);
        write!(f, "{value}")
    }
}

impl std::ops::Add for Volume {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Volume(self.0 + rhs.0)
    }
}
