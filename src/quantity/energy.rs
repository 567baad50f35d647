use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use chrono::TimeDelta;

use crate::quantity::{Quantity, power::Kilowatts};

pub type KilowattHours = Quantity<1, 1, 0>;

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kWh", self.0)
    }
}

impl Div<TimeDelta> for KilowattHours {
    type Output = Kilowatts;

    fn div(self, rhs: TimeDelta) -> Self::Output {
        Quantity(self.0 / as_hours(rhs))
    }
}

/// Fractional number of hours in the time delta.
#[must_use]
pub fn as_hours(time_delta: TimeDelta) -> f64 {
    time_delta.as_seconds_f64() / 3600.0
}
