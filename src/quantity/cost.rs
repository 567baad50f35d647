use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Projected cost per hour of consumption.
pub type HourlyCost = Quantity<0, -1, 1>;

impl Display for HourlyCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} /h", self.0)
    }
}

impl Debug for HourlyCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}/h", self.0)
    }
}
