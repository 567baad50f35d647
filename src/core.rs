mod comparator;
mod consumption;
mod error;
mod interval;
pub mod lookup;
mod plan;
mod reading;

pub use self::{
    comparator::{Comparator, Comparison, MeterHistory, Recommendation, Recommendations},
    consumption::{Consumption, estimate_cost},
    error::NotFound,
    interval::Interval,
    plan::{PlanName, PricePlan},
    reading::{MeterId, Reading},
};
