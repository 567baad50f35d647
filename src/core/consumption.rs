use chrono::TimeDelta;
use serde::Serialize;

use crate::{
    core::{Interval, PricePlan, Reading},
    quantity::{cost::HourlyCost, energy::KilowattHours, power::Kilowatts},
};

/// Consumption observed by a meter over its reading window.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Consumption {
    /// Arithmetic mean of the reading quantities.
    pub average: KilowattHours,

    /// From the earliest to the latest reading.
    pub window: Interval,

    pub n_readings: usize,
}

impl Consumption {
    /// Summarize the readings, which may come in any order.
    ///
    /// Returns [`None`] when there are no readings since the average is undefined then.
    pub fn from_readings(readings: &[Reading]) -> Option<Self> {
        let window = Interval::spanning(readings.iter().map(|reading| reading.time))?;
        #[expect(clippy::cast_precision_loss)]
        let average = readings.iter().map(|reading| reading.consumption).sum::<KilowattHours>()
            / readings.len() as f64;
        Some(Self { average, window, n_readings: readings.len() })
    }

    /// Average consumption spread over the window length in hours.
    ///
    /// Note that this divides the plain mean by the window, it is not a time-integrated rate.
    /// Returns [`None`] for a zero-length window.
    #[must_use]
    pub fn hourly_rate(&self) -> Option<Kilowatts> {
        let elapsed = self.window.duration();
        (elapsed > TimeDelta::zero()).then(|| self.average / elapsed)
    }
}

/// Projected cost per hour of consuming at the rate under the plan.
pub fn estimate_cost(hourly_rate: Kilowatts, plan: &PricePlan) -> HourlyCost {
    hourly_rate * plan.unit_rate
}
