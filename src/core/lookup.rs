//! Read-only lookups the comparator is built upon.
//!
//! The implementations must not change while a comparator borrows them.

use std::collections::HashMap;

use crate::core::{MeterId, PlanName, PricePlan, Reading};

pub trait Accounts {
    /// Price plan currently assigned to the meter, if any.
    fn plan_for_meter(&self, meter_id: &MeterId) -> Option<&PlanName>;
}

pub trait MeterReadings {
    /// All the recorded readings of the meter in no particular order, empty if there are none.
    fn readings_for_meter(&self, meter_id: &MeterId) -> &[Reading];
}

pub trait PricePlans {
    fn all_plans(&self) -> &[PricePlan];

    fn plan_by_name(&self, name: &PlanName) -> Option<&PricePlan> {
        self.all_plans().iter().find(|plan| &plan.name == name)
    }
}

impl Accounts for HashMap<MeterId, PlanName> {
    fn plan_for_meter(&self, meter_id: &MeterId) -> Option<&PlanName> {
        self.get(meter_id)
    }
}

impl MeterReadings for HashMap<MeterId, Vec<Reading>> {
    fn readings_for_meter(&self, meter_id: &MeterId) -> &[Reading] {
        self.get(meter_id).map(Vec::as_slice).unwrap_or_default()
    }
}

impl PricePlans for Vec<PricePlan> {
    fn all_plans(&self) -> &[PricePlan] {
        self
    }
}
