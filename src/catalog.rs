use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use serde::Deserialize;

use crate::{
    core::{
        Comparator,
        MeterId,
        PlanName,
        PricePlan,
        Reading,
        lookup::{Accounts, MeterReadings, PricePlans},
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// Price plans, account assignments, and meter readings, loaded once and never changed.
#[derive(Debug, Default, Deserialize, bon::Builder)]
#[serde(deny_unknown_fields)]
#[must_use]
pub struct Catalog {
    #[serde(default)]
    #[builder(default)]
    plans: Vec<PricePlan>,

    /// Meter to the currently assigned plan.
    #[serde(default)]
    #[builder(default)]
    accounts: HashMap<MeterId, PlanName>,

    #[serde(default)]
    #[builder(default)]
    readings: HashMap<MeterId, Vec<Reading>>,
}

impl Catalog {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read the catalog from `{}`", path.display()))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let this: Self = toml::from_str(text).context("failed to parse the catalog")?;
        this.validate()?;
        info!(
            n_plans = this.plans.len(),
            n_accounts = this.accounts.len(),
            n_meters = this.readings.len(),
            n_readings = this.readings.values().map(Vec::len).sum::<usize>(),
            "loaded the catalog",
        );
        Ok(this)
    }

    pub fn validate(&self) -> Result {
        let mut names = HashSet::new();
        for plan in &self.plans {
            ensure!(names.insert(&plan.name), "price plan `{}` is defined twice", plan.name);
            ensure!(
                plan.unit_rate.is_finite() && plan.unit_rate > KilowattHourRate::ZERO,
                "price plan `{}` must have a positive unit rate, got {}",
                plan.name,
                plan.unit_rate,
            );
        }
        for (meter_id, plan_name) in &self.accounts {
            ensure!(
                names.contains(plan_name),
                "meter `{meter_id}` is assigned to unknown price plan `{plan_name}`",
            );
        }
        for (meter_id, readings) in &self.readings {
            if let Some(reading) = readings.iter().find(|reading| {
                !reading.consumption.is_finite() || reading.consumption.into_inner() < 0.0
            }) {
                bail!(
                    "meter `{meter_id}` has an invalid reading of {} at {}",
                    reading.consumption,
                    reading.time,
                );
            }
        }
        Ok(())
    }

    pub fn comparator(&self) -> Comparator<'_, Self, Self, Self> {
        Comparator::builder().accounts(self).readings(self).plans(self).build()
    }
}

impl Accounts for Catalog {
    fn plan_for_meter(&self, meter_id: &MeterId) -> Option<&PlanName> {
        self.accounts.plan_for_meter(meter_id)
    }
}

impl MeterReadings for Catalog {
    fn readings_for_meter(&self, meter_id: &MeterId) -> &[Reading] {
        self.readings.readings_for_meter(meter_id)
    }
}

impl PricePlans for Catalog {
    fn all_plans(&self) -> &[PricePlan] {
        &self.plans
    }
}
