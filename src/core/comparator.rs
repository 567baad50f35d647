use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{
        Consumption,
        MeterId,
        NotFound,
        PlanName,
        PricePlan,
        Reading,
        estimate_cost,
        lookup::{Accounts, MeterReadings, PricePlans},
    },
    prelude::*,
    quantity::{cost::HourlyCost, power::Kilowatts},
};

/// Price plan costs of a meter, anchored on the plan it is currently on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Comparison {
    /// [`None`] when the meter is not assigned to any plan.
    pub anchor_plan_id: Option<PlanName>,

    /// Every known plan, including the anchor one.
    pub costs: BTreeMap<PlanName, HourlyCost>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Recommendation {
    pub plan_id: PlanName,
    pub cost: HourlyCost,
}

/// Ranked recommendations as they are shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, derive_more::From)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
}

/// Everything known about a meter's consumption.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct MeterHistory {
    pub meter_id: MeterId,
    pub plan_id: Option<PlanName>,
    pub consumption: Consumption,
    pub hourly_rate: Option<Kilowatts>,

    /// Sorted by time.
    pub readings: Vec<Reading>,
}

/// Estimates and ranks the price plans for meters.
///
/// Holds nothing but shared references to the lookups, so it is cheap to build per request.
#[derive(bon::Builder)]
#[must_use]
pub struct Comparator<'a, A, R, P> {
    accounts: &'a A,
    readings: &'a R,
    plans: &'a P,
}

impl<'a, A, R, P> Comparator<'a, A, R, P>
where
    A: Accounts,
    R: MeterReadings,
    P: PricePlans,
{
    /// Estimate the cost of every known plan for the meter.
    #[instrument(skip_all, fields(meter_id = %meter_id))]
    pub fn compare_all_plans(&self, meter_id: &MeterId) -> Result<Comparison, NotFound> {
        let anchor_plan_id = self.accounts.plan_for_meter(meter_id).cloned();
        if anchor_plan_id.is_none() {
            warn!("the meter is not assigned to any price plan");
        }
        let costs: BTreeMap<_, _> = self.estimate_costs(meter_id)?.into_iter().collect();
        info!(anchor_plan_id = ?anchor_plan_id, n_plans = costs.len(), "compared");
        Ok(Comparison { anchor_plan_id, costs })
    }

    /// Rank the plans from the cheapest to the most expensive.
    ///
    /// Zero `limit` means all the plans. Plans of equal cost keep the catalog order.
    #[instrument(skip_all, fields(meter_id = %meter_id, limit = limit))]
    pub fn recommend_plans(
        &self,
        meter_id: &MeterId,
        limit: usize,
    ) -> Result<Vec<Recommendation>, NotFound> {
        let mut recommendations = self
            .estimate_costs(meter_id)?
            .into_iter()
            .map(|(plan_id, cost)| Recommendation { plan_id, cost })
            .collect_vec();
        recommendations.sort_by_key(|recommendation| recommendation.cost);
        if limit != 0 {
            recommendations.truncate(limit);
        }
        if let Some(cheapest) = recommendations.first() {
            info!(plan_id = %cheapest.plan_id, cost = %cheapest.cost, "cheapest");
        }
        Ok(recommendations)
    }

    pub fn all_plans(&self) -> Result<&'a [PricePlan], NotFound> {
        let plans = self.plans.all_plans();
        if plans.is_empty() { Err(NotFound::Plans) } else { Ok(plans) }
    }

    pub fn plan_by_name(&self, name: &PlanName) -> Result<&'a PricePlan, NotFound> {
        self.plans.plan_by_name(name).ok_or_else(|| NotFound::Plan(name.clone()))
    }

    /// Plans of the supplier in the catalog order.
    pub fn plans_by_supplier(&self, supplier: &str) -> Result<Vec<&'a PricePlan>, NotFound> {
        let plans = self
            .plans
            .all_plans()
            .iter()
            .filter(|plan| plan.supplier.as_deref() == Some(supplier))
            .collect_vec();
        if plans.is_empty() { Err(NotFound::Supplier(supplier.to_owned())) } else { Ok(plans) }
    }

    #[instrument(skip_all, fields(meter_id = %meter_id))]
    pub fn meter_history(&self, meter_id: &MeterId) -> Result<MeterHistory, NotFound> {
        let readings = self.readings.readings_for_meter(meter_id);
        let consumption = Consumption::from_readings(readings)
            .ok_or_else(|| NotFound::Readings(meter_id.clone()))?;
        Ok(MeterHistory {
            meter_id: meter_id.clone(),
            plan_id: self.accounts.plan_for_meter(meter_id).cloned(),
            consumption,
            hourly_rate: consumption.hourly_rate().filter(|rate| rate.is_finite()),
            readings: readings.iter().copied().sorted_by_key(|reading| reading.time).collect(),
        })
    }

    /// Cost of each plan in the catalog order.
    ///
    /// Readings are checked before any estimation, so that an empty or instantaneous
    /// reading set never reaches the calculator.
    fn estimate_costs(
        &self,
        meter_id: &MeterId,
    ) -> Result<Vec<(PlanName, HourlyCost)>, NotFound> {
        let readings = self.readings.readings_for_meter(meter_id);
        let Some(consumption) = Consumption::from_readings(readings) else {
            return Err(NotFound::Readings(meter_id.clone()));
        };
        let Some(hourly_rate) = consumption.hourly_rate() else {
            return Err(NotFound::ElapsedTime(meter_id.clone()));
        };
        debug!(
            n_readings = consumption.n_readings,
            average = ?consumption.average,
            window = ?consumption.window,
            hourly_rate = ?hourly_rate,
            "summarized the readings",
        );
        let costs = self
            .all_plans()?
            .iter()
            .map(|plan| (plan.name.clone(), estimate_cost(hourly_rate, plan)))
            .collect_vec();
        if costs.iter().any(|(_, cost)| !cost.is_finite()) {
            return Err(NotFound::Overflow(meter_id.clone()));
        }
        Ok(costs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use chrono::{Local, TimeDelta};

    use super::*;
    use crate::quantity::energy::KilowattHours;

    type TestComparator<'a> =
        Comparator<'a, HashMap<MeterId, PlanName>, HashMap<MeterId, Vec<Reading>>, Vec<PricePlan>>;

    struct Fixture {
        accounts: HashMap<MeterId, PlanName>,
        readings: HashMap<MeterId, Vec<Reading>>,
        plans: Vec<PricePlan>,
    }

    impl Fixture {
        fn home_sweet_home(plans: Vec<PricePlan>) -> Self {
            let now = Local::now();
            Self {
                accounts: HashMap::from([("home-sweet-home".into(), "test-plan".into())]),
                readings: HashMap::from([(
                    "home-sweet-home".into(),
                    vec![
                        Reading::new(now, KilowattHours::from(5.0)),
                        Reading::new(now - TimeDelta::hours(10), KilowattHours::from(15.0)),
                    ],
                )]),
                plans,
            }
        }

        fn comparator(&self) -> TestComparator<'_> {
            Comparator::builder()
                .accounts(&self.accounts)
                .readings(&self.readings)
                .plans(&self.plans)
                .build()
        }
    }

    fn plan(name: &str, unit_rate: f64) -> PricePlan {
        PricePlan::builder().name(name).unit_rate(unit_rate).build()
    }

    /// Plans with distinct rates, so that the ranking is fully determined.
    fn distinct_plans() -> Vec<PricePlan> {
        vec![
            plan("test-plan", 3.0),
            plan("dark-energy", 10.0),
            plan("green-eco", 2.0),
            plan("power-for-everyone", 1.0),
            plan("middle-ground", 5.0),
        ]
    }

    fn meter() -> MeterId {
        MeterId::from("home-sweet-home")
    }

    #[test]
    fn test_compare_all_plans() {
        let fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0)]);
        let comparison = fixture.comparator().compare_all_plans(&meter()).unwrap();
        assert_eq!(comparison.anchor_plan_id, Some(PlanName::from("test-plan")));
        assert_eq!(comparison.costs.len(), 1);
        assert_abs_diff_eq!(comparison.costs[&PlanName::from("test-plan")].into_inner(), 3.0);
    }

    #[test]
    fn test_compare_all_plans_covers_catalog() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparison = fixture.comparator().compare_all_plans(&meter()).unwrap();
        assert_eq!(comparison.costs.len(), fixture.plans.len());
        for plan in &fixture.plans {
            let expected = HourlyCost::from(plan.unit_rate.into_inner());
            assert_eq!(comparison.costs[&plan.name], expected);
        }
        assert!(comparison.costs.contains_key(comparison.anchor_plan_id.as_ref().unwrap()));
    }

    #[test]
    fn test_compare_unassigned_meter() {
        let mut fixture = Fixture::home_sweet_home(distinct_plans());
        fixture.accounts.clear();
        let comparison = fixture.comparator().compare_all_plans(&meter()).unwrap();
        assert_eq!(comparison.anchor_plan_id, None);
        assert_eq!(comparison.costs.len(), 5);
    }

    #[test]
    fn test_recommend_plans() {
        let fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0)]);
        let recommendations = fixture.comparator().recommend_plans(&meter(), 1).unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].plan_id, PlanName::from("test-plan"));
        assert_abs_diff_eq!(recommendations[0].cost.into_inner(), 3.0);
    }

    #[test]
    fn test_recommend_all_plans_ascending() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let recommendations = fixture.comparator().recommend_plans(&meter(), 0).unwrap();
        let plan_ids = recommendations.iter().map(|it| it.plan_id.0.as_str()).collect_vec();
        assert_eq!(
            plan_ids,
            ["power-for-everyone", "green-eco", "test-plan", "middle-ground", "dark-energy"],
        );
        assert!(recommendations.is_sorted_by_key(|it| it.cost));
    }

    #[test]
    fn test_recommend_limit_is_prefix() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparator = fixture.comparator();
        let unlimited = comparator.recommend_plans(&meter(), 0).unwrap();
        for limit in 1..fixture.plans.len() {
            let limited = comparator.recommend_plans(&meter(), limit).unwrap();
            assert_eq!(limited.len(), limit);
            assert_eq!(limited, unlimited[..limit]);
        }
    }

    #[test]
    fn test_recommend_limit_above_count() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparator = fixture.comparator();
        assert_eq!(comparator.recommend_plans(&meter(), 5).unwrap().len(), 5);
        assert_eq!(comparator.recommend_plans(&meter(), 100).unwrap().len(), 5);
    }

    #[test]
    fn test_recommend_tied_plans() {
        let fixture = Fixture::home_sweet_home(vec![
            plan("expensive", 4.0),
            plan("tie-a", 1.0),
            plan("tie-b", 1.0),
        ]);
        let recommendations = fixture.comparator().recommend_plans(&meter(), 0).unwrap();
        let tied =
            recommendations[..2].iter().map(|it| it.plan_id.0.as_str()).sorted().collect_vec();
        assert_eq!(tied, ["tie-a", "tie-b"]);
        assert_eq!(recommendations[2].plan_id, PlanName::from("expensive"));
    }

    #[test]
    fn test_no_readings() {
        let mut fixture = Fixture::home_sweet_home(distinct_plans());
        fixture.readings.clear();
        let comparator = fixture.comparator();
        let expected = NotFound::Readings(meter());
        assert_eq!(comparator.compare_all_plans(&meter()), Err(expected.clone()));
        assert_eq!(comparator.recommend_plans(&meter(), 0), Err(expected.clone()));
        assert_eq!(comparator.recommend_plans(&meter(), 3), Err(expected));
    }

    #[test]
    fn test_unknown_meter() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let unknown = MeterId::from("smart-meter-42");
        assert_eq!(
            fixture.comparator().compare_all_plans(&unknown),
            Err(NotFound::Readings(unknown)),
        );
    }

    #[test]
    fn test_single_reading() {
        let mut fixture = Fixture::home_sweet_home(distinct_plans());
        fixture.readings.get_mut(&meter()).unwrap().truncate(1);
        let comparator = fixture.comparator();
        let expected = NotFound::ElapsedTime(meter());
        assert_eq!(comparator.compare_all_plans(&meter()), Err(expected.clone()));
        assert_eq!(comparator.recommend_plans(&meter(), 0), Err(expected));
    }

    #[test]
    fn test_empty_catalog() {
        let fixture = Fixture::home_sweet_home(Vec::new());
        let comparator = fixture.comparator();
        assert_eq!(comparator.all_plans(), Err(NotFound::Plans));
        assert_eq!(comparator.compare_all_plans(&meter()), Err(NotFound::Plans));
        assert_eq!(comparator.recommend_plans(&meter(), 0), Err(NotFound::Plans));
    }

    #[test]
    fn test_overflowing_readings() {
        let mut fixture = Fixture::home_sweet_home(vec![plan("a", 1.0), plan("b", 2.0)]);
        for reading in fixture.readings.get_mut(&meter()).unwrap() {
            reading.consumption = KilowattHours::from(1e308);
        }
        let comparator = fixture.comparator();
        let expected = NotFound::Overflow(meter());
        assert_eq!(comparator.compare_all_plans(&meter()), Err(expected.clone()));
        assert_eq!(comparator.recommend_plans(&meter(), 0), Err(expected));
        assert_eq!(comparator.meter_history(&meter()).unwrap().hourly_rate, None);
    }

    #[test]
    fn test_overflowing_cost() {
        let mut fixture =
            Fixture::home_sweet_home(vec![plan("cheap", 1.0), plan("lavish", 1e10)]);
        for reading in fixture.readings.get_mut(&meter()).unwrap() {
            reading.consumption = KilowattHours::from(1e300);
        }
        assert_eq!(
            fixture.comparator().recommend_plans(&meter(), 1),
            Err(NotFound::Overflow(meter())),
        );
    }

    #[test]
    fn test_comparison_json() {
        let fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0)]);
        let comparison = fixture.comparator().compare_all_plans(&meter()).unwrap();
        assert_eq!(
            serde_json::to_value(&comparison).unwrap(),
            serde_json::json!({ "anchorPlanId": "test-plan", "costs": { "test-plan": 3.0 } }),
        );
    }

    #[test]
    fn test_unassigned_comparison_json() {
        let mut fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0)]);
        fixture.accounts.clear();
        let comparison = fixture.comparator().compare_all_plans(&meter()).unwrap();
        assert_eq!(
            serde_json::to_value(&comparison).unwrap()["anchorPlanId"],
            serde_json::Value::Null,
        );
    }

    #[test]
    fn test_recommendations_json() {
        let fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0), plan("cheap", 1.0)]);
        let recommendations =
            Recommendations::from(fixture.comparator().recommend_plans(&meter(), 0).unwrap());
        assert_eq!(
            serde_json::to_value(&recommendations).unwrap(),
            serde_json::json!({
                "recommendations": [
                    { "planId": "cheap", "cost": 1.0 },
                    { "planId": "test-plan", "cost": 3.0 }
                ]
            }),
        );
    }

    #[test]
    fn test_all_plans() {
        let fixture = Fixture::home_sweet_home(vec![plan("test-plan", 3.0)]);
        let plans = fixture.comparator().all_plans().unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, PlanName::from("test-plan"));
        assert_abs_diff_eq!(plans[0].unit_rate.into_inner(), 3.0);
    }

    #[test]
    fn test_plan_by_name() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparator = fixture.comparator();
        let name = PlanName::from("green-eco");
        assert_eq!(comparator.plan_by_name(&name).unwrap().name, name);
        let missing = PlanName::from("nope");
        assert_eq!(comparator.plan_by_name(&missing), Err(NotFound::Plan(missing)));
    }

    #[test]
    fn test_plans_by_supplier() {
        let mut plans = distinct_plans();
        plans[1].supplier = Some("Dr Evil's Dark Energy".to_owned());
        plans[4].supplier = Some("Dr Evil's Dark Energy".to_owned());
        let fixture = Fixture::home_sweet_home(plans);
        let comparator = fixture.comparator();

        let names = comparator
            .plans_by_supplier("Dr Evil's Dark Energy")
            .unwrap()
            .into_iter()
            .map(|plan| plan.name.0.as_str())
            .collect_vec();
        assert_eq!(names, ["dark-energy", "middle-ground"]);
        assert_eq!(
            comparator.plans_by_supplier("The Green Eco"),
            Err(NotFound::Supplier("The Green Eco".to_owned())),
        );
    }

    #[test]
    fn test_meter_history() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let history = fixture.comparator().meter_history(&meter()).unwrap();
        assert_eq!(history.plan_id, Some(PlanName::from("test-plan")));
        assert_eq!(history.readings.len(), 2);
        assert!(history.readings[0].time < history.readings[1].time);
        assert_eq!(history.hourly_rate, Some(Kilowatts::from(1.0)));
    }

    #[test]
    fn test_meter_history_no_readings() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let unknown = MeterId::from("smart-meter-42");
        assert_eq!(
            fixture.comparator().meter_history(&unknown).unwrap_err(),
            NotFound::Readings(unknown),
        );
    }

    #[test]
    fn test_idempotent() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparator = fixture.comparator();
        assert_eq!(
            comparator.compare_all_plans(&meter()).unwrap(),
            comparator.compare_all_plans(&meter()).unwrap(),
        );
    }

    #[test]
    fn test_concurrent_requests() {
        let fixture = Fixture::home_sweet_home(distinct_plans());
        let comparator = &fixture.comparator();
        let expected = comparator.recommend_plans(&meter(), 0).unwrap();
        std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(move || comparator.recommend_plans(&meter(), 0).unwrap()))
                .collect_vec();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
