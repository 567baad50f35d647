use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{Comparison, MeterHistory, PricePlan, Recommendation};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Costs by plan name, with the meter's current plan highlighted.
#[must_use]
pub fn build_comparison_table(comparison: &Comparison) -> Table {
    let anchor_cost = comparison
        .anchor_plan_id
        .as_ref()
        .and_then(|plan_id| comparison.costs.get(plan_id))
        .copied();

    let mut table = new_table();
    table.set_header(vec!["Plan", "Hourly cost", ""]);
    for (plan_id, cost) in &comparison.costs {
        let is_anchor = comparison.anchor_plan_id.as_ref() == Some(plan_id);
        let color = match anchor_cost {
            Some(anchor_cost) if *cost < anchor_cost => Color::Green,
            Some(anchor_cost) if *cost > anchor_cost => Color::Red,
            _ => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(plan_id),
            Cell::new(cost).set_alignment(CellAlignment::Right).fg(color),
            if is_anchor {
                Cell::new("current").add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            },
        ]);
    }
    table
}

#[must_use]
pub fn build_recommendations_table(recommendations: &[Recommendation]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Plan", "Hourly cost"]);
    for (rank, recommendation) in (1..).zip(recommendations) {
        table.add_row(vec![
            Cell::new(rank).add_attribute(Attribute::Dim),
            Cell::new(&recommendation.plan_id),
            Cell::new(recommendation.cost)
                .set_alignment(CellAlignment::Right)
                .fg(if rank == 1 { Color::Green } else { Color::Reset }),
        ]);
    }
    table
}

#[must_use]
pub fn build_plans_table<'a>(plans: impl IntoIterator<Item = &'a PricePlan>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Plan", "Supplier", "Unit rate"]);
    for plan in plans {
        table.add_row(vec![
            Cell::new(&plan.name),
            Cell::new(plan.supplier.as_deref().unwrap_or("")),
            Cell::new(plan.unit_rate).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_readings_table(history: &MeterHistory) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Time", "Consumption"]);
    for reading in &history.readings {
        table.add_row(vec![
            Cell::new(reading.time.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(reading.time.format("%H:%M:%S")),
            Cell::new(reading.consumption).set_alignment(CellAlignment::Right).fg(
                if reading.consumption > history.consumption.average {
                    Color::Red
                } else {
                    Color::Green
                },
            ),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{core::PlanName, quantity::cost::HourlyCost};

    #[test]
    fn test_comparison_table_has_row_per_plan() {
        let comparison = Comparison {
            anchor_plan_id: Some(PlanName::from("b")),
            costs: BTreeMap::from([
                (PlanName::from("a"), HourlyCost::from(1.0)),
                (PlanName::from("b"), HourlyCost::from(2.0)),
                (PlanName::from("c"), HourlyCost::from(3.0)),
            ]),
        };
        assert_eq!(build_comparison_table(&comparison).row_count(), 3);
    }

    #[test]
    fn test_recommendations_table() {
        let recommendations = [Recommendation {
            plan_id: PlanName::from("test-plan"),
            cost: HourlyCost::from(3.0),
        }];
        let table = build_recommendations_table(&recommendations);
        assert_eq!(table.row_count(), 1);
        assert!(table.to_string().contains("test-plan"));
    }
}
