#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod catalog;
mod cli;
mod core;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};
use comfy_table::Table;
use serde::Serialize;

use crate::{
    catalog::Catalog,
    cli::{Args, Command},
    core::{NotFound, Recommendations},
    prelude::*,
    tables::{
        build_comparison_table,
        build_plans_table,
        build_readings_table,
        build_recommendations_table,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let catalog = Catalog::read_from(&args.catalog)?;
    let comparator = catalog.comparator();
    let output = Output { json: args.json };

    match args.command {
        Command::Compare(args) => {
            output.print(comparator.compare_all_plans(&args.meter_id), build_comparison_table)?;
        }
        Command::Recommend(args) => {
            output.print(
                comparator
                    .recommend_plans(&args.meter.meter_id, args.limit)
                    .map(Recommendations::from),
                |payload| build_recommendations_table(&payload.recommendations),
            )?;
        }
        Command::Plans(args) => {
            let plans = match args.supplier {
                Some(supplier) => comparator.plans_by_supplier(&supplier),
                None => comparator.all_plans().map(|plans| plans.iter().collect()),
            };
            output.print(plans, |plans| build_plans_table(plans.iter().copied()))?;
        }
        Command::Plan(args) => {
            output.print(comparator.plan_by_name(&args.name), |plan| build_plans_table([*plan]))?;
        }
        Command::Readings(args) => {
            output.print(comparator.meter_history(&args.meter_id), |history| {
                info!(
                    plan_id = ?history.plan_id,
                    average = %history.consumption.average,
                    window = ?history.consumption.window,
                    hourly_rate = ?history.hourly_rate,
                    "consumption",
                );
                build_readings_table(history)
            })?;
        }
    }

    info!("done!");
    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    /// Print the payload, or nothing at all when it is not found.
    fn print<T: Serialize>(
        &self,
        payload: Result<T, NotFound>,
        build_table: impl FnOnce(&T) -> Table,
    ) -> Result {
        match payload {
            Ok(payload) if self.json => {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Ok(payload) => {
                println!("{}", build_table(&payload));
            }
            Err(not_found) => {
                warn!(%not_found, "nothing to show");
            }
        }
        Ok(())
    }
}
