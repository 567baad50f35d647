use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::{MeterId, PlanName};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// TOML file with the price plans, account assignments, and meter readings.
    #[clap(long, env = "CATALOG_PATH", default_value = "catalog.toml", global = true)]
    pub catalog: PathBuf,

    /// Print JSON instead of the tables.
    #[clap(long, env = "JSON_OUTPUT", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate the hourly cost of every price plan for the meter.
    #[clap(name = "compare")]
    Compare(MeterArgs),

    /// Rank the price plans from the cheapest to the most expensive.
    #[clap(name = "recommend")]
    Recommend(RecommendArgs),

    /// List the price plans.
    #[clap(name = "plans")]
    Plans(PlansArgs),

    /// Show a single price plan.
    #[clap(name = "plan")]
    Plan(PlanArgs),

    /// Show the meter readings and the consumption summary.
    #[clap(name = "readings")]
    Readings(MeterArgs),
}

#[derive(Parser)]
pub struct MeterArgs {
    /// Smart meter identifier.
    pub meter_id: MeterId,
}

#[derive(Parser)]
pub struct RecommendArgs {
    #[clap(flatten)]
    pub meter: MeterArgs,

    /// Show only this many cheapest plans, zero shows all of them.
    #[clap(long, short = 'n', default_value = "0")]
    pub limit: usize,
}

#[derive(Parser)]
pub struct PlansArgs {
    /// Show only the plans of the supplier.
    #[clap(long)]
    pub supplier: Option<String>,
}

#[derive(Parser)]
pub struct PlanArgs {
    pub name: PlanName,
}
