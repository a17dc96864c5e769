//! Plan Example
//!
//! Optimises a saved plan against the resort catalog and prints the report.
//!
//! Use `-p` to pick a plan from `data/plans` by name
//! Use `-c` to load a catalog file instead of the bundled one
//! Use `--policy` to choose how resorts on both Epic and Ikon are priced

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use slopewise::{
    catalog::Catalog,
    optimiser::{Optimiser, OptimiserConfig},
    plans::Plan,
    report,
    utils::PlanArgs,
};
use tracing_subscriber::EnvFilter;

/// Plan Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = PlanArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(true)
        .init();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::bundled()?,
    };

    let plan = Plan::load(args.plan_path())?;
    let portfolio = plan.portfolio(&catalog)?;

    let optimiser = Optimiser::new(
        &catalog,
        OptimiserConfig {
            dual_policy: args.policy,
        },
    );

    let start = Instant::now();

    let result = optimiser.optimise(&portfolio)?;

    let elapsed = start.elapsed();

    if let Some(name) = &plan.name {
        println!("\n{name} ({} resorts)", portfolio.len());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report::write_to(&mut handle, &result)?;

    println!("Optimised in {}", elapsed.human(Truncate::Nano));

    Ok(())
}
