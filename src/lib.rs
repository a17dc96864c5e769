//! Slopewise
//!
//! Slopewise finds the cheapest way to pay for a season of ski trips. It groups planned
//! resorts by pass alliance, picks day tickets, a multi-day bundle or a season pass for
//! each group, and reports the savings against buying tickets everywhere, what one more
//! day would cost at each resort, and nearby resorts the chosen passes already cover.

pub mod alliances;
pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod clusters;
pub mod locations;
pub mod optimiser;
pub mod passes;
pub mod plans;
pub mod portfolio;
pub mod prelude;
pub mod pricing;
pub mod report;
pub mod resorts;
pub mod utils;
