//! Slopewise prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    alliances::{Alliance, AllianceSet},
    analysis::{
        ClusterAnalysis, CostLine, Outcome,
        selection::{Choice, Selection, cheapest},
    },
    cache::{OptimiserCache, PlanFingerprint},
    catalog::{Catalog, CatalogError, ResortKey},
    clusters::{Cluster, DualAffiliationPolicy},
    locations::LocationTags,
    optimiser::{
        MarginalCost, OptimizationResult, Optimiser, OptimiserConfig, OptimiserError, Strategy,
    },
    passes::{AlliancePass, BundleTable, PassProducts},
    plans::{Plan, PlanError},
    portfolio::{Booking, Portfolio, PortfolioError, PortfolioItem},
    pricing::{PricingError, window_cost},
    report::ReportError,
    resorts::{MultiDayPrices, Resort, ResortId},
};
