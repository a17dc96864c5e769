//! Bundled data: the resort catalog and the sample plans.

use std::io::Write;

use rust_decimal::Decimal;
use rusty_money::iso::USD;
use tempfile::NamedTempFile;
use testresult::TestResult;

use slopewise::{
    alliances::Alliance,
    cache::OptimiserCache,
    catalog::{Catalog, CatalogError},
    optimiser::{Optimiser, OptimiserConfig},
    plans::Plan,
    portfolio::Portfolio,
    report,
    resorts::ResortId,
};

const PLANS: [&str; 3] = ["colorado", "utah", "mixed"];

fn plan_path(name: &str) -> String {
    format!("{}/data/plans/{name}.yml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn bundled_catalog_is_consistent() -> TestResult {
    let catalog = Catalog::bundled()?;

    assert_eq!(catalog.currency(), USD);
    assert!(catalog.len() >= 40);

    for resort in catalog.iter() {
        assert_eq!(resort.foreign_currency(USD), None, "{} has a foreign price", resort.id);
        assert!(*resort.window_price.amount() > Decimal::ZERO, "{} is free", resort.id);
    }

    let vail = catalog.get(&ResortId::from("vail")).ok_or("vail missing")?;

    assert!(vail.alliances.contains(&Alliance::Epic));

    Ok(())
}

#[test]
fn catalog_search_finds_by_location() -> TestResult {
    let catalog = Catalog::bundled()?;
    let portfolio = Portfolio::new(USD);

    let found: Vec<_> = catalog.search("kalispell", &portfolio, 5).collect();

    assert!(found.iter().any(|resort| resort.id.as_str() == "whitefish"));
    assert_eq!(catalog.search("   ", &portfolio, 5).count(), 0);

    Ok(())
}

#[test]
fn catalog_loads_from_file() -> TestResult {
    let mut file = NamedTempFile::new()?;

    write!(
        file,
        "\
currency: USD
passes:
  epic:
    name: Epic Local Pass
    price: 859 USD
  ikon:
    name: Ikon Base Pass
    price: 1059 USD
resorts:
  - id: local
    name: Local Hill
    region: Nowhere
    passes: []
    window_price: 60 USD
"
    )?;

    let catalog = Catalog::load(file.path())?;

    assert_eq!(catalog.len(), 1);

    Ok(())
}

#[test]
fn missing_catalog_file_is_an_io_error() {
    let result = Catalog::load("/nonexistent/catalog.yml");

    assert!(matches!(result, Err(CatalogError::Io(_))));
}

#[test]
fn sample_plans_optimise_and_render() -> TestResult {
    let catalog = Catalog::bundled()?;
    let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

    for name in PLANS {
        let plan = Plan::load(plan_path(name))?;
        let portfolio = plan.portfolio(&catalog)?;

        assert!(!portfolio.is_empty(), "{name} is empty");

        let result = optimiser.optimise(&portfolio)?;
        let baseline = result.alternatives.first().ok_or("missing baseline")?;

        assert!(
            result.recommended.total().amount() <= baseline.total().amount(),
            "{name} costs more than tickets"
        );
        assert_eq!(result.marginal_costs.len(), portfolio.len());

        let mut out = Vec::new();

        report::write_to(&mut out, &result)?;

        assert!(String::from_utf8(out)?.contains("Best Value Combination"));
    }

    Ok(())
}

#[test]
fn cache_reuses_results_for_unchanged_plans() -> TestResult {
    let catalog = Catalog::bundled()?;
    let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());
    let portfolio = Plan::load(plan_path("utah"))?.portfolio(&catalog)?;

    let mut cache = OptimiserCache::new(4);

    let first = cache.optimise(&optimiser, &portfolio)?;
    let second = cache.optimise(&optimiser, &portfolio)?;

    assert_eq!(first, second);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    Ok(())
}
