//! Optimiser
//!
//! Prices a portfolio every way the clusters allow and recommends the cheapest
//! combination, alongside an all-tickets baseline, the cost of one more day at each
//! resort, and nearby resorts the recommended passes already cover.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{Span, debug, info, warn};

use crate::{
    analysis::{ClusterAnalysis, analyze_alliance, analyze_independents, total_cost},
    catalog::Catalog,
    clusters::{Cluster, DualAffiliationPolicy, MAX_DUAL_SEARCH, Partition, classify},
    portfolio::{Portfolio, PortfolioError, PortfolioItem},
    pricing::PricingError,
    resorts::{Resort, ResortId},
};

pub mod marginal;
pub mod strategy;
pub mod suggestions;

pub use marginal::MarginalCost;
pub use strategy::{BASELINE_NAME, CLUSTER_ORDER, EMPTY_NAME, RECOMMENDED_NAME, Strategy};

/// Errors that can occur while optimising a portfolio.
#[derive(Debug, Error)]
pub enum OptimiserError {
    /// The portfolio is priced in another currency than the catalog's pass products.
    #[error("Portfolio currency {portfolio} does not match catalog currency {catalog}")]
    CurrencyMismatch {
        /// Catalog currency code
        catalog: &'static str,
        /// Portfolio currency code
        portfolio: &'static str,
    },

    /// Error pricing an item.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error deriving a re-priced portfolio.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
}

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OptimiserConfig {
    /// Treatment of resorts on both Epic and Ikon
    pub dual_policy: DualAffiliationPolicy,
}

/// Everything the optimiser reports for one portfolio snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult<'a> {
    /// Cheapest strategy found
    pub recommended: Strategy<'a>,

    /// Strategies for comparison; currently the all-tickets baseline
    pub alternatives: Vec<Strategy<'a>>,

    /// Per-cluster analyses behind the recommendation
    pub clusters: Vec<ClusterAnalysis<'a>>,

    /// Cost of one extra day per item, in portfolio order
    pub marginal_costs: Vec<MarginalCost<'a>>,

    /// Catalog resorts covered by the recommended passes near the plan
    pub suggestions: Vec<Resort<'a>>,
}

impl<'a> OptimizationResult<'a> {
    /// Result for an empty portfolio.
    pub fn empty(currency: &'a Currency) -> Self {
        Self {
            recommended: Strategy::empty(currency),
            alternatives: vec![Strategy::empty_baseline(currency)],
            clusters: Vec::new(),
            marginal_costs: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Marginal cost of one more day at a resort.
    pub fn marginal_cost(&self, id: &ResortId) -> Option<Money<'a, Currency>> {
        self.marginal_costs
            .iter()
            .find(|marginal| marginal.id == *id)
            .map(|marginal| marginal.cost)
    }
}

/// Cluster analyses for one partition and their combined cost.
#[derive(Debug, Clone)]
struct Evaluation<'a> {
    analyses: Vec<ClusterAnalysis<'a>>,
    total: Money<'a, Currency>,
}

impl<'a> Evaluation<'a> {
    fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Optimiser
#[derive(Debug, Clone, Copy)]
pub struct Optimiser<'c, 'a> {
    catalog: &'c Catalog<'a>,
    config: OptimiserConfig,
}

impl<'c, 'a> Optimiser<'c, 'a> {
    /// Create an optimiser over a catalog.
    pub fn new(catalog: &'c Catalog<'a>, config: OptimiserConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine settings.
    pub fn config(&self) -> OptimiserConfig {
        self.config
    }

    /// Optimise a portfolio snapshot.
    ///
    /// Pure: equal snapshots give equal results. An empty portfolio is not an error.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimiserError`] if the portfolio currency differs from the catalog's
    /// or an item cannot be priced.
    #[tracing::instrument(
        name = "optimiser.optimise",
        skip(self, portfolio),
        fields(
            items = portfolio.len(),
            policy = ?self.config.dual_policy,
            total = tracing::field::Empty,
            savings = tracing::field::Empty
        ),
        err
    )]
    pub fn optimise(
        &self,
        portfolio: &Portfolio<'a>,
    ) -> Result<OptimizationResult<'a>, OptimiserError> {
        if portfolio.is_empty() {
            return Ok(OptimizationResult::empty(portfolio.currency()));
        }

        if portfolio.currency() != self.catalog.currency() {
            return Err(OptimiserError::CurrencyMismatch {
                catalog: self.catalog.currency().iso_alpha_code,
                portfolio: portfolio.currency().iso_alpha_code,
            });
        }

        let classification = classify(portfolio);

        if classification.search_truncated(self.config.dual_policy) {
            warn!(
                dual = classification.dual.len(),
                limit = MAX_DUAL_SEARCH,
                "too many dual-pass resorts to search; assigning them to Epic"
            );
        }

        let evaluation = self.evaluate(portfolio)?;

        let baseline = Strategy::baseline(portfolio)?;

        let mut recommended = Strategy::recommended(
            portfolio.currency(),
            self.catalog.passes(),
            &evaluation.analyses,
        )?;

        recommended.compare_to(baseline.total())?;

        let marginal_costs = self.marginal_costs(portfolio, recommended.total())?;

        let suggestions =
            suggestions::covered_nearby(self.catalog, portfolio, &recommended.purchased_passes);

        let span = Span::current();

        span.record("total", tracing::field::display(recommended.total()));
        span.record("savings", tracing::field::display(recommended.savings()));

        info!(
            suggestions = suggestions.len(),
            reasoning = %recommended.reasoning,
            "optimised portfolio"
        );

        Ok(OptimizationResult {
            recommended,
            alternatives: vec![baseline],
            clusters: evaluation.analyses,
            marginal_costs,
            suggestions,
        })
    }

    /// Cheapest partition of the portfolio under the configured policy. Ties keep the
    /// earliest candidate.
    fn evaluate(&self, portfolio: &Portfolio<'a>) -> Result<Evaluation<'a>, OptimiserError> {
        let items: Vec<&PortfolioItem<'a>> = portfolio.iter().collect();

        let mut best: Option<Evaluation<'a>> = None;

        for partition in classify(portfolio).partitions(self.config.dual_policy) {
            let candidate = self.evaluate_partition(portfolio.currency(), &items, &partition)?;

            let cheaper = best
                .as_ref()
                .is_none_or(|best| candidate.total.amount() < best.total.amount());

            if cheaper {
                best = Some(candidate);
            }
        }

        Ok(best.unwrap_or_else(|| Evaluation {
            analyses: Vec::new(),
            total: Money::from_minor(0, portfolio.currency()),
        }))
    }

    fn evaluate_partition(
        &self,
        currency: &'a Currency,
        items: &[&PortfolioItem<'a>],
        partition: &Partition,
    ) -> Result<Evaluation<'a>, OptimiserError> {
        let passes = self.catalog.passes();

        let analyses = CLUSTER_ORDER
            .into_iter()
            .map(|cluster| {
                let members: Vec<&PortfolioItem<'a>> = partition
                    .members(cluster)
                    .iter()
                    .filter_map(|idx| items.get(*idx).copied())
                    .collect();

                match cluster {
                    Cluster::Epic => analyze_alliance(cluster, &passes.epic, currency, &members),
                    Cluster::Ikon => analyze_alliance(cluster, &passes.ikon, currency, &members),
                    Cluster::Independent => analyze_independents(currency, &members),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = total_cost(currency, &analyses)?;

        debug!(
            epic = partition.epic.len(),
            ikon = partition.ikon.len(),
            independent = partition.independent.len(),
            %total,
            "evaluated partition"
        );

        Ok(Evaluation { analyses, total })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CAD, USD};
    use testresult::TestResult;

    use crate::{
        alliances::{Alliance, AllianceSet},
        analysis::Outcome,
        portfolio::Booking,
    };

    use super::*;

    const CATALOG: &str = "\
currency: USD
passes:
  epic:
    name: Epic Local Pass
    price: 859 USD
    bundle:
      name: Epic Day Pass
      prices:
        1: 136 USD
        2: 254 USD
        3: 366 USD
        4: 471 USD
        5: 574 USD
        6: 671 USD
        7: 761 USD
  ikon:
    name: Ikon Base Pass
    price: 1059 USD
    bundle:
      name: Ikon Session Pass
      prices:
        2: 329 USD
        3: 449 USD
        4: 539 USD
resorts: []
";

    fn usd(amount: i64) -> Money<'static, Currency> {
        Money::from_major(amount, USD)
    }

    fn resort(id: &str, alliances: &[&str], window: i64) -> Resort<'static> {
        Resort::new(id, id, "Test", usd(window)).with_alliances(AllianceSet::from_strs(alliances))
    }

    fn window_days(resort: Resort<'static>, days: u32) -> PortfolioItem<'static> {
        PortfolioItem::with_settings(resort, days, false, Booking::Window)
    }

    #[test]
    fn empty_portfolio_is_neutral() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

        let result = optimiser.optimise(&Portfolio::new(USD))?;

        assert_eq!(result.recommended.name, EMPTY_NAME);
        assert_eq!(result.recommended.total(), usd(0));
        assert!(result.marginal_costs.is_empty());
        assert!(result.suggestions.is_empty());

        let baseline = result.alternatives.first().ok_or("missing baseline")?;

        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(baseline.name, BASELINE_NAME);
        assert_eq!(baseline.total(), usd(0));
        assert!(baseline.lines.is_empty());

        Ok(())
    }

    #[test]
    fn tied_dual_split_keeps_earliest_resort_in_epic() -> TestResult {
        let catalog = Catalog::from_yaml_str(
            "\
currency: USD
passes:
  epic:
    name: Epic Local Pass
    price: 859 USD
    bundle:
      name: Epic Day Pass
      prices:
        1: 50 USD
  ikon:
    name: Ikon Base Pass
    price: 1059 USD
resorts: []
",
        )?;
        let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

        // Either one-in-each split costs 150.
        let portfolio = Portfolio::with_items(
            [
                window_days(resort("first", &["Epic", "Ikon"], 100), 1),
                window_days(resort("second", &["Epic", "Ikon"], 100), 1),
            ],
            USD,
        )?;

        let result = optimiser.optimise(&portfolio)?;
        let ikon = result
            .clusters
            .iter()
            .find(|analysis| analysis.cluster == Cluster::Ikon)
            .ok_or("missing ikon cluster")?;
        let ikon_lines: Vec<&str> = ikon.lines.iter().map(|line| line.description.as_str()).collect();

        assert_eq!(result.recommended.total(), usd(150));
        assert_eq!(ikon_lines, ["second Tickets"]);

        Ok(())
    }

    #[test]
    fn dual_resort_goes_to_the_cheaper_alliance() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

        // Five Ikon days are past the session range, so the pass is bought anyway.
        let portfolio = Portfolio::with_items(
            [
                window_days(resort("alta", &["Ikon"], 300), 5),
                window_days(resort("both", &["Epic", "Ikon"], 200), 3),
            ],
            USD,
        )?;

        let result = optimiser.optimise(&portfolio)?;

        assert_eq!(result.recommended.total(), usd(1059));
        assert_eq!(result.recommended.purchased_passes.len(), 1);
        assert!(result.recommended.purchased_passes.contains(&Alliance::Ikon));

        Ok(())
    }

    #[test]
    fn count_in_both_double_counts() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let config = OptimiserConfig {
            dual_policy: DualAffiliationPolicy::CountInBoth,
        };
        let optimiser = Optimiser::new(&catalog, config);

        let portfolio =
            Portfolio::with_items([window_days(resort("both", &["Epic", "Ikon"], 100), 1)], USD)?;

        let result = optimiser.optimise(&portfolio)?;

        assert_eq!(result.recommended.total(), usd(200));

        Ok(())
    }

    #[test]
    fn prefer_ikon_places_dual_resorts_in_ikon() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let config = OptimiserConfig {
            dual_policy: DualAffiliationPolicy::PreferIkon,
        };
        let optimiser = Optimiser::new(&catalog, config);

        let portfolio =
            Portfolio::with_items([window_days(resort("both", &["Epic", "Ikon"], 300), 3)], USD)?;

        let result = optimiser.optimise(&portfolio)?;
        let ikon = result
            .clusters
            .iter()
            .find(|analysis| analysis.cluster == Cluster::Ikon)
            .ok_or("missing ikon cluster")?;

        assert_eq!(ikon.outcome, Outcome::Bundle { days: 3 });
        assert_eq!(result.recommended.total(), usd(449));

        Ok(())
    }

    #[test]
    fn foreign_portfolio_is_rejected() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

        let portfolio = Portfolio::with_items(
            [window_days(Resort::new("x", "X", "Y", Money::from_major(10, CAD)), 1)],
            CAD,
        )?;

        let result = optimiser.optimise(&portfolio);

        assert!(matches!(
            result,
            Err(OptimiserError::CurrencyMismatch {
                catalog: "USD",
                portfolio: "CAD"
            })
        ));

        Ok(())
    }

    #[test]
    fn marginal_cost_lookup_by_id() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let optimiser = Optimiser::new(&catalog, OptimiserConfig::default());

        let portfolio = Portfolio::with_items([window_days(resort("local", &[], 100), 3)], USD)?;

        let result = optimiser.optimise(&portfolio)?;

        assert_eq!(result.marginal_cost(&ResortId::from("local")), Some(usd(100)));
        assert_eq!(result.marginal_cost(&ResortId::from("missing")), None);

        Ok(())
    }
}
