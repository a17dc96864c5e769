//! Strategies
//!
//! A costed way of paying for a whole portfolio, with its breakdown and an explanation.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{
    alliances::{Alliance, AllianceSet},
    analysis::{ClusterAnalysis, CostLine, Outcome},
    clusters::Cluster,
    passes::PassProducts,
    portfolio::Portfolio,
    pricing::{PricingError, day_rate, window_cost},
};

/// Name of the optimised strategy.
pub const RECOMMENDED_NAME: &str = "Best Value Combination";

/// Name of the no-pass baseline.
pub const BASELINE_NAME: &str = "A La Carte (No Passes)";

/// Name of the strategy for an empty portfolio.
pub const EMPTY_NAME: &str = "No Resorts Selected";

const BASELINE_REASONING: &str =
    "Buying daily lift tickets individually (uses your advance/late preference).";

const EMPTY_REASONING: &str = "Add resorts to see your plan.";

const NO_PLAN_REASONING: &str = "No plan generated.";

/// Order in which cluster results are merged.
pub const CLUSTER_ORDER: [Cluster; 3] = [Cluster::Epic, Cluster::Ikon, Cluster::Independent];

/// A priced plan for the whole portfolio.
///
/// The total is always `pass_cost + ticket_cost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy<'a> {
    /// Display name
    pub name: String,

    /// Human-readable explanation
    pub reasoning: String,

    /// Cost breakdown in cluster order (Epic, Ikon, independent)
    pub lines: Vec<CostLine<'a>>,

    /// Alliances whose season pass this strategy buys
    pub purchased_passes: AllianceSet,

    pass_cost: Money<'a, Currency>,
    ticket_cost: Money<'a, Currency>,
    total: Money<'a, Currency>,
    savings: Money<'a, Currency>,
}

impl<'a> Strategy<'a> {
    /// Create a strategy with no savings and no purchased passes.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two cost components have different currencies.
    pub fn new(
        name: impl Into<String>,
        pass_cost: Money<'a, Currency>,
        ticket_cost: Money<'a, Currency>,
        reasoning: impl Into<String>,
        lines: Vec<CostLine<'a>>,
    ) -> Result<Self, MoneyError> {
        let total = pass_cost.add(ticket_cost)?;

        Ok(Self {
            name: name.into(),
            reasoning: reasoning.into(),
            lines,
            purchased_passes: AllianceSet::empty(),
            pass_cost,
            ticket_cost,
            total,
            savings: Money::from_minor(0, total.currency()),
        })
    }

    /// Zero-cost strategy returned for an empty portfolio.
    pub fn empty(currency: &'a Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            name: EMPTY_NAME.to_string(),
            reasoning: EMPTY_REASONING.to_string(),
            lines: Vec::new(),
            purchased_passes: AllianceSet::empty(),
            pass_cost: zero,
            ticket_cost: zero,
            total: zero,
            savings: zero,
        }
    }

    /// All-tickets baseline for an empty portfolio: zero cost, no lines.
    pub fn empty_baseline(currency: &'a Currency) -> Self {
        Self {
            name: BASELINE_NAME.to_string(),
            reasoning: BASELINE_REASONING.to_string(),
            ..Self::empty(currency)
        }
    }

    /// Merge cluster analyses into the recommended strategy.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the analyses mix currencies.
    pub fn recommended(
        currency: &'a Currency,
        passes: &PassProducts<'a>,
        analyses: &[ClusterAnalysis<'a>],
    ) -> Result<Self, MoneyError> {
        let mut pass_cost = Money::from_minor(0, currency);
        let mut ticket_cost = Money::from_minor(0, currency);
        let mut lines = Vec::new();
        let mut purchased_passes = AllianceSet::empty();

        for analysis in analyses {
            pass_cost = pass_cost.add(analysis.pass_cost)?;
            ticket_cost = ticket_cost.add(analysis.ticket_cost)?;
            lines.extend(analysis.lines.iter().cloned());

            if let (Outcome::SeasonPass, Some(alliance)) =
                (analysis.outcome, analysis.cluster.alliance())
            {
                purchased_passes.insert(alliance);
            }
        }

        let reasoning = reasoning(passes, analyses)?;

        let mut strategy = Self::new(RECOMMENDED_NAME, pass_cost, ticket_cost, reasoning, lines)?;

        strategy.purchased_passes = purchased_passes;

        Ok(strategy)
    }

    /// Every resort bought on tickets at its own booking preference.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an item cannot be priced.
    pub fn baseline(portfolio: &Portfolio<'a>) -> Result<Self, PricingError> {
        let mut ticket_cost = Money::from_minor(0, portfolio.currency());
        let mut lines = Vec::with_capacity(portfolio.len());

        for item in portfolio.iter() {
            let cost = window_cost(item)?;
            let (_rate, per_day) = day_rate(item);

            ticket_cost = ticket_cost.add(cost)?;

            lines.push(CostLine::new(
                format!("{} ({} days)", item.name(), item.days()),
                cost,
                format!("{per_day}/day avg"),
            ));
        }

        Ok(Self::new(
            BASELINE_NAME,
            Money::from_minor(0, portfolio.currency()),
            ticket_cost,
            BASELINE_REASONING,
            lines,
        )?)
    }

    /// Record the savings against a baseline total.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] on currency mismatch.
    pub fn compare_to(&mut self, baseline_total: Money<'a, Currency>) -> Result<(), MoneyError> {
        self.savings = baseline_total.sub(self.total)?;

        Ok(())
    }

    /// Spent on season passes
    pub fn pass_cost(&self) -> Money<'a, Currency> {
        self.pass_cost
    }

    /// Spent on tickets and bundles
    pub fn ticket_cost(&self) -> Money<'a, Currency> {
        self.ticket_cost
    }

    /// Total cost
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Baseline total minus this strategy's total
    pub fn savings(&self) -> Money<'a, Currency> {
        self.savings
    }

    /// Savings as a fraction of the baseline total.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let baseline = self.total.add(self.savings)?;

        if baseline.amount().is_zero() {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(*self.savings.amount() / *baseline.amount()))
    }
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next().map(|ch| ch.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn reasoning(
    passes: &PassProducts<'_>,
    analyses: &[ClusterAnalysis<'_>],
) -> Result<String, MoneyError> {
    let mut parts = Vec::with_capacity(analyses.len());

    for analysis in analyses {
        let spent = *analysis.cost()?.amount() > Decimal::ZERO;

        match (analysis.outcome, analysis.cluster.alliance()) {
            (Outcome::SeasonPass, Some(alliance)) => {
                let article = article(alliance.name());

                parts.push(format!("{article} {alliance} Pass for your {alliance} resorts"));
            }
            (Outcome::Bundle { .. }, Some(alliance)) => {
                let name = bundle_name(passes, &alliance);

                parts.push(format!("{} {name}", article(&name)));
            }
            (Outcome::ALaCarte, Some(alliance)) => {
                parts.push(format!("individual tickets/passes for {alliance} resorts"));
            }
            (Outcome::Individual, _) if spent => {
                parts.push("independent tickets/passes where required".to_string());
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        return Ok(NO_PLAN_REASONING.to_string());
    }

    Ok(format!("We recommend buying {}.", parts.join(", plus ")))
}

fn bundle_name(passes: &PassProducts<'_>, alliance: &Alliance) -> String {
    passes
        .iter()
        .find(|pass| pass.alliance == *alliance)
        .and_then(|pass| pass.bundle.as_ref())
        .map_or_else(|| format!("{alliance} bundle"), |bundle| bundle.name.clone())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        passes::{AlliancePass, BundleTable},
        portfolio::{Booking, PortfolioItem},
        resorts::Resort,
    };

    use super::*;

    fn usd(amount: i64) -> Money<'static, Currency> {
        Money::from_major(amount, USD)
    }

    fn passes() -> PassProducts<'static> {
        PassProducts {
            epic: AlliancePass::new(Alliance::Epic, "Epic Local Pass", usd(859))
                .with_bundle(BundleTable::new("Epic Day Pass", [(4, usd(471))])),
            ikon: AlliancePass::new(Alliance::Ikon, "Ikon Base Pass", usd(1059))
                .with_bundle(BundleTable::new("Ikon Session Pass", [(2, usd(329))])),
        }
    }

    fn analysis(
        cluster: Cluster,
        outcome: Outcome,
        pass: i64,
        tickets: i64,
    ) -> ClusterAnalysis<'static> {
        ClusterAnalysis {
            cluster,
            outcome,
            pass_cost: usd(pass),
            ticket_cost: usd(tickets),
            lines: Vec::new(),
        }
    }

    #[test]
    fn total_is_sum_of_components() -> TestResult {
        let strategy = Strategy::new("Test", usd(859), usd(300), "", Vec::new())?;

        assert_eq!(strategy.total(), usd(1159));
        assert_eq!(strategy.savings(), usd(0));

        Ok(())
    }

    #[test]
    fn reasoning_names_each_cluster_choice() -> TestResult {
        let analyses = [
            analysis(Cluster::Epic, Outcome::SeasonPass, 859, 0),
            analysis(Cluster::Ikon, Outcome::Bundle { days: 2 }, 0, 329),
            analysis(Cluster::Independent, Outcome::Individual, 0, 300),
        ];

        let strategy = Strategy::recommended(USD, &passes(), &analyses)?;

        assert_eq!(
            strategy.reasoning,
            "We recommend buying an Epic Pass for your Epic resorts, plus an Ikon Session Pass, plus independent tickets/passes where required."
        );
        assert_eq!(strategy.pass_cost(), usd(859));
        assert_eq!(strategy.ticket_cost(), usd(629));
        assert!(strategy.purchased_passes.contains(&Alliance::Epic));
        assert!(!strategy.purchased_passes.contains(&Alliance::Ikon));

        Ok(())
    }

    #[test]
    fn reasoning_for_a_la_carte_alliance() -> TestResult {
        let analyses = [
            analysis(Cluster::Epic, Outcome::Empty, 0, 0),
            analysis(Cluster::Ikon, Outcome::ALaCarte, 0, 200),
            analysis(Cluster::Independent, Outcome::Empty, 0, 0),
        ];

        let strategy = Strategy::recommended(USD, &passes(), &analyses)?;

        assert_eq!(
            strategy.reasoning,
            "We recommend buying individual tickets/passes for Ikon resorts."
        );
        assert!(strategy.purchased_passes.is_empty());

        Ok(())
    }

    #[test]
    fn reasoning_without_parts() -> TestResult {
        let analyses = [analysis(Cluster::Independent, Outcome::Individual, 0, 0)];

        let strategy = Strategy::recommended(USD, &passes(), &analyses)?;

        assert_eq!(strategy.reasoning, "No plan generated.");

        Ok(())
    }

    #[test]
    fn baseline_lists_each_item_at_its_day_rate() -> TestResult {
        let portfolio = Portfolio::with_items(
            [
                PortfolioItem::with_settings(
                    Resort::new("vail", "Vail", "Colorado", usd(299)).with_advance_price(usd(265)),
                    2,
                    false,
                    Booking::Advance,
                ),
                PortfolioItem::with_settings(
                    Resort::new("local", "Local Hill", "Custom", usd(100)),
                    3,
                    false,
                    Booking::Window,
                ),
            ],
            USD,
        )?;

        let baseline = Strategy::baseline(&portfolio)?;

        assert_eq!(baseline.name, BASELINE_NAME);
        assert_eq!(baseline.total(), usd(830));
        assert_eq!(baseline.pass_cost(), usd(0));

        let first = baseline.lines.first().ok_or("missing line")?;

        assert_eq!(first.description, "Vail (2 days)");
        assert_eq!(first.cost, usd(530));
        assert_eq!(first.notes.as_deref(), Some(format!("{}/day avg", usd(265)).as_str()));

        Ok(())
    }

    #[test]
    fn savings_percent_is_relative_to_baseline() -> TestResult {
        let mut strategy = Strategy::new("Test", usd(0), usd(750), "", Vec::new())?;

        strategy.compare_to(usd(1000))?;

        assert_eq!(strategy.savings(), usd(250));
        assert_eq!(strategy.savings_percent()?, Percentage::from(Decimal::new(25, 2)));

        Ok(())
    }

    #[test]
    fn empty_strategy_is_neutral() -> TestResult {
        let strategy = Strategy::empty(USD);

        assert_eq!(strategy.name, EMPTY_NAME);
        assert_eq!(strategy.reasoning, "Add resorts to see your plan.");
        assert_eq!(strategy.total(), usd(0));
        assert_eq!(strategy.savings_percent()?, Percentage::from(0.0));
        assert!(strategy.lines.is_empty());

        Ok(())
    }
}
