//! Cluster Analysis
//!
//! Least-cost coverage of one cluster. Alliance clusters choose between buying each resort
//! separately, the alliance bundle, and the alliance season pass. The independent cluster
//! has no pooled product, so every resort is bought separately.

use std::fmt;

use rusty_money::{Money, MoneyError, iso::Currency};
use tracing::debug;

use crate::{
    analysis::selection::{Choice, cheapest},
    clusters::Cluster,
    passes::{AlliancePass, BundleTable},
    portfolio::PortfolioItem,
    pricing::{PriceBasis, PricingError, window_quote},
};

pub mod selection;

/// One line of a cost breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CostLine<'a> {
    /// What is bought
    pub description: String,

    /// What it costs
    pub cost: Money<'a, Currency>,

    /// Optional detail
    pub notes: Option<String>,
}

impl<'a> CostLine<'a> {
    /// Create a cost line with a note.
    pub fn new(
        description: impl Into<String>,
        cost: Money<'a, Currency>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            cost,
            notes: Some(notes.into()),
        }
    }
}

/// How a cluster ended up being covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The cluster had no resorts
    Empty,

    /// An alliance cluster bought resort by resort
    ALaCarte,

    /// An alliance bundle covering this many days
    Bundle {
        /// Total days covered
        days: u32,
    },

    /// The alliance season pass
    SeasonPass,

    /// The independent cluster, always bought resort by resort
    Individual,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Empty => f.write_str("none"),
            Outcome::ALaCarte => f.write_str("alacarte"),
            Outcome::Bundle { .. } => f.write_str("bundle"),
            Outcome::SeasonPass => f.write_str("pass"),
            Outcome::Individual => f.write_str("mixed"),
        }
    }
}

/// Result of analysing one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAnalysis<'a> {
    /// Cluster analysed
    pub cluster: Cluster,

    /// Chosen coverage
    pub outcome: Outcome,

    /// Spent on season passes (alliance or individual resort passes)
    pub pass_cost: Money<'a, Currency>,

    /// Spent on tickets and bundles
    pub ticket_cost: Money<'a, Currency>,

    /// Breakdown lines
    pub lines: Vec<CostLine<'a>>,
}

impl<'a> ClusterAnalysis<'a> {
    /// Zero-cost analysis of a cluster with no resorts.
    pub fn empty(cluster: Cluster, currency: &'a Currency) -> Self {
        Self {
            cluster,
            outcome: Outcome::Empty,
            pass_cost: Money::from_minor(0, currency),
            ticket_cost: Money::from_minor(0, currency),
            lines: Vec::new(),
        }
    }

    /// Total cost of the cluster.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two components have different currencies.
    pub fn cost(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.pass_cost.add(self.ticket_cost)
    }
}

/// Which note an individual resort pass line gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassNote {
    /// "Individual Pass"
    Individual,

    /// "Cheaper than N day tickets (...)"
    ComparedToTickets,
}

/// Resorts bought one by one: each gets its own season pass if strictly cheaper than
/// tickets, otherwise tickets.
#[derive(Debug)]
struct Separately<'a> {
    pass_cost: Money<'a, Currency>,
    ticket_cost: Money<'a, Currency>,
    lines: Vec<CostLine<'a>>,
}

impl<'a> Separately<'a> {
    fn price(
        currency: &'a Currency,
        items: &[&PortfolioItem<'a>],
        note: PassNote,
    ) -> Result<Self, PricingError> {
        let mut pass_cost = Money::from_minor(0, currency);
        let mut ticket_cost = Money::from_minor(0, currency);
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let quote = window_quote(item)?;

            match item.season_pass_price() {
                Some(pass) if pass.amount() < quote.cost.amount() => {
                    let notes = match note {
                        PassNote::Individual => "Individual Pass".to_string(),
                        PassNote::ComparedToTickets => {
                            format!("Cheaper than {} day tickets ({})", item.days(), quote.cost)
                        }
                    };

                    pass_cost = pass_cost.add(pass)?;
                    lines.push(CostLine::new(format!("{} Season Pass", item.name()), pass, notes));
                }
                _ => {
                    let notes = match quote.basis {
                        PriceBasis::Package => "Consecutive discount".to_string(),
                        PriceBasis::Daily(rate) => format!("{} days @ {rate}", item.days()),
                    };

                    ticket_cost = ticket_cost.add(quote.cost)?;
                    lines.push(CostLine::new(
                        format!("{} Tickets", item.name()),
                        quote.cost,
                        notes,
                    ));
                }
            }
        }

        Ok(Self {
            pass_cost,
            ticket_cost,
            lines,
        })
    }

    fn total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.pass_cost.add(self.ticket_cost)
    }
}

/// Cover an alliance cluster at least cost.
///
/// # Errors
///
/// Returns a [`PricingError`] if an item cannot be priced or amounts mix currencies.
pub fn analyze_alliance<'a>(
    cluster: Cluster,
    pass: &AlliancePass<'a>,
    currency: &'a Currency,
    items: &[&PortfolioItem<'a>],
) -> Result<ClusterAnalysis<'a>, PricingError> {
    if items.is_empty() {
        return Ok(ClusterAnalysis::empty(cluster, currency));
    }

    let total_days = items
        .iter()
        .try_fold(0_u32, |days, item| days.checked_add(item.days()));

    let bundle_price = total_days.and_then(|days| pass.bundle_price(days));

    let separately = Separately::price(currency, items, PassNote::Individual)?;
    let a_la_carte = separately.total()?;

    let selection = cheapest(a_la_carte, bundle_price, pass.pass_price);

    debug!(
        %cluster,
        items = items.len(),
        a_la_carte = %a_la_carte,
        bundle = ?bundle_price.map(|price| price.to_string()),
        bundle_days = ?pass.bundle.as_ref().and_then(BundleTable::day_range),
        season_pass = %pass.pass_price,
        choice = %selection.choice,
        "analysed cluster"
    );

    let zero = Money::from_minor(0, currency);

    let analysis = match (selection.choice, total_days, pass.bundle.as_ref()) {
        (Choice::Bundle, Some(days), Some(bundle)) => ClusterAnalysis {
            cluster,
            outcome: Outcome::Bundle { days },
            pass_cost: zero,
            ticket_cost: selection.cost,
            lines: vec![CostLine::new(
                bundle.describe(days),
                selection.cost,
                format!("Covers {days} days at {} resorts", pass.alliance),
            )],
        },
        (Choice::SeasonPass, ..) => {
            let names: Vec<&str> = items.iter().map(|item| item.name()).collect();

            ClusterAnalysis {
                cluster,
                outcome: Outcome::SeasonPass,
                pass_cost: selection.cost,
                ticket_cost: zero,
                lines: vec![CostLine::new(
                    pass.pass_name.clone(),
                    selection.cost,
                    format!("Covers {}", names.join(", ")),
                )],
            }
        }
        _ => ClusterAnalysis {
            cluster,
            outcome: Outcome::ALaCarte,
            pass_cost: separately.pass_cost,
            ticket_cost: separately.ticket_cost,
            lines: separately.lines,
        },
    };

    Ok(analysis)
}

/// Cover the independent cluster, resort by resort.
///
/// # Errors
///
/// Returns a [`PricingError`] if an item cannot be priced or amounts mix currencies.
pub fn analyze_independents<'a>(
    currency: &'a Currency,
    items: &[&PortfolioItem<'a>],
) -> Result<ClusterAnalysis<'a>, PricingError> {
    if items.is_empty() {
        return Ok(ClusterAnalysis::empty(Cluster::Independent, currency));
    }

    let separately = Separately::price(currency, items, PassNote::ComparedToTickets)?;

    debug!(
        items = items.len(),
        pass_cost = %separately.pass_cost,
        ticket_cost = %separately.ticket_cost,
        "analysed independent resorts"
    );

    Ok(ClusterAnalysis {
        cluster: Cluster::Independent,
        outcome: Outcome::Individual,
        pass_cost: separately.pass_cost,
        ticket_cost: separately.ticket_cost,
        lines: separately.lines,
    })
}

/// Sum of a set of analyses.
///
/// # Errors
///
/// Returns a [`MoneyError`] on currency mismatch.
pub fn total_cost<'a, 'r>(
    currency: &'a Currency,
    analyses: impl IntoIterator<Item = &'r ClusterAnalysis<'a>>,
) -> Result<Money<'a, Currency>, MoneyError>
where
    'a: 'r,
{
    analyses
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, analysis| {
            acc.add(analysis.cost()?)
        })
}
