//! Least-Cost Selection
//!
//! Cheapest of the three ways to cover a cluster, with a fixed tie-break so the outcome is
//! auditable.

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Which purchase covers a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// Each resort bought separately (tickets or that resort's own pass)
    ALaCarte,

    /// The alliance's multi-day bundle
    Bundle,

    /// The alliance season pass
    SeasonPass,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::ALaCarte => f.write_str("alacarte"),
            Choice::Bundle => f.write_str("bundle"),
            Choice::SeasonPass => f.write_str("pass"),
        }
    }
}

/// The winning choice and what it costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    /// Winning alternative
    pub choice: Choice,

    /// Its cost
    pub cost: Money<'a, Currency>,
}

/// Pick the cheapest way to cover a cluster.
///
/// A la carte wins whenever it is no dearer than both pooled products; the bundle wins
/// only when strictly cheaper than the season pass. `None` means no bundle is sold for
/// the cluster's day count.
pub fn cheapest<'a>(
    a_la_carte: Money<'a, Currency>,
    bundle: Option<Money<'a, Currency>>,
    season_pass: Money<'a, Currency>,
) -> Selection<'a> {
    let a_la_carte_amount = *a_la_carte.amount();
    let pass_amount = *season_pass.amount();

    let beats_bundle = bundle.is_none_or(|price| a_la_carte_amount <= *price.amount());

    if a_la_carte_amount <= pass_amount && beats_bundle {
        return Selection {
            choice: Choice::ALaCarte,
            cost: a_la_carte,
        };
    }

    match bundle {
        Some(price) if *price.amount() < pass_amount => Selection {
            choice: Choice::Bundle,
            cost: price,
        },
        _ => Selection {
            choice: Choice::SeasonPass,
            cost: season_pass,
        },
    }
}
