//! Marginal Costs

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    optimiser::{Optimiser, OptimiserError},
    portfolio::Portfolio,
    resorts::ResortId,
};

/// Extra cost of skiing one more day at a resort.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalCost<'a> {
    /// Portfolio item
    pub id: ResortId,

    /// Resort name, for display
    pub name: String,

    /// Added cost, never negative
    pub cost: Money<'a, Currency>,
}

impl<'a> Optimiser<'_, 'a> {
    /// One entry per item, in portfolio order: the recommended total with that item's
    /// day count raised by one, minus `recommended_total`, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimiserError`] if a re-priced portfolio cannot be evaluated.
    pub fn marginal_costs(
        &self,
        portfolio: &Portfolio<'a>,
        recommended_total: Money<'a, Currency>,
    ) -> Result<Vec<MarginalCost<'a>>, OptimiserError> {
        let zero = Money::from_minor(0, portfolio.currency());

        portfolio
            .iter()
            .map(|item| {
                let extended = portfolio.with_extra_day(item.id())?;
                let total = self.evaluate(&extended)?.total();
                let delta = total.sub(recommended_total)?;

                debug!(
                    resort = %item.id(),
                    days = item.days().saturating_add(1),
                    %total,
                    %delta,
                    "priced extra day"
                );

                Ok(MarginalCost {
                    id: item.id().clone(),
                    name: item.name().to_string(),
                    cost: if *delta.amount() < Decimal::ZERO { zero } else { delta },
                })
            })
            .collect()
    }
}
