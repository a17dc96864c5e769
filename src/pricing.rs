//! Pricing
//!
//! Pay-as-you-go cost of a single portfolio item, plus the money helpers the analyzers
//! share.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::portfolio::{Booking, PortfolioItem};

/// Errors that can occur while pricing items.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Day count times price does not fit in a decimal amount.
    #[error("price of {days} days at {per_day} overflows")]
    Overflow {
        /// Number of days priced
        days: u32,
        /// Per-day price
        per_day: Decimal,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Which day rate an item is charged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRate {
    /// Advance-purchase rate
    Advance,

    /// Last-minute window rate
    Window,
}

impl fmt::Display for DayRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayRate::Advance => f.write_str("Advance"),
            DayRate::Window => f.write_str("Window"),
        }
    }
}

/// The rate used for an item's single-day tickets and its price.
///
/// Advance booking only helps when the resort publishes an advance price.
pub fn day_rate<'a>(item: &PortfolioItem<'a>) -> (DayRate, Money<'a, Currency>) {
    let resort = item.resort();

    match (item.booking(), resort.advance_price) {
        (Booking::Advance, Some(price)) => (DayRate::Advance, price),
        _ => (DayRate::Window, resort.window_price),
    }
}

/// How a pay-as-you-go cost was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    /// A consecutive-day package for exactly the planned days
    Package,

    /// Single-day tickets at the given rate
    Daily(DayRate),
}

/// Pay-as-you-go cost of an item and how it was priced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowQuote<'a> {
    /// Total ticket cost
    pub cost: Money<'a, Currency>,

    /// Pricing rule that produced the cost
    pub basis: PriceBasis,
}

/// Price an item with no pass of any kind.
///
/// A consecutive-day package priced for exactly the item's day count wins; otherwise the
/// item pays its day rate for each day.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the multiplication does not fit in a decimal amount.
pub fn window_quote<'a>(item: &PortfolioItem<'a>) -> Result<WindowQuote<'a>, PricingError> {
    let package = item
        .consecutive()
        .then(|| item.resort().multi_day_prices.get(item.days()))
        .flatten();

    if let Some(cost) = package {
        return Ok(WindowQuote {
            cost,
            basis: PriceBasis::Package,
        });
    }

    let (rate, per_day) = day_rate(item);

    Ok(WindowQuote {
        cost: times(per_day, item.days())?,
        basis: PriceBasis::Daily(rate),
    })
}

/// Cost of an item with no pass of any kind. See [`window_quote`].
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the multiplication does not fit in a decimal amount.
pub fn window_cost<'a>(item: &PortfolioItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
    Ok(window_quote(item)?.cost)
}

/// Multiply a price by a day count.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in a decimal amount.
pub fn times<'a>(price: Money<'a, Currency>, days: u32) -> Result<Money<'a, Currency>, PricingError> {
    let per_day = *price.amount();

    per_day
        .checked_mul(Decimal::from(days))
        .map(|amount| Money::from_decimal(amount, price.currency()))
        .ok_or(PricingError::Overflow { days, per_day })
}

/// Sum prices, starting from zero in `currency`.
///
/// # Errors
///
/// Returns a [`MoneyError`] on currency mismatch.
pub fn total<'a, I>(currency: &'a Currency, prices: I) -> Result<Money<'a, Currency>, MoneyError>
where
    I: IntoIterator<Item = Money<'a, Currency>>,
{
    prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))
}

/// Sum of the window costs of every item.
///
/// # Errors
///
/// Returns a [`PricingError`] if any item cannot be priced.
pub fn total_window_cost<'a, 'i, I>(
    currency: &'a Currency,
    items: I,
) -> Result<Money<'a, Currency>, PricingError>
where
    'a: 'i,
    I: IntoIterator<Item = &'i PortfolioItem<'a>>,
{
    items
        .into_iter()
        .try_fold(
            Money::from_minor(0, currency),
            |acc, item| -> Result<_, PricingError> { Ok(acc.add(window_cost(item)?)?) },
        )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::resorts::{MultiDayPrices, Resort};

    use super::*;

    fn whitefish() -> Resort<'static> {
        Resort::new("whitefish", "Whitefish", "Montana", Money::from_major(104, USD))
            .with_advance_price(Money::from_major(94, USD))
            .with_multi_day_prices(
                [(2, Money::from_major(195, USD)), (3, Money::from_major(275, USD))]
                    .into_iter()
                    .collect::<MultiDayPrices<'_>>(),
            )
    }

    #[test]
    fn window_booking_pays_window_rate() -> TestResult {
        let item = PortfolioItem::with_settings(
            Resort::new("local", "Local", "Custom", Money::from_major(100, USD)),
            3,
            false,
            Booking::Window,
        );

        assert_eq!(window_cost(&item)?, Money::from_major(300, USD));

        Ok(())
    }

    #[test]
    fn advance_booking_uses_advance_rate() -> TestResult {
        let item = PortfolioItem::with_settings(whitefish(), 3, false, Booking::Advance);

        assert_eq!(window_cost(&item)?, Money::from_major(282, USD));
        assert_eq!(day_rate(&item), (DayRate::Advance, Money::from_major(94, USD)));

        Ok(())
    }

    #[test]
    fn advance_booking_without_advance_price_falls_back_to_window() -> TestResult {
        let item = PortfolioItem::with_settings(
            Resort::new("local", "Local", "Custom", Money::from_major(80, USD)),
            2,
            false,
            Booking::Advance,
        );

        assert_eq!(window_cost(&item)?, Money::from_major(160, USD));
        assert_eq!(day_rate(&item).0, DayRate::Window);

        Ok(())
    }

    #[test]
    fn consecutive_package_beats_per_day_pricing() -> TestResult {
        let item = PortfolioItem::with_settings(whitefish(), 3, true, Booking::Advance);

        assert_eq!(
            window_quote(&item)?,
            WindowQuote {
                cost: Money::from_major(275, USD),
                basis: PriceBasis::Package,
            }
        );

        Ok(())
    }

    #[test]
    fn consecutive_without_matching_package_uses_day_rate() -> TestResult {
        let item = PortfolioItem::with_settings(whitefish(), 4, true, Booking::Window);

        assert_eq!(window_cost(&item)?, Money::from_major(416, USD));
        assert_eq!(window_quote(&item)?.basis, PriceBasis::Daily(DayRate::Window));

        Ok(())
    }

    #[test]
    fn package_ignored_when_days_not_consecutive() -> TestResult {
        let item = PortfolioItem::with_settings(whitefish(), 2, false, Booking::Window);

        assert_eq!(window_cost(&item)?, Money::from_major(208, USD));

        Ok(())
    }

    #[test]
    fn times_reports_overflow() {
        let result = times(Money::from_decimal(Decimal::MAX, USD), 2);

        assert_eq!(
            result,
            Err(PricingError::Overflow {
                days: 2,
                per_day: Decimal::MAX
            })
        );
    }

    #[test]
    fn times_stays_exact_beyond_minor_unit_range() -> TestResult {
        let per_day = Decimal::from(i64::MAX);

        let cost = times(Money::from_decimal(per_day, USD), 3)?;

        assert_eq!(*cost.amount(), per_day * Decimal::from(3));

        Ok(())
    }

    #[test]
    fn total_of_nothing_is_zero() -> TestResult {
        assert_eq!(total(USD, [])?, Money::from_minor(0, USD));

        Ok(())
    }
}
