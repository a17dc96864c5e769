//! Resorts

use std::{collections::BTreeMap, fmt};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{alliances::AllianceSet, locations::LocationTags};

/// Unique resort identifier, either a catalog id (`vail`) or a generated custom id (`custom-1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct ResortId(String);

impl ResortId {
    /// Create a new resort id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResortId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Total prices for buying N consecutive days at a single resort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiDayPrices<'a> {
    prices: BTreeMap<u32, Money<'a, Currency>>,
}

impl<'a> MultiDayPrices<'a> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    /// Set the total price for `days` consecutive days.
    pub fn insert(&mut self, days: u32, price: Money<'a, Currency>) {
        self.prices.insert(days, price);
    }

    /// Total price for exactly `days` consecutive days, if offered.
    pub fn get(&self, days: u32) -> Option<Money<'a, Currency>> {
        self.prices.get(&days).copied()
    }

    /// Iterate over `(days, price)` entries in ascending day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Money<'a, Currency>)> {
        self.prices.iter().map(|(days, price)| (*days, price))
    }
}

impl<'a> FromIterator<(u32, Money<'a, Currency>)> for MultiDayPrices<'a> {
    fn from_iter<I: IntoIterator<Item = (u32, Money<'a, Currency>)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Reference resort record.
///
/// Catalog resorts are immutable; a portfolio keeps its own copy so prices can be
/// overridden per plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Resort<'a> {
    /// Unique id
    pub id: ResortId,

    /// Display name
    pub name: String,

    /// Region (state, province, ...)
    pub region: String,

    /// Pass alliances the resort belongs to
    pub alliances: AllianceSet,

    /// Last-minute single-day ticket price
    pub window_price: Money<'a, Currency>,

    /// Single-day price when bought well ahead of the visit
    pub advance_price: Option<Money<'a, Currency>>,

    /// Price of the resort's own season pass
    pub season_pass_price: Option<Money<'a, Currency>>,

    /// Consecutive-day package prices
    pub multi_day_prices: MultiDayPrices<'a>,

    /// Nearby places, used for suggestions
    pub locations: LocationTags,

    /// Official website, display only
    pub website: Option<String>,
}

impl<'a> Resort<'a> {
    /// Create a resort with a window price and no optional attributes.
    pub fn new(
        id: impl Into<ResortId>,
        name: impl Into<String>,
        region: impl Into<String>,
        window_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region: region.into(),
            alliances: AllianceSet::empty(),
            window_price,
            advance_price: None,
            season_pass_price: None,
            multi_day_prices: MultiDayPrices::new(),
            locations: LocationTags::empty(),
            website: None,
        }
    }

    /// Set the pass alliances.
    #[must_use]
    pub fn with_alliances(mut self, alliances: AllianceSet) -> Self {
        self.alliances = alliances;
        self
    }

    /// Set the advance-purchase day price.
    #[must_use]
    pub fn with_advance_price(mut self, price: Money<'a, Currency>) -> Self {
        self.advance_price = Some(price);
        self
    }

    /// Set the resort's own season pass price.
    #[must_use]
    pub fn with_season_pass_price(mut self, price: Money<'a, Currency>) -> Self {
        self.season_pass_price = Some(price);
        self
    }

    /// Set the consecutive-day package prices.
    #[must_use]
    pub fn with_multi_day_prices(mut self, prices: MultiDayPrices<'a>) -> Self {
        self.multi_day_prices = prices;
        self
    }

    /// Set the location keywords.
    #[must_use]
    pub fn with_locations(mut self, locations: LocationTags) -> Self {
        self.locations = locations;
        self
    }

    /// All money amounts carried by the resort.
    pub fn prices(&self) -> impl Iterator<Item = &Money<'a, Currency>> {
        std::iter::once(&self.window_price)
            .chain(self.advance_price.as_ref())
            .chain(self.season_pass_price.as_ref())
            .chain(self.multi_day_prices.iter().map(|(_days, price)| price))
    }

    /// Returns the first price not in `currency`, if any.
    pub fn foreign_currency(&self, currency: &Currency) -> Option<&'a Currency> {
        self.prices()
            .map(Money::currency)
            .find(|price_currency| *price_currency != currency)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CAD, USD};

    use super::*;

    #[test]
    fn multi_day_lookup_is_exact() {
        let prices: MultiDayPrices<'_> = [
            (2, Money::from_minor(19_500, USD)),
            (3, Money::from_minor(27_500, USD)),
        ]
        .into_iter()
        .collect();

        assert_eq!(prices.get(3), Some(Money::from_minor(27_500, USD)));
        assert_eq!(prices.get(4), None);
    }

    #[test]
    fn foreign_currency_finds_mismatched_price() {
        let resort = Resort::new("whistler", "Whistler", "BC", Money::from_minor(23_000, USD))
            .with_season_pass_price(Money::from_minor(120_000, CAD));

        assert_eq!(resort.foreign_currency(USD), Some(CAD));
        assert_eq!(
            Resort::new("vail", "Vail", "Colorado", Money::from_minor(29_900, USD))
                .foreign_currency(USD),
            None
        );
    }
}
