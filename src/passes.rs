//! Pass Products
//!
//! Pooled products sold by an alliance: an unlimited season pass and, optionally, a
//! bundle of days usable across the alliance's resorts.

use std::collections::BTreeMap;

use rusty_money::{Money, iso::Currency};

use crate::alliances::Alliance;

/// Day-count priced bundle, e.g. "Epic Day Pass" or "Ikon Session Pass".
#[derive(Debug, Clone, PartialEq)]
pub struct BundleTable<'a> {
    /// Product family name
    pub name: String,

    prices: BTreeMap<u32, Money<'a, Currency>>,
}

impl<'a> BundleTable<'a> {
    /// Create a bundle table from `(days, total price)` entries.
    pub fn new(
        name: impl Into<String>,
        prices: impl IntoIterator<Item = (u32, Money<'a, Currency>)>,
    ) -> Self {
        Self {
            name: name.into(),
            prices: prices.into_iter().collect(),
        }
    }

    /// Price covering `days` total days, or `None` when the product is not sold for that
    /// many days.
    pub fn price_for(&self, days: u32) -> Option<Money<'a, Currency>> {
        self.prices.get(&days).copied()
    }

    /// Smallest and largest day counts on sale.
    pub fn day_range(&self) -> Option<(u32, u32)> {
        let min = self.prices.keys().next()?;
        let max = self.prices.keys().next_back()?;

        Some((*min, *max))
    }

    /// Description used on a cost line, e.g. "4-Day Epic Day Pass".
    pub fn describe(&self, days: u32) -> String {
        format!("{days}-Day {}", self.name)
    }
}

/// Season pass and optional bundle for one alliance.
#[derive(Debug, Clone, PartialEq)]
pub struct AlliancePass<'a> {
    /// Alliance the products belong to
    pub alliance: Alliance,

    /// Season pass name, e.g. "Epic Local Pass"
    pub pass_name: String,

    /// Season pass price
    pub pass_price: Money<'a, Currency>,

    /// Optional multi-day bundle
    pub bundle: Option<BundleTable<'a>>,
}

impl<'a> AlliancePass<'a> {
    /// Create a pass product with no bundle.
    pub fn new(
        alliance: Alliance,
        pass_name: impl Into<String>,
        pass_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            alliance,
            pass_name: pass_name.into(),
            pass_price,
            bundle: None,
        }
    }

    /// Attach a bundle table.
    #[must_use]
    pub fn with_bundle(mut self, bundle: BundleTable<'a>) -> Self {
        self.bundle = Some(bundle);
        self
    }

    /// Bundle price for `days`, if any bundle covers that many days.
    pub fn bundle_price(&self, days: u32) -> Option<Money<'a, Currency>> {
        self.bundle.as_ref()?.price_for(days)
    }
}

/// The pooled products the optimiser may buy.
#[derive(Debug, Clone, PartialEq)]
pub struct PassProducts<'a> {
    /// Epic products
    pub epic: AlliancePass<'a>,

    /// Ikon products
    pub ikon: AlliancePass<'a>,
}

impl<'a> PassProducts<'a> {
    /// Iterate over every pooled product.
    pub fn iter(&self) -> impl Iterator<Item = &AlliancePass<'a>> {
        [&self.epic, &self.ikon].into_iter()
    }
}
