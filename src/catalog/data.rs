//! Catalog Records
//!
//! Serde shapes of the YAML catalog and their conversion into engine types.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{CAD, Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    alliances::{Alliance, AllianceSet},
    catalog::CatalogError,
    locations::LocationTags,
    passes::{AlliancePass, BundleTable, PassProducts},
    resorts::{MultiDayPrices, Resort, ResortId},
};

/// Top-level catalog file
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    /// ISO code every price must use
    pub currency: String,

    /// Alliance products
    pub passes: PassesRecord,

    /// Resorts in display order
    pub resorts: Vec<ResortRecord>,
}

/// Pooled products of the two alliances that sell them
#[derive(Debug, Deserialize)]
pub struct PassesRecord {
    /// Epic products
    pub epic: PassRecord,

    /// Ikon products
    pub ikon: PassRecord,
}

/// Season pass and optional bundle
#[derive(Debug, Deserialize)]
pub struct PassRecord {
    /// Season pass name
    pub name: String,

    /// Season pass price (e.g. "859 USD")
    pub price: String,

    /// Day-count bundle
    #[serde(default)]
    pub bundle: Option<BundleRecord>,
}

/// Bundle table
#[derive(Debug, Deserialize)]
pub struct BundleRecord {
    /// Product family name
    pub name: String,

    /// Day count -> total price
    pub prices: BTreeMap<u32, String>,
}

/// Resort entry
#[derive(Debug, Deserialize)]
pub struct ResortRecord {
    /// Unique id
    pub id: ResortId,

    /// Display name
    pub name: String,

    /// Region
    pub region: String,

    /// Alliance tags
    #[serde(default)]
    pub passes: AllianceSet,

    /// Window day price
    pub window_price: String,

    /// Advance day price
    #[serde(default)]
    pub advance_price: Option<String>,

    /// Resort season pass price
    #[serde(default)]
    pub season_pass_price: Option<String>,

    /// Consecutive-day packages
    #[serde(default)]
    pub multi_day_prices: BTreeMap<u32, String>,

    /// Location keywords
    #[serde(default)]
    pub locations: LocationTags,

    /// Website
    #[serde(default)]
    pub website: Option<String>,
}

impl ResortRecord {
    /// Convert into a resort priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed, priced in another currency, or a
    /// package is keyed by zero days.
    pub fn into_resort<'a>(self, currency: &'a Currency) -> Result<Resort<'a>, CatalogError> {
        let mut multi_day_prices = MultiDayPrices::new();

        for (days, price) in &self.multi_day_prices {
            if *days == 0 {
                return Err(CatalogError::InvalidDayCount {
                    product: self.name,
                    days: *days,
                });
            }

            multi_day_prices.insert(*days, money_in(price, currency)?);
        }

        let mut resort = Resort::new(
            self.id,
            self.name,
            self.region,
            money_in(&self.window_price, currency)?,
        )
        .with_alliances(self.passes)
        .with_multi_day_prices(multi_day_prices)
        .with_locations(self.locations);

        if let Some(price) = &self.advance_price {
            resort = resort.with_advance_price(money_in(price, currency)?);
        }

        if let Some(price) = &self.season_pass_price {
            resort = resort.with_season_pass_price(money_in(price, currency)?);
        }

        resort.website = self.website;

        Ok(resort)
    }
}

impl PassesRecord {
    /// Convert into pass products priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed or a bundle is keyed by zero days.
    pub fn into_products<'a>(self, currency: &'a Currency) -> Result<PassProducts<'a>, CatalogError> {
        Ok(PassProducts {
            epic: self.epic.into_pass(Alliance::Epic, currency)?,
            ikon: self.ikon.into_pass(Alliance::Ikon, currency)?,
        })
    }
}

impl PassRecord {
    fn into_pass<'a>(
        self,
        alliance: Alliance,
        currency: &'a Currency,
    ) -> Result<AlliancePass<'a>, CatalogError> {
        let pass = AlliancePass::new(alliance, self.name, money_in(&self.price, currency)?);

        let Some(bundle) = self.bundle else {
            return Ok(pass);
        };

        let prices = bundle
            .prices
            .iter()
            .map(|(days, price)| {
                if *days == 0 {
                    return Err(CatalogError::InvalidDayCount {
                        product: bundle.name.clone(),
                        days: *days,
                    });
                }

                Ok((*days, money_in(price, currency)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pass.with_bundle(BundleTable::new(bundle.name, prices)))
    }
}

/// Parse a price that must be in `currency`.
fn money_in<'a>(s: &str, currency: &'a Currency) -> Result<Money<'a, Currency>, CatalogError> {
    let (minor_units, parsed) = parse_price(s)?;

    if parsed != currency {
        return Err(CatalogError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            parsed.iso_alpha_code.to_string(),
        ));
    }

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a price string (e.g. "299 USD" or "94.50 USD") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the form "AMOUNT CURRENCY", the amount is
/// not a decimal number, or the currency code is not supported.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(code)?))
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for anything but GBP, USD, EUR and CAD.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "CAD" => Ok(CAD),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("299USD");

        assert!(matches!(result, Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("299 CHF");

        assert!(matches!(result, Err(CatalogError::UnknownCurrency(code)) if code == "CHF"));
    }

    #[test]
    fn parse_price_accepts_whole_and_fractional_amounts() -> TestResult {
        assert_eq!(parse_price("299 USD")?, (29_900, USD));
        assert_eq!(parse_price("94.50 CAD")?, (9_450, CAD));

        Ok(())
    }

    #[test]
    fn foreign_price_is_rejected() {
        let result = money_in("100 EUR", USD);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "EUR"
        ));
    }

    #[test]
    fn resort_record_converts_optional_prices() -> TestResult {
        let record: ResortRecord = serde_norway::from_str(
            "id: whitefish\nname: Whitefish\nregion: Montana\nwindow_price: 104 USD\nadvance_price: 94 USD\nmulti_day_prices:\n  3: 275 USD\nlocations: [Kalispell, Montana]\n",
        )?;

        let resort = record.into_resort(USD)?;

        assert_eq!(resort.advance_price, Some(Money::from_major(94, USD)));
        assert_eq!(resort.season_pass_price, None);
        assert_eq!(resort.multi_day_prices.get(3), Some(Money::from_major(275, USD)));
        assert!(resort.alliances.is_empty());
        assert!(resort.locations.contains("Kalispell"));

        Ok(())
    }

    #[test]
    fn zero_day_package_is_rejected() -> TestResult {
        let record: ResortRecord = serde_norway::from_str(
            "id: x\nname: X\nregion: Y\nwindow_price: 10 USD\nmulti_day_prices:\n  0: 5 USD\n",
        )?;

        let result = record.into_resort(USD);

        assert!(matches!(result, Err(CatalogError::InvalidDayCount { days: 0, .. })));

        Ok(())
    }
}
