//! Plans
//!
//! Saved trip plans in YAML. A plan names catalog resorts, or custom resorts by name,
//! with optional per-resort settings, alliance and price overrides.

use std::{fs, path::Path};

use rusty_money::Money;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    alliances::AllianceSet,
    catalog::{Catalog, CatalogError, data::parse_price},
    portfolio::{Booking, Portfolio, PortfolioError},
    resorts::ResortId,
};

/// Plan Loading Errors
#[derive(Debug, Error)]
pub enum PlanError {
    /// IO error reading the plan file
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price override
    #[error(transparent)]
    Price(#[from] CatalogError),

    /// The plan could not be applied to a portfolio
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    /// Resort id not in the catalog
    #[error("Resort not found in catalog: {0}")]
    UnknownResort(ResortId),

    /// An entry names both or neither of `id` and `custom`
    #[error("Plan entry {0} must have exactly one of `id` or `custom`")]
    InvalidEntry(usize),
}

/// One resort in a plan
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanEntry {
    /// Catalog resort id
    #[serde(default)]
    pub id: Option<ResortId>,

    /// Name of a custom resort
    #[serde(default)]
    pub custom: Option<String>,

    /// Days planned
    #[serde(default)]
    pub days: Option<u32>,

    /// Whether the days are consecutive
    #[serde(default)]
    pub consecutive: Option<bool>,

    /// When tickets are bought
    #[serde(default)]
    pub booking: Option<Booking>,

    /// Pass alliance override
    #[serde(default)]
    pub passes: Option<AllianceSet>,

    /// Window price override (e.g. "120 USD")
    #[serde(default)]
    pub window_price: Option<String>,

    /// Advance price override
    #[serde(default)]
    pub advance_price: Option<String>,

    /// Resort season pass price override
    #[serde(default)]
    pub season_pass_price: Option<String>,
}

/// Plan
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Resorts in plan order
    pub resorts: Vec<PlanEntry>,
}

impl Plan {
    /// Load a plan from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a plan from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PlanError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Build a portfolio in the catalog's currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if an entry names an unknown resort, is ambiguous, or
    /// carries an invalid setting or price.
    pub fn portfolio<'a>(&self, catalog: &Catalog<'a>) -> Result<Portfolio<'a>, PlanError> {
        let mut portfolio = Portfolio::new(catalog.currency());

        for (index, entry) in self.resorts.iter().enumerate() {
            let id = match (&entry.id, &entry.custom) {
                (Some(id), None) => {
                    let resort = catalog
                        .get(id)
                        .ok_or_else(|| PlanError::UnknownResort(id.clone()))?;

                    portfolio.add_resort(resort)?
                }
                (None, Some(name)) => portfolio.add_custom(name)?,
                _ => return Err(PlanError::InvalidEntry(index)),
            };

            entry.apply(&mut portfolio, &id)?;
        }

        Ok(portfolio)
    }
}

impl PlanEntry {
    fn apply(&self, portfolio: &mut Portfolio<'_>, id: &ResortId) -> Result<(), PlanError> {
        if let Some(days) = self.days {
            portfolio.set_days(id, days)?;
        }

        if let Some(consecutive) = self.consecutive {
            portfolio.set_consecutive(id, consecutive)?;
        }

        if let Some(booking) = self.booking {
            portfolio.set_booking(id, booking)?;
        }

        let window = self.window_price.as_deref().map(parse_price).transpose()?;
        let advance = self.advance_price.as_deref().map(parse_price).transpose()?;
        let season = self.season_pass_price.as_deref().map(parse_price).transpose()?;

        if window.is_none() && advance.is_none() && season.is_none() && self.passes.is_none() {
            return Ok(());
        }

        let passes = self.passes.clone();

        portfolio.edit(id, |resort| {
            if let Some(passes) = passes {
                resort.alliances = passes;
            }

            if let Some((minor, currency)) = window {
                resort.window_price = Money::from_minor(minor, currency);
            }

            if let Some((minor, currency)) = advance {
                resort.advance_price = Some(Money::from_minor(minor, currency));
            }

            if let Some((minor, currency)) = season {
                resort.season_pass_price = Some(Money::from_minor(minor, currency));
            }
        })?;

        Ok(())
    }
}
