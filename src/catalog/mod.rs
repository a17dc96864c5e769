//! Catalog
//!
//! Read-only reference data: the resort list and the alliance pass products, loaded once
//! and shared by reference with the optimiser.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    catalog::data::{CatalogFile, parse_currency},
    passes::PassProducts,
    portfolio::Portfolio,
    resorts::{Resort, ResortId},
};

pub mod data;

/// Catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.yml");

new_key_type! {
    /// Resort Key
    pub struct ResortKey;
}

/// Catalog Loading Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A price is not in the catalog currency
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two resorts share an id
    #[error("Duplicate resort id: {0}")]
    DuplicateResort(ResortId),

    /// A bundle or package keyed by an impossible day count
    #[error("{product} has a price for {days} days")]
    InvalidDayCount {
        /// Product or resort name
        product: String,
        /// Offending day count
        days: u32,
    },
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    resorts: SlotMap<ResortKey, Resort<'a>>,

    /// Resort id -> `SlotMap` key
    keys: FxHashMap<ResortId, ResortKey>,

    /// Keys in file order
    order: Vec<ResortKey>,

    passes: PassProducts<'a>,

    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// The catalog embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUNDLED_CATALOG)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid or in another
    /// currency, a day count is zero, or a resort id is repeated.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;
        let currency = parse_currency(&file.currency)?;

        let passes = file.passes.into_products(currency)?;

        let mut resorts = SlotMap::with_capacity_and_key(file.resorts.len());
        let mut keys = FxHashMap::default();
        let mut order = Vec::with_capacity(file.resorts.len());

        for record in file.resorts {
            if keys.contains_key(&record.id) {
                return Err(CatalogError::DuplicateResort(record.id));
            }

            let resort = record.into_resort(currency)?;
            let id = resort.id.clone();
            let key = resorts.insert(resort);

            keys.insert(id, key);
            order.push(key);
        }

        Ok(Catalog {
            resorts,
            keys,
            order,
            passes,
            currency,
        })
    }

    /// Look up a resort by id.
    pub fn get(&self, id: &ResortId) -> Option<&Resort<'a>> {
        self.keys.get(id).and_then(|key| self.resorts.get(*key))
    }

    /// Iterate over resorts in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Resort<'a>> {
        self.order.iter().filter_map(|key| self.resorts.get(*key))
    }

    /// Resorts whose name, region or a location keyword contains `query`
    /// (case-insensitive), skipping those already in `exclude`. At most `limit` results,
    /// in catalog order. A blank query matches nothing.
    pub fn search<'c>(
        &'c self,
        query: &str,
        exclude: &Portfolio<'_>,
        limit: usize,
    ) -> impl Iterator<Item = &'c Resort<'a>> {
        let needle = query.trim().to_lowercase();

        self.iter()
            .filter(move |resort| {
                !needle.is_empty()
                    && !exclude.contains(&resort.id)
                    && (resort.name.to_lowercase().contains(&needle)
                        || resort.region.to_lowercase().contains(&needle)
                        || resort.locations.matches_lowercase(&needle))
            })
            .take(limit)
    }

    /// Alliance pass products.
    pub fn passes(&self) -> &PassProducts<'a> {
        &self.passes
    }

    /// Currency every catalog price is in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Number of resorts.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no resorts.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
