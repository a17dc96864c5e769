//! Portfolio
//!
//! The caller-owned plan: an ordered, single-currency collection of resorts with unique ids.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    locations::LocationTags,
    resorts::{Resort, ResortId},
};

pub mod items;

pub use items::{Booking, DEFAULT_DAYS, PortfolioItem};

/// Region assigned to user-defined resorts.
pub const CUSTOM_REGION: &str = "Custom";

/// Default window price of a custom resort, in major units.
pub const CUSTOM_WINDOW_PRICE: i64 = 150;

/// Default advance price of a custom resort, in major units.
pub const CUSTOM_ADVANCE_PRICE: i64 = 125;

/// Errors related to portfolio construction or edits.
#[derive(Debug, Error, PartialEq)]
pub enum PortfolioError {
    /// An item carries a price in another currency (item id, item currency, portfolio currency).
    #[error("Item {0} has currency {1}, but portfolio has currency {2}")]
    CurrencyMismatch(ResortId, &'static str, &'static str),

    /// Two items share an id.
    #[error("Item {0} is already in the portfolio")]
    DuplicateId(ResortId),

    /// Day counts must be positive.
    #[error("Item {0} must have at least one day")]
    ZeroDays(ResortId),

    /// The item was not found in the portfolio.
    #[error("Item {0} not found")]
    ItemNotFound(ResortId),

    /// An edit tried to change the item's id.
    #[error("Item {0} cannot be renamed to {1}")]
    IdChanged(ResortId, ResortId),
}

/// Portfolio
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio<'a> {
    items: Vec<PortfolioItem<'a>>,
    currency: &'a Currency,
}

impl<'a> Portfolio<'a> {
    /// Create an empty portfolio priced in `currency`.
    #[must_use]
    pub fn new(currency: &'a Currency) -> Self {
        Portfolio {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a portfolio from items.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if an item has a foreign currency, a zero day count, or
    /// an id already used by an earlier item.
    pub fn with_items(
        items: impl IntoIterator<Item = PortfolioItem<'a>>,
        currency: &'a Currency,
    ) -> Result<Self, PortfolioError> {
        let mut portfolio = Portfolio::new(currency);

        for item in items {
            portfolio.push(item)?;
        }

        Ok(portfolio)
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if the item fails validation.
    pub fn push(&mut self, item: PortfolioItem<'a>) -> Result<ResortId, PortfolioError> {
        let id = item.id().clone();

        if self.contains(&id) {
            return Err(PortfolioError::DuplicateId(id));
        }

        self.validate(&item)?;

        self.items.push(item);

        Ok(id)
    }

    /// Add a copy of a catalog resort with the default plan settings.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if the resort is already present or priced in another
    /// currency.
    pub fn add_resort(&mut self, resort: &Resort<'a>) -> Result<ResortId, PortfolioError> {
        self.push(PortfolioItem::new(resort.clone()))
    }

    /// Add a user-defined resort with placeholder pricing and the default plan settings.
    ///
    /// The generated id is `custom-N` with the lowest unused `N`.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if the item fails validation.
    pub fn add_custom(&mut self, name: &str) -> Result<ResortId, PortfolioError> {
        let id = self.next_custom_id();

        let resort = Resort::new(
            id,
            name.trim(),
            CUSTOM_REGION,
            Money::from_major(CUSTOM_WINDOW_PRICE, self.currency),
        )
        .with_advance_price(Money::from_major(CUSTOM_ADVANCE_PRICE, self.currency));

        self.push(PortfolioItem::new(resort))
    }

    /// Remove an item, returning it.
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::ItemNotFound` if no item has the id.
    pub fn remove(&mut self, id: &ResortId) -> Result<PortfolioItem<'a>, PortfolioError> {
        let pos = self.position(id)?;

        Ok(self.items.remove(pos))
    }

    /// Set the number of days planned at a resort.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if the item is missing or `days` is zero.
    pub fn set_days(&mut self, id: &ResortId, days: u32) -> Result<(), PortfolioError> {
        if days == 0 {
            return Err(PortfolioError::ZeroDays(id.clone()));
        }

        self.item_mut(id)?.set_days(days);

        Ok(())
    }

    /// Mark a resort's days as consecutive (or not).
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::ItemNotFound` if no item has the id.
    pub fn set_consecutive(&mut self, id: &ResortId, consecutive: bool) -> Result<(), PortfolioError> {
        self.item_mut(id)?.set_consecutive(consecutive);

        Ok(())
    }

    /// Set when tickets for a resort are bought.
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::ItemNotFound` if no item has the id.
    pub fn set_booking(&mut self, id: &ResortId, booking: Booking) -> Result<(), PortfolioError> {
        self.item_mut(id)?.set_booking(booking);

        Ok(())
    }

    /// Edit an item's copied resort attributes (prices, alliances, locations, ...).
    ///
    /// The catalog is unaffected. The edit is rolled back if it changes the id or
    /// introduces a price in another currency.
    ///
    /// # Errors
    ///
    /// Returns a `PortfolioError` if the item is missing or the edited item is invalid.
    pub fn edit(
        &mut self,
        id: &ResortId,
        edit: impl FnOnce(&mut Resort<'a>),
    ) -> Result<(), PortfolioError> {
        let currency = self.currency;
        let item = self.item_mut(id)?;
        let original = item.resort().clone();

        edit(item.resort_mut());

        let result = if item.id() == id {
            check_currency(item, currency)
        } else {
            Err(PortfolioError::IdChanged(id.clone(), item.id().clone()))
        };

        if result.is_err() {
            *item.resort_mut() = original;
        }

        result
    }

    /// Copy of the portfolio with one more day at the given resort.
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::ItemNotFound` if no item has the id.
    pub fn with_extra_day(&self, id: &ResortId) -> Result<Self, PortfolioError> {
        let mut copy = self.clone();
        let item = copy.item_mut(id)?;

        item.set_days(item.days().saturating_add(1));

        Ok(copy)
    }

    /// Get an item by id.
    pub fn get(&self, id: &ResortId) -> Option<&PortfolioItem<'a>> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Check whether an item with the id exists.
    pub fn contains(&self, id: &ResortId) -> bool {
        self.get(id).is_some()
    }

    /// Union of the location keywords of every item.
    pub fn location_tags(&self) -> LocationTags {
        self.items
            .iter()
            .fold(LocationTags::empty(), |tags, item| tags | &item.resort().locations)
    }

    /// Iterate over the items in plan order.
    pub fn iter(&self) -> impl Iterator<Item = &PortfolioItem<'a>> {
        self.items.iter()
    }

    /// Get the number of items in the portfolio.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the portfolio is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the portfolio.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn validate(&self, item: &PortfolioItem<'a>) -> Result<(), PortfolioError> {
        if item.days() == 0 {
            return Err(PortfolioError::ZeroDays(item.id().clone()));
        }

        check_currency(item, self.currency)
    }

    fn position(&self, id: &ResortId) -> Result<usize, PortfolioError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| PortfolioError::ItemNotFound(id.clone()))
    }

    fn item_mut(&mut self, id: &ResortId) -> Result<&mut PortfolioItem<'a>, PortfolioError> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| PortfolioError::ItemNotFound(id.clone()))
    }

    fn next_custom_id(&self) -> ResortId {
        (1_u32..)
            .map(|n| ResortId::new(format!("custom-{n}")))
            .find(|id| !self.contains(id))
            .unwrap_or_else(|| ResortId::new("custom"))
    }
}

fn check_currency(item: &PortfolioItem<'_>, currency: &Currency) -> Result<(), PortfolioError> {
    match item.resort().foreign_currency(currency) {
        Some(foreign) => Err(PortfolioError::CurrencyMismatch(
            item.id().clone(),
            foreign.iso_alpha_code,
            currency.iso_alpha_code,
        )),
        None => Ok(()),
    }
}
