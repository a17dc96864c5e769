//! Portfolio Items

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::resorts::{Resort, ResortId};

/// Default number of days for a newly added resort.
pub const DEFAULT_DAYS: u32 = 3;

/// When the lift tickets are bought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Booking {
    /// Bought well ahead of the visit, at the advance rate when one exists.
    #[default]
    Advance,

    /// Bought last minute at the window rate.
    Window,
}

/// A resort in a plan, with its own copy of the resort's pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioItem<'a> {
    resort: Resort<'a>,
    days: u32,
    consecutive: bool,
    booking: Booking,
}

impl<'a> PortfolioItem<'a> {
    /// Creates an item with the default plan settings: three non-consecutive days
    /// booked in advance.
    pub fn new(resort: Resort<'a>) -> Self {
        Self {
            resort,
            days: DEFAULT_DAYS,
            consecutive: false,
            booking: Booking::Advance,
        }
    }

    /// Creates an item with explicit settings.
    ///
    /// Day counts are validated when the item is added to a
    /// [`Portfolio`](crate::portfolio::Portfolio).
    pub fn with_settings(resort: Resort<'a>, days: u32, consecutive: bool, booking: Booking) -> Self {
        Self {
            resort,
            days,
            consecutive,
            booking,
        }
    }

    /// Returns the item id
    pub fn id(&self) -> &ResortId {
        &self.resort.id
    }

    /// Returns the item's resort attributes
    pub fn resort(&self) -> &Resort<'a> {
        &self.resort
    }

    pub(crate) fn resort_mut(&mut self) -> &mut Resort<'a> {
        &mut self.resort
    }

    /// Returns the resort name
    pub fn name(&self) -> &str {
        &self.resort.name
    }

    /// Number of planned days
    pub fn days(&self) -> u32 {
        self.days
    }

    pub(crate) fn set_days(&mut self, days: u32) {
        self.days = days;
    }

    /// Whether the days are consecutive
    pub fn consecutive(&self) -> bool {
        self.consecutive
    }

    pub(crate) fn set_consecutive(&mut self, consecutive: bool) {
        self.consecutive = consecutive;
    }

    /// Booking timing
    pub fn booking(&self) -> Booking {
        self.booking
    }

    pub(crate) fn set_booking(&mut self, booking: Booking) {
        self.booking = booking;
    }

    /// Season pass price of this resort's own pass, if it sells one.
    pub fn season_pass_price(&self) -> Option<Money<'a, Currency>> {
        self.resort.season_pass_price
    }
}
