//! Result Cache
//!
//! Callers re-run the optimiser after every plan edit. [`OptimiserCache`] memoises
//! results by a structural fingerprint of the portfolio snapshot so unchanged plans are
//! not re-priced.

use std::{
    collections::VecDeque,
    hash::{Hash, Hasher},
};

use rustc_hash::{FxHashMap, FxHasher};
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    optimiser::{OptimizationResult, Optimiser, OptimiserConfig, OptimiserError},
    portfolio::Portfolio,
};

/// Structural hash of a portfolio snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanFingerprint(u64);

impl PlanFingerprint {
    /// Fingerprint every priced attribute of every item, in order.
    pub fn of(portfolio: &Portfolio<'_>) -> Self {
        let mut hasher = FxHasher::default();

        portfolio.currency().iso_alpha_code.hash(&mut hasher);
        portfolio.len().hash(&mut hasher);

        for item in portfolio.iter() {
            let resort = item.resort();

            resort.id.hash(&mut hasher);
            resort.name.hash(&mut hasher);
            resort.region.hash(&mut hasher);
            resort.alliances.hash(&mut hasher);
            resort.locations.hash(&mut hasher);

            hash_money(&mut hasher, Some(&resort.window_price));
            hash_money(&mut hasher, resort.advance_price.as_ref());
            hash_money(&mut hasher, resort.season_pass_price.as_ref());

            for (days, price) in resort.multi_day_prices.iter() {
                days.hash(&mut hasher);
                hash_money(&mut hasher, Some(price));
            }

            item.days().hash(&mut hasher);
            item.consecutive().hash(&mut hasher);
            item.booking().hash(&mut hasher);
        }

        Self(hasher.finish())
    }
}

fn hash_money(hasher: &mut FxHasher, money: Option<&Money<'_, Currency>>) {
    money
        .map(|money| (money.amount(), money.currency().iso_alpha_code))
        .hash(hasher);
}

#[derive(Debug)]
struct Entry<'a> {
    config: OptimiserConfig,
    snapshot: Portfolio<'a>,
    result: OptimizationResult<'a>,
}

/// Bounded memo of optimiser results, evicting the oldest entry first.
#[derive(Debug)]
pub struct OptimiserCache<'a> {
    capacity: usize,
    entries: FxHashMap<PlanFingerprint, Entry<'a>>,
    order: VecDeque<PlanFingerprint>,
    hits: u64,
    misses: u64,
}

impl<'a> OptimiserCache<'a> {
    /// Create a cache holding at most `capacity` results. A zero capacity caches nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FxHashMap::default(),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the memoised result for an equal snapshot, or optimise and remember it.
    ///
    /// A fingerprint match only counts as a hit when the stored snapshot and optimiser
    /// settings are equal to the current ones.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimiserError`] if the portfolio has to be optimised and fails.
    /// Failures are not cached.
    pub fn optimise(
        &mut self,
        optimiser: &Optimiser<'_, 'a>,
        portfolio: &Portfolio<'a>,
    ) -> Result<OptimizationResult<'a>, OptimiserError> {
        let fingerprint = PlanFingerprint::of(portfolio);

        if let Some(entry) = self.entries.get(&fingerprint)
            && entry.config == optimiser.config()
            && entry.snapshot == *portfolio
        {
            self.hits += 1;

            debug!(?fingerprint, "optimiser cache hit");

            return Ok(entry.result.clone());
        }

        self.misses += 1;

        let result = optimiser.optimise(portfolio)?;

        if self.capacity > 0 {
            self.insert(
                fingerprint,
                Entry {
                    config: optimiser.config(),
                    snapshot: portfolio.clone(),
                    result: result.clone(),
                },
            );
        }

        Ok(result)
    }

    fn insert(&mut self, fingerprint: PlanFingerprint, entry: Entry<'a>) {
        if self.entries.insert(fingerprint, entry).is_some() {
            return;
        }

        self.order.push_back(fingerprint);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no results.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that ran the optimiser.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every cached result.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
