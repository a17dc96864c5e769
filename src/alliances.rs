//! Alliances
//!
//! Pass affiliation tags. The two alliances that sell pooled products (Epic and Ikon) are
//! first-class so cluster logic can match on them exhaustively; everything else is kept as
//! a known extension or a free-form [`Alliance::Other`] tag.

use std::fmt;

use serde::Deserialize;
use smallvec::SmallVec;

/// A pass alliance a resort may belong to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Alliance {
    /// Vail Resorts' Epic Pass family.
    Epic,

    /// Alterra's Ikon Pass family.
    Ikon,

    /// Mountain Collective.
    MountainCollective,

    /// Indy Pass.
    Indy,

    /// Any other affiliation, kept verbatim.
    Other(String),
}

impl Alliance {
    /// Returns the display name of the alliance.
    pub fn name(&self) -> &str {
        match self {
            Alliance::Epic => "Epic",
            Alliance::Ikon => "Ikon",
            Alliance::MountainCollective => "Mountain Collective",
            Alliance::Indy => "Indy",
            Alliance::Other(name) => name,
        }
    }
}

impl From<&str> for Alliance {
    fn from(tag: &str) -> Self {
        match tag {
            "Epic" => Alliance::Epic,
            "Ikon" => Alliance::Ikon,
            "Mountain Collective" => Alliance::MountainCollective,
            "Indy" => Alliance::Indy,
            other => Alliance::Other(other.to_string()),
        }
    }
}

impl From<String> for Alliance {
    fn from(tag: String) -> Self {
        Alliance::from(tag.as_str())
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sorted, de-duplicated set of alliances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Vec<Alliance>")]
pub struct AllianceSet {
    alliances: SmallVec<[Alliance; 3]>,
}

impl AllianceSet {
    /// Create an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a set from tag strings.
    pub fn from_strs(tags: &[&str]) -> Self {
        tags.iter().copied().map(Alliance::from).collect()
    }

    /// Check whether the set contains an alliance.
    pub fn contains(&self, alliance: &Alliance) -> bool {
        self.alliances.binary_search(alliance).is_ok()
    }

    /// Check whether the set shares at least one alliance with `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.alliances.iter().any(|alliance| other.contains(alliance))
    }

    /// Add an alliance, keeping the set sorted.
    pub fn insert(&mut self, alliance: Alliance) {
        if let Err(pos) = self.alliances.binary_search(&alliance) {
            self.alliances.insert(pos, alliance);
        }
    }

    /// Iterate over the alliances in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Alliance> {
        self.alliances.iter()
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }

    /// Number of alliances in the set.
    pub fn len(&self) -> usize {
        self.alliances.len()
    }
}

impl FromIterator<Alliance> for AllianceSet {
    fn from_iter<I: IntoIterator<Item = Alliance>>(iter: I) -> Self {
        let mut alliances: SmallVec<[Alliance; 3]> = iter.into_iter().collect();

        alliances.sort();
        alliances.dedup();

        Self { alliances }
    }
}

impl From<Vec<Alliance>> for AllianceSet {
    fn from(alliances: Vec<Alliance>) -> Self {
        alliances.into_iter().collect()
    }
}
