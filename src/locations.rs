//! Location Tags
//!
//! Free-form place keywords ("Denver", "Lake Tahoe", ...) used to find resorts near the
//! ones already in a plan.

use std::{cmp::Ordering, ops::BitOr};

use serde::Deserialize;
use smallvec::SmallVec;

/// A sorted, de-duplicated set of location keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct LocationTags {
    tags: SmallVec<[String; 5]>,
}

impl LocationTags {
    /// Create a location tag set from owned strings.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 5]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create a location tag set from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(ToString::to_string).collect())
    }

    /// Create an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the two sets share at least one keyword.
    pub fn intersects(&self, other: &Self) -> bool {
        // Both sides are sorted, so walk them together.
        let mut left = self.tags.iter();
        let mut right = other.tags.iter();
        let mut left_tag = left.next();
        let mut right_tag = right.next();

        while let (Some(left_tag_ref), Some(right_tag_ref)) = (left_tag, right_tag) {
            match left_tag_ref.cmp(right_tag_ref) {
                Ordering::Equal => return true,
                Ordering::Less => left_tag = left.next(),
                Ordering::Greater => right_tag = right.next(),
            }
        }

        false
    }

    /// Check if the set contains a keyword (exact match).
    pub fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|existing| existing.as_str().cmp(tag))
            .is_ok()
    }

    /// Returns true if any keyword contains `needle` (already lowercased).
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
    }

    /// Iterate over the keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

impl From<Vec<String>> for LocationTags {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags.into_iter().collect())
    }
}

impl BitOr<&LocationTags> for LocationTags {
    type Output = Self;

    fn bitor(self, rhs: &LocationTags) -> Self::Output {
        let capacity = self.tags.len().saturating_add(rhs.tags.len());
        let mut result = SmallVec::with_capacity(capacity);
        let mut left = self.tags.into_iter().peekable();
        let mut right = rhs.tags.iter().peekable();

        // Merge of two sorted sequences.
        while let (Some(left_tag), Some(right_tag)) = (left.peek(), right.peek()) {
            match left_tag.as_str().cmp(right_tag.as_str()) {
                Ordering::Less => {
                    if let Some(tag) = left.next() {
                        result.push(tag);
                    }
                }
                Ordering::Greater => {
                    if let Some(tag) = right.next() {
                        result.push(tag.clone());
                    }
                }
                Ordering::Equal => {
                    if let Some(tag) = left.next() {
                        result.push(tag);
                    }
                    right.next();
                }
            }
        }

        result.extend(left);
        result.extend(right.cloned());

        Self { tags: result }
    }
}
