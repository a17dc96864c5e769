//! Clusters
//!
//! Partition a portfolio into the Epic group, the Ikon group, and the independent
//! remainder. Resorts on both alliances are resolved by a [`DualAffiliationPolicy`].

use std::fmt;

use clap::ValueEnum;
use smallvec::SmallVec;

use crate::{alliances::Alliance, portfolio::Portfolio};

/// Largest number of dual-affiliated items searched exhaustively.
pub const MAX_DUAL_SEARCH: usize = 10;

/// Indexes of portfolio items.
pub type ItemIndexes = SmallVec<[usize; 8]>;

/// An affinity group evaluated jointly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cluster {
    /// Resorts on the Epic pass
    Epic,

    /// Resorts on the Ikon pass
    Ikon,

    /// Everything else
    Independent,
}

impl Cluster {
    /// The alliance whose pooled products apply, if any.
    pub fn alliance(self) -> Option<Alliance> {
        match self {
            Cluster::Epic => Some(Alliance::Epic),
            Cluster::Ikon => Some(Alliance::Ikon),
            Cluster::Independent => None,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Epic => f.write_str("Epic"),
            Cluster::Ikon => f.write_str("Ikon"),
            Cluster::Independent => f.write_str("Independent"),
        }
    }
}

/// How to treat resorts affiliated with both Epic and Ikon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum DualAffiliationPolicy {
    /// Try every Epic/Ikon assignment and keep the cheapest.
    #[default]
    CheapestAssignment,

    /// Always cover them from the Epic group.
    PreferEpic,

    /// Always cover them from the Ikon group.
    PreferIkon,

    /// Price them in both groups. Double counts their cost.
    CountInBoth,
}

/// Portfolio items split by affiliation before dual items are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Items tagged Epic only
    pub epic: ItemIndexes,

    /// Items tagged Ikon only
    pub ikon: ItemIndexes,

    /// Items tagged both Epic and Ikon
    pub dual: ItemIndexes,

    /// Items tagged with neither
    pub independent: ItemIndexes,
}

/// Portfolio items assigned to the three clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Items priced in the Epic group
    pub epic: ItemIndexes,

    /// Items priced in the Ikon group
    pub ikon: ItemIndexes,

    /// Items priced individually
    pub independent: ItemIndexes,
}

impl Partition {
    /// Items assigned to a cluster.
    pub fn members(&self, cluster: Cluster) -> &[usize] {
        match cluster {
            Cluster::Epic => &self.epic,
            Cluster::Ikon => &self.ikon,
            Cluster::Independent => &self.independent,
        }
    }
}

/// Split a portfolio by pass affiliation.
pub fn classify(portfolio: &Portfolio<'_>) -> Classification {
    let mut classification = Classification::default();

    for (idx, item) in portfolio.iter().enumerate() {
        let alliances = &item.resort().alliances;

        match (
            alliances.contains(&Alliance::Epic),
            alliances.contains(&Alliance::Ikon),
        ) {
            (true, true) => classification.dual.push(idx),
            (true, false) => classification.epic.push(idx),
            (false, true) => classification.ikon.push(idx),
            (false, false) => classification.independent.push(idx),
        }
    }

    classification
}

impl Classification {
    /// Candidate partitions under a policy, in preference order.
    ///
    /// Every candidate covers each item exactly once, except under
    /// [`DualAffiliationPolicy::CountInBoth`]. The cheapest-assignment search yields
    /// `2^k` candidates for `k` dual items, ordered by how few go to Ikon and then by
    /// keeping the earliest items in Epic; past [`MAX_DUAL_SEARCH`] dual items it yields
    /// only the Epic-first partition.
    pub fn partitions(&self, policy: DualAffiliationPolicy) -> Vec<Partition> {
        match policy {
            DualAffiliationPolicy::PreferEpic => vec![self.assign(|_| Cluster::Epic)],
            DualAffiliationPolicy::PreferIkon => vec![self.assign(|_| Cluster::Ikon)],
            DualAffiliationPolicy::CountInBoth => {
                let mut partition = self.assign(|_| Cluster::Epic);

                partition.ikon.extend(self.dual.iter().copied());
                partition.ikon.sort_unstable();

                vec![partition]
            }
            DualAffiliationPolicy::CheapestAssignment if self.dual.len() > MAX_DUAL_SEARCH => {
                vec![self.assign(|_| Cluster::Epic)]
            }
            DualAffiliationPolicy::CheapestAssignment => {
                // Bit set means Ikon, bit 0 is the first dual item. Reversed bits put
                // masks that move later items to Ikon first.
                let mut masks: Vec<u32> = (0_u32..1 << self.dual.len()).collect();

                masks.sort_by_key(|mask| (mask.count_ones(), mask.reverse_bits()));

                masks
                    .into_iter()
                    .map(|mask| {
                        self.assign(|position| {
                            if mask & (1 << position) == 0 {
                                Cluster::Epic
                            } else {
                                Cluster::Ikon
                            }
                        })
                    })
                    .collect()
            }
        }
    }

    /// Whether the cheapest-assignment search had to fall back to Epic-first.
    pub fn search_truncated(&self, policy: DualAffiliationPolicy) -> bool {
        policy == DualAffiliationPolicy::CheapestAssignment && self.dual.len() > MAX_DUAL_SEARCH
    }

    fn assign(&self, choose: impl Fn(usize) -> Cluster) -> Partition {
        let mut partition = Partition {
            epic: self.epic.clone(),
            ikon: self.ikon.clone(),
            independent: self.independent.clone(),
        };

        for (position, &idx) in self.dual.iter().enumerate() {
            match choose(position) {
                Cluster::Epic => partition.epic.push(idx),
                Cluster::Ikon => partition.ikon.push(idx),
                Cluster::Independent => partition.independent.push(idx),
            }
        }

        // Keep plan order within each group.
        partition.epic.sort_unstable();
        partition.ikon.sort_unstable();

        partition
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        alliances::AllianceSet,
        portfolio::{Portfolio, PortfolioItem},
        resorts::Resort,
    };

    use super::*;

    fn portfolio(tags: &[(&str, &[&str])]) -> Result<Portfolio<'static>, crate::portfolio::PortfolioError> {
        Portfolio::with_items(
            tags.iter().map(|(id, alliances)| {
                PortfolioItem::new(
                    Resort::new(*id, *id, "Test", Money::from_major(100, USD))
                        .with_alliances(AllianceSet::from_strs(alliances)),
                )
            }),
            USD,
        )
    }

    #[test]
    fn classify_splits_by_alliance() -> TestResult {
        let portfolio = portfolio(&[
            ("vail", &["Epic"]),
            ("alta", &["Ikon", "Mountain Collective"]),
            ("both", &["Epic", "Ikon"]),
            ("china-peak", &["Indy"]),
            ("custom-1", &[]),
        ])?;

        let classification = classify(&portfolio);

        assert_eq!(classification.epic.as_slice(), &[0]);
        assert_eq!(classification.ikon.as_slice(), &[1]);
        assert_eq!(classification.dual.as_slice(), &[2]);
        assert_eq!(classification.independent.as_slice(), &[3, 4]);

        Ok(())
    }

    #[test]
    fn priority_policies_assign_dual_items_once() -> TestResult {
        let portfolio = portfolio(&[("both", &["Epic", "Ikon"]), ("vail", &["Epic"])])?;
        let classification = classify(&portfolio);

        let epic_first = classification.partitions(DualAffiliationPolicy::PreferEpic);
        let ikon_first = classification.partitions(DualAffiliationPolicy::PreferIkon);

        assert_eq!(epic_first.len(), 1);
        assert_eq!(epic_first.first().map(|p| p.epic.to_vec()), Some(vec![0, 1]));
        assert_eq!(ikon_first.first().map(|p| p.ikon.to_vec()), Some(vec![0]));
        assert_eq!(ikon_first.first().map(|p| p.epic.to_vec()), Some(vec![1]));

        Ok(())
    }

    #[test]
    fn count_in_both_duplicates_dual_items() -> TestResult {
        let portfolio = portfolio(&[("both", &["Epic", "Ikon"])])?;

        let partitions = classify(&portfolio).partitions(DualAffiliationPolicy::CountInBoth);
        let partition = partitions.first().ok_or("missing partition")?;

        assert_eq!(partition.epic.as_slice(), &[0]);
        assert_eq!(partition.ikon.as_slice(), &[0]);

        Ok(())
    }

    #[test]
    fn cheapest_assignment_enumerates_every_split() -> TestResult {
        let portfolio = portfolio(&[("a", &["Epic", "Ikon"]), ("b", &["Epic", "Ikon"])])?;

        let partitions = classify(&portfolio).partitions(DualAffiliationPolicy::CheapestAssignment);

        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions.first().map(|p| p.epic.to_vec()), Some(vec![0, 1]));
        assert_eq!(partitions.last().map(|p| p.ikon.to_vec()), Some(vec![0, 1]));

        let single_moves: Vec<Vec<usize>> =
            partitions.iter().skip(1).take(2).map(|p| p.ikon.to_vec()).collect();

        assert_eq!(single_moves, vec![vec![1], vec![0]]);

        Ok(())
    }

    #[test]
    fn cheapest_assignment_is_bounded() -> TestResult {
        let ids: Vec<String> = (0..=MAX_DUAL_SEARCH).map(|n| format!("dual-{n}")).collect();
        let tags: Vec<(&str, &[&str])> = ids
            .iter()
            .map(|id| (id.as_str(), &["Epic", "Ikon"][..]))
            .collect();
        let portfolio = portfolio(&tags)?;
        let classification = classify(&portfolio);

        let partitions = classification.partitions(DualAffiliationPolicy::CheapestAssignment);

        assert!(classification.search_truncated(DualAffiliationPolicy::CheapestAssignment));
        assert_eq!(partitions.len(), 1);

        Ok(())
    }
}
