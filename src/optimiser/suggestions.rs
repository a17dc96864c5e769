//! Suggestions

use crate::{alliances::AllianceSet, catalog::Catalog, portfolio::Portfolio, resorts::Resort};

/// Catalog resorts outside the portfolio that a purchased pass already covers and that
/// share a location keyword with the portfolio, in catalog order.
pub fn covered_nearby<'a>(
    catalog: &Catalog<'a>,
    portfolio: &Portfolio<'a>,
    purchased_passes: &AllianceSet,
) -> Vec<Resort<'a>> {
    if purchased_passes.is_empty() {
        return Vec::new();
    }

    let nearby = portfolio.location_tags();

    catalog
        .iter()
        .filter(|resort| {
            !portfolio.contains(&resort.id)
                && resort.alliances.intersects(purchased_passes)
                && resort.locations.intersects(&nearby)
        })
        .cloned()
        .collect()
}
