//! The fixed, addressable space of storage locations (site × lot).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use stockyard_core::{Location, LotId, SiteId, StockError, StockResult, LOCATION_SEPARATOR};

use crate::setup::SetupError;

/// One site and the lots it holds, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLayout {
    pub site: SiteId,
    pub lots: Vec<LotId>,
}

/// Static grid of locations, known at startup and never resized at runtime.
///
/// Enumeration order is site-major, then lot, both in the order they were
/// configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationGrid {
    sites: Vec<SiteLayout>,
}

impl LocationGrid {
    /// Build a grid, rejecting blank labels, empty sites and duplicates.
    ///
    /// Labels may not contain the composite separator; exported keys must
    /// parse back to the same site and lot.
    pub fn new(sites: Vec<SiteLayout>) -> Result<Self, SetupError> {
        if sites.is_empty() {
            return Err(SetupError::EmptyGrid);
        }

        let mut seen_sites = HashSet::new();
        for layout in &sites {
            check_label(layout.site.as_str())?;
            if !seen_sites.insert(layout.site.clone()) {
                return Err(SetupError::DuplicateSite(layout.site.to_string()));
            }
            if layout.lots.is_empty() {
                return Err(SetupError::SiteWithoutLots(layout.site.to_string()));
            }

            let mut seen_lots = HashSet::new();
            for lot in &layout.lots {
                check_label(lot.as_str())?;
                if !seen_lots.insert(lot) {
                    return Err(SetupError::DuplicateLot {
                        site: layout.site.to_string(),
                        lot: lot.to_string(),
                    });
                }
            }
        }

        Ok(Self { sites })
    }

    /// Grid where every site carries the same set of lots.
    pub fn uniform<S, L>(sites: S, lots: L) -> Result<Self, SetupError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let lots: Vec<LotId> = lots.into_iter().map(LotId::new).collect();
        let layouts = sites
            .into_iter()
            .map(|site| SiteLayout {
                site: SiteId::new(site),
                lots: lots.clone(),
            })
            .collect();
        Self::new(layouts)
    }

    /// The default yard: sites `S1..S7`, each with lots `L1..L6`.
    pub fn standard() -> Self {
        let lots: Vec<LotId> = (1..=6).map(|n| LotId::new(format!("L{n}"))).collect();
        let sites = (1..=7)
            .map(|n| SiteLayout {
                site: SiteId::new(format!("S{n}")),
                lots: lots.clone(),
            })
            .collect();
        Self { sites }
    }

    pub fn sites(&self) -> &[SiteLayout] {
        &self.sites
    }

    /// True iff both site and lot fall within the configured ranges.
    pub fn is_valid(&self, site: &str, lot: &str) -> bool {
        self.sites
            .iter()
            .find(|layout| layout.site.as_str() == site)
            .is_some_and(|layout| layout.lots.iter().any(|l| l.as_str() == lot))
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.is_valid(location.site.as_str(), location.lot.as_str())
    }

    /// Resolve a site/lot pair into a `Location`, failing outside the grid.
    pub fn location(&self, site: &str, lot: &str) -> StockResult<Location> {
        let (site, lot) = (site.trim(), lot.trim());
        if self.is_valid(site, lot) {
            Ok(Location::new(site, lot))
        } else {
            Err(StockError::invalid_location(site, lot))
        }
    }

    /// Fails with `InvalidLocation` unless the location belongs to the grid.
    pub fn ensure(&self, location: &Location) -> StockResult<()> {
        if self.contains(location) {
            Ok(())
        } else {
            Err(StockError::invalid_location(
                location.site.as_str(),
                location.lot.as_str(),
            ))
        }
    }

    /// Every location, site-major then lot.
    pub fn all_locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.sites.iter().flat_map(|layout| {
            layout
                .lots
                .iter()
                .map(move |lot| Location::new(layout.site.clone(), lot.clone()))
        })
    }

    pub fn len(&self) -> usize {
        self.sites.iter().map(|layout| layout.lots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A label must be non-blank and survive the composite form: no separator
/// inside it, and no trailing `" -"` that would fuse with the separator.
fn check_label(label: &str) -> Result<(), SetupError> {
    if label.is_empty() {
        return Err(SetupError::BlankLabel);
    }
    if label.contains(LOCATION_SEPARATOR) || label.ends_with(LOCATION_SEPARATOR.trim_end()) {
        return Err(SetupError::SeparatorInLabel(label.to_string()));
    }
    Ok(())
}

impl Default for LocationGrid {
    fn default() -> Self {
        Self::standard()
    }
}
