//! Strongly-typed identifiers used across the ledger.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StockError;
use crate::value_object::ValueObject;

/// Separator between site and lot in the composite location form.
pub const LOCATION_SEPARATOR: &str = " - ";

/// Identifier of a storage site (first level of the grid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

/// Identifier of a lot within a site (second level of the grid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(String);

macro_rules! impl_label_newtype {
    ($t:ty) => {
        impl $t {
            /// Create an identifier; surrounding whitespace is trimmed.
            pub fn new(label: impl AsRef<str>) -> Self {
                Self(label.as_ref().trim().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

impl_label_newtype!(SiteId);
impl_label_newtype!(LotId);

/// A `(site, lot)` address.
///
/// A `Location` is only an address: whether it belongs to the configured grid
/// is decided by `LocationGrid`, so imported history can still name locations
/// the grid no longer knows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub site: SiteId,
    pub lot: LotId,
}

impl ValueObject for Location {}

impl Location {
    pub fn new(site: impl Into<SiteId>, lot: impl Into<LotId>) -> Self {
        Self {
            site: site.into(),
            lot: lot.into(),
        }
    }

    /// Composite form, e.g. `"S1 - L1"`.
    ///
    /// A location with no lot (an imported key that did not parse) renders as
    /// the bare site label, so it reads back as the same key.
    pub fn composite(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.lot.as_str().is_empty() {
            f.write_str(self.site.as_str())
        } else {
            write!(f, "{}{}{}", self.site, LOCATION_SEPARATOR, self.lot)
        }
    }
}

impl FromStr for Location {
    type Err = StockError;

    /// Parse the composite form. The site is everything before the first
    /// separator; both halves are trimmed and must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (site, lot) = s
            .split_once(LOCATION_SEPARATOR)
            .ok_or_else(|| StockError::invalid_location(s.trim(), ""))?;
        let (site, lot) = (site.trim(), lot.trim());
        if site.is_empty() || lot.is_empty() {
            return Err(StockError::invalid_location(site, lot));
        }
        Ok(Self::new(site, lot))
    }
}

/// Identifier of a ledger entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EntryId {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s).map_err(|e| StockError::malformed(format!("EntryId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_round_trips() {
        let loc = Location::new("S1", "L4");
        assert_eq!(loc.composite(), "S1 - L4");
        assert_eq!("S1 - L4".parse::<Location>().unwrap(), loc);
    }

    #[test]
    fn composite_parse_trims_and_splits_on_first_separator() {
        let loc: Location = "  Muelle Norte - Lote - B ".parse().unwrap();
        assert_eq!(loc.site.as_str(), "Muelle Norte");
        assert_eq!(loc.lot.as_str(), "Lote - B");
    }

    #[test]
    fn composite_without_separator_is_invalid_location() {
        let err = "S1L1".parse::<Location>().unwrap_err();
        assert!(matches!(err, StockError::InvalidLocation { .. }));
    }

    #[test]
    fn owned_labels_convert_like_borrowed_ones() {
        let site = String::from(" S3 ");
        let lot = String::from("L2");
        assert_eq!(Location::new(site, lot), Location::new("S3", "L2"));
    }

    #[test]
    fn lotless_key_renders_as_bare_label() {
        let key = Location::new("Patio viejo", "");
        assert_eq!(key.composite(), "Patio viejo");
        assert!(key.composite().parse::<Location>().is_err());
    }

    #[test]
    fn location_serializes_as_site_and_lot() {
        let json = serde_json::to_value(Location::new("S2", "L3")).unwrap();
        assert_eq!(json, serde_json::json!({ "site": "S2", "lot": "L3" }));
    }
}
