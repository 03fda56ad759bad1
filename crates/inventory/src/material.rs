//! Bulk material carried by a movement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "Arena")]
    Sand,
    #[serde(rename = "Sal")]
    Salt,
    #[serde(rename = "Gravilla")]
    Gravel,
    #[serde(rename = "Tierra")]
    Soil,
    #[serde(rename = "Otro")]
    Other,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Sand,
        Material::Salt,
        Material::Gravel,
        Material::Soil,
        Material::Other,
    ];

    /// Label used in exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            Material::Sand => "Arena",
            Material::Salt => "Sal",
            Material::Gravel => "Gravilla",
            Material::Soil => "Tierra",
            Material::Other => "Otro",
        }
    }

    /// Exact (case-insensitive) label or English name.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|m| {
            m.label().eq_ignore_ascii_case(s) || format!("{m:?}").eq_ignore_ascii_case(s)
        })
    }

    /// Parse an imported cell. Blank means "not recorded"; unknown text is kept as `Other`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        if s.trim().is_empty() {
            return None;
        }
        Some(Self::from_label(s).unwrap_or(Material::Other))
    }
}

impl core::fmt::Display for Material {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
