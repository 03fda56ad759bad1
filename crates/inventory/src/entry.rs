//! Ledger entries: immutable records of applied movements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{EntryId, Location};
use stockyard_events::Event;

use crate::material::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "INGRESO")]
    Inbound,
    #[serde(rename = "SALIDA")]
    Outbound,
}

impl MovementKind {
    /// Label used in exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "INGRESO",
            MovementKind::Outbound => "SALIDA",
        }
    }

    /// Accepts the exported labels and common equivalents, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INGRESO" | "ENTRADA" | "INBOUND" | "IN" => Some(MovementKind::Inbound),
            "SALIDA" | "OUTBOUND" | "OUT" => Some(MovementKind::Outbound),
            _ => None,
        }
    }

    /// Kind implied by the sign of a signed quantity (zero counts as inbound).
    pub fn from_signed(quantity: f64) -> Self {
        if quantity < 0.0 {
            MovementKind::Outbound
        } else {
            MovementKind::Inbound
        }
    }

    /// Apply this kind's sign to a magnitude.
    pub fn signed(&self, quantity: f64) -> f64 {
        match self {
            MovementKind::Inbound => quantity.abs(),
            MovementKind::Outbound => -quantity.abs(),
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One applied movement and the balance it left behind.
///
/// `resulting_balance` is the location's balance right after this entry; it
/// is what restore-from-file relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    /// 1-based position in the history (append order).
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub location: Location,
    pub material: Option<Material>,
    /// Positive for inbound, negative for outbound.
    pub signed_quantity: f64,
    pub resulting_balance: f64,
}

impl LedgerEntry {
    pub fn quantity(&self) -> f64 {
        self.signed_quantity.abs()
    }
}

impl Event for LedgerEntry {
    fn event_type(&self) -> &'static str {
        match self.kind {
            MovementKind::Inbound => "stock.movement.inbound",
            MovementKind::Outbound => "stock.movement.outbound",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_parse_case_insensitively() {
        assert_eq!(MovementKind::parse("ingreso"), Some(MovementKind::Inbound));
        assert_eq!(MovementKind::parse(" SALIDA "), Some(MovementKind::Outbound));
        assert_eq!(MovementKind::parse("ajuste"), None);
    }

    #[test]
    fn sign_follows_kind() {
        assert_eq!(MovementKind::Outbound.signed(12.5), -12.5);
        assert_eq!(MovementKind::Outbound.signed(-12.5), -12.5);
        assert_eq!(MovementKind::Inbound.signed(-3.0), 3.0);
        assert_eq!(MovementKind::from_signed(-0.5), MovementKind::Outbound);
        assert_eq!(MovementKind::from_signed(0.0), MovementKind::Inbound);
    }

    #[test]
    fn entries_describe_themselves_as_events() {
        let entry = LedgerEntry {
            entry_id: EntryId::new(),
            sequence: 1,
            recorded_at: Utc::now(),
            kind: MovementKind::Outbound,
            location: Location::new("S1", "L1"),
            material: None,
            signed_quantity: -4.0,
            resulting_balance: 6.0,
        };
        assert_eq!(entry.event_type(), "stock.movement.outbound");
        assert_eq!(entry.quantity(), 4.0);
        assert_eq!(Event::location(&entry), &Location::new("S1", "L1"));
    }
}
