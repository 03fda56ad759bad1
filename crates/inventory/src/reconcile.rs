//! Rebuilding balances and history from an exported movement table.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockyard_core::{EntryId, Location};

use crate::entry::{LedgerEntry, MovementKind};
use crate::grid::LocationGrid;
use crate::material::Material;

/// One imported row, as read from either table shape.
///
/// Only `location` and `resulting_balance` are required; a row from a
/// balance table carries its balance as the quantity too.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRecord {
    pub location: Location,
    pub kind: Option<MovementKind>,
    pub signed_quantity: Option<f64>,
    pub resulting_balance: f64,
    pub recorded_at: Option<DateTime<Utc>>,
    pub material: Option<Material>,
}

impl MovementRecord {
    /// A `(site, lot, quantity)` row from a balance table.
    pub fn balance(location: Location, quantity: f64) -> Self {
        Self {
            location,
            kind: None,
            signed_quantity: Some(quantity),
            resulting_balance: quantity,
            recorded_at: None,
            material: None,
        }
    }
}

/// Outcome of a reconciliation, before it is swapped into an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub balances: HashMap<Location, f64>,
    /// Canonical (oldest-first) history.
    pub entries: Vec<LedgerEntry>,
    pub restored: usize,
    pub skipped: Vec<Location>,
    pub negative: Vec<Location>,
}

/// Summary handed back to the caller after a restore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoreReport {
    pub records: usize,
    pub restored_locations: usize,
    pub skipped_locations: Vec<Location>,
    pub negative_locations: Vec<Location>,
}

/// First-occurrence-wins reconciliation.
///
/// `records` are in export order (newest first), so the first row seen for a
/// location carries its current balance; later rows for the same location are
/// ignored for balances. Grid locations without a row reset to 0.0. Rows for
/// locations outside the grid are skipped for balances but kept in history.
///
/// Every row becomes a history entry. The sequence is reversed so the
/// restored history is oldest-first like one built by appends, with
/// non-decreasing timestamps; `restored_at` is used only when no row has one.
pub fn reconcile(
    grid: &LocationGrid,
    records: &[MovementRecord],
    restored_at: DateTime<Utc>,
) -> Reconciliation {
    let mut balances: HashMap<Location, f64> =
        grid.all_locations().map(|location| (location, 0.0)).collect();
    let mut resolved: HashSet<&Location> = HashSet::new();
    let mut skipped: Vec<Location> = Vec::new();

    for record in records {
        if !grid.contains(&record.location) {
            if !skipped.contains(&record.location) {
                tracing::warn!(
                    location = %record.location,
                    "import names a location outside the grid; skipping its balance"
                );
                skipped.push(record.location.clone());
            }
            continue;
        }
        if resolved.insert(&record.location) {
            balances.insert(record.location.clone(), record.resulting_balance);
        }
    }

    let negative: Vec<Location> = grid
        .all_locations()
        .filter(|location| balances.get(location).is_some_and(|b| *b < 0.0))
        .collect();
    for location in &negative {
        tracing::warn!(%location, "restored balance is negative");
    }

    // Rows without a usable timestamp take the previous entry's time, and the
    // whole sequence is clamped so it never goes backwards.
    let mut clock = records
        .iter()
        .rev()
        .find_map(|record| record.recorded_at)
        .unwrap_or(restored_at);
    let entries = records
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, record)| {
            clock = record.recorded_at.map_or(clock, |at| at.max(clock));
            to_entry(idx as u64 + 1, record, clock)
        })
        .collect();

    Reconciliation {
        balances,
        entries,
        restored: resolved.len(),
        skipped,
        negative,
    }
}

fn to_entry(sequence: u64, record: &MovementRecord, recorded_at: DateTime<Utc>) -> LedgerEntry {
    let raw = record.signed_quantity.unwrap_or(0.0);
    let (kind, signed_quantity) = match record.kind {
        Some(kind) => (kind, kind.signed(raw)),
        None => (MovementKind::from_signed(raw), raw),
    };

    LedgerEntry {
        entry_id: EntryId::new(),
        sequence,
        recorded_at,
        kind,
        location: record.location.clone(),
        material: record.material,
        signed_quantity,
        resulting_balance: record.resulting_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: &str, lot: &str, balance: f64) -> MovementRecord {
        MovementRecord {
            location: Location::new(site, lot),
            kind: Some(MovementKind::Inbound),
            signed_quantity: Some(1.0),
            resulting_balance: balance,
            recorded_at: None,
            material: None,
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let grid = LocationGrid::standard();
        let records = vec![record("S1", "L1", 12.0), record("S1", "L1", 30.0)];

        let rec = reconcile(&grid, &records, Utc::now());
        assert_eq!(rec.balances[&Location::new("S1", "L1")], 12.0);
        assert_eq!(rec.restored, 1);
    }

    #[test]
    fn missing_locations_reset_and_unknown_are_skipped() {
        let grid = LocationGrid::standard();
        let records = vec![
            record("S9", "L1", 5.0),
            record("S2", "L3", 8.0),
            record("S9", "L1", 6.0),
        ];

        let rec = reconcile(&grid, &records, Utc::now());
        assert_eq!(rec.balances.len(), grid.len());
        assert_eq!(rec.balances[&Location::new("S2", "L3")], 8.0);
        assert_eq!(rec.balances[&Location::new("S1", "L1")], 0.0);
        assert!(!rec.balances.contains_key(&Location::new("S9", "L1")));
        assert_eq!(rec.skipped, vec![Location::new("S9", "L1")]);
        // Unknown locations still land in history.
        assert_eq!(rec.entries.len(), 3);
    }

    #[test]
    fn history_is_reversed_into_canonical_order() {
        let grid = LocationGrid::standard();
        let records = vec![record("S1", "L1", 12.0), record("S1", "L2", 30.0)];

        let rec = reconcile(&grid, &records, Utc::now());
        let seq: Vec<(u64, f64)> = rec
            .entries
            .iter()
            .map(|e| (e.sequence, e.resulting_balance))
            .collect();
        assert_eq!(seq, vec![(1, 30.0), (2, 12.0)]);
    }

    #[test]
    fn negative_balances_are_flagged_not_rejected() {
        let grid = LocationGrid::standard();
        let records = vec![record("S3", "L2", -4.5)];

        let rec = reconcile(&grid, &records, Utc::now());
        assert_eq!(rec.balances[&Location::new("S3", "L2")], -4.5);
        assert_eq!(rec.negative, vec![Location::new("S3", "L2")]);
    }

    #[test]
    fn entry_sign_follows_kind_or_quantity() {
        let grid = LocationGrid::standard();
        let mut outbound = record("S1", "L1", 10.0);
        outbound.kind = Some(MovementKind::Outbound);
        outbound.signed_quantity = Some(4.0);
        let balance_row = MovementRecord::balance(Location::new("S1", "L2"), -2.0);

        let rec = reconcile(&grid, &[outbound, balance_row], Utc::now());
        assert_eq!(rec.entries[0].kind, MovementKind::Outbound);
        assert_eq!(rec.entries[0].signed_quantity, -2.0);
        assert_eq!(rec.entries[1].kind, MovementKind::Outbound);
        assert_eq!(rec.entries[1].signed_quantity, -4.0);
    }

    #[test]
    fn restored_timestamps_never_go_backwards() {
        let grid = LocationGrid::standard();
        let at = |s: &str| s.parse::<DateTime<Utc>>().unwrap();
        let stamped = |balance: f64, when: Option<&str>| {
            let mut r = record("S1", "L1", balance);
            r.recorded_at = when.map(at);
            r
        };
        // Newest first, as exported; the oldest row has no date.
        let records = vec![
            stamped(10.0, None),
            stamped(9.0, Some("2026-03-05T08:00:00Z")),
            stamped(8.0, None),
            stamped(7.0, Some("2026-03-02T10:00:00Z")),
            stamped(6.0, None),
        ];

        let rec = reconcile(&grid, &records, at("2026-10-19T00:00:00Z"));
        let times: Vec<DateTime<Utc>> = rec.entries.iter().map(|e| e.recorded_at).collect();
        assert_eq!(
            times,
            vec![
                at("2026-03-02T10:00:00Z"),
                at("2026-03-02T10:00:00Z"),
                at("2026-03-02T10:00:00Z"),
                at("2026-03-05T08:00:00Z"),
                at("2026-03-05T08:00:00Z"),
            ]
        );
        assert!(times.windows(2).all(|w| w[0] <= w[1]));

        // An older date after a newer one is clamped forward.
        let swapped = vec![
            stamped(2.0, Some("2026-03-01T00:00:00Z")),
            stamped(1.0, Some("2026-03-04T00:00:00Z")),
        ];
        let rec = reconcile(&grid, &swapped, Utc::now());
        assert_eq!(rec.entries[1].recorded_at, at("2026-03-04T00:00:00Z"));
    }

    #[test]
    fn rows_without_any_timestamp_use_the_restore_time() {
        let grid = LocationGrid::standard();
        let restored_at = Utc::now();
        let rec = reconcile(&grid, &[record("S1", "L1", 1.0)], restored_at);
        assert_eq!(rec.entries[0].recorded_at, restored_at);
    }
}
