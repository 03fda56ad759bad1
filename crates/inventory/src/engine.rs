//! The ledger engine: sole mutator of per-location balances.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{Aggregate, EntryId, Location, StockError, StockResult};
use stockyard_events::{Command, Event};

use crate::entry::{LedgerEntry, MovementKind};
use crate::grid::LocationGrid;
use crate::history::HistoryStore;
use crate::material::Material;
use crate::reconcile::{reconcile, MovementRecord, RestoreReport};
use crate::summary::{LocationSnapshot, SiteSubtotal, StockSummary};
use crate::tier::{StatusTier, TierPolicy};

/// Command: RecordInbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInbound {
    pub location: Location,
    pub quantity: f64,
    pub material: Option<Material>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordOutbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutbound {
    pub location: Location,
    pub quantity: f64,
    pub material: Option<Material>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StockCommand {
    RecordInbound(RecordInbound),
    RecordOutbound(RecordOutbound),
}

impl Command for StockCommand {
    fn target_location(&self) -> &Location {
        match self {
            StockCommand::RecordInbound(cmd) => &cmd.location,
            StockCommand::RecordOutbound(cmd) => &cmd.location,
        }
    }
}

/// Round to 2 decimal places, ties to even.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Holds the current balance of every grid location plus the history of
/// movements that produced them.
///
/// Balances start at 0.0. Through `record_outbound` a balance never goes
/// negative; a negative balance can only come from `restore_from` and is
/// tolerated at read time.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    grid: LocationGrid,
    tiers: TierPolicy,
    balances: HashMap<Location, f64>,
    history: HistoryStore,
    version: u64,
}

impl LedgerEngine {
    pub fn new(grid: LocationGrid, tiers: TierPolicy) -> Self {
        let balances = zeroed(&grid);
        Self {
            grid,
            tiers,
            balances,
            history: HistoryStore::new(),
            version: 0,
        }
    }

    pub fn grid(&self) -> &LocationGrid {
        &self.grid
    }

    pub fn tiers(&self) -> &TierPolicy {
        &self.tiers
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Decide and apply one command; nothing changes when it is rejected.
    pub fn execute(&mut self, command: &StockCommand) -> StockResult<LedgerEntry> {
        let entries = match self.handle(command) {
            Ok(entries) => entries,
            Err(err) => {
                if let StockError::InsufficientStock {
                    location,
                    available,
                    requested,
                } = &err
                {
                    tracing::warn!(%location, available, requested, "outbound rejected: insufficient stock");
                }
                return Err(err);
            }
        };

        for entry in &entries {
            self.apply(entry);
        }

        entries
            .into_iter()
            .last()
            .ok_or_else(|| StockError::invalid_quantity("command produced no entry"))
    }

    pub fn record_inbound(&mut self, location: &Location, quantity: f64) -> StockResult<LedgerEntry> {
        self.execute(&StockCommand::RecordInbound(RecordInbound {
            location: location.clone(),
            quantity,
            material: None,
            occurred_at: Utc::now(),
        }))
    }

    pub fn record_outbound(&mut self, location: &Location, quantity: f64) -> StockResult<LedgerEntry> {
        self.execute(&StockCommand::RecordOutbound(RecordOutbound {
            location: location.clone(),
            quantity,
            material: None,
            occurred_at: Utc::now(),
        }))
    }

    /// Outbound of `unit_count` loads of `unit_weight` each.
    ///
    /// The product is rounded to 2 decimals before the sufficiency check and
    /// that rounded amount is what gets recorded.
    pub fn outbound_from_units(
        &mut self,
        location: &Location,
        unit_weight: f64,
        unit_count: u32,
    ) -> StockResult<LedgerEntry> {
        let quantity = units_to_quantity(unit_weight, unit_count)?;
        self.record_outbound(location, quantity)
    }

    /// Current balance of a grid location.
    pub fn current_balance(&self, location: &Location) -> StockResult<f64> {
        self.grid.ensure(location)?;
        Ok(self.balance_of(location))
    }

    /// Sum over every grid location.
    pub fn total_stock(&self) -> f64 {
        self.grid
            .all_locations()
            .map(|location| self.balance_of(&location))
            .sum()
    }

    pub fn status_tier(&self, balance: f64) -> StatusTier {
        self.tiers.classify(balance)
    }

    /// Grid locations whose balance is below zero (only reachable via restore).
    pub fn negative_locations(&self) -> Vec<Location> {
        self.grid
            .all_locations()
            .filter(|location| self.balance_of(location) < 0.0)
            .collect()
    }

    /// Grouped view: one subtotal per site, in grid order.
    pub fn summary(&self) -> StockSummary {
        let sites: Vec<SiteSubtotal> = self
            .grid
            .sites()
            .iter()
            .map(|layout| {
                let locations: Vec<LocationSnapshot> = layout
                    .lots
                    .iter()
                    .map(|lot| {
                        let location = Location::new(layout.site.clone(), lot.clone());
                        let balance = self.balance_of(&location);
                        LocationSnapshot {
                            tier: self.tiers.classify(balance),
                            negative: balance < 0.0,
                            location,
                            balance,
                        }
                    })
                    .collect();
                SiteSubtotal {
                    site: layout.site.clone(),
                    total: locations.iter().map(|s| s.balance).sum(),
                    locations,
                }
            })
            .collect();

        StockSummary {
            total: sites.iter().map(|s| s.total).sum(),
            negative: self.negative_locations(),
            sites,
        }
    }

    /// Replace balances and history from imported records (newest first).
    ///
    /// The result is computed in full before anything is swapped in.
    pub fn restore_from(&mut self, records: &[MovementRecord], restored_at: DateTime<Utc>) -> RestoreReport {
        let rec = reconcile(&self.grid, records, restored_at);

        self.balances = rec.balances;
        self.version = rec.entries.len() as u64;
        self.history.replace(rec.entries);

        tracing::info!(
            records = records.len(),
            restored = rec.restored,
            skipped = rec.skipped.len(),
            negative = rec.negative.len(),
            "ledger restored from import"
        );

        RestoreReport {
            records: records.len(),
            restored_locations: rec.restored,
            skipped_locations: rec.skipped,
            negative_locations: rec.negative,
        }
    }

    /// All balances back to 0.0 and an empty history.
    pub fn reset(&mut self) {
        self.balances = zeroed(&self.grid);
        self.history.clear();
        self.version = 0;
        tracing::info!("ledger reset");
    }

    fn balance_of(&self, location: &Location) -> f64 {
        self.balances.get(location).copied().unwrap_or(0.0)
    }

    fn decide(
        &self,
        kind: MovementKind,
        location: &Location,
        quantity: f64,
        material: Option<Material>,
        occurred_at: DateTime<Utc>,
    ) -> StockResult<LedgerEntry> {
        let quantity = validate_quantity(quantity)?;
        let available = self.balance_of(location);

        let resulting_balance = match kind {
            MovementKind::Inbound => available + quantity,
            MovementKind::Outbound => {
                if available < quantity {
                    return Err(StockError::InsufficientStock {
                        location: location.clone(),
                        available,
                        requested: quantity,
                    });
                }
                available - quantity
            }
        };

        Ok(LedgerEntry {
            entry_id: EntryId::new(),
            sequence: self.history.next_sequence(),
            recorded_at: self.history.monotonic_timestamp(occurred_at),
            kind,
            location: location.clone(),
            material,
            signed_quantity: kind.signed(quantity),
            resulting_balance,
        })
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(LocationGrid::standard(), TierPolicy::default())
    }
}

impl Aggregate for LedgerEngine {
    type Command = StockCommand;
    type Event = LedgerEntry;
    type Error = StockError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.balances
            .insert(event.location.clone(), event.resulting_balance);
        self.history.append(event.clone());
        tracing::debug!(
            event = event.event_type(),
            schema = event.version(),
            location = %event.location(),
            at = %event.occurred_at(),
            balance = event.resulting_balance,
            "movement applied"
        );

        // Deterministic version tracking: +1 per applied entry.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.grid.ensure(command.target_location())?;

        let entry = match command {
            StockCommand::RecordInbound(cmd) => self.decide(
                MovementKind::Inbound,
                &cmd.location,
                cmd.quantity,
                cmd.material,
                cmd.occurred_at,
            )?,
            StockCommand::RecordOutbound(cmd) => self.decide(
                MovementKind::Outbound,
                &cmd.location,
                cmd.quantity,
                cmd.material,
                cmd.occurred_at,
            )?,
        };
        Ok(vec![entry])
    }
}

/// Rounded outbound amount for `unit_count` loads of `unit_weight`.
pub fn units_to_quantity(unit_weight: f64, unit_count: u32) -> StockResult<f64> {
    if !unit_weight.is_finite() || unit_weight < 0.0 {
        return Err(StockError::invalid_quantity(format!(
            "unit weight must be a non-negative number, got {unit_weight}"
        )));
    }
    Ok(round_to_cents(unit_weight * f64::from(unit_count)))
}

fn validate_quantity(quantity: f64) -> StockResult<f64> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(StockError::invalid_quantity(format!(
            "quantity must be a non-negative number, got {quantity}"
        )));
    }
    // Normalizes -0.0.
    Ok(quantity.abs())
}

fn zeroed(grid: &LocationGrid) -> HashMap<Location, f64> {
    grid.all_locations().map(|location| (location, 0.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> LedgerEngine {
        LedgerEngine::default()
    }

    fn s1(lot: &str) -> Location {
        Location::new("S1", lot)
    }

    #[test]
    fn all_locations_start_at_zero() {
        let engine = engine();
        for location in engine.grid().all_locations() {
            assert_eq!(engine.current_balance(&location).unwrap(), 0.0);
        }
        assert_eq!(engine.total_stock(), 0.0);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn inbound_appends_entry_with_resulting_balance() {
        let mut engine = engine();
        let entry = engine.record_inbound(&s1("L1"), 50.0).unwrap();

        assert_eq!(entry.kind, MovementKind::Inbound);
        assert_eq!(entry.signed_quantity, 50.0);
        assert_eq!(entry.resulting_balance, 50.0);
        assert_eq!(entry.sequence, 1);
        assert_eq!(engine.current_balance(&s1("L1")).unwrap(), 50.0);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.version(), 1);
    }

    #[test]
    fn bucket_scenario_from_front_loader() {
        let mut engine = engine();
        engine.record_inbound(&s1("L1"), 50.0).unwrap();

        let entry = engine.outbound_from_units(&s1("L1"), 3.5, 10).unwrap();
        assert_eq!(entry.signed_quantity, -35.0);
        assert_eq!(engine.current_balance(&s1("L1")).unwrap(), 15.0);

        let err = engine.outbound_from_units(&s1("L1"), 3.5, 10).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                location: s1("L1"),
                available: 15.0,
                requested: 35.0,
            }
        );
        assert_eq!(engine.current_balance(&s1("L1")).unwrap(), 15.0);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn outbound_of_entire_balance_drives_it_to_zero() {
        let mut engine = engine();
        engine.record_inbound(&s1("L2"), 12.34).unwrap();
        let entry = engine.record_outbound(&s1("L2"), 12.34).unwrap();
        assert_eq!(entry.resulting_balance, 0.0);
        assert_eq!(engine.current_balance(&s1("L2")).unwrap(), 0.0);
    }

    #[test]
    fn unit_product_is_rounded_before_the_check() {
        let mut engine = engine();
        engine.record_inbound(&s1("L3"), 1.0).unwrap();
        // 3 * 0.333333 = 0.999999 rounds to 1.00, which fits exactly.
        let entry = engine.outbound_from_units(&s1("L3"), 0.333333, 3).unwrap();
        assert_eq!(entry.signed_quantity, -1.0);
        assert_eq!(engine.current_balance(&s1("L3")).unwrap(), 0.0);
    }

    #[test]
    fn sufficiency_compares_exact_balances() {
        let mut engine = engine();
        engine.record_inbound(&s1("L3"), 0.3).unwrap();
        engine.record_outbound(&s1("L3"), 0.1).unwrap();

        // 0.3 - 0.1 is just under 0.2 in binary floating point.
        let left = engine.current_balance(&s1("L3")).unwrap();
        assert!(left < 0.2);
        assert!(matches!(
            engine.record_outbound(&s1("L3"), 0.2),
            Err(StockError::InsufficientStock { .. })
        ));
        // Taking exactly what is left still drives the balance to zero.
        engine.record_outbound(&s1("L3"), left).unwrap();
        assert_eq!(engine.current_balance(&s1("L3")).unwrap(), 0.0);
    }

    #[test]
    fn invalid_inputs_are_rejected_before_mutation() {
        let mut engine = engine();
        assert!(matches!(
            engine.record_inbound(&Location::new("S9", "L1"), 1.0),
            Err(StockError::InvalidLocation { .. })
        ));
        assert!(matches!(
            engine.record_inbound(&s1("L1"), -1.0),
            Err(StockError::InvalidQuantity(_))
        ));
        assert!(matches!(
            engine.record_outbound(&s1("L1"), f64::NAN),
            Err(StockError::InvalidQuantity(_))
        ));
        assert!(matches!(
            engine.outbound_from_units(&s1("L1"), -3.5, 2),
            Err(StockError::InvalidQuantity(_))
        ));
        assert!(matches!(
            engine.current_balance(&Location::new("S1", "L0")),
            Err(StockError::InvalidLocation { .. })
        ));
        assert!(engine.history().is_empty());
        assert_eq!(engine.version(), 0);
    }

    #[test]
    fn material_is_recorded_on_the_entry() {
        let mut engine = engine();
        let entry = engine
            .execute(&StockCommand::RecordInbound(RecordInbound {
                location: s1("L1"),
                quantity: 8.0,
                material: Some(Material::Salt),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert_eq!(entry.material, Some(Material::Salt));
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut engine = engine();
        let now = Utc::now();
        engine
            .execute(&StockCommand::RecordInbound(RecordInbound {
                location: s1("L1"),
                quantity: 1.0,
                material: None,
                occurred_at: now,
            }))
            .unwrap();
        let entry = engine
            .execute(&StockCommand::RecordInbound(RecordInbound {
                location: s1("L1"),
                quantity: 1.0,
                material: None,
                occurred_at: now - chrono::Duration::minutes(5),
            }))
            .unwrap();
        assert_eq!(entry.recorded_at, now);
    }

    #[test]
    fn reset_clears_balances_and_history() {
        let mut engine = engine();
        engine.record_inbound(&s1("L1"), 10.0).unwrap();
        engine.reset();
        assert_eq!(engine.total_stock(), 0.0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.version(), 0);
    }

    #[test]
    fn restore_replaces_state_and_tolerates_negative_balances() {
        let mut engine = engine();
        engine.record_inbound(&s1("L6"), 99.0).unwrap();

        let records = vec![
            MovementRecord::balance(s1("L1"), 12.0),
            MovementRecord::balance(s1("L1"), 30.0),
            MovementRecord::balance(Location::new("S2", "L2"), -3.0),
        ];
        let report = engine.restore_from(&records, Utc::now());

        assert_eq!(report.records, 3);
        assert_eq!(report.restored_locations, 2);
        assert_eq!(report.negative_locations, vec![Location::new("S2", "L2")]);
        assert_eq!(engine.current_balance(&s1("L1")).unwrap(), 12.0);
        assert_eq!(engine.current_balance(&s1("L6")).unwrap(), 0.0);
        assert_eq!(engine.current_balance(&Location::new("S2", "L2")).unwrap(), -3.0);
        assert_eq!(engine.negative_locations(), vec![Location::new("S2", "L2")]);
        assert_eq!(engine.history().len(), 3);
        assert_eq!(engine.history().next_sequence(), 4);
    }

    #[test]
    fn summary_groups_by_site_in_grid_order() {
        let mut engine = engine();
        engine.record_inbound(&s1("L1"), 750.0).unwrap();
        engine.record_inbound(&Location::new("S2", "L1"), 10.0).unwrap();

        let summary = engine.summary();
        assert_eq!(summary.total, 760.0);
        assert_eq!(summary.sites.len(), 7);
        assert_eq!(summary.sites[0].total, 750.0);
        assert_eq!(summary.sites[0].locations[0].tier, StatusTier::Full);
        assert_eq!(summary.sites[1].locations[0].tier, StatusTier::Low);
        assert!(summary.negative.is_empty());
    }

    #[test]
    fn round_to_cents_uses_ties_to_even() {
        assert_eq!(round_to_cents(35.0), 35.0);
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(1.006), 1.01);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: inbound increases the balance by q and appends one entry
        /// whose resulting balance equals the new current balance.
        #[test]
        fn inbound_adds_exactly_q(
            start in 0.0f64..10_000.0,
            q in 0.0f64..10_000.0,
            lot in 1u8..=6,
        ) {
            let mut engine = engine();
            let location = s1(&format!("L{lot}"));
            engine.record_inbound(&location, start).unwrap();
            let before = engine.current_balance(&location).unwrap();
            let len = engine.history().len();

            let entry = engine.record_inbound(&location, q).unwrap();
            let after = engine.current_balance(&location).unwrap();

            prop_assert_eq!(after, before + q);
            prop_assert_eq!(engine.history().len(), len + 1);
            prop_assert_eq!(entry.resulting_balance, after);
        }

        /// Property: an outbound larger than the balance changes nothing.
        #[test]
        fn oversized_outbound_is_a_no_op(
            start in 0.0f64..1_000.0,
            extra in 0.001f64..1_000.0,
        ) {
            let mut engine = engine();
            let location = s1("L1");
            engine.record_inbound(&location, start).unwrap();
            let len = engine.history().len();

            let result = engine.record_outbound(&location, start + extra);
            let is_insufficient = matches!(result, Err(StockError::InsufficientStock { .. }));
            prop_assert!(is_insufficient);
            prop_assert_eq!(engine.current_balance(&location).unwrap(), start);
            prop_assert_eq!(engine.history().len(), len);
        }

        /// Property: totals are stable without mutation and never negative
        /// under normal movements.
        #[test]
        fn total_stock_is_idempotent(
            moves in prop::collection::vec((1u8..=6, 0.0f64..100.0, any::<bool>()), 1..40)
        ) {
            let mut engine = engine();
            for (lot, q, inbound) in moves {
                let location = s1(&format!("L{lot}"));
                let _ = if inbound {
                    engine.record_inbound(&location, q)
                } else {
                    engine.record_outbound(&location, q)
                };
            }

            let first = engine.total_stock();
            let second = engine.total_stock();
            prop_assert_eq!(first, second);
            prop_assert!(engine.negative_locations().is_empty());
        }
    }
}
