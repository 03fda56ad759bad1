use stockyard_core::Location;

/// A command targets a single storage location.
///
/// Commands represent **intent** ("take 35 t out of S1 - L1"); they are
/// transient and either rejected or turned into ledger entries. Each command
/// touches exactly one location, which is the atomicity boundary of every
/// movement.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_location(&self) -> &Location;
}
