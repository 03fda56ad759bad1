use chrono::{DateTime, Utc};

use stockyard_core::Location;

/// A recorded stock movement, treated as an immutable fact.
///
/// Movement events are append-only: a correction is a new compensating
/// movement, never an edit of an old one.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable name, e.g. `stock.movement.outbound`.
    fn event_type(&self) -> &'static str;

    /// Schema version of this event shape.
    fn version(&self) -> u32;

    /// Location whose balance the movement changed.
    fn location(&self) -> &Location;

    /// Creation time; non-decreasing along a history.
    fn occurred_at(&self) -> DateTime<Utc>;
}
