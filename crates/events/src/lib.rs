//! Ledger events and commands.
//!
//! Movements are recorded as events (facts) produced from commands (intent).

pub mod command;
pub mod event;

pub use command::Command;
pub use event::Event;
