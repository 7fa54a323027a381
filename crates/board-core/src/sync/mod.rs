//! Reconciliation Layer
//!
//! Turns local mutations into backend commands, journals them with
//! sequence numbers and tracks whether local state may have diverged.

mod command;
mod journal;
mod executor;

pub use command::{BoardCommand, Reply};
pub use executor::execute;
pub use journal::{Dispatch, EntryStatus, JournalEntry, SyncHealth, SyncJournal};
