//! Sync journal
//!
//! Sequence-numbered record of issued commands. A failed command marks the
//! journal diverged until the next successful full reload.

use std::collections::VecDeque;

use super::command::BoardCommand;

/// A command handed to the host for execution
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub seq: u64,
    pub command: BoardCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    InFlight,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub seq: u64,
    pub command: BoardCommand,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncHealth {
    InSync,
    Syncing { in_flight: usize },
    /// Local state may be stale until the next reload
    Diverged { failures: usize, last_error: String },
}

impl SyncHealth {
    pub fn is_diverged(&self) -> bool {
        matches!(self, SyncHealth::Diverged { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncJournal {
    next_seq: u64,
    entries: VecDeque<JournalEntry>,
    /// Settled entries kept for diagnostics
    capacity: usize,
    failures: usize,
    last_error: Option<String>,
}

impl Default for SyncJournal {
    fn default() -> Self {
        Self::new(256)
    }
}

impl SyncJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            next_seq: 1,
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            failures: 0,
            last_error: None,
        }
    }

    /// Journal a command and assign the next sequence number
    pub fn record(&mut self, command: BoardCommand) -> Dispatch {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(JournalEntry { seq, command: command.clone(), status: EntryStatus::InFlight });
        Dispatch { seq, command }
    }

    pub fn entry(&self, seq: u64) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.seq == seq)
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn complete(&mut self, seq: u64) {
        self.set_status(seq, EntryStatus::Done);
    }

    pub fn fail(&mut self, seq: u64, error: impl Into<String>) {
        let error = error.into();
        self.failures += 1;
        self.last_error = Some(error.clone());
        self.set_status(seq, EntryStatus::Failed(error));
    }

    fn set_status(&mut self, seq: u64, status: EntryStatus) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) {
            entry.status = status;
        }
        self.prune();
    }

    /// Drop the oldest settled entries beyond capacity. In-flight entries stay.
    fn prune(&mut self) {
        let mut settled = self.entries.iter().filter(|e| e.status != EntryStatus::InFlight).count();
        while settled > self.capacity {
            match self.entries.iter().position(|e| e.status != EntryStatus::InFlight) {
                Some(index) => {
                    self.entries.remove(index);
                    settled -= 1;
                }
                None => break,
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.entries.iter().filter(|e| e.status == EntryStatus::InFlight).count()
    }

    /// True when a structural command was issued after `seq`
    pub fn structural_after(&self, seq: u64) -> bool {
        self.entries.iter().any(|e| e.seq > seq && e.command.is_structural())
    }

    /// True while any structural command is in flight
    pub fn structural_in_flight(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.status == EntryStatus::InFlight && e.command.is_structural())
    }

    /// A full reload succeeded; local state matches the server again
    pub fn mark_reloaded(&mut self) {
        self.failures = 0;
        self.last_error = None;
    }

    pub fn health(&self) -> SyncHealth {
        if let Some(last_error) = &self.last_error {
            return SyncHealth::Diverged { failures: self.failures, last_error: last_error.clone() };
        }
        match self.in_flight() {
            0 => SyncHealth::InSync,
            in_flight => SyncHealth::Syncing { in_flight },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reorder(task: &str) -> BoardCommand {
        BoardCommand::ReorderTask { column_id: "A".into(), task_id: task.into(), new_position: 0 }
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut journal = SyncJournal::new(8);
        let a = journal.record(BoardCommand::FetchColumns);
        let b = journal.record(reorder("t1"));
        assert_eq!(a.seq, 1);
        assert_eq!(b.seq, 2);
        assert_eq!(journal.health(), SyncHealth::Syncing { in_flight: 2 });
    }

    #[test]
    fn test_failure_diverges_until_reload() {
        let mut journal = SyncJournal::new(8);
        let d = journal.record(reorder("t1"));
        journal.fail(d.seq, "HTTP 500");
        assert!(journal.health().is_diverged());

        journal.mark_reloaded();
        assert_eq!(journal.health(), SyncHealth::InSync);
    }

    #[test]
    fn test_structural_after() {
        let mut journal = SyncJournal::new(8);
        let fetch = journal.record(BoardCommand::FetchColumns);
        assert!(!journal.structural_after(fetch.seq));
        journal.record(reorder("t1"));
        assert!(journal.structural_after(fetch.seq));
    }

    #[test]
    fn test_prune_keeps_in_flight() {
        let mut journal = SyncJournal::new(1);
        let a = journal.record(reorder("t1"));
        let b = journal.record(reorder("t2"));
        let c = journal.record(reorder("t3"));
        journal.complete(a.seq);
        journal.complete(b.seq);

        assert!(journal.entry(a.seq).is_none());
        assert!(journal.entry(b.seq).is_some());
        assert_eq!(journal.entry(c.seq).map(|e| &e.status), Some(&EntryStatus::InFlight));
    }
}
