//! Journal infrastructure for recording and auditing dispatches
//!
//! The journal provides:
//! - A log of every committed dispatch, in order
//! - Periodic state snapshots
//! - Free-form metadata notes for auditing
//!
//! Positions in the journal are dispatch sequence numbers: `seq` is the
//! value of [`Store::dispatch_count`](crate::Store::dispatch_count) right
//! after the dispatch committed, and a snapshot taken at `seq` holds the
//! state produced by that dispatch (`seq = 0` is the seeded state).
//!
//! # Example
//!
//! ```rust,ignore
//! use menagerie_core::{increase_count, Journal, RootReducer, Store};
//!
//! let store = Store::new(RootReducer::new());
//! let mut journal = Journal::new();
//! journal.start_recording();
//! store.attach_journal(journal);
//!
//! store.dispatch(increase_count(2))?;
//!
//! let stats = store.with_journal(|j| j.stats()).unwrap();
//! assert_eq!(stats.dispatch_count, 1);
//! ```

use crate::{Action, SnapshotId, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dispatch sequence number
pub type Seq = u64;

/// A journal entry representing a recorded event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JournalEntry {
    /// An action was reduced and committed
    Dispatch {
        /// Sequence number of this dispatch
        seq: Seq,
        /// The dispatched action
        #[serde(with = "crate::action::record")]
        action: Action,
        /// Wall-clock time of the commit
        recorded_at: DateTime<Utc>,
    },
    /// A state snapshot was taken
    Snapshot {
        /// Sequence number the snapshot belongs to
        seq: Seq,
        /// Unique ID for this snapshot
        snapshot_id: SnapshotId,
    },
    /// Custom metadata entry (for auditing)
    Metadata {
        /// Sequence number when this was recorded
        seq: Seq,
        /// Key for the metadata
        key: String,
        /// Value
        value: String,
    },
}

impl JournalEntry {
    /// Sequence number this entry belongs to
    pub fn seq(&self) -> Seq {
        match self {
            JournalEntry::Dispatch { seq, .. } => *seq,
            JournalEntry::Snapshot { seq, .. } => *seq,
            JournalEntry::Metadata { seq, .. } => *seq,
        }
    }
}

/// A stored state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<S = State> {
    /// Unique ID
    pub id: SnapshotId,
    /// Sequence number of the dispatch that produced this state
    pub seq: Seq,
    /// The state
    pub state: Arc<S>,
}

/// Configuration for the journal
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Whether recording is enabled
    pub recording_enabled: bool,
    /// Take snapshots every N dispatches (0 = disabled)
    pub snapshot_interval: u64,
    /// Maximum number of entries to keep (0 = unlimited)
    pub max_entries: usize,
    /// Maximum number of snapshots to keep (0 = unlimited)
    pub max_snapshots: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            recording_enabled: false,
            snapshot_interval: 100,
            max_entries: 0,
            max_snapshots: 10,
        }
    }
}

/// The journal of committed dispatches
#[derive(Debug, Clone)]
pub struct Journal<S = State> {
    config: JournalConfig,
    entries: Vec<JournalEntry>,
    snapshots: Vec<Snapshot<S>>,
    next_snapshot_id: u64,
    last_recorded_seq: Option<Seq>,
}

impl<S> Journal<S> {
    /// Create a new journal (recording disabled)
    pub fn new() -> Self {
        Self::with_config(JournalConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            snapshots: Vec::new(),
            next_snapshot_id: 0,
            last_recorded_seq: None,
        }
    }

    /// Start recording
    pub fn start_recording(&mut self) {
        self.config.recording_enabled = true;
    }

    /// Stop recording
    pub fn stop_recording(&mut self) {
        self.config.recording_enabled = false;
    }

    /// Check if recording is enabled
    pub fn is_recording(&self) -> bool {
        self.config.recording_enabled
    }

    /// The active configuration
    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Record a committed dispatch, snapshotting `state` when due
    pub fn record_dispatch(&mut self, seq: Seq, action: &Action, state: &Arc<S>) {
        if !self.config.recording_enabled {
            return;
        }

        self.entries.push(JournalEntry::Dispatch {
            seq,
            action: action.clone(),
            recorded_at: Utc::now(),
        });
        self.last_recorded_seq = Some(seq);

        if self.should_snapshot(seq) {
            self.take_snapshot(seq, state);
        }

        self.enforce_limits();
    }

    /// Take a snapshot of `state` as of dispatch `seq`
    pub fn take_snapshot(&mut self, seq: Seq, state: &Arc<S>) -> SnapshotId {
        let id = SnapshotId::new(self.next_snapshot_id);
        self.next_snapshot_id += 1;

        self.snapshots.push(Snapshot {
            id,
            seq,
            state: Arc::clone(state),
        });

        if self.config.recording_enabled {
            self.entries.push(JournalEntry::Snapshot {
                seq,
                snapshot_id: id,
            });
        }

        self.enforce_snapshot_limits();
        id
    }

    /// Check if a snapshot should be taken after dispatch `seq`
    pub fn should_snapshot(&self, seq: Seq) -> bool {
        self.config.snapshot_interval != 0 && seq % self.config.snapshot_interval == 0
    }

    /// Record custom metadata (for auditing)
    pub fn record_metadata(&mut self, seq: Seq, key: impl Into<String>, value: impl Into<String>) {
        if !self.config.recording_enabled {
            return;
        }

        self.entries.push(JournalEntry::Metadata {
            seq,
            key: key.into(),
            value: value.into(),
        });

        self.enforce_limits();
    }

    /// Get all entries
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Get entries in a sequence range (inclusive)
    pub fn entries_in_range(&self, start: Seq, end: Seq) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|e| (start..=end).contains(&e.seq()))
            .collect()
    }

    /// Get dispatches only
    pub fn dispatches(&self) -> impl Iterator<Item = (Seq, &Action)> {
        self.entries.iter().filter_map(|e| match e {
            JournalEntry::Dispatch { seq, action, .. } => Some((*seq, action)),
            _ => None,
        })
    }

    /// Get all snapshots
    pub fn snapshots(&self) -> &[Snapshot<S>] {
        &self.snapshots
    }

    /// Get the nearest snapshot at or before a sequence number
    pub fn snapshot_at_or_before(&self, seq: Seq) -> Option<&Snapshot<S>> {
        self.snapshots
            .iter()
            .filter(|s| s.seq <= seq)
            .max_by_key(|s| s.seq)
    }

    /// Get a specific snapshot by ID
    pub fn get_snapshot(&self, id: SnapshotId) -> Option<&Snapshot<S>> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    /// Clear all entries and snapshots
    pub fn clear(&mut self) {
        self.entries.clear();
        self.snapshots.clear();
        self.last_recorded_seq = None;
    }

    /// Get statistics about the journal
    pub fn stats(&self) -> JournalStats {
        let dispatch_count = self
            .entries
            .iter()
            .filter(|e| matches!(e, JournalEntry::Dispatch { .. }))
            .count();

        JournalStats {
            total_entries: self.entries.len(),
            dispatch_count,
            snapshot_count: self.snapshots.len(),
            first_seq: self.entries.first().map(JournalEntry::seq),
            last_seq: self.last_recorded_seq,
        }
    }

    fn enforce_limits(&mut self) {
        if self.config.max_entries > 0 && self.entries.len() > self.config.max_entries {
            let excess = self.entries.len() - self.config.max_entries;
            self.entries.drain(0..excess);
        }
    }

    fn enforce_snapshot_limits(&mut self) {
        if self.config.max_snapshots > 0 && self.snapshots.len() > self.config.max_snapshots {
            let excess = self.snapshots.len() - self.config.max_snapshots;
            self.snapshots.drain(0..excess);
        }
    }
}

impl<S> Default for Journal<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Number of dispatch entries
    pub dispatch_count: usize,
    /// Number of snapshots
    pub snapshot_count: usize,
    /// First sequence number still held
    pub first_seq: Option<Seq>,
    /// Last dispatch recorded
    pub last_seq: Option<Seq>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{increase_count, reset_count};

    fn recording() -> Journal {
        let mut journal = Journal::new();
        journal.start_recording();
        journal
    }

    #[test]
    fn test_journal_recording() {
        let mut journal = recording();
        let state = Arc::new(State::new());

        journal.record_dispatch(1, &increase_count(1), &state);
        journal.record_dispatch(2, &increase_count(2), &state);
        journal.record_dispatch(3, &reset_count(), &state);

        let stats = journal.stats();
        assert_eq!(stats.dispatch_count, 3);
        assert_eq!(stats.first_seq, Some(1));
        assert_eq!(stats.last_seq, Some(3));

        let kinds: Vec<_> = journal.dispatches().map(|(_, a)| a.kind()).collect();
        assert_eq!(kinds, ["INCREASE_COUNT", "INCREASE_COUNT", "RESET_COUNT"]);
    }

    #[test]
    fn test_journal_disabled() {
        let mut journal: Journal = Journal::new();
        journal.record_dispatch(1, &reset_count(), &Arc::new(State::new()));
        journal.record_metadata(1, "user", "alice");

        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_journal_snapshot() {
        let mut journal: Journal = Journal::new();
        let state = Arc::new(State::new());

        let id = journal.take_snapshot(0, &state);

        assert_eq!(journal.snapshots().len(), 1);
        assert!(journal.get_snapshot(id).is_some());
        assert!(Arc::ptr_eq(&journal.snapshots()[0].state, &state));
    }

    #[test]
    fn test_snapshot_interval() {
        let mut journal = Journal::with_config(JournalConfig {
            recording_enabled: true,
            snapshot_interval: 2,
            ..Default::default()
        });
        let state = Arc::new(State::new());

        for seq in 1..=5 {
            journal.record_dispatch(seq, &increase_count(1), &state);
        }

        let seqs: Vec<_> = journal.snapshots().iter().map(|s| s.seq).collect();
        assert_eq!(seqs, [2, 4]);
        assert_eq!(journal.snapshot_at_or_before(3).map(|s| s.seq), Some(2));
        assert!(journal.snapshot_at_or_before(1).is_none());
    }

    #[test]
    fn test_entries_in_range() {
        let mut journal = recording();
        let state = Arc::new(State::new());
        for seq in 1..=10 {
            journal.record_dispatch(seq, &increase_count(1), &state);
        }

        let range = journal.entries_in_range(3, 6);
        assert_eq!(range.len(), 4);
        assert!(range.iter().all(|e| (3..=6).contains(&e.seq())));
    }

    #[test]
    fn test_max_entries_limit() {
        let mut journal = Journal::with_config(JournalConfig {
            recording_enabled: true,
            max_entries: 5,
            snapshot_interval: 0,
            ..Default::default()
        });
        let state = Arc::new(State::new());
        for seq in 1..=10 {
            journal.record_dispatch(seq, &increase_count(1), &state);
        }

        assert_eq!(journal.entries().len(), 5);
        assert_eq!(journal.stats().first_seq, Some(6));
    }

    #[test]
    fn test_max_snapshots_limit() {
        let mut journal = Journal::with_config(JournalConfig {
            max_snapshots: 2,
            ..Default::default()
        });
        let state = Arc::new(State::new());
        for seq in 0..4 {
            journal.take_snapshot(seq, &state);
        }

        let seqs: Vec<_> = journal.snapshots().iter().map(|s| s.seq).collect();
        assert_eq!(seqs, [2, 3]);
    }

    #[test]
    fn test_metadata_recording() {
        let mut journal: Journal = recording();
        journal.record_metadata(1, "driver", "timer");
        journal.record_metadata(1, "source", "people");

        let metadata: Vec<_> = journal
            .entries()
            .iter()
            .filter_map(|e| match e {
                JournalEntry::Metadata { key, value, .. } => Some((key.as_str(), value.as_str())),
                _ => None,
            })
            .collect();

        assert_eq!(metadata, [("driver", "timer"), ("source", "people")]);
    }

    #[test]
    fn test_clear() {
        let mut journal = recording();
        let state = Arc::new(State::new());
        journal.record_dispatch(1, &reset_count(), &state);
        journal.take_snapshot(1, &state);
        journal.clear();

        assert_eq!(journal.stats().total_entries, 0);
        assert!(journal.snapshots().is_empty());
        assert_eq!(journal.stats().last_seq, None);
    }
}
