//! Auditing and analytics for journal data

use indexmap::IndexMap;
use menagerie_core::{Action, Journal, JournalEntry, Reducer, Seq, State};
use tracing::warn;

/// Auditor for querying and analyzing journal data
pub struct Auditor<'a> {
    journal: &'a Journal,
}

impl<'a> Auditor<'a> {
    /// Create a new auditor for a journal
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Generate a summary report
    pub fn generate_report(&self) -> AuditReport {
        let stats = self.journal.stats();
        let mut dispatches_by_type: IndexMap<String, u64> = IndexMap::new();

        for (_, action) in self.journal.dispatches() {
            *dispatches_by_type.entry(action.kind().to_string()).or_insert(0) += 1;
        }

        AuditReport {
            total_entries: stats.total_entries,
            total_dispatches: stats.dispatch_count,
            snapshot_count: stats.snapshot_count,
            first_seq: stats.first_seq,
            last_seq: stats.last_seq,
            dispatches_by_type,
            metadata_count: self.metadata().len(),
        }
    }

    /// Query entries matching specific criteria
    pub fn query(&self, query: &AuditQuery) -> Vec<&JournalEntry> {
        self.journal
            .entries()
            .iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }

    /// Count dispatches of one action type
    pub fn count_type(&self, kind: &str) -> u64 {
        self.journal
            .dispatches()
            .filter(|(_, action)| action.kind() == kind)
            .count() as u64
    }

    /// Every dispatched action type, in first-seen order
    pub fn unique_types(&self) -> Vec<String> {
        self.generate_report().dispatches_by_type.into_keys().collect()
    }

    /// Get metadata entries as (key, value, seq)
    pub fn metadata(&self) -> Vec<(&str, &str, Seq)> {
        self.journal
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                JournalEntry::Metadata { seq, key, value } => {
                    Some((key.as_str(), value.as_str(), *seq))
                }
                _ => None,
            })
            .collect()
    }

    /// Re-run recorded dispatches between consecutive snapshots
    ///
    /// For every pair of snapshots whose intermediate dispatches are all still
    /// in the journal, the earlier snapshot is reduced through those actions
    /// and compared with the later one. A mismatch means the reducer is not a
    /// pure function of (state, action).
    pub fn verify_replay<R>(&self, reducer: &R) -> ReplayReport
    where
        R: Reducer<State = State>,
    {
        let mut report = ReplayReport::default();
        let dispatches: IndexMap<Seq, &Action> = self.journal.dispatches().collect();

        for pair in self.journal.snapshots().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let actions: Option<Vec<&Action>> = (from.seq + 1..=to.seq)
                .map(|seq| dispatches.get(&seq).copied())
                .collect();

            let Some(actions) = actions else {
                report.skipped_segments += 1;
                continue;
            };

            let replayed = actions
                .into_iter()
                .fold(State::clone(&from.state), |state, action| {
                    reducer.reduce(&state, action)
                });

            report.checked_segments += 1;
            if replayed != *to.state {
                warn!(from = from.seq, to = to.seq, "replay diverged from snapshot");
                report.mismatches.push(ReplayMismatch {
                    from_seq: from.seq,
                    to_seq: to.seq,
                    expected: State::clone(&to.state),
                    replayed,
                });
            }
        }

        report
    }
}

/// A summary of a journal
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Total number of journal entries
    pub total_entries: usize,
    /// Total number of dispatches
    pub total_dispatches: usize,
    /// Number of snapshots
    pub snapshot_count: usize,
    /// First sequence number in journal
    pub first_seq: Option<Seq>,
    /// Last dispatch in journal
    pub last_seq: Option<Seq>,
    /// Dispatch count per action type, in first-seen order
    pub dispatches_by_type: IndexMap<String, u64>,
    /// Number of metadata notes
    pub metadata_count: usize,
}

impl std::fmt::Display for AuditReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Audit Report ===")?;
        writeln!(f, "Total entries: {}", self.total_entries)?;
        writeln!(f, "Dispatches: {}", self.total_dispatches)?;
        writeln!(f, "Snapshots: {}", self.snapshot_count)?;
        writeln!(f, "Metadata notes: {}", self.metadata_count)?;

        if let (Some(first), Some(last)) = (self.first_seq, self.last_seq) {
            writeln!(f, "Sequence range: {} - {}", first, last)?;
        }

        if !self.dispatches_by_type.is_empty() {
            writeln!(f, "\nDispatches by type:")?;
            for (kind, count) in &self.dispatches_by_type {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        Ok(())
    }
}

/// Outcome of [`Auditor::verify_replay`]
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    /// Snapshot pairs that were replayed
    pub checked_segments: usize,
    /// Snapshot pairs with trimmed dispatches in between
    pub skipped_segments: usize,
    /// Snapshot pairs that did not reproduce
    pub mismatches: Vec<ReplayMismatch>,
}

impl ReplayReport {
    /// No replayed segment diverged
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A segment whose replay did not match the recorded snapshot
#[derive(Debug, Clone)]
pub struct ReplayMismatch {
    pub from_seq: Seq,
    pub to_seq: Seq,
    /// State held by the later snapshot
    pub expected: State,
    /// State produced by replaying the segment
    pub replayed: State,
}

/// Query criteria for filtering journal entries
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Start sequence (inclusive)
    pub start_seq: Option<Seq>,
    /// End sequence (inclusive)
    pub end_seq: Option<Seq>,
    /// Filter dispatches by action type
    pub action_type: Option<String>,
    /// Include snapshots in results
    pub include_snapshots: bool,
    /// Include metadata in results
    pub include_metadata: bool,
    /// Filter metadata by key
    pub metadata_key: Option<String>,
}

impl AuditQuery {
    /// Create a new empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by sequence range
    pub fn in_range(mut self, start: Seq, end: Seq) -> Self {
        self.start_seq = Some(start);
        self.end_seq = Some(end);
        self
    }

    /// Filter by action type
    pub fn by_type(mut self, kind: impl Into<String>) -> Self {
        self.action_type = Some(kind.into());
        self
    }

    /// Include snapshots
    pub fn with_snapshots(mut self) -> Self {
        self.include_snapshots = true;
        self
    }

    /// Include metadata
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }

    /// Filter metadata by key
    pub fn metadata_with_key(mut self, key: impl Into<String>) -> Self {
        self.include_metadata = true;
        self.metadata_key = Some(key.into());
        self
    }

    fn in_seq_range(&self, seq: Seq) -> bool {
        self.start_seq.is_none_or(|start| seq >= start) && self.end_seq.is_none_or(|end| seq <= end)
    }

    fn matches(&self, entry: &JournalEntry) -> bool {
        if !self.in_seq_range(entry.seq()) {
            return false;
        }

        match entry {
            JournalEntry::Dispatch { action, .. } => self
                .action_type
                .as_deref()
                .is_none_or(|kind| action.kind() == kind),
            JournalEntry::Snapshot { .. } => self.include_snapshots,
            JournalEntry::Metadata { key, .. } => {
                self.include_metadata
                    && self.metadata_key.as_ref().is_none_or(|filter| key == filter)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menagerie_core::{
        add_person, increase_count, remove_person, reset_count, set_count, JournalConfig,
        RootReducer, Store,
    };
    use std::cell::Cell;

    fn recorded_session(snapshot_interval: u64) -> Journal {
        let store = Store::new(RootReducer::new());
        store.attach_journal(Journal::with_config(JournalConfig {
            recording_enabled: true,
            snapshot_interval,
            ..Default::default()
        }));

        store.dispatch(increase_count(2)).unwrap();
        store.dispatch(set_count(76)).unwrap();
        store.record_metadata("user", "test_user");
        store.dispatch(add_person("Steve", Some(30), None, None)).unwrap();
        store.dispatch(remove_person("Maxi")).unwrap();
        store.dispatch(increase_count(1)).unwrap();
        store.dispatch(reset_count()).unwrap();

        store.detach_journal().unwrap()
    }

    #[test]
    fn test_generate_report() {
        let journal = recorded_session(100);
        let report = Auditor::new(&journal).generate_report();

        assert_eq!(report.total_dispatches, 6);
        assert_eq!(report.dispatches_by_type["INCREASE_COUNT"], 2);
        let order: Vec<_> = report.dispatches_by_type.keys().map(String::as_str).collect();
        assert_eq!(
            order,
            ["INCREASE_COUNT", "SET_COUNT", "ADD_PERSON", "REMOVE_PERSON", "RESET_COUNT"]
        );
        assert!(report.to_string().contains("Dispatches by type"));
    }

    #[test]
    fn test_query_by_range_and_type() {
        let journal = recorded_session(100);
        let auditor = Auditor::new(&journal);

        let results = auditor.query(&AuditQuery::new().in_range(2, 4));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|e| (2..=4).contains(&e.seq())));

        let results = auditor.query(&AuditQuery::new().by_type("INCREASE_COUNT"));
        let seqs: Vec<_> = results.iter().map(|e| e.seq()).collect();
        assert_eq!(seqs, [1, 5]);
    }

    #[test]
    fn test_query_snapshots_opt_in() {
        let journal = recorded_session(2);
        let auditor = Auditor::new(&journal);

        let plain = auditor.query(&AuditQuery::new());
        assert!(plain
            .iter()
            .all(|e| !matches!(e, JournalEntry::Snapshot { .. })));

        let with = auditor.query(&AuditQuery::new().with_snapshots());
        assert!(with.len() > plain.len());
    }

    #[test]
    fn test_metadata() {
        let journal = recorded_session(100);
        let auditor = Auditor::new(&journal);

        assert_eq!(auditor.metadata(), [("user", "test_user", 2)]);
        let results = auditor.query(&AuditQuery::new().metadata_with_key("user"));
        assert_eq!(results.len(), 1 + 6);
        let results = auditor.query(&AuditQuery::new().metadata_with_key("other"));
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn test_count_and_unique_types() {
        let journal = recorded_session(100);
        let auditor = Auditor::new(&journal);

        assert_eq!(auditor.count_type("RESET_COUNT"), 1);
        assert_eq!(auditor.count_type("ADD_ANIMAL"), 0);
        assert_eq!(auditor.unique_types().len(), 5);
    }

    #[test]
    fn test_replay_is_consistent_for_pure_reducers() {
        let journal = recorded_session(2);
        let report = Auditor::new(&journal).verify_replay(&RootReducer::new());

        // snapshots at 0 (attach), 2, 4, 6
        assert_eq!(report.checked_segments, 3);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_replay_flags_impure_reducer() {
        struct Drifting {
            calls: Cell<i64>,
        }

        impl Reducer for Drifting {
            type State = State;

            fn initial_state(&self) -> State {
                State::new()
            }

            fn reduce(&self, state: &State, action: &Action) -> State {
                self.calls.set(self.calls.get() + 1);
                let mut next = RootReducer::new().reduce(state, action);
                next.count += self.calls.get();
                next
            }
        }

        let journal = recorded_session(2);
        let report = Auditor::new(&journal).verify_replay(&Drifting {
            calls: Cell::new(1000),
        });

        assert!(!report.is_consistent());
        assert_eq!(report.mismatches[0].from_seq, 0);
        assert_eq!(report.mismatches[0].to_seq, 2);
    }

    #[test]
    fn test_replay_skips_trimmed_segments() {
        let store = Store::new(RootReducer::new());
        store.attach_journal(Journal::with_config(JournalConfig {
            recording_enabled: true,
            snapshot_interval: 3,
            max_entries: 2,
            ..Default::default()
        }));
        for _ in 0..6 {
            store.dispatch(increase_count(1)).unwrap();
        }
        let journal = store.detach_journal().unwrap();

        let report = Auditor::new(&journal).verify_replay(&RootReducer::new());
        assert_eq!(report.checked_segments, 0);
        assert_eq!(report.skipped_segments, 2);
    }
}
