//! Menagerie Journal - export and auditing of recorded dispatches
//!
//! This crate builds on `menagerie-core`'s `journal` feature to provide:
//!
//! - **Auditor**: Query recorded dispatches, count them by type, and
//!   re-run them through a reducer to confirm snapshots are reproducible
//! - **Exporter**: Export journal data to RON, JSON, CSV or plain text
//!
//! # Example
//!
//! ```rust,ignore
//! use menagerie_core::{increase_count, Journal, RootReducer, Store};
//! use menagerie_journal::{Auditor, ExportFormat, Exporter};
//!
//! let store = Store::new(RootReducer::new());
//! let mut journal = Journal::new();
//! journal.start_recording();
//! store.attach_journal(journal);
//!
//! store.dispatch(increase_count(2))?;
//!
//! let journal = store.detach_journal().unwrap();
//! println!("{}", Auditor::new(&journal).generate_report());
//! assert!(Auditor::new(&journal).verify_replay(&RootReducer::new()).is_consistent());
//! let ron = Exporter::new(&journal).export(ExportFormat::Ron)?;
//! ```

mod auditor;
mod error;
mod exporter;

pub use auditor::{AuditQuery, AuditReport, Auditor, ReplayMismatch, ReplayReport};
pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};

// Re-export core journal types for convenience
pub use menagerie_core::{Journal, JournalConfig, JournalEntry, JournalStats, Seq, Snapshot};
