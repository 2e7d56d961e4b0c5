//! Export journal data to various formats

use crate::{Error, Result};
use menagerie_core::{Journal, JournalEntry, Seq, Snapshot};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format
    Json,
    /// CSV format (dispatches only)
    Csv,
    /// Human-readable text format
    Text,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ron" => Ok(ExportFormat::Ron),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(Error::ExportError(format!("unknown export format: {other}"))),
        }
    }
}

/// Exporter for journal data
pub struct Exporter<'a> {
    journal: &'a Journal,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Export to RON format
    pub fn to_ron(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal);
        ron::ser::to_string_pretty(&export, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to JSON format
    pub fn to_json(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal);
        serde_json::to_string_pretty(&export).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to CSV format (dispatches only)
    pub fn to_csv(&self) -> Result<String> {
        let mut output = String::new();
        output.push_str("seq,type,recorded_at,payload\n");

        for entry in self.journal.entries() {
            if let JournalEntry::Dispatch {
                seq,
                action,
                recorded_at,
            } = entry
            {
                let payload = action.to_record()?.to_string();

                // Escape CSV fields
                let payload_escaped = payload.replace('"', "\"\"");

                output.push_str(&format!(
                    "{},{},{},\"{}\"\n",
                    seq,
                    action.kind(),
                    recorded_at.to_rfc3339(),
                    payload_escaped
                ));
            }
        }

        Ok(output)
    }

    /// Export to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let stats = self.journal.stats();

        output.push_str("=== Journal Export ===\n\n");
        output.push_str(&format!("Total entries: {}\n", stats.total_entries));
        output.push_str(&format!("Dispatches: {}\n", stats.dispatch_count));
        output.push_str(&format!("Snapshots: {}\n", stats.snapshot_count));

        if let (Some(first), Some(last)) = (stats.first_seq, stats.last_seq) {
            output.push_str(&format!("Sequence range: {} - {}\n", first, last));
        }

        output.push_str("\n=== Entries ===\n\n");

        for entry in self.journal.entries() {
            match entry {
                JournalEntry::Dispatch {
                    seq,
                    action,
                    recorded_at,
                } => {
                    output.push_str(&format!(
                        "  #{} {} at {}\n",
                        seq,
                        action.kind(),
                        recorded_at.format("%H:%M:%S%.3f")
                    ));
                }
                JournalEntry::Snapshot { seq, snapshot_id } => {
                    let summary = self
                        .journal
                        .get_snapshot(*snapshot_id)
                        .map(|s| format!(" ({})", s.state))
                        .unwrap_or_default();
                    output.push_str(&format!(
                        "  [SNAPSHOT] {} after #{}{}\n",
                        snapshot_id, seq, summary
                    ));
                }
                JournalEntry::Metadata { seq, key, value } => {
                    output.push_str(&format!("  [META] {}={} after #{}\n", key, value, seq));
                }
            }
        }

        output
    }

    /// Export only entries in a sequence range
    pub fn export_range(&self, start: Seq, end: Seq, format: ExportFormat) -> Result<String> {
        if start > end {
            return Err(Error::InvalidRange(start, end));
        }

        let entries: Vec<_> = self
            .journal
            .entries_in_range(start, end)
            .into_iter()
            .cloned()
            .collect();
        let filtered = FilteredExport { entries };

        match format {
            ExportFormat::Ron => {
                ron::ser::to_string_pretty(&filtered, ron::ser::PrettyConfig::default())
                    .map_err(|e| Error::Serialization(e.to_string()))
            }
            ExportFormat::Json => serde_json::to_string_pretty(&filtered)
                .map_err(|e| Error::Serialization(e.to_string())),
            _ => Err(Error::ExportError(
                "Range export only supports RON and JSON".to_string(),
            )),
        }
    }
}

/// Data structure for full journal export
#[derive(Debug, Clone, Serialize)]
struct ExportData<'a> {
    version: u32,
    stats: ExportStats,
    entries: &'a [JournalEntry],
    snapshots: &'a [Snapshot],
}

impl<'a> ExportData<'a> {
    fn from_journal(journal: &'a Journal) -> Self {
        let stats = journal.stats();
        Self {
            version: 1,
            stats: ExportStats {
                total_entries: stats.total_entries,
                dispatch_count: stats.dispatch_count,
                snapshot_count: stats.snapshot_count,
                first_seq: stats.first_seq,
                last_seq: stats.last_seq,
            },
            entries: journal.entries(),
            snapshots: journal.snapshots(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ExportStats {
    total_entries: usize,
    dispatch_count: usize,
    snapshot_count: usize,
    first_seq: Option<Seq>,
    last_seq: Option<Seq>,
}

#[derive(Debug, Clone, Serialize)]
struct FilteredExport {
    entries: Vec<JournalEntry>,
}
