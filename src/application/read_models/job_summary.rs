//! Job summary read model
//!
//! Aggregates version identity, security rating, gate status, scan recency
//! and per-scan-type finding counts.

use chrono::{DateTime, Utc};

/// Security gate outcome as shown in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Passed,
    Failed,
    /// The gate could not be evaluated
    Unknown,
}

impl From<Option<bool>> for GateStatus {
    fn from(passed: Option<bool>) -> Self {
        match passed {
            Some(true) => GateStatus::Passed,
            Some(false) => GateStatus::Failed,
            None => GateStatus::Unknown,
        }
    }
}

/// A finding count with the part of it that is new
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountCell {
    pub total: u64,
    pub new: u64,
}

impl CountCell {
    pub fn new(total: u64, new: u64) -> Self {
        Self { total, new }
    }

    pub fn add(&mut self, other: CountCell) {
        self.total += other.total;
        self.new += other.new;
    }
}

/// Finding counts of one scan type, one cell per filter set folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTypeRow {
    /// Engine name as reported by the service (e.g. `SCA`)
    pub scan_type: String,
    pub cells: Vec<CountCell>,
}

impl ScanTypeRow {
    pub fn total(&self) -> CountCell {
        let mut total = CountCell::default();
        for cell in &self.cells {
            total.add(*cell);
        }
        total
    }
}

/// Most recent successful scan of one scan type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastScanView {
    pub scan_type: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub application: String,
    pub version: String,
    /// Link to the audit page of the version
    pub version_url: String,
    /// Security rating from 0 to 5
    pub security_rating: f64,
    pub gate_status: GateStatus,
    pub gate_url: String,
    pub last_scans: Vec<LastScanView>,
    pub filter_set: String,
    pub folders: Vec<String>,
    pub rows: Vec<ScanTypeRow>,
    pub generated_at: DateTime<Utc>,
}

impl JobSummary {
    /// Column totals across every scan type row
    pub fn folder_totals(&self) -> Vec<CountCell> {
        let mut totals = vec![CountCell::default(); self.folders.len()];
        for row in &self.rows {
            for (total, cell) in totals.iter_mut().zip(&row.cells) {
                total.add(*cell);
            }
        }
        totals
    }

    pub fn grand_total(&self) -> CountCell {
        let mut total = CountCell::default();
        for cell in self.folder_totals() {
            total.add(cell);
        }
        total
    }
}
