//! Read models for the job summary
//!
//! View-optimized structs assembled from several remote queries and
//! handed to a `SummaryFormatter`.

pub mod job_summary;

pub use job_summary::{CountCell, GateStatus, JobSummary, LastScanView, ScanTypeRow};
