use crate::scan_pipeline::domain::{FolderCount, GateAction, GateVerdict};

/// Security gate decision over folder counts of a filter set
pub struct GateEvaluator;

impl GateEvaluator {
    /// The gate passes exactly when no folder holds a finding
    pub fn evaluate(counts: &[FolderCount], action: GateAction) -> GateVerdict {
        let total: u64 = counts.iter().map(|c| c.total_count).sum();
        GateVerdict {
            total,
            passed: total == 0,
            action,
        }
    }
}
