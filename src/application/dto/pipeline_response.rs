use crate::scan_pipeline::domain::{GateVerdict, VersionId};
use crate::shared::error::ExitCode;
use std::fmt;

/// Stages of a pipeline run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Provisioning,
    Scanning,
    Reconciling,
    Tagging,
    GateEvaluation,
    Summarizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Provisioning => "Provisioning",
            Stage::Scanning => "Scanning",
            Stage::Reconciling => "Reconciling",
            Stage::Tagging => "Tagging",
            Stage::GateEvaluation => "Gate evaluation",
            Stage::Summarizing => "Summarizing",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Completed,
    Skipped,
    /// Failed without failing the run
    Degraded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
}

/// PipelineResponse - Outcome of a pipeline run
///
/// A run ends `Failed` when a stage failed fatally (`failure` is set) or
/// when a blocking gate did not pass; it ends `Done` otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResponse {
    pub version_id: Option<VersionId>,
    pub scan_id: Option<u64>,
    pub verdict: Option<GateVerdict>,
    pub stages: Vec<StageRecord>,
    /// Message of the fatal error that ended the run
    pub failure: Option<String>,
}

impl PipelineResponse {
    pub fn record(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageRecord { stage, status });
    }

    pub fn stage_status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .rev()
            .find(|r| r.stage == stage)
            .map(|r| &r.status)
    }

    /// Non-fatal problems of the run, in stage order
    pub fn warnings(&self) -> Vec<String> {
        self.stages
            .iter()
            .filter_map(|r| match &r.status {
                StageStatus::Degraded(message) => Some(format!("{}: {}", r.stage, message)),
                _ => None,
            })
            .collect()
    }

    pub fn gate_blocked(&self) -> bool {
        self.verdict.is_some_and(|v| v.blocks_run())
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && !self.gate_blocked()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failure.is_some() {
            ExitCode::ApplicationError
        } else if self.gate_blocked() {
            ExitCode::GateFailed
        } else {
            ExitCode::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_pipeline::domain::GateAction;

    fn verdict(passed: bool, action: GateAction) -> GateVerdict {
        GateVerdict {
            total: if passed { 0 } else { 4 },
            passed,
            action,
        }
    }

    #[test]
    fn test_exit_codes() {
        let mut response = PipelineResponse::default();
        assert_eq!(response.exit_code(), ExitCode::Success);

        response.verdict = Some(verdict(false, GateAction::Warn));
        assert_eq!(response.exit_code(), ExitCode::Success);
        assert!(response.succeeded());

        response.verdict = Some(verdict(false, GateAction::Block));
        assert_eq!(response.exit_code(), ExitCode::GateFailed);
        assert!(!response.succeeded());

        response.failure = Some("boom".to_string());
        assert_eq!(response.exit_code(), ExitCode::ApplicationError);
    }

    #[test]
    fn test_warnings_and_stage_status() {
        let mut response = PipelineResponse::default();
        response.record(Stage::Provisioning, StageStatus::Completed);
        response.record(Stage::Tagging, StageStatus::Degraded("tag rejected".to_string()));

        assert_eq!(response.warnings(), vec!["Tagging: tag rejected".to_string()]);
        assert_eq!(
            response.stage_status(Stage::Provisioning),
            Some(&StageStatus::Completed)
        );
        assert_eq!(response.stage_status(Stage::Scanning), None);
    }
}
