use crate::application::dto::GateRequest;
use crate::ports::outbound::{ProgressReporter, SecurityManagementService, StepStatus};
use crate::scan_pipeline::domain::{GateAction, GateVerdict, IssueQuery, VersionId};
use crate::scan_pipeline::services::GateEvaluator;
use crate::shared::error::PipelineError;
use crate::shared::Result;

/// EvaluateGateUseCase - Counts the findings of the gate filter set and
/// decides pass or fail
pub struct EvaluateGateUseCase<'a, S, PR> {
    service: &'a S,
    progress_reporter: &'a PR,
}

impl<'a, S, PR> EvaluateGateUseCase<'a, S, PR>
where
    S: SecurityManagementService,
    PR: ProgressReporter,
{
    pub fn new(service: &'a S, progress_reporter: &'a PR) -> Self {
        Self {
            service,
            progress_reporter,
        }
    }

    /// # Errors
    /// * `PipelineError::InvalidConfig` when the filter set does not exist on the version
    /// * Transport errors from the folder count query
    pub async fn execute(&self, version: VersionId, request: &GateRequest) -> Result<GateVerdict> {
        let filter_set = self
            .service
            .find_filter_set(version, &request.filter_set)
            .await?
            .ok_or_else(|| PipelineError::InvalidConfig {
                message: format!(
                    "filter set '{}' not found on version {}",
                    request.filter_set, version
                ),
            })?;

        let counts = self
            .service
            .folder_counts(version, &filter_set.guid, &IssueQuery::all())
            .await?;
        let verdict = GateEvaluator::evaluate(&counts, request.action);
        tracing::info!(
            filter_set = %filter_set.name,
            total = verdict.total,
            passed = verdict.passed,
            "security gate evaluated"
        );

        let step = format!("Security gate ({})", filter_set.name);
        if verdict.passed {
            self.progress_reporter.report_step(&step, StepStatus::Success);
            return Ok(verdict);
        }

        self.progress_reporter.report_step(&step, StepStatus::Failure);
        match request.action {
            GateAction::Warn => {
                self.progress_reporter
                    .report("Security gate is set to warn only");
                self.progress_reporter.report_warning(&format!(
                    "Security gate failure: {} finding(s) in {}",
                    verdict.total, filter_set.name
                ));
            }
            GateAction::Block => {
                self.progress_reporter
                    .report("Security gate is set to block, the job will fail");
                self.progress_reporter.report_error(&format!(
                    "Security gate failure: {} finding(s) in {}",
                    verdict.total, filter_set.name
                ));
            }
        }
        Ok(verdict)
    }
}
