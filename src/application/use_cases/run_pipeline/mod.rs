use crate::application::dto::{PipelineRequest, PipelineResponse, ScanRequest, Stage, StageStatus};
use crate::application::read_models::GateStatus;
use crate::application::use_cases::{
    BuildSummaryUseCase, DecoratePullRequestUseCase, EvaluateGateUseCase,
    ProvisionVersionUseCase, RunSastScanUseCase, ScanOutcome, TagFindingsUseCase,
    WaitForPullRequestChecksUseCase,
};
use crate::ports::outbound::{
    CodeReviewPlatform, OutputPresenter, ProgressReporter, SastScanService,
    SecurityManagementService, SourcePackager, SummaryFormatter,
};
use crate::scan_pipeline::domain::{PullRequestContext, VersionId};
use crate::scan_pipeline::services::{BoundedFanout, FindingReconciler};
use crate::shared::error::PipelineError;
use crate::shared::Result;

/// Collaborators used only when scanning is requested
pub struct ScanCollaborators<P, C> {
    pub packager: P,
    pub scan_service: C,
}

/// RunPipelineUseCase - Sequences the stages of one pipeline run
///
/// Stages run strictly in order: Provisioning, Scanning, Reconciling,
/// Tagging, GateEvaluation, Summarizing. Provisioning and scan failures end
/// the run without a summary. Reconciling, tagging and summary failures
/// only degrade it. A gate error fails the run but the summary is still
/// written, with the gate shown as unknown.
///
/// # Type Parameters
/// * `S` - SecurityManagementService implementation
/// * `P` - SourcePackager implementation
/// * `C` - SastScanService implementation
/// * `G` - CodeReviewPlatform implementation
/// * `F` - SummaryFormatter implementation
/// * `O` - OutputPresenter implementation
/// * `PR` - ProgressReporter implementation
pub struct RunPipelineUseCase<S, P, C, G, F, O, PR> {
    security_service: S,
    scan: Option<ScanCollaborators<P, C>>,
    platform: Option<G>,
    formatter: F,
    presenter: O,
    progress_reporter: PR,
}

impl<S, P, C, G, F, O, PR> RunPipelineUseCase<S, P, C, G, F, O, PR>
where
    S: SecurityManagementService,
    P: SourcePackager,
    C: SastScanService,
    G: CodeReviewPlatform,
    F: SummaryFormatter,
    O: OutputPresenter,
    PR: ProgressReporter,
{
    pub fn new(
        security_service: S,
        scan: Option<ScanCollaborators<P, C>>,
        platform: Option<G>,
        formatter: F,
        presenter: O,
        progress_reporter: PR,
    ) -> Self {
        Self {
            security_service,
            scan,
            platform,
            formatter,
            presenter,
            progress_reporter,
        }
    }

    /// Executes the pipeline.
    ///
    /// Stage failures never surface as `Err`: they are recorded in the
    /// response, whose `exit_code` gives the outcome of the run.
    pub async fn execute(&self, request: &PipelineRequest) -> PipelineResponse {
        let mut response = PipelineResponse::default();
        let fanout = BoundedFanout::new(request.max_concurrency);

        if let Some(context) = &request.pull_request {
            self.await_sibling_checks(context, request, fanout).await;
        }

        // Provisioning
        let version_id = match self.provision(request, fanout).await {
            Ok(id) => {
                response.version_id = Some(id);
                response.record(Stage::Provisioning, StageStatus::Completed);
                id
            }
            Err(e) => return self.fail(response, Stage::Provisioning, e),
        };

        match &request.sast_scan {
            Some(scan_request) => {
                // Scanning
                let outcome = match self.scan(version_id, scan_request, request).await {
                    Ok(outcome) => outcome,
                    Err(e) => return self.fail(response, Stage::Scanning, e),
                };
                response.scan_id = Some(outcome.scan_id);
                response.record(Stage::Scanning, StageStatus::Completed);

                let reconciled = self.reconcile(version_id, request, fanout).await;
                response.record(Stage::Reconciling, reconciled);

                let tagged = self.tag(version_id, outcome.scan_id, request).await;
                response.record(Stage::Tagging, tagged);
            }
            None => {
                tracing::debug!("scan not requested, going straight to the gate");
                for stage in [Stage::Scanning, Stage::Reconciling, Stage::Tagging] {
                    response.record(stage, StageStatus::Skipped);
                }
            }
        }

        // GateEvaluation
        let gate = EvaluateGateUseCase::new(&self.security_service, &self.progress_reporter)
            .execute(version_id, &request.gate)
            .await;
        let gate_status = match gate {
            Ok(verdict) => {
                response.verdict = Some(verdict);
                response.record(Stage::GateEvaluation, StageStatus::Completed);
                GateStatus::from(Some(verdict.passed))
            }
            Err(e) => {
                let message = format!("{:#}", e);
                self.progress_reporter
                    .report_error(&format!("{} failed: {}", Stage::GateEvaluation, message));
                response.record(Stage::GateEvaluation, StageStatus::Failed(message.clone()));
                response.failure = Some(message);
                GateStatus::Unknown
            }
        };

        // Summarizing
        let summary = BuildSummaryUseCase::new(
            &self.security_service,
            &self.formatter,
            &self.presenter,
            &self.progress_reporter,
            fanout,
        )
        .execute(version_id, request, gate_status)
        .await;
        match summary {
            Ok(_) => response.record(Stage::Summarizing, StageStatus::Completed),
            Err(e) => {
                let message = format!("{:#}", e);
                self.progress_reporter
                    .report_warning(&format!("Job summary generation failed: {}", message));
                response.record(Stage::Summarizing, StageStatus::Degraded(message));
            }
        }

        self.report_outcome(&response);
        response
    }

    async fn await_sibling_checks(
        &self,
        context: &PullRequestContext,
        request: &PipelineRequest,
        fanout: BoundedFanout,
    ) {
        let Some(platform) = &self.platform else {
            return;
        };
        self.progress_reporter
            .report("⏳ Waiting for check runs of the pull request commits to complete");
        let waited = WaitForPullRequestChecksUseCase::new(
            platform,
            &self.progress_reporter,
            fanout,
            request.poll,
        )
        .execute(context)
        .await;
        match waited {
            Ok(warnings) if warnings.is_empty() => self
                .progress_reporter
                .report("All check runs of the pull request commits are completed"),
            Ok(_) => self
                .progress_reporter
                .report_warning("Not all check runs of the pull request commits completed"),
            Err(e) => self.progress_reporter.report_warning(&format!(
                "Failed to wait for the pull request check runs: {:#}",
                e
            )),
        }
    }

    async fn provision(&self, request: &PipelineRequest, fanout: BoundedFanout) -> Result<VersionId> {
        let outcome = ProvisionVersionUseCase::new(
            &self.security_service,
            &self.progress_reporter,
            fanout,
            FindingReconciler::new(request.duplicate_policy),
            request.poll,
        )
        .execute(&request.provision)
        .await?;
        Ok(outcome.version_id)
    }

    async fn scan(
        &self,
        version_id: VersionId,
        scan_request: &ScanRequest,
        request: &PipelineRequest,
    ) -> Result<ScanOutcome> {
        let Some(scan) = &self.scan else {
            return Err(PipelineError::InvalidConfig {
                message: "scan requested but no scan service is configured".to_string(),
            }
            .into());
        };
        RunSastScanUseCase::new(
            &scan.packager,
            &scan.scan_service,
            &self.security_service,
            &self.progress_reporter,
            request.poll,
        )
        .execute(version_id, scan_request)
        .await
    }

    async fn reconcile(
        &self,
        version_id: VersionId,
        request: &PipelineRequest,
        fanout: BoundedFanout,
    ) -> StageStatus {
        let (Some(context), Some(platform)) = (&request.pull_request, &self.platform) else {
            return StageStatus::Skipped;
        };
        let decorated = DecoratePullRequestUseCase::new(
            &self.security_service,
            platform,
            &self.progress_reporter,
            fanout,
        )
        .execute(context, version_id, &request.version_url(version_id.value()))
        .await;

        match decorated {
            Ok(outcome) if outcome.warnings.is_empty() => StageStatus::Completed,
            Ok(outcome) => StageStatus::Degraded(format!(
                "{} decoration warning(s)",
                outcome.warnings.len()
            )),
            Err(e) => {
                let message = format!("{:#}", e);
                self.progress_reporter
                    .report_warning(&format!("Pull request decoration failed: {}", message));
                StageStatus::Degraded(message)
            }
        }
    }

    async fn tag(&self, version_id: VersionId, scan_id: u64, request: &PipelineRequest) -> StageStatus {
        let Some(tagging) = &request.tagging else {
            return StageStatus::Skipped;
        };
        self.progress_reporter.report(&format!(
            "🏷️  Tagging new findings with commit {}",
            tagging.value
        ));
        let tagged = TagFindingsUseCase::new(&self.security_service, &self.progress_reporter)
            .execute(version_id, scan_id, tagging)
            .await;
        match tagged {
            Ok(0) => {
                self.progress_reporter
                    .report("The scan found no new findings, nothing to tag");
                StageStatus::Skipped
            }
            Ok(_) => StageStatus::Completed,
            Err(e) => {
                let message = format!("{:#}", e);
                self.progress_reporter
                    .report_warning(&format!("Tagging findings failed: {}", message));
                StageStatus::Degraded(message)
            }
        }
    }

    fn fail(&self, mut response: PipelineResponse, stage: Stage, error: anyhow::Error) -> PipelineResponse {
        let message = format!("{:#}", error);
        tracing::error!(%stage, "stage failed: {}", message);
        self.progress_reporter
            .report_error(&format!("{} failed: {}", stage, message));
        response.record(stage, StageStatus::Failed(message.clone()));
        response.failure = Some(message);
        response
    }

    fn report_outcome(&self, response: &PipelineResponse) {
        let warnings = response.warnings();
        if response.succeeded() {
            let suffix = if warnings.is_empty() {
                String::new()
            } else {
                format!(" with {} warning(s)", warnings.len())
            };
            self.progress_reporter
                .report_completion(&format!("✅ Pipeline completed{}", suffix));
        } else if response.gate_blocked() {
            self.progress_reporter
                .report_error("Security gate failure blocks the pipeline");
        }
    }
}
