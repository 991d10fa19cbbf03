use crate::application::dto::{PollSettings, ScanRequest};
use crate::ports::outbound::{
    ProgressReporter, SastScanService, SecurityManagementService, SourcePackager, StepStatus,
};
use crate::scan_pipeline::domain::VersionId;
use crate::scan_pipeline::policies::TerminalVocabulary;
use crate::scan_pipeline::services::Poller;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use anyhow::Context;

const PACKAGE_FILE: &str = "package.zip";
const RESULT_FILE: &str = "scan.fpr";

/// Identifiers produced by a completed scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub job_token: String,
    pub artifact_id: u64,
    /// Scan embedded in the processed artifact; findings it introduced carry this id
    pub scan_id: u64,
}

/// RunSastScanUseCase - Packages the sources, runs the remote scan and
/// imports its result into the target version
///
/// Package and result files live in a temporary directory removed when
/// the use case returns.
pub struct RunSastScanUseCase<'a, P, C, S, PR> {
    packager: &'a P,
    scan_service: &'a C,
    security_service: &'a S,
    progress_reporter: &'a PR,
    poll: PollSettings,
}

impl<'a, P, C, S, PR> RunSastScanUseCase<'a, P, C, S, PR>
where
    P: SourcePackager,
    C: SastScanService,
    S: SecurityManagementService,
    PR: ProgressReporter,
{
    pub fn new(
        packager: &'a P,
        scan_service: &'a C,
        security_service: &'a S,
        progress_reporter: &'a PR,
        poll: PollSettings,
    ) -> Self {
        Self {
            packager,
            scan_service,
            security_service,
            progress_reporter,
            poll,
        }
    }

    /// Executes the scan use case
    ///
    /// # Errors
    /// * `PipelineError::RemoteOperationFailed` when the scan, its upload or
    ///   the artifact processing ends in a failure state
    /// * `PipelineError::TimedOut` when a poll exhausts its attempts
    /// * Packaging and transport errors
    pub async fn execute(&self, version: VersionId, request: &ScanRequest) -> Result<ScanOutcome> {
        let work_dir = tempfile::tempdir().context("Failed to create scan working directory")?;
        let package = work_dir.path().join(PACKAGE_FILE);

        self.progress_reporter.report("📦 Packaging sources...");
        self.packager
            .package(&request.build_options, &package)
            .await
            .context("Failed to package sources")?;
        self.progress_reporter
            .report_step("Packaging sources", StepStatus::Success);

        let job_token = self.scan_service.submit_scan(&package).await?;
        self.progress_reporter
            .report(&format!("🚀 Submitted SAST scan, job token {}", job_token));
        tracing::info!(job_token = %job_token, "scan submitted");

        let state = Poller::new(
            "SAST scan execution",
            TerminalVocabulary::SCAN_EXECUTION,
            self.poll.scan_policy(),
        )
        .await_terminal(
            &job_token,
            || self.scan_service.scan_status(&job_token),
            |attempt, status| self.progress_reporter.report_poll(&job_token, status, attempt),
        )
        .await?;

        if let Some((stage, status)) = state.failed_sub_state() {
            return Err(PipelineError::RemoteOperationFailed {
                operation: format!("SAST scan {}", stage),
                job: job_token.clone(),
                status: status.to_string(),
            }
            .into());
        }
        self.progress_reporter
            .report_step("Running SAST scan", StepStatus::Success);

        let result = work_dir.path().join(RESULT_FILE);
        self.scan_service.download_result(&job_token, &result).await?;

        let artifact_id = self.import(version, &result).await?;
        let scan_id = self.await_processing(artifact_id).await?;

        Ok(ScanOutcome {
            job_token,
            artifact_id,
            scan_id,
        })
    }

    async fn import(&self, version: VersionId, result: &std::path::Path) -> Result<u64> {
        let artifact = self
            .security_service
            .upload_artifact(version, result)
            .await
            .context("Failed to upload scan result")?;

        if !artifact.is_accepted_upload() {
            self.progress_reporter
                .report_step("Uploading scan result", StepStatus::Failure);
            return Err(PipelineError::RemoteOperationFailed {
                operation: "Scan result upload".to_string(),
                job: artifact.id.to_string(),
                status: artifact.status,
            }
            .into());
        }
        self.progress_reporter
            .report_step("Uploading scan result", StepStatus::Success);
        Ok(artifact.id)
    }

    /// Waits for the artifact to be processed and returns the scan it produced
    async fn await_processing(&self, artifact_id: u64) -> Result<u64> {
        let job = artifact_id.to_string();
        let artifact = Poller::new(
            "Artifact processing",
            TerminalVocabulary::ARTIFACT_PROCESSING,
            self.poll.artifact_policy(),
        )
        .await_terminal(
            &job,
            || self.security_service.get_artifact(artifact_id),
            |attempt, status| self.progress_reporter.report_poll(&job, status, attempt),
        )
        .await?;
        self.progress_reporter
            .report_step("Processing scan result", StepStatus::Success);

        artifact.scan_id.ok_or_else(|| {
            PipelineError::UnexpectedResponse {
                operation: "artifact processing".to_string(),
                details: format!("artifact {} carries no scan", artifact_id),
            }
            .into()
        })
    }
}
