use crate::application::dto::TagRequest;
use crate::ports::outbound::{ProgressReporter, SecurityManagementService, StepStatus};
use crate::scan_pipeline::domain::{FindingHandle, FindingQuery, VersionId};
use crate::shared::error::PipelineError;
use crate::shared::Result;

/// TagFindingsUseCase - Marks the findings introduced by a scan with a custom tag
pub struct TagFindingsUseCase<'a, S, PR> {
    service: &'a S,
    progress_reporter: &'a PR,
}

impl<'a, S, PR> TagFindingsUseCase<'a, S, PR>
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

    /// Tags every finding first seen in `scan_id`.
    ///
    /// # Returns
    /// The number of tagged findings; zero when the scan introduced none
    pub async fn execute(&self, version: VersionId, scan_id: u64, request: &TagRequest) -> Result<usize> {
        let findings = self
            .service
            .list_findings(version, &FindingQuery::new_in_scan(scan_id))
            .await?;
        let step = format!("Tagging new findings of scan {}", scan_id);
        if findings.is_empty() {
            self.progress_reporter.report_step(&step, StepStatus::Skipped);
            tracing::debug!(scan_id, "no new findings to tag");
            return Ok(0);
        }

        self.ensure_tag(version, &request.tag_guid).await?;

        let handles: Vec<FindingHandle> = findings.iter().map(|f| f.handle()).collect();
        let tagged = self
            .service
            .tag_findings(version, &handles, &request.tag_guid, &request.value)
            .await?;
        if !tagged {
            self.progress_reporter.report_step(&step, StepStatus::Failure);
            return Err(PipelineError::UnexpectedResponse {
                operation: "finding tagging".to_string(),
                details: format!("no findings were tagged in version {}", version),
            }
            .into());
        }

        self.progress_reporter.report_step(&step, StepStatus::Success);
        tracing::info!(count = handles.len(), tag = %request.tag_guid, "findings tagged");
        Ok(handles.len())
    }

    /// Attaches the tag definition to the version when it is not attached yet.
    /// A tag unknown to the server is left to the tagging call to reject.
    async fn ensure_tag(&self, version: VersionId, tag_guid: &str) -> Result<()> {
        let attached = self.service.version_custom_tags(version).await?;
        if attached.iter().any(|guid| guid == tag_guid) {
            return Ok(());
        }
        if !self.service.custom_tag_exists(tag_guid).await? {
            tracing::warn!(tag = tag_guid, "custom tag is not defined on the server");
            self.progress_reporter.report_step(
                &format!("Looking up custom tag {}", tag_guid),
                StepStatus::NotFound,
            );
            return Ok(());
        }
        self.service.attach_custom_tag(version, tag_guid).await?;
        self.progress_reporter.report_step(
            &format!("Attaching custom tag {} to version {}", tag_guid, version),
            StepStatus::Success,
        );
        Ok(())
    }
}
