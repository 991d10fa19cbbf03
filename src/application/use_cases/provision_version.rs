use crate::application::dto::{PollSettings, ProvisionRequest};
use crate::ports::outbound::{ProgressReporter, SecurityManagementService, StepStatus};
use crate::scan_pipeline::domain::{
    ApplicationRef, AttributeAssignment, BulkRequest, FindingQuery, VersionId, VersionRef,
};
use crate::scan_pipeline::policies::TerminalVocabulary;
use crate::scan_pipeline::services::{BoundedFanout, FindingReconciler, Poller};
use crate::shared::error::PipelineError;
use crate::shared::Result;

/// Result of provisioning the target version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub version_id: VersionId,
    /// `false` when the version already existed and nothing was changed
    pub created: bool,
    /// Optional enrichment steps that failed without failing provisioning
    pub warnings: Vec<String>,
}

/// ProvisionVersionUseCase - Idempotent get-or-create of the target version
///
/// An existing version is returned untouched. A new one is created
/// uncommitted, configured, seeded from the source version when one is
/// given, then committed. A version that fails to commit is deleted.
pub struct ProvisionVersionUseCase<'a, S, PR> {
    service: &'a S,
    progress_reporter: &'a PR,
    fanout: BoundedFanout,
    reconciler: FindingReconciler,
    poll: PollSettings,
}

impl<'a, S, PR> ProvisionVersionUseCase<'a, S, PR>
where
    S: SecurityManagementService,
    PR: ProgressReporter,
{
    pub fn new(
        service: &'a S,
        progress_reporter: &'a PR,
        fanout: BoundedFanout,
        reconciler: FindingReconciler,
        poll: PollSettings,
    ) -> Self {
        Self {
            service,
            progress_reporter,
            fanout,
            reconciler,
            poll,
        }
    }

    /// Executes the provisioning use case
    ///
    /// # Errors
    /// * `PipelineError::ProvisioningFailed` when the version cannot be created
    /// * `PipelineError::CommitFailed` when the commit fails (the version is deleted first)
    /// * Transport errors from the initial existence check
    pub async fn execute(&self, request: &ProvisionRequest) -> Result<ProvisionOutcome> {
        let target = &request.target;
        let step = format!("Checking if version {} exists", target);

        if let Some(existing) = self.service.find_version(target).await? {
            self.progress_reporter.report_step(&step, StepStatus::Exists);
            return Ok(ProvisionOutcome {
                version_id: existing.id,
                created: false,
                warnings: Vec::new(),
            });
        }
        self.progress_reporter.report_step(&step, StepStatus::NotFound);

        let version_id = self.create(target).await?;
        let mut warnings = Vec::new();

        let source_id = match &request.source {
            Some(source) => self.resolve_source(source, &mut warnings).await,
            None => None,
        };
        if let Some(source_id) = source_id {
            self.copy_state(source_id, version_id, &mut warnings).await;
        }

        self.configure(version_id, request, &mut warnings).await;
        self.commit(version_id, target).await?;

        if let (Some(source_id), true) = (source_id, request.copy_vulnerabilities) {
            self.copy_findings(source_id, version_id, &mut warnings).await;
        }

        Ok(ProvisionOutcome {
            version_id,
            created: true,
            warnings,
        })
    }

    async fn create(&self, target: &VersionRef) -> Result<VersionId> {
        let application = match self.service.find_application(target.application()).await {
            Ok(Some(id)) => ApplicationRef::Id(id),
            Ok(None) => {
                self.progress_reporter.report(&format!(
                    "Application {} not found, creating it with the version",
                    target.application()
                ));
                ApplicationRef::Name(target.application().to_string())
            }
            Err(e) => return Err(provisioning_failed(target, e)),
        };

        let step = format!("Creating version {}", target);
        match self
            .service
            .create_version(&application, target.version())
            .await
        {
            Ok(id) => {
                self.progress_reporter.report_step(&step, StepStatus::Success);
                tracing::debug!(version_id = %id, "version created");
                Ok(id)
            }
            Err(e) => {
                self.progress_reporter.report_step(&step, StepStatus::Failure);
                Err(provisioning_failed(target, e))
            }
        }
    }

    /// Resolves the source version; a missing or unreadable source only skips copying
    async fn resolve_source(
        &self,
        source: &VersionRef,
        warnings: &mut Vec<String>,
    ) -> Option<VersionId> {
        let step = format!("Looking up source version {}", source);
        match self.service.find_version(source).await {
            Ok(Some(version)) => {
                self.progress_reporter.report_step(&step, StepStatus::Exists);
                Some(version.id)
            }
            Ok(None) => {
                self.progress_reporter.report_step(&step, StepStatus::NotFound);
                self.warn(
                    warnings,
                    format!("Source version {} not found, nothing is copied", source),
                );
                None
            }
            Err(e) => {
                self.progress_reporter.report_step(&step, StepStatus::Failure);
                self.warn(
                    warnings,
                    format!("Failed to look up source version {}: {:#}", source, e),
                );
                None
            }
        }
    }

    async fn copy_state(&self, source: VersionId, target: VersionId, warnings: &mut Vec<String>) {
        let step = format!("Copying version state {} -> {}", source, target);
        match self.service.copy_version_state(source, target).await {
            Ok(()) => self.progress_reporter.report_step(&step, StepStatus::Success),
            Err(e) => {
                self.progress_reporter.report_step(&step, StepStatus::Failure);
                self.warn(warnings, format!("Failed to copy version state: {:#}", e));
            }
        }
    }

    async fn configure(
        &self,
        version: VersionId,
        request: &ProvisionRequest,
        warnings: &mut Vec<String>,
    ) {
        if let Some(template) = &request.issue_template {
            let step = format!("Setting issue template {}", template);
            match self.service.set_issue_template(version, template).await {
                Ok(true) => self.progress_reporter.report_step(&step, StepStatus::Success),
                Ok(false) => {
                    self.progress_reporter.report_step(&step, StepStatus::NotFound);
                    self.warn(warnings, format!("Issue template {} not found", template));
                }
                Err(e) => {
                    self.progress_reporter.report_step(&step, StepStatus::Failure);
                    self.warn(warnings, format!("Failed to set issue template: {:#}", e));
                }
            }
        }

        if request.attributes.is_empty() {
            return;
        }
        match self.apply_attributes(version, &request.attributes).await {
            Ok(rejected) => {
                let status = if rejected.is_empty() {
                    StepStatus::Success
                } else {
                    StepStatus::Failure
                };
                self.progress_reporter
                    .report_step("Setting version attributes", status);
                for attribute in rejected {
                    self.warn(warnings, format!("Attribute assignment failed: {}", attribute));
                }
            }
            Err(e) => {
                self.progress_reporter
                    .report_step("Setting version attributes", StepStatus::Failure);
                self.warn(warnings, format!("Failed to set version attributes: {:#}", e));
            }
        }
    }

    /// Applies every attribute independently.
    ///
    /// # Returns
    /// The assignments the service rejected
    ///
    /// # Errors
    /// The first transport error, reported once every assignment has completed
    pub async fn apply_attributes(
        &self,
        version: VersionId,
        attributes: &[AttributeAssignment],
    ) -> Result<Vec<AttributeAssignment>> {
        let outcomes = self
            .fanout
            .run(attributes, |attribute| async move {
                let outcome = self.service.set_attribute(version, attribute).await;
                tracing::debug!(%attribute, ok = ?outcome.as_ref().ok(), "attribute assigned");
                (attribute, outcome)
            })
            .await;

        let mut rejected = Vec::new();
        let mut first_error = None;
        for (attribute, outcome) in outcomes {
            match outcome {
                Ok(true) => {}
                Ok(false) => rejected.push(attribute.clone()),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e.context(format!("Failed to set attribute {}", attribute)));
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(rejected),
        }
    }

    async fn commit(&self, version: VersionId, target: &VersionRef) -> Result<()> {
        let step = format!("Committing version {} (id: {})", target, version);
        match self.commit_and_confirm(version).await {
            Ok(()) => {
                self.progress_reporter.report_step(&step, StepStatus::Success);
                Ok(())
            }
            Err(e) => {
                self.progress_reporter.report_step(&step, StepStatus::Failure);
                let reason = format!("{:#}", e);
                if let Err(delete_error) = self.service.delete_version(version).await {
                    tracing::warn!(version_id = %version, "failed to delete uncommitted version: {:#}", delete_error);
                    self.progress_reporter.report_warning(&format!(
                        "Failed to delete uncommitted version {}: {:#}",
                        version, delete_error
                    ));
                } else {
                    self.progress_reporter
                        .report(&format!("Deleted uncommitted version {}", version));
                }
                Err(PipelineError::CommitFailed {
                    version_id: version.value(),
                    reason,
                }
                .into())
            }
        }
    }

    async fn commit_and_confirm(&self, version: VersionId) -> Result<()> {
        self.service.commit_version(version).await?;
        let job = version.to_string();
        Poller::new(
            "Version commit",
            TerminalVocabulary::VERSION_COMMIT,
            self.poll.commit_policy(),
        )
        .await_terminal(
            &job,
            || self.service.get_version(version),
            |attempt, status| self.progress_reporter.report_poll(&job, status, attempt),
        )
        .await?;
        Ok(())
    }

    /// Copies findings server-side, then re-applies their audit values on the target
    async fn copy_findings(&self, source: VersionId, target: VersionId, warnings: &mut Vec<String>) {
        let step = format!("Copying vulnerabilities {} -> {}", source, target);
        if let Err(e) = self.service.copy_vulnerabilities(source, target).await {
            self.progress_reporter.report_step(&step, StepStatus::Failure);
            self.warn(warnings, format!("Failed to copy vulnerabilities: {:#}", e));
            return;
        }
        self.progress_reporter.report_step(&step, StepStatus::Success);

        let step = format!("Copying audit values {} -> {}", source, target);
        match self.copy_audit(source, target).await {
            Ok(count) => {
                self.progress_reporter.report_step(&step, StepStatus::Success);
                tracing::debug!(count, "audit requests submitted");
            }
            Err(e) => {
                self.progress_reporter.report_step(&step, StepStatus::Failure);
                self.warn(warnings, format!("Failed to copy audit values: {:#}", e));
            }
        }
    }

    /// Returns the number of findings whose audit values were submitted
    pub async fn copy_audit(&self, source: VersionId, target: VersionId) -> Result<usize> {
        let source_findings = self
            .service
            .list_findings(source, &FindingQuery::identities_with_audit())
            .await?;
        let target_findings = self
            .service
            .list_findings(target, &FindingQuery::identities())
            .await?;
        let source_count = source_findings.len();
        let transposed = self.reconciler.transpose(source_findings, &target_findings);
        tracing::debug!(
            source = source_count,
            matched = transposed.len(),
            "findings transposed to target version"
        );

        let requests: Vec<BulkRequest> = transposed
            .iter()
            .filter(|f| !f.audit_values.is_empty())
            .map(|f| BulkRequest::audit(target, f.handle(), &f.audit_values))
            .collect();
        if !requests.is_empty() {
            self.service.submit_bulk(&requests).await?;
        }
        Ok(requests.len())
    }

    fn warn(&self, warnings: &mut Vec<String>, message: String) {
        tracing::warn!("{}", message);
        self.progress_reporter.report_warning(&message);
        warnings.push(message);
    }
}

fn provisioning_failed(target: &VersionRef, error: anyhow::Error) -> anyhow::Error {
    PipelineError::ProvisioningFailed {
        app: target.application().to_string(),
        version: target.version().to_string(),
        reason: format!("{:#}", error),
    }
    .into()
}
