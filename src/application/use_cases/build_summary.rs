use crate::application::dto::PipelineRequest;
use crate::application::read_models::{CountCell, GateStatus, JobSummary, LastScanView, ScanTypeRow};
use crate::ports::outbound::{
    OutputPresenter, ProgressReporter, SecurityManagementService, SummaryFormatter,
};
use crate::scan_pipeline::domain::{Artifact, FilterSet, FolderCount, IssueQuery, VersionId};
use crate::scan_pipeline::services::BoundedFanout;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// BuildSummaryUseCase - Collects the job summary read model, renders it
/// and hands it to the presenter
pub struct BuildSummaryUseCase<'a, S, F, O, PR> {
    service: &'a S,
    formatter: &'a F,
    presenter: &'a O,
    progress_reporter: &'a PR,
    fanout: BoundedFanout,
}

impl<'a, S, F, O, PR> BuildSummaryUseCase<'a, S, F, O, PR>
where
    S: SecurityManagementService,
    F: SummaryFormatter,
    O: OutputPresenter,
    PR: ProgressReporter,
{
    pub fn new(
        service: &'a S,
        formatter: &'a F,
        presenter: &'a O,
        progress_reporter: &'a PR,
        fanout: BoundedFanout,
    ) -> Self {
        Self {
            service,
            formatter,
            presenter,
            progress_reporter,
            fanout,
        }
    }

    pub async fn execute(
        &self,
        version: VersionId,
        request: &PipelineRequest,
        gate_status: GateStatus,
    ) -> Result<JobSummary> {
        let summary = self.collect(version, request, gate_status).await?;
        let rendered = self.formatter.format(&summary)?;
        self.presenter.present(&rendered)?;
        Ok(summary)
    }

    /// Builds the read model without rendering it
    pub async fn collect(
        &self,
        version: VersionId,
        request: &PipelineRequest,
        gate_status: GateStatus,
    ) -> Result<JobSummary> {
        let security_rating = match self.service.security_rating(version).await {
            Ok(rating) => rating,
            Err(e) => {
                tracing::warn!("failed to read security rating: {:#}", e);
                self.progress_reporter
                    .report_warning("Failed to get the security rating");
                0.0
            }
        };

        let version_url = request.version_url(version.value());
        let gate_url = match self
            .service
            .find_filter_set(version, &request.gate.filter_set)
            .await
        {
            Ok(Some(gate_set)) => format!("{}?filterset={}", version_url, gate_set.guid),
            Ok(None) | Err(_) => version_url.clone(),
        };

        let filter_set = self
            .service
            .find_filter_set(version, &request.summary_filter_set)
            .await?
            .ok_or_else(|| PipelineError::InvalidConfig {
                message: format!(
                    "summary filter set '{}' not found on version {}",
                    request.summary_filter_set, version
                ),
            })?;

        let artifacts = self.service.list_artifacts(version).await?;
        let last_scans = last_scans(&artifacts);
        let rows = self
            .fanout
            .try_all(last_scans.iter(), |scan| {
                self.scan_type_row(version, &filter_set, &scan.scan_type)
            })
            .await?;

        let target = &request.provision.target;
        Ok(JobSummary {
            application: target.application().to_string(),
            version: target.version().to_string(),
            version_url,
            security_rating,
            gate_status,
            gate_url,
            last_scans,
            filter_set: filter_set.name.clone(),
            folders: filter_set
                .folder_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows,
            generated_at: Utc::now(),
        })
    }

    async fn scan_type_row(
        &self,
        version: VersionId,
        filter_set: &FilterSet,
        scan_type: &str,
    ) -> Result<ScanTypeRow> {
        let all = self
            .service
            .folder_counts(
                version,
                &filter_set.guid,
                &IssueQuery::all().with_analysis_type(scan_type),
            )
            .await?;
        let new = self
            .service
            .folder_counts(
                version,
                &filter_set.guid,
                &IssueQuery::new_issues().with_analysis_type(scan_type),
            )
            .await?;

        let cells = filter_set
            .folders
            .iter()
            .map(|folder| {
                CountCell::new(
                    FolderCount::count_for(&all, &folder.name),
                    FolderCount::count_for(&new, &folder.name),
                )
            })
            .collect();
        Ok(ScanTypeRow {
            scan_type: scan_type.to_string(),
            cells,
        })
    }
}

/// Latest scan date of every scan type found in the artifacts, ordered by type
pub fn last_scans(artifacts: &[Artifact]) -> Vec<LastScanView> {
    let mut latest: BTreeMap<&str, Option<DateTime<Utc>>> = BTreeMap::new();
    for artifact in artifacts {
        for scan_type in &artifact.scan_types {
            let entry = latest.entry(scan_type.as_str()).or_default();
            if artifact.last_scan_date > *entry {
                *entry = artifact.last_scan_date;
            }
        }
    }
    latest
        .into_iter()
        .filter_map(|(scan_type, date)| {
            date.map(|date| LastScanView {
                scan_type: scan_type.to_string(),
                date,
            })
        })
        .collect()
}
