use crate::scan_pipeline::domain::{
    ApplicationRef, ApplicationVersion, Artifact, AttributeAssignment, BulkRequest, FilterSet,
    Finding, FindingDetails, FindingHandle, FindingQuery, FolderCount, IssueQuery, VersionId,
    VersionRef,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// SecurityManagementService port for the remote application security
/// management service
///
/// This port is the single source of truth for versions, findings, tags and
/// counts. Nothing it returns is cached across runs.
///
/// # Errors
/// Every method returns an error when the call itself fails: network
/// failure, a non-success status code, or a response that cannot be parsed.
/// Lookups that legitimately find nothing return `Ok(None)` instead.
#[async_trait]
pub trait SecurityManagementService: Send + Sync {
    /// Looks up an application by exact name
    ///
    /// # Returns
    /// The application identifier, or `None` when no application has that name
    async fn find_application(&self, name: &str) -> Result<Option<u64>>;

    /// Looks up a version by exact (application, version) name pair
    async fn find_version(&self, version: &VersionRef) -> Result<Option<ApplicationVersion>>;

    /// Reads a version by identifier
    async fn get_version(&self, id: VersionId) -> Result<ApplicationVersion>;

    /// Creates an uncommitted version
    ///
    /// # Arguments
    /// * `application` - Existing application, or the name of one to create with the version
    /// * `version_name` - Name of the new version
    async fn create_version(
        &self,
        application: &ApplicationRef,
        version_name: &str,
    ) -> Result<VersionId>;

    /// Copies analysis rules, bug tracker configuration and custom tags
    async fn copy_version_state(&self, source: VersionId, target: VersionId) -> Result<()>;

    /// Copies the current findings of `source` into `target` server-side
    async fn copy_vulnerabilities(&self, source: VersionId, target: VersionId) -> Result<()>;

    /// Assigns an issue template by name
    ///
    /// # Returns
    /// `false` when no template has that name
    async fn set_issue_template(&self, version: VersionId, template: &str) -> Result<bool>;

    /// Sets one attribute on a version
    ///
    /// # Returns
    /// `false` when the service rejects the assignment (unknown attribute,
    /// unknown option value)
    async fn set_attribute(
        &self,
        version: VersionId,
        assignment: &AttributeAssignment,
    ) -> Result<bool>;

    /// Requests the commit of a configured version.
    /// Completion is observed through [`get_version`](Self::get_version).
    async fn commit_version(&self, version: VersionId) -> Result<()>;

    async fn delete_version(&self, version: VersionId) -> Result<()>;

    /// Lists findings of a version
    ///
    /// # Arguments
    /// * `version` - Version whose findings are listed
    /// * `query` - Search expression, projection and optional scan scope
    async fn list_findings(&self, version: VersionId, query: &FindingQuery)
        -> Result<Vec<Finding>>;

    /// Reads the presentation fields of one finding
    async fn finding_details(&self, finding_id: u64) -> Result<FindingDetails>;

    /// Submits several requests in one bulk call
    async fn submit_bulk(&self, requests: &[BulkRequest]) -> Result<()>;

    /// Sets one custom tag value on a set of findings in one request
    ///
    /// # Returns
    /// `true` when the service accepted at least one item
    async fn tag_findings(
        &self,
        version: VersionId,
        findings: &[FindingHandle],
        tag_guid: &str,
        value: &str,
    ) -> Result<bool>;

    /// GUIDs of the custom tags attached to a version
    async fn version_custom_tags(&self, version: VersionId) -> Result<Vec<String>>;

    /// Whether a custom tag with this GUID exists on the service
    async fn custom_tag_exists(&self, tag_guid: &str) -> Result<bool>;

    async fn attach_custom_tag(&self, version: VersionId, tag_guid: &str) -> Result<()>;

    /// Resolves a filter set of a version by name
    async fn find_filter_set(&self, version: VersionId, name: &str) -> Result<Option<FilterSet>>;

    /// Counts findings per folder of a filter set
    ///
    /// # Arguments
    /// * `filter_set_guid` - Filter set partitioning the findings
    /// * `query` - Restricts the counted findings
    async fn folder_counts(
        &self,
        version: VersionId,
        filter_set_guid: &str,
        query: &IssueQuery,
    ) -> Result<Vec<FolderCount>>;

    /// Current security rating of a version (0 to 5)
    async fn security_rating(&self, version: VersionId) -> Result<f64>;

    /// Uploads a scan result file to a version
    async fn upload_artifact(&self, version: VersionId, file: &Path) -> Result<Artifact>;

    async fn get_artifact(&self, artifact_id: u64) -> Result<Artifact>;

    async fn list_artifacts(&self, version: VersionId) -> Result<Vec<Artifact>>;
}
