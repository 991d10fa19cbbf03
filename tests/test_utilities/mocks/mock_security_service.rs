use async_trait::async_trait;
use scan_orchestrator::prelude::*;
use scan_orchestrator::scan_pipeline::domain::{
    ApplicationRef, ApplicationVersion, Artifact, BulkRequest, FilterSet, Finding,
    FindingDetails, FindingQuery, Folder, FolderCount, IssueQuery,
};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

/// How the mock answers one attribute assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOutcome {
    Accepted,
    Rejected,
    TransportError,
}

/// Mock SecurityManagementService keeping versions and findings in memory
///
/// Every call is appended to `calls` so tests can assert on ordering.
pub struct MockSecurityService {
    pub calls: Mutex<Vec<String>>,
    versions: Mutex<HashMap<(String, String), ApplicationVersion>>,
    next_version_id: Mutex<u64>,
    pub applications: HashMap<String, u64>,
    pub fail_create: bool,
    pub fail_commit: bool,
    pub attribute_outcomes: HashMap<String, AttributeOutcome>,
    pub findings: HashMap<u64, Vec<Finding>>,
    pub details: HashMap<u64, FindingDetails>,
    /// Files whose finding queries fail with a transport error
    pub failing_files: Vec<String>,
    pub bulk_requests: Mutex<Vec<BulkRequest>>,
    pub tagged: Mutex<Vec<(u64, Vec<FindingHandle>, String, String)>>,
    pub attached_tags: Mutex<Vec<String>>,
    pub known_tags: Vec<String>,
    pub tag_accepted: bool,
    pub filter_sets: Vec<FilterSet>,
    pub counts: Vec<FolderCount>,
    pub new_counts: Vec<FolderCount>,
    artifact_states: Mutex<VecDeque<String>>,
    pub artifact_scan_id: Option<u64>,
}

impl MockSecurityService {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            versions: Mutex::new(HashMap::new()),
            next_version_id: Mutex::new(100),
            applications: HashMap::new(),
            fail_create: false,
            fail_commit: false,
            attribute_outcomes: HashMap::new(),
            findings: HashMap::new(),
            details: HashMap::new(),
            failing_files: Vec::new(),
            bulk_requests: Mutex::new(Vec::new()),
            tagged: Mutex::new(Vec::new()),
            attached_tags: Mutex::new(Vec::new()),
            known_tags: Vec::new(),
            tag_accepted: true,
            filter_sets: vec![FilterSet {
                guid: "fs-1".to_string(),
                name: "Security Auditor View".to_string(),
                folders: ["Critical", "High", "Medium", "Low"]
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Folder {
                        guid: format!("folder-{}", i),
                        name: name.to_string(),
                    })
                    .collect(),
            }],
            counts: Vec::new(),
            new_counts: Vec::new(),
            artifact_states: Mutex::new(VecDeque::from(["PROCESS_COMPLETE".to_string()])),
            artifact_scan_id: Some(500),
        }
    }

    pub fn with_version(self, application: &str, version: &str, id: u64) -> Self {
        self.versions.lock().unwrap().insert(
            (application.to_string(), version.to_string()),
            ApplicationVersion {
                id: VersionId::new(id).unwrap(),
                name: version.to_string(),
                application_id: Some(1),
                application_name: application.to_string(),
                committed: true,
            },
        );
        self
    }

    pub fn with_application(mut self, name: &str, id: u64) -> Self {
        self.applications.insert(name.to_string(), id);
        self
    }

    pub fn with_findings(mut self, version: u64, findings: Vec<Finding>) -> Self {
        self.findings.insert(version, findings);
        self
    }

    pub fn with_details(mut self, finding_id: u64, details: FindingDetails) -> Self {
        self.details.insert(finding_id, details);
        self
    }

    pub fn with_failing_file(mut self, file: &str) -> Self {
        self.failing_files.push(file.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, outcome: AttributeOutcome) -> Self {
        self.attribute_outcomes.insert(name.to_string(), outcome);
        self
    }

    pub fn with_counts(mut self, counts: &[(&str, u64)]) -> Self {
        self.counts = counts.iter().map(|(f, n)| FolderCount::new(*f, *n)).collect();
        self
    }

    pub fn with_artifact_states(self, states: &[&str]) -> Self {
        *self.artifact_states.lock().unwrap() = states.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.starts_with(prefix))
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn version_count(&self) -> usize {
        self.versions.lock().unwrap().len()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn version_by_id(&self, id: VersionId) -> Option<ApplicationVersion> {
        self.versions
            .lock()
            .unwrap()
            .values()
            .find(|v| v.id == id)
            .cloned()
    }
}

impl Default for MockSecurityService {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the quoted value of `file:"..."` from a search expression
fn searched_file(search: &str) -> Option<&str> {
    let start = search.find("file:\"")? + "file:\"".len();
    let rest = &search[start..];
    rest.find('"').map(|end| &rest[..end])
}

#[async_trait]
impl SecurityManagementService for MockSecurityService {
    async fn find_application(&self, name: &str) -> Result<Option<u64>> {
        self.log(format!("find_application {}", name));
        Ok(self.applications.get(name).copied())
    }

    async fn find_version(&self, version: &VersionRef) -> Result<Option<ApplicationVersion>> {
        self.log(format!("find_version {}", version));
        let key = (version.application().to_string(), version.version().to_string());
        Ok(self.versions.lock().unwrap().get(&key).cloned())
    }

    async fn get_version(&self, id: VersionId) -> Result<ApplicationVersion> {
        self.log(format!("get_version {}", id));
        self.version_by_id(id)
            .ok_or_else(|| anyhow::anyhow!("version {} does not exist", id))
    }

    async fn create_version(
        &self,
        application: &ApplicationRef,
        version_name: &str,
    ) -> Result<VersionId> {
        self.log(format!("create_version {:?} {}", application, version_name));
        if self.fail_create {
            anyhow::bail!("HTTP 400: version name already used");
        }
        let application_name = match application {
            ApplicationRef::Name(name) => name.clone(),
            ApplicationRef::Id(id) => self
                .applications
                .iter()
                .find(|(_, app_id)| *app_id == id)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
        };
        let mut next = self.next_version_id.lock().unwrap();
        *next += 1;
        let id = VersionId::new(*next)?;
        self.versions.lock().unwrap().insert(
            (application_name.clone(), version_name.to_string()),
            ApplicationVersion {
                id,
                name: version_name.to_string(),
                application_id: None,
                application_name,
                committed: false,
            },
        );
        Ok(id)
    }

    async fn copy_version_state(&self, source: VersionId, target: VersionId) -> Result<()> {
        self.log(format!("copy_version_state {} {}", source, target));
        Ok(())
    }

    async fn copy_vulnerabilities(&self, source: VersionId, target: VersionId) -> Result<()> {
        self.log(format!("copy_vulnerabilities {} {}", source, target));
        Ok(())
    }

    async fn set_issue_template(&self, version: VersionId, template: &str) -> Result<bool> {
        self.log(format!("set_issue_template {} {}", version, template));
        Ok(true)
    }

    async fn set_attribute(
        &self,
        version: VersionId,
        assignment: &AttributeAssignment,
    ) -> Result<bool> {
        self.log(format!("set_attribute {} {}", version, assignment.name()));
        match self
            .attribute_outcomes
            .get(assignment.name())
            .copied()
            .unwrap_or(AttributeOutcome::Accepted)
        {
            AttributeOutcome::Accepted => Ok(true),
            AttributeOutcome::Rejected => Ok(false),
            AttributeOutcome::TransportError => anyhow::bail!("connection reset by peer"),
        }
    }

    async fn commit_version(&self, version: VersionId) -> Result<()> {
        self.log(format!("commit_version {}", version));
        if self.fail_commit {
            return Ok(());
        }
        for v in self.versions.lock().unwrap().values_mut() {
            if v.id == version {
                v.committed = true;
            }
        }
        Ok(())
    }

    async fn delete_version(&self, version: VersionId) -> Result<()> {
        self.log(format!("delete_version {}", version));
        self.versions.lock().unwrap().retain(|_, v| v.id != version);
        Ok(())
    }

    async fn list_findings(&self, version: VersionId, query: &FindingQuery) -> Result<Vec<Finding>> {
        self.log(format!("list_findings {}", version));
        let findings = self.findings.get(&version.value()).cloned().unwrap_or_default();
        let file = query.search.as_deref().and_then(searched_file);
        if let Some(file) = file.filter(|f| self.failing_files.iter().any(|x| x == f)) {
            anyhow::bail!("HTTP 500 while listing findings of {}", file);
        }
        Ok(findings
            .into_iter()
            .filter(|f| query.last_scan_id.is_none() || f.last_scan_id == query.last_scan_id)
            .filter(|f| match file {
                Some(file) => self
                    .details
                    .get(&f.id)
                    .and_then(|d| d.file_name.as_deref())
                    == Some(file),
                None => true,
            })
            .map(|mut f| {
                if query.embed.is_none() {
                    f.audit_values.clear();
                }
                f
            })
            .collect())
    }

    async fn finding_details(&self, finding_id: u64) -> Result<FindingDetails> {
        self.log(format!("finding_details {}", finding_id));
        self.details
            .get(&finding_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("finding {} not found", finding_id))
    }

    async fn submit_bulk(&self, requests: &[BulkRequest]) -> Result<()> {
        self.log(format!("submit_bulk {}", requests.len()));
        self.bulk_requests.lock().unwrap().extend_from_slice(requests);
        Ok(())
    }

    async fn tag_findings(
        &self,
        version: VersionId,
        findings: &[FindingHandle],
        tag_guid: &str,
        value: &str,
    ) -> Result<bool> {
        self.log(format!("tag_findings {} {}", version, findings.len()));
        self.tagged.lock().unwrap().push((
            version.value(),
            findings.to_vec(),
            tag_guid.to_string(),
            value.to_string(),
        ));
        Ok(self.tag_accepted)
    }

    async fn version_custom_tags(&self, version: VersionId) -> Result<Vec<String>> {
        self.log(format!("version_custom_tags {}", version));
        Ok(self.attached_tags.lock().unwrap().clone())
    }

    async fn custom_tag_exists(&self, tag_guid: &str) -> Result<bool> {
        self.log(format!("custom_tag_exists {}", tag_guid));
        Ok(self.known_tags.iter().any(|t| t == tag_guid))
    }

    async fn attach_custom_tag(&self, version: VersionId, tag_guid: &str) -> Result<()> {
        self.log(format!("attach_custom_tag {} {}", version, tag_guid));
        self.attached_tags.lock().unwrap().push(tag_guid.to_string());
        Ok(())
    }

    async fn find_filter_set(&self, version: VersionId, name: &str) -> Result<Option<FilterSet>> {
        self.log(format!("find_filter_set {} {}", version, name));
        Ok(self.filter_sets.iter().find(|f| f.name == name).cloned())
    }

    async fn folder_counts(
        &self,
        version: VersionId,
        filter_set_guid: &str,
        query: &IssueQuery,
    ) -> Result<Vec<FolderCount>> {
        self.log(format!("folder_counts {} {}", version, filter_set_guid));
        if query.new_only {
            Ok(self.new_counts.clone())
        } else {
            Ok(self.counts.clone())
        }
    }

    async fn security_rating(&self, version: VersionId) -> Result<f64> {
        self.log(format!("security_rating {}", version));
        Ok(4.0)
    }

    async fn upload_artifact(&self, version: VersionId, file: &Path) -> Result<Artifact> {
        self.log(format!("upload_artifact {}", version));
        if !file.exists() {
            anyhow::bail!("scan result {} was not downloaded", file.display());
        }
        Ok(Artifact {
            id: 31,
            status: "SCHED_PROCESSING".to_string(),
            scan_types: Vec::new(),
            last_scan_date: None,
            scan_id: None,
        })
    }

    async fn get_artifact(&self, artifact_id: u64) -> Result<Artifact> {
        self.log(format!("get_artifact {}", artifact_id));
        let mut states = self.artifact_states.lock().unwrap();
        let status = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().cloned()
        }
        .unwrap_or_default();
        let scan_id = if status == "PROCESS_COMPLETE" {
            self.artifact_scan_id
        } else {
            None
        };
        Ok(Artifact {
            id: artifact_id,
            status,
            scan_types: vec!["SCA".to_string()],
            last_scan_date: None,
            scan_id,
        })
    }

    async fn list_artifacts(&self, version: VersionId) -> Result<Vec<Artifact>> {
        self.log(format!("list_artifacts {}", version));
        Ok(Vec::new())
    }
}
