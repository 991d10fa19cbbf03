use crate::scan_pipeline::domain::{
    AttributeAssignment, GateAction, PullRequestContext, VersionRef,
};
use crate::scan_pipeline::services::{DuplicateMatchPolicy, PollPolicy};
use std::time::Duration;

/// Filter set used for the gate and the summary when none is configured
pub const DEFAULT_FILTER_SET: &str = "Security Auditor View";

/// Poll intervals of the remote operations and the shared attempt ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub scan_interval: Duration,
    pub artifact_interval: Duration,
    pub checks_interval: Duration,
    /// `None` polls until the remote side reports a terminal status
    pub max_attempts: Option<u32>,
}

impl PollSettings {
    pub fn scan_policy(&self) -> PollPolicy {
        PollPolicy::new(self.scan_interval).with_max_attempts(self.max_attempts)
    }

    pub fn artifact_policy(&self) -> PollPolicy {
        PollPolicy::new(self.artifact_interval).with_max_attempts(self.max_attempts)
    }

    pub fn checks_policy(&self) -> PollPolicy {
        PollPolicy::new(self.checks_interval).with_max_attempts(self.max_attempts)
    }

    /// The commit read-back is either committed or failed, so one check decides it
    pub fn commit_policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::ZERO).with_max_attempts(Some(1))
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(60),
            artifact_interval: Duration::from_secs(10),
            checks_interval: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

/// Target version and how to seed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub target: VersionRef,
    /// Baseline version whose state (and optionally findings) is copied
    pub source: Option<VersionRef>,
    pub copy_vulnerabilities: bool,
    pub issue_template: Option<String>,
    pub attributes: Vec<AttributeAssignment>,
}

impl ProvisionRequest {
    pub fn new(target: VersionRef) -> Self {
        Self {
            target,
            source: None,
            copy_vulnerabilities: false,
            issue_template: None,
            attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Options passed through to the source packager
    pub build_options: Vec<String>,
}

/// Custom tag written on the findings introduced by the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub tag_guid: String,
    /// Commit SHA used as the tag value
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    pub filter_set: String,
    pub action: GateAction,
}

impl Default for GateRequest {
    fn default() -> Self {
        Self {
            filter_set: DEFAULT_FILTER_SET.to_string(),
            action: GateAction::default(),
        }
    }
}

/// PipelineRequest - Resolved configuration of one pipeline run
///
/// Built once from the config file, flags and environment, then passed
/// by reference to every stage.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub provision: ProvisionRequest,
    /// `None` skips the scan stages and goes straight to the gate
    pub sast_scan: Option<ScanRequest>,
    pub tagging: Option<TagRequest>,
    pub gate: GateRequest,
    pub summary_filter_set: String,
    /// Set when the run was triggered by a pull request
    pub pull_request: Option<PullRequestContext>,
    /// Base URL of the security management web interface, for links
    pub service_url: String,
    pub poll: PollSettings,
    pub max_concurrency: usize,
    pub duplicate_policy: DuplicateMatchPolicy,
}

impl PipelineRequest {
    pub fn new(provision: ProvisionRequest, service_url: impl Into<String>) -> Self {
        Self {
            provision,
            sast_scan: None,
            tagging: None,
            gate: GateRequest::default(),
            summary_filter_set: DEFAULT_FILTER_SET.to_string(),
            pull_request: None,
            service_url: service_url.into(),
            poll: PollSettings::default(),
            max_concurrency: 8,
            duplicate_policy: DuplicateMatchPolicy::default(),
        }
    }

    /// Link to the audit page of a version, optionally filtered
    pub fn version_url(&self, version_id: u64) -> String {
        format!(
            "{}/html/ssc/version/{}/audit",
            self.service_url.trim_end_matches('/'),
            version_id
        )
    }
}
