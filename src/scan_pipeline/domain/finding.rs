use super::app_version::VersionId;
use super::diff_hunk::LineRange;
use serde::Serialize;
use serde_json::{json, Value};

/// A single reported vulnerability instance.
///
/// `id` and `revision` are only meaningful within the version the finding
/// was read from; `issue_instance_id` identifies the same logical defect
/// across versions and scans.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub id: u64,
    pub issue_instance_id: String,
    pub revision: u64,
    pub last_scan_id: Option<u64>,
    /// Custom tag audit records, passed through verbatim
    pub audit_values: Vec<Value>,
}

impl Finding {
    pub fn new(id: u64, issue_instance_id: impl Into<String>, revision: u64) -> Self {
        Self {
            id,
            issue_instance_id: issue_instance_id.into(),
            revision,
            last_scan_id: None,
            audit_values: Vec::new(),
        }
    }

    pub fn handle(&self) -> FindingHandle {
        FindingHandle {
            id: self.id,
            revision: self.revision,
        }
    }
}

/// The (id, revision) pair update calls use to address a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FindingHandle {
    pub id: u64,
    pub revision: u64,
}

/// Presentation fields of a finding, used for review comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindingDetails {
    pub issue_instance_id: String,
    pub issue_name: String,
    pub brief: String,
    pub severity: String,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
}

/// Scope and projection of a finding listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindingQuery {
    /// Issue search expression
    pub search: Option<String>,
    pub fields: Option<String>,
    pub embed: Option<String>,
    /// Keep only findings last seen by this scan
    pub last_scan_id: Option<u64>,
}

impl FindingQuery {
    /// Identity projection used to match findings across versions
    pub fn identities() -> Self {
        Self {
            fields: Some("id,issueInstanceId,revision".to_string()),
            ..Self::default()
        }
    }

    /// Identities plus their custom tag audit values
    pub fn identities_with_audit() -> Self {
        Self {
            embed: Some("auditValues".to_string()),
            ..Self::identities()
        }
    }

    /// Findings introduced by the given scan
    pub fn new_in_scan(scan_id: u64) -> Self {
        Self {
            search: Some("[issue age]:NEW".to_string()),
            fields: Some("id,issueInstanceId,revision,lastScanId".to_string()),
            embed: None,
            last_scan_id: Some(scan_id),
        }
    }

    /// SAST findings located in `file` within `range`, attributed to `commit`
    pub fn changed_lines(file: &str, range: LineRange, commit: &str) -> Self {
        Self {
            search: Some(format!(
                "[analysis type]:\"sca\" AND file:\"{}\" AND line:[{},{}] AND commit:{}",
                file,
                range.start(),
                range.end(),
                commit
            )),
            fields: Some("id,issueInstanceId".to_string()),
            embed: None,
            last_scan_id: None,
        }
    }
}

/// One entry of a bulk submission; `uri` is relative to the service root
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub http_verb: String,
    pub uri: String,
    pub post_data: Value,
}

impl BulkRequest {
    /// Re-applies `audit_values` to one finding of `version`
    pub fn audit(version: VersionId, handle: FindingHandle, audit_values: &[Value]) -> Self {
        Self {
            http_verb: "POST".to_string(),
            uri: format!("/api/v1/projectVersions/{}/issues/action/audit", version),
            post_data: json!({
                "issues": [handle],
                "customTagAudit": audit_values,
            }),
        }
    }
}
