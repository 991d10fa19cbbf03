use super::remote_job::RemoteJob;
use chrono::{DateTime, Utc};

/// Artifact states in which a freshly uploaded artifact is accepted for processing
pub const ACCEPTED_UPLOAD_STATES: &[&str] =
    &["REQUIRE_AUTH", "SCHED_PROCESSING", "PROCESSING", "PROCESSED"];

/// Sub-state values that mean the scan service did not deliver its result
const FAILED_SUB_STATES: &[&str] = &["FAILED", "ERROR_PROCESSING", "REQUIRE_AUTH"];

/// An uploaded scan result file as tracked by the remote service
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub id: u64,
    pub status: String,
    pub scan_types: Vec<String>,
    pub last_scan_date: Option<DateTime<Utc>>,
    /// First scan embedded in the artifact, available once processing completed
    pub scan_id: Option<u64>,
}

impl Artifact {
    pub fn is_accepted_upload(&self) -> bool {
        ACCEPTED_UPLOAD_STATES.contains(&self.status.as_str())
    }
}

impl RemoteJob for Artifact {
    fn status(&self) -> &str {
        &self.status
    }
}

/// Status snapshot of a submitted SAST scan job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanJobState {
    pub job_token: String,
    pub scan_state: String,
    pub upload_state: Option<String>,
    pub artifact_state: Option<String>,
}

impl ScanJobState {
    /// Returns the name and value of the first upload/artifact sub-state
    /// reporting a failure, if any.
    pub fn failed_sub_state(&self) -> Option<(&'static str, &str)> {
        let checks = [
            ("upload", self.upload_state.as_deref()),
            ("artifact processing", self.artifact_state.as_deref()),
        ];
        checks.into_iter().find_map(|(name, state)| {
            state
                .filter(|s| FAILED_SUB_STATES.contains(s))
                .map(|s| (name, s))
        })
    }
}

impl RemoteJob for ScanJobState {
    fn status(&self) -> &str {
        &self.scan_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(status: &str) -> Artifact {
        Artifact {
            id: 1,
            status: status.to_string(),
            scan_types: vec![],
            last_scan_date: None,
            scan_id: None,
        }
    }

    #[test]
    fn test_accepted_upload_states() {
        assert!(artifact("PROCESSING").is_accepted_upload());
        assert!(artifact("REQUIRE_AUTH").is_accepted_upload());
        assert!(!artifact("ERROR_PROCESSING").is_accepted_upload());
    }

    #[test]
    fn test_failed_sub_state_none_when_not_applicable() {
        let state = ScanJobState {
            job_token: "t".to_string(),
            scan_state: "COMPLETED".to_string(),
            upload_state: Some("NOT_APPLICABLE".to_string()),
            artifact_state: None,
        };
        assert_eq!(state.failed_sub_state(), None);
        assert_eq!(state.status(), "COMPLETED");
    }

    #[test]
    fn test_failed_sub_state_reports_upload_failure() {
        let state = ScanJobState {
            job_token: "t".to_string(),
            scan_state: "COMPLETED".to_string(),
            upload_state: Some("FAILED".to_string()),
            artifact_state: Some("ERROR_PROCESSING".to_string()),
        };
        assert_eq!(state.failed_sub_state(), Some(("upload", "FAILED")));
    }
}
