use crate::scan_pipeline::domain::JobState;

/// Status vocabulary of one kind of remote job.
///
/// Each remote operation reports progress with its own strings. A
/// vocabulary sorts them into pending, success and failure; anything it does
/// not list falls back to `unlisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalVocabulary {
    pub success: &'static [&'static str],
    pub failure: &'static [&'static str],
    pub pending: &'static [&'static str],
    pub unlisted: JobState,
}

impl TerminalVocabulary {
    /// SAST scan execution on the scan service
    pub const SCAN_EXECUTION: Self = Self {
        success: &["COMPLETED"],
        failure: &["FAILED", "FAULTED", "CANCELED", "TIMEOUT", "ABORTED"],
        pending: &["PENDING", "QUEUED", "RUNNING", "UNKNOWN_PENDING"],
        unlisted: JobState::Unknown,
    };

    /// Processing of an uploaded artifact
    pub const ARTIFACT_PROCESSING: Self = Self {
        success: &["PROCESS_COMPLETE"],
        failure: &[
            "ERROR_PROCESSING",
            "REQUIRE_AUTH",
            "ERROR_DISPATCH",
            "DELETING",
            "DELETED",
            "ERROR_DELETING",
            "PURGING",
            "PURGED",
            "ERROR_PURGING",
        ],
        pending: &[
            "SCHED_PROCESSING",
            "PROCESSING",
            "PROCESSED",
            "QUEUED_ANALYSIS",
            "REQUEUED_ANALYSIS",
            "DISPATCH_ANALYSIS",
            "DISPATCH_REAUDIT",
        ],
        unlisted: JobState::Unknown,
    };

    /// Version commit: the read-back either says committed or the commit failed
    pub const VERSION_COMMIT: Self = Self {
        success: &["COMMITTED"],
        failure: &[],
        pending: &[],
        unlisted: JobState::Failed,
    };

    /// Check runs of a pull request commit; any non-pending status is final
    pub const CHECK_RUN: Self = Self {
        success: &["completed"],
        failure: &[],
        pending: &[
            "stale",
            "in_progress",
            "queued",
            "requested",
            "waiting",
            "pending",
        ],
        unlisted: JobState::Succeeded,
    };

    pub fn classify(&self, status: &str) -> JobState {
        if self.success.contains(&status) {
            JobState::Succeeded
        } else if self.failure.contains(&status) {
            JobState::Failed
        } else if self.pending.contains(&status) {
            JobState::Pending
        } else {
            self.unlisted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_execution_vocabulary() {
        let vocab = TerminalVocabulary::SCAN_EXECUTION;
        assert_eq!(vocab.classify("PENDING"), JobState::Pending);
        assert_eq!(vocab.classify("RUNNING"), JobState::Pending);
        assert_eq!(vocab.classify("COMPLETED"), JobState::Succeeded);
        assert_eq!(vocab.classify("FAILED"), JobState::Failed);
        assert_eq!(vocab.classify("SOMETHING_NEW"), JobState::Unknown);
    }

    #[test]
    fn test_artifact_processing_vocabulary() {
        let vocab = TerminalVocabulary::ARTIFACT_PROCESSING;
        assert_eq!(vocab.classify("SCHED_PROCESSING"), JobState::Pending);
        assert_eq!(vocab.classify("PROCESS_COMPLETE"), JobState::Succeeded);
        assert_eq!(vocab.classify("ERROR_PROCESSING"), JobState::Failed);
        assert_eq!(vocab.classify(""), JobState::Unknown);
    }

    #[test]
    fn test_version_commit_vocabulary() {
        let vocab = TerminalVocabulary::VERSION_COMMIT;
        assert_eq!(vocab.classify("COMMITTED"), JobState::Succeeded);
        assert_eq!(vocab.classify("UNCOMMITTED"), JobState::Failed);
    }

    #[test]
    fn test_check_run_vocabulary() {
        let vocab = TerminalVocabulary::CHECK_RUN;
        assert_eq!(vocab.classify("in_progress"), JobState::Pending);
        assert_eq!(vocab.classify("completed"), JobState::Succeeded);
        assert_eq!(vocab.classify("action_required"), JobState::Succeeded);
    }
}
