use super::remote_job::RemoteJob;
use serde::Serialize;

/// Identifies the pull request under review and the workflow job running us
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// Branch name of the pull request head
    pub head_ref: String,
    pub run_id: u64,
    /// Check name of the current job; sibling runs share it
    pub job: String,
}

impl PullRequestContext {
    pub fn slug(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: String,
    pub message: String,
}

impl CommitRef {
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

/// First seven characters of a commit SHA
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// A file touched by a commit, with its unified-diff patch when the
/// platform provides one (binary and very large files have none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub filename: String,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub id: u64,
    pub name: String,
    pub status: String,
}

impl RemoteJob for CheckRun {
    fn status(&self) -> &str {
        &self.status
    }
}

/// An inline review comment anchored to a file line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    pub path: String,
    pub line: u32,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sha() {
        let commit = CommitRef {
            sha: "0123456789abcdef".to_string(),
            message: "fix".to_string(),
        };
        assert_eq!(commit.short_sha(), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn test_slug() {
        let context = PullRequestContext {
            owner: "acme".to_string(),
            repo: "shop".to_string(),
            number: 12,
            head_ref: "feature/login".to_string(),
            run_id: 1,
            job: "security".to_string(),
        };
        assert_eq!(context.slug(), "acme/shop#12");
    }
}
