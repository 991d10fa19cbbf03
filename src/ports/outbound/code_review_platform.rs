use crate::scan_pipeline::domain::{
    ChangedFile, CheckRun, CommitRef, PullRequestContext, ReviewComment,
};
use crate::shared::Result;
use async_trait::async_trait;

/// CodeReviewPlatform port for the pull request hosting platform
#[async_trait]
pub trait CodeReviewPlatform: Send + Sync {
    /// Commits of the pull request, oldest first
    async fn pull_request_commits(&self, context: &PullRequestContext) -> Result<Vec<CommitRef>>;

    /// Files changed by a commit, with their patches
    async fn commit_files(&self, context: &PullRequestContext, sha: &str)
        -> Result<Vec<ChangedFile>>;

    /// Check runs of a commit with the given check name
    async fn check_runs(
        &self,
        context: &PullRequestContext,
        sha: &str,
        check_name: &str,
    ) -> Result<Vec<CheckRun>>;

    async fn check_run(&self, context: &PullRequestContext, check_run_id: u64) -> Result<CheckRun>;

    /// Identifier of the job this process runs in, when the platform reports one
    async fn current_job_id(&self, context: &PullRequestContext) -> Result<Option<u64>>;

    /// Publishes one review on `commit` carrying all `comments`
    ///
    /// # Errors
    /// Returns an error if the platform rejects the review
    async fn create_review(
        &self,
        context: &PullRequestContext,
        commit: &CommitRef,
        comments: &[ReviewComment],
    ) -> Result<()>;
}
