use async_trait::async_trait;
use scan_orchestrator::prelude::*;
use scan_orchestrator::scan_pipeline::domain::{ChangedFile, CheckRun, CommitRef, ReviewComment};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Mock CodeReviewPlatform serving a fixed pull request
pub struct MockCodeReviewPlatform {
    pub commits: Vec<CommitRef>,
    pub files: HashMap<String, Vec<ChangedFile>>,
    /// Commits whose file listing fails
    pub failing_commits: Vec<String>,
    pub check_runs: HashMap<String, Vec<CheckRun>>,
    run_statuses: Mutex<HashMap<u64, VecDeque<String>>>,
    pub own_job_id: Option<u64>,
    pub reviews: Mutex<Vec<(String, Vec<ReviewComment>)>>,
    pub polled_runs: Mutex<Vec<u64>>,
}

impl MockCodeReviewPlatform {
    pub fn new() -> Self {
        Self {
            commits: Vec::new(),
            files: HashMap::new(),
            failing_commits: Vec::new(),
            check_runs: HashMap::new(),
            run_statuses: Mutex::new(HashMap::new()),
            own_job_id: None,
            reviews: Mutex::new(Vec::new()),
            polled_runs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_commit(mut self, sha: &str, files: Vec<ChangedFile>) -> Self {
        self.commits.push(CommitRef {
            sha: sha.to_string(),
            message: format!("commit {}", sha),
        });
        self.files.insert(sha.to_string(), files);
        self
    }

    pub fn with_failing_commit(mut self, sha: &str) -> Self {
        self.commits.push(CommitRef {
            sha: sha.to_string(),
            message: format!("commit {}", sha),
        });
        self.failing_commits.push(sha.to_string());
        self
    }

    /// Registers a check run whose successive `check_run` reads return `statuses`
    pub fn with_check_run(mut self, sha: &str, id: u64, initial: &str, statuses: &[&str]) -> Self {
        self.check_runs.entry(sha.to_string()).or_default().push(CheckRun {
            id,
            name: "security".to_string(),
            status: initial.to_string(),
        });
        self.run_statuses
            .lock()
            .unwrap()
            .insert(id, statuses.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_own_job(mut self, id: u64) -> Self {
        self.own_job_id = Some(id);
        self
    }

    pub fn reviews(&self) -> Vec<(String, Vec<ReviewComment>)> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn polled_runs(&self) -> Vec<u64> {
        self.polled_runs.lock().unwrap().clone()
    }
}

impl Default for MockCodeReviewPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeReviewPlatform for MockCodeReviewPlatform {
    async fn pull_request_commits(&self, _context: &PullRequestContext) -> Result<Vec<CommitRef>> {
        Ok(self.commits.clone())
    }

    async fn commit_files(&self, _context: &PullRequestContext, sha: &str) -> Result<Vec<ChangedFile>> {
        if self.failing_commits.iter().any(|c| c == sha) {
            anyhow::bail!("HTTP 502 while listing files of {}", sha);
        }
        Ok(self.files.get(sha).cloned().unwrap_or_default())
    }

    async fn check_runs(
        &self,
        _context: &PullRequestContext,
        sha: &str,
        check_name: &str,
    ) -> Result<Vec<CheckRun>> {
        Ok(self
            .check_runs
            .get(sha)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|run| run.name == check_name)
            .collect())
    }

    async fn check_run(&self, _context: &PullRequestContext, check_run_id: u64) -> Result<CheckRun> {
        self.polled_runs.lock().unwrap().push(check_run_id);
        let mut statuses = self.run_statuses.lock().unwrap();
        let queue = statuses
            .get_mut(&check_run_id)
            .ok_or_else(|| anyhow::anyhow!("unknown check run {}", check_run_id))?;
        let status = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
        .unwrap_or_else(|| "completed".to_string());
        Ok(CheckRun {
            id: check_run_id,
            name: "security".to_string(),
            status,
        })
    }

    async fn current_job_id(&self, _context: &PullRequestContext) -> Result<Option<u64>> {
        Ok(self.own_job_id)
    }

    async fn create_review(
        &self,
        _context: &PullRequestContext,
        commit: &CommitRef,
        comments: &[ReviewComment],
    ) -> Result<()> {
        self.reviews
            .lock()
            .unwrap()
            .push((commit.sha.clone(), comments.to_vec()));
        Ok(())
    }
}
