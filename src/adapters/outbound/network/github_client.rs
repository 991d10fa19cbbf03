use crate::ports::outbound::CodeReviewPlatform;
use crate::scan_pipeline::domain::review::short_sha;
use crate::scan_pipeline::domain::{
    ChangedFile, CheckRun, CommitRef, PullRequestContext, ReviewComment,
};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitWithFiles {
    #[serde(default)]
    files: Vec<GitHubFile>,
}

#[derive(Debug, Deserialize)]
struct GitHubFile {
    filename: String,
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubCheckRuns {
    #[serde(default)]
    check_runs: Vec<GitHubCheckRun>,
}

#[derive(Debug, Deserialize)]
struct GitHubCheckRun {
    id: u64,
    name: String,
    status: String,
}

impl From<GitHubCheckRun> for CheckRun {
    fn from(run: GitHubCheckRun) -> Self {
        CheckRun {
            id: run.id,
            name: run.name,
            status: run.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubJobs {
    #[serde(default)]
    jobs: Vec<GitHubJob>,
}

#[derive(Debug, Deserialize)]
struct GitHubJob {
    id: u64,
    #[serde(default)]
    name: String,
}

/// GitHubClient adapter for the pull request REST API
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("scan-orchestrator/{}", version);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn repo_path(context: &PullRequestContext) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(&context.owner),
            urlencoding::encode(&context.repo)
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Failed to send request: {}", path))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "GitHub API returned status code {} for {}",
                response.status(),
                path
            );
        }
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))
    }

    fn review_body(commit: &CommitRef) -> String {
        format!(
            "Security scanning found potential problems in commit {}",
            short_sha(&commit.sha)
        )
    }
}

#[async_trait]
impl CodeReviewPlatform for GitHubClient {
    async fn pull_request_commits(&self, context: &PullRequestContext) -> Result<Vec<CommitRef>> {
        let path = format!(
            "{}/pulls/{}/commits?per_page=100",
            Self::repo_path(context),
            context.number
        );
        let commits: Vec<GitHubCommit> = self.get(&path).await.with_context(|| {
            format!("Failed to fetch commit list for pull {}", context.slug())
        })?;
        Ok(commits
            .into_iter()
            .map(|c| CommitRef {
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }

    async fn commit_files(
        &self,
        context: &PullRequestContext,
        sha: &str,
    ) -> Result<Vec<ChangedFile>> {
        let path = format!(
            "{}/commits/{}",
            Self::repo_path(context),
            urlencoding::encode(sha)
        );
        let commit: GitHubCommitWithFiles = self.get(&path).await?;
        Ok(commit
            .files
            .into_iter()
            .map(|f| ChangedFile {
                filename: f.filename,
                patch: f.patch,
            })
            .collect())
    }

    async fn check_runs(
        &self,
        context: &PullRequestContext,
        sha: &str,
        check_name: &str,
    ) -> Result<Vec<CheckRun>> {
        let path = format!(
            "{}/commits/{}/check-runs?check_name={}",
            Self::repo_path(context),
            urlencoding::encode(sha),
            urlencoding::encode(check_name)
        );
        let runs: GitHubCheckRuns = self.get(&path).await?;
        Ok(runs.check_runs.into_iter().map(CheckRun::from).collect())
    }

    async fn check_run(&self, context: &PullRequestContext, check_run_id: u64) -> Result<CheckRun> {
        let path = format!("{}/check-runs/{}", Self::repo_path(context), check_run_id);
        let run: GitHubCheckRun = self.get(&path).await?;
        Ok(run.into())
    }

    async fn current_job_id(&self, context: &PullRequestContext) -> Result<Option<u64>> {
        let path = format!(
            "{}/actions/runs/{}/jobs",
            Self::repo_path(context),
            context.run_id
        );
        let jobs: GitHubJobs = self.get(&path).await?;
        let by_name = jobs.jobs.iter().find(|j| j.name == context.job).map(|j| j.id);
        Ok(by_name.or_else(|| jobs.jobs.first().map(|j| j.id)))
    }

    async fn create_review(
        &self,
        context: &PullRequestContext,
        commit: &CommitRef,
        comments: &[ReviewComment],
    ) -> Result<()> {
        let path = format!("{}/pulls/{}/reviews", Self::repo_path(context), context.number);
        let body = json!({
            "commit_id": commit.sha,
            "body": Self::review_body(commit),
            "event": "COMMENT",
            "comments": comments,
        });

        let response = self
            .client
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send request: {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "GitHub rejected the review on commit {}: {} {}",
                commit.short_sha(),
                status,
                text
            );
        }
        Ok(())
    }
}
