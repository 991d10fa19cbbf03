use crate::ports::outbound::{CodeReviewPlatform, ProgressReporter, SecurityManagementService};
use crate::scan_pipeline::domain::{
    CommitRef, FindingDetails, PullRequestContext, ReviewComment, VersionId,
};
use crate::scan_pipeline::services::{
    BoundedFanout, ChangedLineQuery, CommitMatches, FindingReconciler, MatchedFinding,
};
use crate::shared::Result;
use anyhow::Context;

/// Counts of what a decoration pass posted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationOutcome {
    pub reviewed_commits: usize,
    pub comments: usize,
    /// One entry per commit or file that could not be processed
    pub warnings: Vec<String>,
}

/// DecoratePullRequestUseCase - Posts a review per pull request commit,
/// with one inline comment per finding on a line that commit changed
///
/// Commits are processed concurrently and independently: a commit that
/// fails is reported as a warning and the others still get their review.
/// Within a commit, a file whose findings cannot be read is skipped with a
/// warning and the review carries the matches of the remaining files.
pub struct DecoratePullRequestUseCase<'a, S, G, PR> {
    security_service: &'a S,
    platform: &'a G,
    progress_reporter: &'a PR,
    fanout: BoundedFanout,
}

impl<'a, S, G, PR> DecoratePullRequestUseCase<'a, S, G, PR>
where
    S: SecurityManagementService,
    G: CodeReviewPlatform,
    PR: ProgressReporter,
{
    pub fn new(
        security_service: &'a S,
        platform: &'a G,
        progress_reporter: &'a PR,
        fanout: BoundedFanout,
    ) -> Self {
        Self {
            security_service,
            platform,
            progress_reporter,
            fanout,
        }
    }

    /// Decorates every commit of the pull request
    ///
    /// # Arguments
    /// * `version_url` - Audit page of the version, linked from each comment
    ///
    /// # Errors
    /// Only when the commit list itself cannot be fetched
    pub async fn execute(
        &self,
        context: &PullRequestContext,
        version: VersionId,
        version_url: &str,
    ) -> Result<DecorationOutcome> {
        self.progress_reporter
            .report(&format!("💬 Decorating pull request {}", context.slug()));
        let commits = self
            .platform
            .pull_request_commits(context)
            .await
            .with_context(|| format!("Failed to fetch commit list for pull {}", context.slug()))?;
        tracing::debug!(commits = commits.len(), "pull request commits fetched");

        let results = self
            .fanout
            .run(commits, |commit| async move {
                let outcome = self.decorate_commit(context, version, version_url, &commit).await;
                (commit, outcome)
            })
            .await;

        let mut outcome = DecorationOutcome::default();
        for (commit, result) in results {
            match result {
                Ok(decorated) => {
                    if decorated.comments > 0 {
                        outcome.reviewed_commits += 1;
                        outcome.comments += decorated.comments;
                    }
                    outcome.warnings.extend(decorated.warnings);
                }
                Err(e) => {
                    let message = format!("Failed to process commit {}: {:#}", commit.sha, e);
                    tracing::warn!("{}", message);
                    self.progress_reporter.report_warning(&message);
                    outcome.warnings.push(message);
                }
            }
        }

        self.progress_reporter.report(&format!(
            "Decoration finished: {} comment(s) on {} commit(s)",
            outcome.comments, outcome.reviewed_commits
        ));
        Ok(outcome)
    }

    async fn decorate_commit(
        &self,
        context: &PullRequestContext,
        version: VersionId,
        version_url: &str,
        commit: &CommitRef,
    ) -> Result<CommitDecoration> {
        let matches = self.matches_for(context, version, commit).await?;
        let comments: Vec<ReviewComment> = matches
            .matches
            .iter()
            .map(|m| ReviewComment {
                path: m.file.clone(),
                line: m.line(),
                body: comment_body(&m.details, version_url),
            })
            .collect();
        if comments.is_empty() {
            return Ok(CommitDecoration {
                comments: 0,
                warnings: matches.warnings,
            });
        }

        self.platform
            .create_review(context, &matches.commit, &comments)
            .await?;
        tracing::info!(commit = %commit.short_sha(), comments = comments.len(), "review posted");
        Ok(CommitDecoration {
            comments: comments.len(),
            warnings: matches.warnings,
        })
    }

    /// Findings of the version that lie on lines changed by `commit`
    ///
    /// # Errors
    /// Only when the files of the commit cannot be listed. A failed finding
    /// query for one file is recorded in `CommitMatches::warnings`.
    pub async fn matches_for(
        &self,
        context: &PullRequestContext,
        version: VersionId,
        commit: &CommitRef,
    ) -> Result<CommitMatches> {
        let files = self.platform.commit_files(context, &commit.sha).await?;
        let mut matches = Vec::new();
        let mut warnings = Vec::new();

        for changed in FindingReconciler::changed_line_queries(commit, &files) {
            match self.matches_in_range(version, &changed).await {
                Ok(found) => matches.extend(found),
                Err(e) => {
                    let message = format!(
                        "Failed to read findings of {} lines {}-{} in commit {}: {:#}",
                        changed.file,
                        changed.range.start(),
                        changed.range.end(),
                        commit.short_sha(),
                        e
                    );
                    tracing::warn!("{}", message);
                    self.progress_reporter.report_warning(&message);
                    warnings.push(message);
                }
            }
        }

        Ok(CommitMatches {
            commit: commit.clone(),
            matches,
            warnings,
        })
    }

    async fn matches_in_range(
        &self,
        version: VersionId,
        changed: &ChangedLineQuery,
    ) -> Result<Vec<MatchedFinding>> {
        let findings = self
            .security_service
            .list_findings(version, &changed.query)
            .await?;
        let mut matches = Vec::new();
        for finding in findings {
            let details = self.security_service.finding_details(finding.id).await?;
            if !FindingReconciler::within_range(changed.range, &details) {
                tracing::debug!(
                    finding = finding.id,
                    file = %changed.file,
                    "finding outside changed range, skipped"
                );
                continue;
            }
            matches.push(MatchedFinding {
                finding_id: finding.id,
                file: changed.file.clone(),
                range: changed.range,
                details,
            });
        }
        Ok(matches)
    }
}

/// Comments posted for one commit and the files skipped on the way
struct CommitDecoration {
    comments: usize,
    warnings: Vec<String>,
}

/// HTML body of an inline review comment
pub fn comment_body(details: &FindingDetails, version_url: &str) -> String {
    format!(
        "<p><b>Security Scanning</b> / Fortify SAST</p>\n\
         <h3>{} - {}</h3>\n\
         <p>{}</p>\n\
         <br>\n\
         <p><a href={}?q={} target=\"_blank\" rel=\"noopener noreferrer\">More detailed information</a></p>",
        details.severity,
        details.issue_name,
        details.brief,
        version_url,
        urlencoding::encode(&details.issue_instance_id)
    )
}
