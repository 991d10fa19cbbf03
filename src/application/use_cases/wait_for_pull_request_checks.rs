use crate::application::dto::PollSettings;
use crate::ports::outbound::{CodeReviewPlatform, ProgressReporter};
use crate::scan_pipeline::domain::{CheckRun, CommitRef, JobState, PullRequestContext};
use crate::scan_pipeline::policies::TerminalVocabulary;
use crate::scan_pipeline::services::{BoundedFanout, Poller};
use crate::shared::Result;
use anyhow::Context;

/// WaitForPullRequestChecksUseCase - Blocks until sibling runs of this job
/// on every pull request commit have completed
///
/// Runs of the same check on other commits may still be importing their own
/// scan results; decorating before they finish would miss findings.
pub struct WaitForPullRequestChecksUseCase<'a, G, PR> {
    platform: &'a G,
    progress_reporter: &'a PR,
    fanout: BoundedFanout,
    poll: PollSettings,
}

impl<'a, G, PR> WaitForPullRequestChecksUseCase<'a, G, PR>
where
    G: CodeReviewPlatform,
    PR: ProgressReporter,
{
    pub fn new(
        platform: &'a G,
        progress_reporter: &'a PR,
        fanout: BoundedFanout,
        poll: PollSettings,
    ) -> Self {
        Self {
            platform,
            progress_reporter,
            fanout,
            poll,
        }
    }

    /// Waits for every pending sibling run.
    ///
    /// # Returns
    /// Warnings for commits whose runs could not be awaited
    pub async fn execute(&self, context: &PullRequestContext) -> Result<Vec<String>> {
        let own_job = self.platform.current_job_id(context).await?;
        let commits = self
            .platform
            .pull_request_commits(context)
            .await
            .with_context(|| format!("Failed to fetch commit list for pull {}", context.slug()))?;
        tracing::debug!(commits = commits.len(), ?own_job, "waiting for sibling check runs");

        let results = self
            .fanout
            .run(commits, |commit| async move {
                let outcome = self.wait_for_commit(context, own_job, &commit).await;
                (commit, outcome)
            })
            .await;

        let mut warnings = Vec::new();
        for (commit, result) in results {
            if let Err(e) = result {
                let message = format!(
                    "Failed to wait for check runs of commit {}: {:#}",
                    commit.short_sha(),
                    e
                );
                tracing::warn!("{}", message);
                self.progress_reporter.report_warning(&message);
                warnings.push(message);
            }
        }
        Ok(warnings)
    }

    async fn wait_for_commit(
        &self,
        context: &PullRequestContext,
        own_job: Option<u64>,
        commit: &CommitRef,
    ) -> Result<()> {
        let runs = self
            .platform
            .check_runs(context, &commit.sha, &context.job)
            .await?;
        let siblings: Vec<CheckRun> = runs
            .into_iter()
            .filter(|run| Some(run.id) != own_job)
            .collect();

        for run in siblings {
            if TerminalVocabulary::CHECK_RUN.classify(&run.status) != JobState::Pending {
                continue;
            }
            let label = format!("{}: {} [{}]", run.name, commit.message, commit.short_sha());
            let finished = Poller::new(
                "Check run",
                TerminalVocabulary::CHECK_RUN,
                self.poll.checks_policy(),
            )
            .await_terminal(
                &label,
                || self.platform.check_run(context, run.id),
                |attempt, status| self.progress_reporter.report_poll(&label, status, attempt),
            )
            .await?;
            self.progress_reporter
                .report(&format!("[{}] {} is {}", finished.id, label, finished.status));
        }
        Ok(())
    }
}
