use crate::scan_pipeline::domain::{JobState, RemoteJob};
use crate::scan_pipeline::policies::TerminalVocabulary;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use std::future::Future;
use std::time::Duration;

/// How often a job is checked and how many checks it gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the remote service reports a terminal status
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Drives a remote job to a terminal state.
///
/// The first status check happens immediately; later checks are spaced by
/// the policy interval. Transport errors from the status accessor are
/// returned as-is and never retried.
#[derive(Debug, Clone, Copy)]
pub struct Poller<'a> {
    operation: &'a str,
    vocabulary: TerminalVocabulary,
    policy: PollPolicy,
}

impl<'a> Poller<'a> {
    pub fn new(operation: &'a str, vocabulary: TerminalVocabulary, policy: PollPolicy) -> Self {
        Self {
            operation,
            vocabulary,
            policy,
        }
    }

    /// Polls `status_of` until the job it describes is terminal.
    ///
    /// # Arguments
    /// * `job` - Job token or identifier, used in progress output and errors
    /// * `status_of` - Fetches the current job payload
    /// * `on_poll` - Called once per check with the attempt number and status
    ///
    /// # Returns
    /// The payload of the check that observed terminal success
    ///
    /// # Errors
    /// * `PipelineError::RemoteOperationFailed` on a failure or unrecognised status
    /// * `PipelineError::TimedOut` when `max_attempts` checks saw only pending statuses
    pub async fn await_terminal<T, F, Fut, O>(
        &self,
        job: &str,
        mut status_of: F,
        mut on_poll: O,
    ) -> Result<T>
    where
        T: RemoteJob,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        O: FnMut(u32, &str),
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let payload = status_of().await?;
            let status = payload.status();
            on_poll(attempt, status);

            match self.vocabulary.classify(status) {
                JobState::Succeeded => return Ok(payload),
                JobState::Failed | JobState::Unknown => {
                    return Err(PipelineError::RemoteOperationFailed {
                        operation: self.operation.to_string(),
                        job: job.to_string(),
                        status: status.to_string(),
                    }
                    .into());
                }
                JobState::Pending => {}
            }

            if self.policy.max_attempts.is_some_and(|max| attempt >= max) {
                return Err(PipelineError::TimedOut {
                    operation: self.operation.to_string(),
                    job: job.to_string(),
                    attempts: attempt,
                }
                .into());
            }

            tracing::debug!(
                operation = self.operation,
                job,
                attempt,
                "job pending, next check in {:?}",
                self.policy.interval
            );
            tokio::time::sleep(self.policy.interval).await;
        }
    }
}
