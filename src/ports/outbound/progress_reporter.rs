use std::fmt;

/// Result label shown next to a pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Failure,
    Exists,
    Skipped,
    NotFound,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepStatus::Success => "Success",
            StepStatus::Failure => "Failure",
            StepStatus::Exists => "Exists",
            StepStatus::Skipped => "Skipped",
            StepStatus::NotFound => "Not Found",
        };
        write!(f, "{}", label)
    }
}

/// ProgressReporter port for reporting progress during operations
///
/// This port abstracts user-facing progress output (e.g., to stderr).
/// Implementations must be `Send + Sync`: reports arrive from concurrent
/// fan-out tasks.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports the outcome of a named step
    ///
    /// # Arguments
    /// * `step` - Short description of the step
    /// * `status` - Outcome label
    fn report_step(&self, step: &str, status: StepStatus);

    /// Reports one status check of a polled remote job
    ///
    /// # Arguments
    /// * `job` - Job token or identifier
    /// * `status` - Status observed by this check
    /// * `attempt` - 1-based check number
    fn report_poll(&self, job: &str, status: &str, attempt: u32);

    /// Reports a degraded but non-fatal condition
    fn report_warning(&self, message: &str);

    /// Reports an error message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
