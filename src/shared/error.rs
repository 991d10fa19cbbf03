use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a blocking
/// security gate and a broken pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - pipeline completed and the gate passed (or only warned)
    Success = 0,
    /// The security gate failed while configured to block
    GateFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (provisioning, scan, transport, configuration, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::GateFailed => write!(f, "Security Gate Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Pipeline-specific errors.
///
/// Raised as `anyhow::Error` like every other failure in the crate; callers
/// that need to branch on the kind recover it with `downcast_ref`.
/// Transport failures (network, non-2xx, malformed payloads) are not listed
/// here: they travel as plain `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A polled job reached a terminal-failure or unrecognised status
    #[error("{operation} failed (job: {job}): remote service reported status {status}")]
    RemoteOperationFailed {
        operation: String,
        job: String,
        status: String,
    },

    /// A polled job was still pending when the attempt ceiling was reached
    #[error("{operation} timed out (job: {job}) after {attempts} status check(s)\n\n💡 Hint: Increase --max-poll-attempts or the poll interval")]
    TimedOut {
        operation: String,
        job: String,
        attempts: u32,
    },

    #[error("Failed to provision application version {app}:{version}\nReason: {reason}")]
    ProvisioningFailed {
        app: String,
        version: String,
        reason: String,
    },

    #[error("Failed to commit application version {version_id}\nReason: {reason}")]
    CommitFailed { version_id: u64, reason: String },

    /// The remote service answered, but not with what the call expects
    #[error("Unexpected response for {operation}: {details}")]
    UnexpectedResponse { operation: String, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: Check the command-line flags, environment variables and config file")]
    InvalidConfig { message: String },

    /// Validation error for value objects
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl PipelineError {
    /// The observed status for poll failures, if this is one
    pub fn remote_status(&self) -> Option<&str> {
        match self {
            PipelineError::RemoteOperationFailed { status, .. } => Some(status),
            _ => None,
        }
    }
}
