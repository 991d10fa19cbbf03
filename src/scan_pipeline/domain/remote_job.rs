/// Classification of a remote job status.
///
/// A job is in exactly one of these at any observation; only `Pending`
/// means it has to be polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Succeeded,
    Failed,
    /// A status outside the known vocabulary; handled like a failure
    Unknown,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

/// Any asynchronous unit of remote work whose progress is read as a status string
pub trait RemoteJob {
    /// The service-defined status string of the latest observation
    fn status(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!JobState::Pending.is_terminal());
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Unknown.is_terminal());
    }
}
