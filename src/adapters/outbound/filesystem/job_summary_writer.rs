use crate::ports::outbound::OutputPresenter;
use crate::shared::Result;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// JobSummaryWriter adapter appending the summary to the CI job summary file
///
/// The file is shared with the other steps of the job, so content is
/// appended, never truncated.
pub struct JobSummaryWriter {
    summary_path: PathBuf,
}

impl JobSummaryWriter {
    pub fn new(summary_path: PathBuf) -> Self {
        Self { summary_path }
    }

    /// Refuses to follow a symlink at the summary path
    fn validate_output_security(&self) -> Result<()> {
        if let Ok(metadata) = fs::symlink_metadata(&self.summary_path) {
            if metadata.is_symlink() {
                anyhow::bail!(
                    "Security: job summary path {} is a symbolic link. For security reasons, writing to symbolic links is not allowed.",
                    self.summary_path.display()
                );
            }
        }
        Ok(())
    }
}

impl OutputPresenter for JobSummaryWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_output_security()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.summary_path)
            .with_context(|| {
                format!(
                    "Failed to open job summary file {}",
                    self.summary_path.display()
                )
            })?;
        file.write_all(content.as_bytes()).with_context(|| {
            format!(
                "Failed to write job summary file {}",
                self.summary_path.display()
            )
        })?;

        tracing::debug!(path = %self.summary_path.display(), "job summary written");
        Ok(())
    }
}
