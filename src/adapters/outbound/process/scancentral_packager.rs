use crate::ports::outbound::SourcePackager;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// ScanCentralPackager adapter running `scancentral package` to bundle sources
pub struct ScanCentralPackager {
    executable: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ScanCentralPackager {
    pub const DEFAULT_EXECUTABLE: &'static str = "scancentral";

    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: None,
        }
    }

    /// Runs the packager from `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn arguments(build_options: &[String], output: &Path) -> Vec<String> {
        let mut args = vec!["package".to_string()];
        args.extend(build_options.iter().cloned());
        args.push("-o".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Default for ScanCentralPackager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXECUTABLE)
    }
}

#[async_trait]
impl SourcePackager for ScanCentralPackager {
    async fn package(&self, build_options: &[String], output: &Path) -> Result<()> {
        let args = Self::arguments(build_options, output);
        tracing::debug!(executable = %self.executable.display(), ?args, "running packager");

        let mut command = Command::new(&self.executable);
        command
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output_result = command
            .output()
            .await
            .with_context(|| format!("Failed to start {}", self.executable.display()))?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            anyhow::bail!(
                "Source packaging failed (exit code {}): {}",
                output_result.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_order() {
        let options = vec!["-bt".to_string(), "mvn".to_string()];
        let args = ScanCentralPackager::arguments(&options, Path::new("/tmp/package.zip"));
        assert_eq!(args, vec!["package", "-bt", "mvn", "-o", "/tmp/package.zip"]);
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let packager = ScanCentralPackager::new("/nonexistent/scancentral-binary");
        let err = packager
            .package(&[], Path::new("package.zip"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }
}
