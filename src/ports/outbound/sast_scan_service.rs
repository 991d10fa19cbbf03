use crate::scan_pipeline::domain::ScanJobState;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// SastScanService port for the remote static analysis execution service
#[async_trait]
pub trait SastScanService: Send + Sync {
    /// Submits a source package for scanning
    ///
    /// # Arguments
    /// * `package` - Path to the packaged sources
    ///
    /// # Returns
    /// The job token identifying the submitted scan
    ///
    /// # Errors
    /// Returns an error if the upload fails or the service does not
    /// acknowledge the submission
    async fn submit_scan(&self, package: &Path) -> Result<String>;

    /// Reads the current state of a scan job
    async fn scan_status(&self, job_token: &str) -> Result<ScanJobState>;

    /// Downloads the result file of a completed scan to `destination`
    async fn download_result(&self, job_token: &str, destination: &Path) -> Result<()>;
}
