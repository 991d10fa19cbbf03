use crate::ports::outbound::SastScanService;
use crate::scan_pipeline::domain::ScanJobState;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusResponse {
    #[serde(alias = "jobState")]
    scan_state: String,
    ssc_upload_state: Option<String>,
    ssc_artifact_state: Option<String>,
}

/// ScanCentralClient adapter for the remote SAST execution controller
pub struct ScanCentralClient {
    client: reqwest::Client,
    base_url: String,
    client_token: String,
}

impl ScanCentralClient {
    const TIMEOUT_SECONDS: u64 = 300;
    /// Client version announced to the controller on submission
    const CLIENT_VERSION: &'static str = "23.2.0";

    pub fn new(base_url: &str, client_token: &str) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("scan-orchestrator/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_token: client_token.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("fortify-client", &self.client_token)
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Scan controller returned status code {} for {}: {}",
                status,
                what,
                body
            );
        }
        Ok(response)
    }

    /// Path segment of a job token, rejecting anything that could escape it
    fn job_segment(job_token: &str) -> Result<String> {
        if job_token.is_empty() || job_token.contains(['/', '\\', '?', '#']) {
            return Err(PipelineError::Validation {
                message: format!("Invalid scan job token: {:?}", job_token),
            }
            .into());
        }
        Ok(urlencoding::encode(job_token).into_owned())
    }
}

#[async_trait]
impl SastScanService for ScanCentralClient {
    async fn submit_scan(&self, package: &Path) -> Result<String> {
        let bytes = tokio::fs::read(package)
            .await
            .with_context(|| format!("Failed to read package {}", package.display()))?;
        let form = reqwest::multipart::Form::new()
            .text("clientVersion", Self::CLIENT_VERSION)
            .text("scaVersion", Self::CLIENT_VERSION)
            .text("jobType", "TRANSLATION_AND_SCAN_JOB")
            .part(
                "zipFile",
                reqwest::multipart::Part::bytes(bytes).file_name("package.zip"),
            );

        let response = self
            .request(reqwest::Method::POST, "/rest/v2/job")
            .multipart(form)
            .send()
            .await
            .context("Failed to submit scan package")?;
        let response = Self::check(response, "scan submission").await?;
        let submitted: SubmitResponse = response
            .json()
            .await
            .context("Failed to parse scan submission response")?;

        submitted.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            PipelineError::UnexpectedResponse {
                operation: "scan submission".to_string(),
                details: submitted
                    .message
                    .unwrap_or_else(|| "no job token returned".to_string()),
            }
            .into()
        })
    }

    async fn scan_status(&self, job_token: &str) -> Result<ScanJobState> {
        let path = format!("/rest/v3/job/{}/status", Self::job_segment(job_token)?);
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("Failed to read status of scan {}", job_token))?;
        let response = Self::check(response, "scan status").await?;
        let status: JobStatusResponse = response
            .json()
            .await
            .context("Failed to parse scan status response")?;

        Ok(ScanJobState {
            job_token: job_token.to_string(),
            scan_state: status.scan_state,
            upload_state: status.ssc_upload_state,
            artifact_state: status.ssc_artifact_state,
        })
    }

    async fn download_result(&self, job_token: &str, destination: &Path) -> Result<()> {
        let path = format!("/rest/v2/job/{}/FPR", Self::job_segment(job_token)?);
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("Failed to download result of scan {}", job_token))?;
        let response = Self::check(response, "scan result download").await?;
        let bytes = response.bytes().await?;
        tokio::fs::write(destination, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        tracing::debug!(job_token, bytes = bytes.len(), "scan result downloaded");
        Ok(())
    }
}
