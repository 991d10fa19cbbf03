use async_trait::async_trait;
use scan_orchestrator::prelude::*;
use scan_orchestrator::scan_pipeline::domain::ScanJobState;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Mock SastScanService replaying a scripted sequence of scan states
///
/// The last scripted state repeats once the script is exhausted.
pub struct MockScanService {
    pub job_token: String,
    states: Mutex<VecDeque<ScanJobState>>,
    pub status_checks: Mutex<u32>,
}

impl MockScanService {
    pub fn new(job_token: &str) -> Self {
        Self {
            job_token: job_token.to_string(),
            states: Mutex::new(VecDeque::new()),
            status_checks: Mutex::new(0),
        }
    }

    pub fn with_states(self, states: &[&str]) -> Self {
        let scripted = states
            .iter()
            .map(|s| ScanJobState {
                job_token: self.job_token.clone(),
                scan_state: s.to_string(),
                upload_state: None,
                artifact_state: None,
            })
            .collect();
        *self.states.lock().unwrap() = scripted;
        self
    }

    pub fn with_final_state(self, state: ScanJobState) -> Self {
        self.states.lock().unwrap().push_back(state);
        self
    }

    pub fn status_checks(&self) -> u32 {
        *self.status_checks.lock().unwrap()
    }
}

#[async_trait]
impl SastScanService for MockScanService {
    async fn submit_scan(&self, package: &Path) -> Result<String> {
        if !package.exists() {
            anyhow::bail!("package {} was not written", package.display());
        }
        Ok(self.job_token.clone())
    }

    async fn scan_status(&self, job_token: &str) -> Result<ScanJobState> {
        assert_eq!(job_token, self.job_token);
        *self.status_checks.lock().unwrap() += 1;
        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().cloned()
        };
        state.ok_or_else(|| anyhow::anyhow!("no scan state scripted"))
    }

    async fn download_result(&self, _job_token: &str, destination: &Path) -> Result<()> {
        std::fs::write(destination, b"FPR")?;
        Ok(())
    }
}
