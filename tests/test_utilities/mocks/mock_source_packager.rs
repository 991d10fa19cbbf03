use async_trait::async_trait;
use scan_orchestrator::prelude::*;
use std::path::Path;
use std::sync::Mutex;

/// Mock SourcePackager writing a placeholder package
#[derive(Default)]
pub struct MockSourcePackager {
    pub received_options: Mutex<Vec<Vec<String>>>,
    pub should_fail: bool,
}

impl MockSourcePackager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SourcePackager for MockSourcePackager {
    async fn package(&self, build_options: &[String], output: &Path) -> Result<()> {
        self.received_options
            .lock()
            .unwrap()
            .push(build_options.to_vec());
        if self.should_fail {
            anyhow::bail!("Mock packager failure");
        }
        std::fs::write(output, b"PK")?;
        Ok(())
    }
}
