use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// SourcePackager port for bundling the working tree for a remote scan
#[async_trait]
pub trait SourcePackager: Send + Sync {
    /// Packages the sources into `output`
    ///
    /// # Arguments
    /// * `build_options` - Build tool options passed through to the packager
    /// * `output` - Path of the package file to create
    ///
    /// # Errors
    /// Returns an error if the packager cannot be started or exits unsuccessfully
    async fn package(&self, build_options: &[String], output: &Path) -> Result<()>;
}
