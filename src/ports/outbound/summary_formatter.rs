use crate::application::read_models::JobSummary;
use crate::shared::Result;

/// SummaryFormatter port for rendering the job summary
pub trait SummaryFormatter {
    /// Renders the summary read model
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn format(&self, summary: &JobSummary) -> Result<String>;
}
