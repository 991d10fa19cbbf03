use crate::shared::Result;

/// OutputPresenter port for presenting the rendered job summary
///
/// This port abstracts the output destination (stdout, the CI job summary
/// file, etc.).
pub trait OutputPresenter {
    /// Presents rendered content to the output destination
    ///
    /// # Errors
    /// Returns an error if writing to the output destination fails
    fn present(&self, content: &str) -> Result<()>;
}
