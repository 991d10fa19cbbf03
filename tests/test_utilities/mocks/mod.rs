/// Mock implementations for testing
mod mock_code_review_platform;
mod mock_progress_reporter;
mod mock_scan_service;
mod mock_security_service;
mod mock_source_packager;

pub use mock_code_review_platform::MockCodeReviewPlatform;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_scan_service::MockScanService;
pub use mock_security_service::{AttributeOutcome, MockSecurityService};
pub use mock_source_packager::MockSourcePackager;
