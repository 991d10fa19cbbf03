/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (remote services, console, file system).
pub mod code_review_platform;
pub mod output_presenter;
pub mod progress_reporter;
pub mod sast_scan_service;
pub mod security_management;
pub mod source_packager;
pub mod summary_formatter;

pub use code_review_platform::CodeReviewPlatform;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::{ProgressReporter, StepStatus};
pub use sast_scan_service::SastScanService;
pub use security_management::SecurityManagementService;
pub use source_packager::SourcePackager;
pub use summary_formatter::SummaryFormatter;
