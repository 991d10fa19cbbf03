//! scan-orchestrator - CI pipeline driver for a security management service
//!
//! This library provisions an application version on the security management
//! service, runs a remote SAST scan against it, reconciles findings across
//! versions and pull request diffs, tags new findings and enforces a security
//! gate, following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`scan_pipeline`): Domain model, status vocabularies,
//!   polling and finding reconciliation
//! - **Application Layer** (`application`): Use cases and the pipeline coordinator
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use scan_orchestrator::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let security_service =
//!     CachingSecurityManagementService::new(SscRestClient::new("https://ssc.example.com/ssc", "token")?);
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case; no scan and no pull request decoration
//! let use_case = RunPipelineUseCase::new(
//!     security_service,
//!     None::<ScanCollaborators<ScanCentralPackager, ScanCentralClient>>,
//!     None::<GitHubClient>,
//!     MarkdownSummaryFormatter::new(),
//!     StdoutPresenter::new(),
//!     progress_reporter,
//! );
//!
//! // Execute
//! let target = VersionRef::new("shop", "main")?;
//! let request = PipelineRequest::new(ProvisionRequest::new(target), "https://ssc.example.com/ssc");
//! let response = use_case.execute(&request).await;
//! std::process::exit(response.exit_code().as_i32());
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod scan_pipeline;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{JobSummaryWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::MarkdownSummaryFormatter;
    pub use crate::adapters::outbound::network::{
        CachingSecurityManagementService, GitHubClient, ScanCentralClient, SscRestClient,
    };
    pub use crate::adapters::outbound::process::ScanCentralPackager;
    pub use crate::application::dto::{
        GateRequest, PipelineRequest, PipelineResponse, PollSettings, ProvisionRequest,
        ScanRequest, Stage, StageStatus, TagRequest,
    };
    pub use crate::application::read_models::{GateStatus, JobSummary};
    pub use crate::application::use_cases::{RunPipelineUseCase, ScanCollaborators};
    pub use crate::ports::outbound::{
        CodeReviewPlatform, OutputPresenter, ProgressReporter, SastScanService,
        SecurityManagementService, SourcePackager, StepStatus, SummaryFormatter,
    };
    pub use crate::scan_pipeline::domain::{
        AttributeAssignment, FindingHandle, GateAction, GateVerdict, PullRequestContext,
        VersionId, VersionRef,
    };
    pub use crate::scan_pipeline::services::{
        BoundedFanout, DuplicateMatchPolicy, FindingReconciler, GateEvaluator, PollPolicy, Poller,
    };
    pub use crate::shared::error::{ExitCode, PipelineError};
    pub use crate::shared::Result;
}
