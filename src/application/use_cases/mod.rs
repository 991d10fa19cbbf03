/// Use cases module containing application business logic orchestration
mod build_summary;
mod decorate_pull_request;
mod evaluate_gate;
mod provision_version;
mod run_pipeline;
mod run_sast_scan;
mod tag_findings;
mod wait_for_pull_request_checks;

pub use build_summary::{last_scans, BuildSummaryUseCase};
pub use decorate_pull_request::{comment_body, DecorationOutcome, DecoratePullRequestUseCase};
pub use evaluate_gate::EvaluateGateUseCase;
pub use provision_version::{ProvisionOutcome, ProvisionVersionUseCase};
pub use run_pipeline::{RunPipelineUseCase, ScanCollaborators};
pub use run_sast_scan::{RunSastScanUseCase, ScanOutcome};
pub use tag_findings::TagFindingsUseCase;
pub use wait_for_pull_request_checks::WaitForPullRequestChecksUseCase;
