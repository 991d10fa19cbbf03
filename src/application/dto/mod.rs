/// Data Transfer Objects for application layer
///
/// DTOs carry the resolved configuration into the use cases and the
/// pipeline outcome back out to the CLI.
mod pipeline_request;
mod pipeline_response;

pub use pipeline_request::{
    GateRequest, PipelineRequest, PollSettings, ProvisionRequest, ScanRequest, TagRequest,
    DEFAULT_FILTER_SET,
};
pub use pipeline_response::{PipelineResponse, Stage, StageRecord, StageStatus};
