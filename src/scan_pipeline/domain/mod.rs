pub mod app_version;
pub mod artifact;
pub mod attribute;
pub mod diff_hunk;
pub mod filter_set;
pub mod finding;
pub mod gate;
pub mod remote_job;
pub mod review;

pub use app_version::{ApplicationRef, ApplicationVersion, VersionId, VersionRef};
pub use artifact::{Artifact, ScanJobState};
pub use attribute::AttributeAssignment;
pub use diff_hunk::{DiffHunk, LineRange};
pub use filter_set::{FilterSet, Folder, FolderCount, IssueQuery};
pub use finding::{BulkRequest, Finding, FindingDetails, FindingHandle, FindingQuery};
pub use gate::{GateAction, GateVerdict};
pub use remote_job::{JobState, RemoteJob};
pub use review::{ChangedFile, CheckRun, CommitRef, PullRequestContext, ReviewComment};
