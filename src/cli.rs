use clap::Parser;
use scan_orchestrator::scan_pipeline::domain::{AttributeAssignment, GateAction};
use scan_orchestrator::scan_pipeline::services::DuplicateMatchPolicy;
use std::path::PathBuf;

/// How transposition resolves several target findings sharing one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateMatchArg {
    LowestId,
    Skip,
}

impl std::str::FromStr for DuplicateMatchArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lowest-id" | "lowest" => Ok(DuplicateMatchArg::LowestId),
            "skip" => Ok(DuplicateMatchArg::Skip),
            _ => Err(format!(
                "Invalid duplicate match policy: {}. Please specify 'lowest-id' or 'skip'",
                s
            )),
        }
    }
}

impl From<DuplicateMatchArg> for DuplicateMatchPolicy {
    fn from(arg: DuplicateMatchArg) -> Self {
        match arg {
            DuplicateMatchArg::LowestId => DuplicateMatchPolicy::LowestId,
            DuplicateMatchArg::Skip => DuplicateMatchPolicy::Skip,
        }
    }
}

/// Provision a security management version, scan it and enforce the security gate
#[derive(Parser, Debug)]
#[command(name = "scan-orchestrator")]
#[command(version)]
#[command(
    about = "Provision a security management version, run a SAST scan, tag and gate its findings",
    long_about = None
)]
pub struct Args {
    /// Path to a YAML config file (defaults to ./scan-orchestrator.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the security management service
    #[arg(long, env = "SSC_URL")]
    pub ssc_url: Option<String>,

    /// CI token for the security management service
    #[arg(long, env = "SSC_TOKEN", hide_env_values = true)]
    pub ssc_token: Option<String>,

    /// Application name
    #[arg(long, env = "SSC_APP")]
    pub ssc_app: Option<String>,

    /// Application version name
    #[arg(long, env = "SSC_VERSION")]
    pub ssc_version: Option<String>,

    /// Application of the version to copy state from
    #[arg(long, env = "SSC_SOURCE_APP")]
    pub ssc_source_app: Option<String>,

    /// Version to copy state from when the target version is created
    #[arg(long, env = "SSC_SOURCE_VERSION")]
    pub ssc_source_version: Option<String>,

    /// Also copy findings and their audit values from the source version
    #[arg(long, env = "SSC_SOURCE_COPY_VULNS")]
    pub copy_vulns: bool,

    /// Issue template assigned to a new version
    #[arg(long, env = "SSC_ISSUE_TEMPLATE")]
    pub issue_template: Option<String>,

    /// Attribute set on a new version, as Name=value (repeatable)
    #[arg(long = "attribute", value_name = "NAME=VALUE")]
    pub attributes: Vec<AttributeAssignment>,

    /// GUID of the custom tag receiving the commit SHA on new findings
    #[arg(long, env = "SSC_COMMIT_CUSTOMTAG_GUID")]
    pub commit_tag_guid: Option<String>,

    /// Commit SHA written to the custom tag
    #[arg(long, env = "GITHUB_SHA")]
    pub commit_sha: Option<String>,

    /// Run a SAST scan before evaluating the gate
    #[arg(long, env = "SAST_SCAN")]
    pub sast_scan: bool,

    /// Base URL of the scan controller
    #[arg(long, env = "SAST_URL")]
    pub sast_url: Option<String>,

    /// Client auth token of the scan controller
    #[arg(long, env = "SAST_CLIENT_AUTH_TOKEN", hide_env_values = true)]
    pub sast_client_token: Option<String>,

    /// Options passed to the source packager, quoted parts kept together
    #[arg(long, env = "SAST_BUILD_OPTIONS", allow_hyphen_values = true)]
    pub sast_build_options: Option<String>,

    /// Source packager executable
    #[arg(long, env = "SC_EXECUTABLE_PATH")]
    pub packager_path: Option<PathBuf>,

    /// Security gate action: warn or block
    #[arg(long, env = "SECURITY_GATE_ACTION")]
    pub gate_action: Option<GateAction>,

    /// Filter set whose findings the security gate counts
    #[arg(long, env = "SECURITY_GATE_FILTERSET")]
    pub gate_filterset: Option<String>,

    /// Filter set used for the job summary
    #[arg(long, env = "SUMMARY_FILTERSET")]
    pub summary_filterset: Option<String>,

    /// Token for the code review platform, enables pull request decoration
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Seconds between scan status checks
    #[arg(long, env = "SCAN_POLL_INTERVAL", value_name = "SECONDS")]
    pub scan_poll_interval: Option<u64>,

    /// Seconds between artifact processing checks
    #[arg(long, env = "ARTIFACT_POLL_INTERVAL", value_name = "SECONDS")]
    pub artifact_poll_interval: Option<u64>,

    /// Seconds between pull request check run checks
    #[arg(long, env = "GHA_COMMIT_CHECKS_PULL_INTERVAL", value_name = "SECONDS")]
    pub checks_poll_interval: Option<u64>,

    /// Give up polling after this many status checks (default: poll until terminal)
    #[arg(long, value_name = "N")]
    pub max_poll_attempts: Option<u32>,

    /// Maximum concurrent requests of a batch
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Target findings sharing an issue instance id: lowest-id or skip
    #[arg(long, value_name = "POLICY")]
    pub on_duplicate_match: Option<DuplicateMatchArg>,
}

impl Args {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
