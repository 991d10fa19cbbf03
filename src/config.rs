//! Configuration support for scan-orchestrator.
//!
//! Provides YAML-based configuration through `scan-orchestrator.config.yml`
//! files, the workflow environment of the CI runner, and the resolution of
//! both plus the command-line flags into one `PipelineConfig`.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Args, DuplicateMatchArg};
use scan_orchestrator::application::dto::{
    GateRequest, PipelineRequest, PollSettings, ProvisionRequest, ScanRequest, TagRequest,
    DEFAULT_FILTER_SET,
};
use scan_orchestrator::scan_pipeline::domain::{
    AttributeAssignment, GateAction, PullRequestContext, VersionRef,
};
use scan_orchestrator::shared::error::PipelineError;
use scan_orchestrator::shared::Result;

const CONFIG_FILENAME: &str = "scan-orchestrator.config.yml";

const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Top-level configuration file schema.
///
/// Service tokens are not read from the file; they come from flags or the
/// environment only.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub ssc_url: Option<String>,
    pub ssc_app: Option<String>,
    pub ssc_version: Option<String>,
    pub ssc_source_app: Option<String>,
    pub ssc_source_version: Option<String>,
    pub copy_vulns: Option<bool>,
    pub issue_template: Option<String>,
    /// `Name=value` entries
    pub attributes: Option<Vec<String>>,
    pub commit_tag_guid: Option<String>,
    pub sast_scan: Option<bool>,
    pub sast_url: Option<String>,
    pub sast_build_options: Option<String>,
    pub packager_path: Option<PathBuf>,
    pub gate_action: Option<String>,
    pub gate_filterset: Option<String>,
    pub summary_filterset: Option<String>,
    pub poll: Option<PollConfig>,
    pub max_concurrency: Option<usize>,
    pub on_duplicate_match: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Poll intervals in seconds
#[derive(Debug, Deserialize, Default)]
pub struct PollConfig {
    pub scan_interval: Option<u64>,
    pub artifact_interval: Option<u64>,
    pub checks_interval: Option<u64>,
    pub max_attempts: Option<u32>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    PipelineError::InvalidConfig {
        message: message.into(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref attributes) = config.attributes {
        for (i, entry) in attributes.iter().enumerate() {
            entry
                .parse::<AttributeAssignment>()
                .map_err(|e| invalid(format!("attributes[{}]: {}", i, e)))?;
        }
    }
    if let Some(ref action) = config.gate_action {
        action.parse::<GateAction>().map_err(invalid)?;
    }
    if let Some(ref policy) = config.on_duplicate_match {
        policy.parse::<DuplicateMatchArg>().map_err(invalid)?;
    }
    if config.max_concurrency == Some(0) {
        return Err(invalid("max_concurrency must be at least 1"));
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    head_ref: String,
}

/// The workflow run environment provided by the CI runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubEnvironment {
    pub event_name: Option<String>,
    /// `owner/repo`
    pub repository: Option<String>,
    pub run_id: Option<u64>,
    pub job: Option<String>,
    pub api_url: Option<String>,
    pub step_summary: Option<PathBuf>,
    /// Pull request number and head branch, from the event payload
    pub pull_request: Option<(u64, String)>,
}

impl GitHubEnvironment {
    pub fn from_process_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads the `GITHUB_*` variables through `lookup`
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let run_id = match get("GITHUB_RUN_ID") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("GITHUB_RUN_ID is not a number: {}", raw)))?,
            ),
            None => None,
        };

        let event_name = get("GITHUB_EVENT_NAME");
        let pull_request = match (event_name.as_deref(), get("GITHUB_EVENT_PATH")) {
            (Some(name), Some(path)) if is_pull_request_event(name) => {
                read_pull_request(Path::new(&path))?
            }
            _ => None,
        };

        Ok(Self {
            event_name,
            repository: get("GITHUB_REPOSITORY"),
            run_id,
            job: get("GITHUB_JOB"),
            api_url: get("GITHUB_API_URL"),
            step_summary: get("GITHUB_STEP_SUMMARY").map(PathBuf::from),
            pull_request,
        })
    }

    /// The pull request under review, when the run was triggered by one and
    /// every identifying value is available
    pub fn pull_request_context(&self) -> Option<PullRequestContext> {
        if !self.event_name.as_deref().is_some_and(is_pull_request_event) {
            return None;
        }
        let (number, head_ref) = self.pull_request.clone()?;
        let (owner, repo) = self.repository.as_deref()?.split_once('/')?;
        match (self.run_id, self.job.clone()) {
            (Some(run_id), Some(job)) => Some(PullRequestContext {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
                head_ref,
                run_id,
                job,
            }),
            _ => {
                tracing::warn!("Pull request event without GITHUB_RUN_ID or GITHUB_JOB, pull request handling disabled");
                None
            }
        }
    }
}

fn is_pull_request_event(name: &str) -> bool {
    matches!(name, "pull_request" | "pull_request_target")
}

fn read_pull_request(path: &Path) -> Result<Option<(u64, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow event payload: {}", path.display()))?;
    let payload: EventPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse workflow event payload: {}", path.display()))?;
    Ok(payload.pull_request.map(|pr| (pr.number, pr.head.head_ref)))
}

/// Splits packager options on whitespace; double-quoted parts stay together
pub fn split_build_options(options: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in options.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    parts.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        parts.push(current);
    }
    parts
}

/// Connection settings of the scan controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SastConnection {
    pub url: String,
    pub client_token: String,
    pub packager_path: Option<PathBuf>,
}

/// PipelineConfig - everything a run needs, resolved once
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub ssc_url: String,
    pub ssc_token: String,
    /// Set when a scan was requested
    pub sast: Option<SastConnection>,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub step_summary: Option<PathBuf>,
    pub request: PipelineRequest,
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| invalid(format!("--{} is required", flag)))
}

impl PipelineConfig {
    /// Flags (and their environment variables) override the config file
    pub fn resolve(args: &Args, file: Option<ConfigFile>, github: &GitHubEnvironment) -> Result<Self> {
        let file = file.unwrap_or_default();

        let ssc_url = required(args.ssc_url.clone().or(file.ssc_url), "ssc-url")?;
        let app = required(args.ssc_app.clone().or(file.ssc_app), "ssc-app")?;
        let version = required(args.ssc_version.clone().or(file.ssc_version), "ssc-version")?;
        let ssc_token = required(args.ssc_token.clone(), "ssc-token")?;

        let pull_request = github.pull_request_context();

        let mut provision = ProvisionRequest::new(VersionRef::new(app.clone(), version)?);
        let source_app = args.ssc_source_app.clone().or(file.ssc_source_app);
        let source_version = args.ssc_source_version.clone().or(file.ssc_source_version);
        provision.source = match (source_version, &pull_request) {
            (Some(source_version), _) => {
                Some(VersionRef::new(source_app.unwrap_or_else(|| app.clone()), source_version)?)
            }
            (None, Some(context)) => Some(VersionRef::new(
                source_app.unwrap_or_else(|| app.clone()),
                context.head_ref.clone(),
            )?),
            (None, None) => None,
        };
        provision.copy_vulnerabilities = args.copy_vulns || file.copy_vulns.unwrap_or(false);
        provision.issue_template = args.issue_template.clone().or(file.issue_template);
        provision.attributes = if args.attributes.is_empty() {
            file.attributes
                .unwrap_or_default()
                .iter()
                .map(|a| a.parse::<AttributeAssignment>())
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            args.attributes.clone()
        };

        let mut request = PipelineRequest::new(provision, ssc_url.clone());

        let sast_scan = args.sast_scan || file.sast_scan.unwrap_or(false);
        let sast = if sast_scan {
            let url = required(args.sast_url.clone().or(file.sast_url), "sast-url")?;
            let client_token = required(args.sast_client_token.clone(), "sast-client-token")?;
            let options = args
                .sast_build_options
                .clone()
                .or(file.sast_build_options)
                .unwrap_or_default();
            request.sast_scan = Some(ScanRequest {
                build_options: split_build_options(&options),
            });
            Some(SastConnection {
                url,
                client_token,
                packager_path: args.packager_path.clone().or(file.packager_path),
            })
        } else {
            None
        };

        let tag_guid = args.commit_tag_guid.clone().or(file.commit_tag_guid);
        request.tagging = match (tag_guid, args.commit_sha.clone()) {
            (Some(tag_guid), Some(value)) => Some(TagRequest { tag_guid, value }),
            (Some(_), None) => {
                tracing::warn!("Commit custom tag configured without a commit SHA, tagging disabled");
                None
            }
            _ => None,
        };

        let action = match args.gate_action {
            Some(action) => action,
            None => match file.gate_action {
                Some(raw) => raw.parse::<GateAction>().map_err(invalid)?,
                None => GateAction::default(),
            },
        };
        request.gate = GateRequest {
            filter_set: args
                .gate_filterset
                .clone()
                .or(file.gate_filterset)
                .unwrap_or_else(|| DEFAULT_FILTER_SET.to_string()),
            action,
        };
        request.summary_filter_set = args
            .summary_filterset
            .clone()
            .or(file.summary_filterset)
            .unwrap_or_else(|| DEFAULT_FILTER_SET.to_string());

        request.poll = resolve_poll(args, file.poll.unwrap_or_default());

        let max_concurrency = args
            .max_concurrency
            .or(file.max_concurrency)
            .unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(invalid("--max-concurrency must be at least 1"));
        }
        request.max_concurrency = max_concurrency;

        let duplicate = match args.on_duplicate_match {
            Some(policy) => policy,
            None => match file.on_duplicate_match {
                Some(raw) => raw.parse::<DuplicateMatchArg>().map_err(invalid)?,
                None => DuplicateMatchArg::LowestId,
            },
        };
        request.duplicate_policy = duplicate.into();
        request.pull_request = pull_request;

        Ok(Self {
            ssc_url,
            ssc_token,
            sast,
            github_token: args.github_token.clone().filter(|t| !t.trim().is_empty()),
            github_api_url: github.api_url.clone(),
            step_summary: github.step_summary.clone(),
            request,
        })
    }
}

fn resolve_poll(args: &Args, file: PollConfig) -> PollSettings {
    let defaults = PollSettings::default();
    let seconds = |flag: Option<u64>, file: Option<u64>, default: Duration| {
        flag.or(file).map(Duration::from_secs).unwrap_or(default)
    };
    PollSettings {
        scan_interval: seconds(args.scan_poll_interval, file.scan_interval, defaults.scan_interval),
        artifact_interval: seconds(
            args.artifact_poll_interval,
            file.artifact_interval,
            defaults.artifact_interval,
        ),
        checks_interval: seconds(
            args.checks_poll_interval,
            file.checks_interval,
            defaults.checks_interval,
        ),
        max_attempts: args.max_poll_attempts.or(file.max_attempts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use scan_orchestrator::scan_pipeline::services::DuplicateMatchPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "scan-orchestrator",
            "--ssc-url",
            "https://ssc.example.com/ssc",
            "--ssc-token",
            "secret",
            "--ssc-app",
            "shop",
            "--ssc-version",
            "main",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn pull_request_env(dir: &TempDir) -> GitHubEnvironment {
        let event_path = dir.path().join("event.json");
        fs::write(
            &event_path,
            r#"{"action":"opened","pull_request":{"number":42,"head":{"ref":"feature/login","sha":"abc"}}}"#,
        )
        .unwrap();
        let vars: HashMap<&str, String> = HashMap::from([
            ("GITHUB_EVENT_NAME", "pull_request".to_string()),
            ("GITHUB_EVENT_PATH", event_path.display().to_string()),
            ("GITHUB_REPOSITORY", "acme/shop".to_string()),
            ("GITHUB_RUN_ID", "9001".to_string()),
            ("GITHUB_JOB", "security".to_string()),
        ]);
        GitHubEnvironment::from_vars(|k| vars.get(k).cloned()).unwrap()
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
ssc_url: https://ssc.example.com/ssc
ssc_app: shop
attributes:
  - "Accessibility=Internal Network Access Required"
gate_action: block
poll:
  scan_interval: 30
  max_attempts: 20
on_duplicate_match: skip
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.ssc_app.as_deref(), Some("shop"));
        assert_eq!(config.attributes.as_ref().map(|a| a.len()), Some(1));
        assert_eq!(config.gate_action.as_deref(), Some("block"));
        let poll = config.poll.unwrap();
        assert_eq!(poll.scan_interval, Some(30));
        assert_eq!(poll.max_attempts, Some(20));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "ssc_version: release-1\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.ssc_version.as_deref(), Some("release-1"));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");

        fs::write(&config_path, "gate_action: stop\n").unwrap();
        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Invalid security gate action"));

        fs::write(&config_path, "attributes:\n  - NoEqualsSign\n").unwrap();
        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("attributes[0]"));

        fs::write(&config_path, "max_concurrency: 0\n").unwrap();
        assert!(load_config_from_path(&config_path).is_err());
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "ssc_app: shop\nssc_token: leaked\nformat: json\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("ssc_token"));
    }

    #[test]
    fn test_split_build_options() {
        assert_eq!(
            split_build_options(r#"-bt mvn -bf "my pom.xml"  --skipBuild"#),
            vec!["-bt", "mvn", "-bf", "my pom.xml", "--skipBuild"]
        );
        assert_eq!(split_build_options(r#"-targs """#), vec!["-targs", ""]);
        assert!(split_build_options("   ").is_empty());
    }

    #[test]
    fn test_github_environment_pull_request() {
        let dir = TempDir::new().unwrap();
        let env = pull_request_env(&dir);

        let context = env.pull_request_context().unwrap();
        assert_eq!(context.owner, "acme");
        assert_eq!(context.repo, "shop");
        assert_eq!(context.number, 42);
        assert_eq!(context.head_ref, "feature/login");
        assert_eq!(context.run_id, 9001);
        assert_eq!(context.job, "security");
    }

    #[test]
    fn test_github_environment_push_has_no_pull_request() {
        let env = GitHubEnvironment::from_vars(|k| match k {
            "GITHUB_EVENT_NAME" => Some("push".to_string()),
            "GITHUB_REPOSITORY" => Some("acme/shop".to_string()),
            "GITHUB_STEP_SUMMARY" => Some("/tmp/summary.md".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(env.pull_request_context().is_none());
        assert_eq!(env.step_summary, Some(PathBuf::from("/tmp/summary.md")));
    }

    #[test]
    fn test_github_environment_invalid_run_id() {
        let result = GitHubEnvironment::from_vars(|k| match k {
            "GITHUB_RUN_ID" => Some("abc".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_minimal() {
        let config = PipelineConfig::resolve(&args(&[]), None, &GitHubEnvironment::default()).unwrap();

        assert_eq!(config.ssc_url, "https://ssc.example.com/ssc");
        assert!(config.sast.is_none());
        assert!(config.request.sast_scan.is_none());
        assert!(config.request.tagging.is_none());
        assert!(config.request.provision.source.is_none());
        assert_eq!(config.request.gate.action, GateAction::Warn);
        assert_eq!(config.request.summary_filter_set, DEFAULT_FILTER_SET);
        assert_eq!(config.request.max_concurrency, 8);
        assert_eq!(config.request.poll, PollSettings::default());
    }

    #[test]
    fn test_resolve_missing_required_input() {
        let args = Args::try_parse_from(["scan-orchestrator", "--ssc-url", "https://ssc"]).unwrap();
        let err = PipelineConfig::resolve(&args, None, &GitHubEnvironment::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let file = ConfigFile {
            ssc_version: Some("from-file".to_string()),
            gate_action: Some("block".to_string()),
            gate_filterset: Some("Quality".to_string()),
            poll: Some(PollConfig {
                scan_interval: Some(5),
                ..PollConfig::default()
            }),
            on_duplicate_match: Some("skip".to_string()),
            ..ConfigFile::default()
        };
        let config = PipelineConfig::resolve(
            &args(&["--gate-action", "warn", "--scan-poll-interval", "15"]),
            Some(file),
            &GitHubEnvironment::default(),
        )
        .unwrap();

        assert_eq!(config.request.provision.target.version(), "main");
        assert_eq!(config.request.gate.action, GateAction::Warn);
        assert_eq!(config.request.gate.filter_set, "Quality");
        assert_eq!(config.request.poll.scan_interval, Duration::from_secs(15));
        assert_eq!(config.request.duplicate_policy, DuplicateMatchPolicy::Skip);
    }

    #[test]
    fn test_resolve_scan_requires_controller() {
        let result = PipelineConfig::resolve(
            &args(&["--sast-scan"]),
            None,
            &GitHubEnvironment::default(),
        );
        assert!(result.is_err());

        let config = PipelineConfig::resolve(
            &args(&[
                "--sast-scan",
                "--sast-url",
                "https://scancentral",
                "--sast-client-token",
                "client",
                "--sast-build-options",
                "-bt none",
            ]),
            None,
            &GitHubEnvironment::default(),
        )
        .unwrap();
        assert_eq!(
            config.request.sast_scan.unwrap().build_options,
            vec!["-bt".to_string(), "none".to_string()]
        );
        assert_eq!(config.sast.unwrap().url, "https://scancentral");
    }

    #[test]
    fn test_resolve_tagging_needs_commit_sha() {
        let mut without_sha = args(&["--commit-tag-guid", "guid-1"]);
        without_sha.commit_sha = None;
        let config =
            PipelineConfig::resolve(&without_sha, None, &GitHubEnvironment::default()).unwrap();
        assert!(config.request.tagging.is_none());

        let config = PipelineConfig::resolve(
            &args(&["--commit-tag-guid", "guid-1", "--commit-sha", "abc123"]),
            None,
            &GitHubEnvironment::default(),
        )
        .unwrap();
        let tagging = config.request.tagging.unwrap();
        assert_eq!(tagging.tag_guid, "guid-1");
        assert_eq!(tagging.value, "abc123");
    }

    #[test]
    fn test_resolve_pull_request_defaults_source_to_head_ref() {
        let dir = TempDir::new().unwrap();
        let env = pull_request_env(&dir);

        let config = PipelineConfig::resolve(&args(&[]), None, &env).unwrap();
        let source = config.request.provision.source.unwrap();
        assert_eq!(source.application(), "shop");
        assert_eq!(source.version(), "feature/login");
        assert_eq!(config.request.pull_request.unwrap().number, 42);

        let config = PipelineConfig::resolve(
            &args(&["--ssc-source-version", "develop"]),
            None,
            &env,
        )
        .unwrap();
        assert_eq!(config.request.provision.source.unwrap().version(), "develop");
    }
}
