mod cli;
mod config;

use cli::Args;
use config::{discover_config, load_config_from_path, GitHubEnvironment, PipelineConfig};
use scan_orchestrator::adapters::outbound::console::StderrProgressReporter;
use scan_orchestrator::adapters::outbound::filesystem::{JobSummaryWriter, StdoutPresenter};
use scan_orchestrator::adapters::outbound::formatters::MarkdownSummaryFormatter;
use scan_orchestrator::adapters::outbound::network::{
    CachingSecurityManagementService, GitHubClient, ScanCentralClient, SscRestClient,
};
use scan_orchestrator::adapters::outbound::process::ScanCentralPackager;
use scan_orchestrator::application::use_cases::{RunPipelineUseCase, ScanCollaborators};
use scan_orchestrator::ports::outbound::OutputPresenter;
use scan_orchestrator::shared::error::ExitCode;
use scan_orchestrator::shared::Result;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Where the rendered job summary goes
enum SummaryTarget {
    JobSummary(JobSummaryWriter),
    Stdout(StdoutPresenter),
}

impl OutputPresenter for SummaryTarget {
    fn present(&self, content: &str) -> Result<()> {
        match self {
            SummaryTarget::JobSummary(writer) => writer.present(content),
            SummaryTarget::Stdout(presenter) => presenter.present(content),
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scan_orchestrator=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let file = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&PathBuf::from("."))?,
    };
    let github = GitHubEnvironment::from_process_env()?;
    let config = PipelineConfig::resolve(&args, file, &github)?;

    // Create adapters (Dependency Injection)
    let security_service =
        CachingSecurityManagementService::new(SscRestClient::new(&config.ssc_url, &config.ssc_token)?);

    let scan = match &config.sast {
        Some(sast) => Some(ScanCollaborators {
            packager: sast
                .packager_path
                .clone()
                .map(ScanCentralPackager::new)
                .unwrap_or_default(),
            scan_service: ScanCentralClient::new(&sast.url, &sast.client_token)?,
        }),
        None => None,
    };

    let platform = match (&config.request.pull_request, &config.github_token) {
        (Some(_), Some(token)) => {
            let api_url = config
                .github_api_url
                .as_deref()
                .unwrap_or(GitHubClient::DEFAULT_API_URL);
            Some(GitHubClient::new(api_url, token)?)
        }
        (Some(context), None) => {
            tracing::warn!(
                pull_request = %context.slug(),
                "No GitHub token available, pull request decoration disabled"
            );
            None
        }
        _ => None,
    };

    let presenter = match &config.step_summary {
        Some(path) => SummaryTarget::JobSummary(JobSummaryWriter::new(path.clone())),
        None => SummaryTarget::Stdout(StdoutPresenter::new()),
    };

    // Create use case with injected dependencies
    let use_case = RunPipelineUseCase::new(
        security_service,
        scan,
        platform,
        MarkdownSummaryFormatter::new(),
        presenter,
        StderrProgressReporter::new(),
    );

    let response = use_case.execute(&config.request).await;
    tracing::debug!(stages = ?response.stages, "pipeline finished");

    Ok(response.exit_code())
}
