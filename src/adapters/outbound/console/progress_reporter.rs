use crate::ports::outbound::{ProgressReporter, StepStatus};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Mutex;
use std::time::Duration;

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with stdout output.
/// Poll ticks update an indicatif spinner; every other message first
/// clears it.
pub struct StderrProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn with_spinner(&self, update: impl FnOnce(&ProgressBar)) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("   {spinner:.green} {msg}") {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner
        });
        update(spinner);
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(spinner) = guard.take() {
                spinner.finish_and_clear();
            }
        }
    }

    /// `"<step> ..... [ Success ]"` with a coloured label
    fn step_line(step: &str, status: StepStatus) -> String {
        let label = format!("[ {} ]", status);
        let label = match status {
            StepStatus::Success => label.green().to_string(),
            StepStatus::Failure => label.red().to_string(),
            StepStatus::Exists => label.cyan().to_string(),
            StepStatus::Skipped | StepStatus::NotFound => label.yellow().to_string(),
        };
        format!("{} ..... {}", step, label)
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{}", message);
    }

    fn report_step(&self, step: &str, status: StepStatus) {
        self.clear_spinner();
        eprintln!("{}", Self::step_line(step, status));
    }

    fn report_poll(&self, job: &str, status: &str, attempt: u32) {
        let line = format!("{} ... {} (check #{})", job, status.bold(), attempt);
        self.with_spinner(|spinner| {
            spinner.println(&line);
            spinner.set_message(line);
        });
    }

    fn report_warning(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{} {}", "⚠️  Warning:".yellow(), message);
    }

    fn report_error(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{} {}", "❌ Error:".red(), message);
    }

    fn report_completion(&self, message: &str) {
        self.clear_spinner();
        eprintln!();
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_creation() {
        let reporter = StderrProgressReporter::new();
        // Can't easily test stderr output, but verify it doesn't panic
        reporter.report("Test message");
        reporter.report_poll("job-1", "PENDING", 1);
        reporter.report_poll("job-1", "COMPLETED", 2);
        reporter.report_step("Committing version", StepStatus::Success);
        reporter.report_warning("Test warning");
        reporter.report_error("Test error");
        reporter.report_completion("Test completion");
    }

    #[test]
    fn test_step_line_layout() {
        let line = StderrProgressReporter::step_line("Creating version app:1.0", StepStatus::Exists);
        assert!(line.starts_with("Creating version app:1.0 ..... "));
        assert!(line.contains("[ Exists ]"));
    }

    #[test]
    fn test_progress_reporter_default() {
        let reporter = StderrProgressReporter::default();
        reporter.report("Test message");
    }
}
