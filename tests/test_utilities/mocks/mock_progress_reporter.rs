use scan_orchestrator::prelude::*;

/// Mock ProgressReporter for testing that captures messages
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    pub messages: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.get_messages()
            .into_iter()
            .filter(|m| m.starts_with("Warning: "))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.get_messages().iter().any(|m| m.contains(needle))
    }

    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(message.to_string());
    }

    fn report_step(&self, step: &str, status: StepStatus) {
        self.push(format!("{} [{}]", step, status));
    }

    fn report_poll(&self, job: &str, status: &str, attempt: u32) {
        self.push(format!("Poll #{} {}: {}", attempt, job, status));
    }

    fn report_warning(&self, message: &str) {
        self.push(format!("Warning: {}", message));
    }

    fn report_error(&self, message: &str) {
        self.push(format!("Error: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.push(format!("Completed: {}", message));
    }
}
