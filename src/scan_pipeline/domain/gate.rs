use std::fmt;

/// What a failed security gate does to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateAction {
    /// Log the failure and continue
    #[default]
    Warn,
    /// Mark the whole run as failed (reporting still runs)
    Block,
}

impl std::str::FromStr for GateAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(GateAction::Warn),
            "block" => Ok(GateAction::Block),
            _ => Err(format!(
                "Invalid security gate action: {}. Please specify 'warn' or 'block'",
                s
            )),
        }
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateAction::Warn => write!(f, "warn"),
            GateAction::Block => write!(f, "block"),
        }
    }
}

/// Outcome of a gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict {
    pub total: u64,
    pub passed: bool,
    pub action: GateAction,
}

impl GateVerdict {
    /// Whether this verdict fails the overall run
    pub fn blocks_run(&self) -> bool {
        !self.passed && self.action == GateAction::Block
    }
}
