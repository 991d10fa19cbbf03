use crate::shared::error::PipelineError;
use std::fmt;
use std::str::FromStr;

/// One `Name=value` attribute assignment applied to a new version.
///
/// Multi-valued attributes carry a comma separated value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAssignment {
    name: String,
    value: String,
}

impl AttributeAssignment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Individual values for multi-valued attributes
    pub fn values(&self) -> Vec<&str> {
        self.value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}

impl FromStr for AttributeAssignment {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s.split_once('=').ok_or_else(|| PipelineError::Validation {
            message: format!("Attribute '{}' must be written as Name=value", s),
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PipelineError::Validation {
                message: format!("Attribute '{}' has an empty name", s),
            });
        }
        Ok(Self::new(name, value.trim()))
    }
}

impl fmt::Display for AttributeAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
