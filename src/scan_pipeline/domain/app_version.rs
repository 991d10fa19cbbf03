use super::remote_job::RemoteJob;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use std::fmt;

/// Maximum length for application and version names
const MAX_NAME_LENGTH: usize = 255;

/// Status string reported for a committed version
pub const COMMITTED: &str = "COMMITTED";

/// Status string reported for a version that is still being configured
pub const UNCOMMITTED: &str = "UNCOMMITTED";

/// Identifier assigned to an application version by the remote service.
///
/// Only positive identifiers exist; the service's `-1` "does not exist"
/// sentinel is represented as `None` wherever a lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(u64);

impl VersionId {
    pub fn new(id: u64) -> Result<Self> {
        if id == 0 {
            return Err(PipelineError::Validation {
                message: "Application version id must be positive".to_string(),
            }
            .into());
        }
        Ok(Self(id))
    }

    /// Converts a raw service identifier, treating `<= 0` as "does not exist"
    pub fn from_raw(id: i64) -> Option<Self> {
        u64::try_from(id).ok().filter(|id| *id > 0).map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An (application name, version name) pair used for lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRef {
    application: String,
    version: String,
}

impl VersionRef {
    pub fn new(application: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let application = application.into();
        let version = version.into();
        validate_name(&application, "Application name")?;
        validate_name(&version, "Version name")?;
        Ok(Self {
            application,
            version,
        })
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.application, self.version)
    }
}

fn validate_name(name: &str, kind: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PipelineError::Validation {
            message: format!("{} cannot be empty", kind),
        }
        .into());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(PipelineError::Validation {
            message: format!(
                "{} is too long ({} bytes). Maximum allowed: {} bytes",
                kind,
                name.len(),
                MAX_NAME_LENGTH
            ),
        }
        .into());
    }
    Ok(())
}

/// Owning application of a version about to be created.
///
/// An existing application is referenced by id; an unknown one by name, in
/// which case the service creates it together with the version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationRef {
    Id(u64),
    Name(String),
}

/// A named, versioned scan target as reported by the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationVersion {
    pub id: VersionId,
    pub name: String,
    pub application_id: Option<u64>,
    pub application_name: String,
    pub committed: bool,
}

impl ApplicationVersion {
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.application_name, self.name)
    }
}

/// A version's commit flag is the job status driven by the commit poll
impl RemoteJob for ApplicationVersion {
    fn status(&self) -> &str {
        if self.committed {
            COMMITTED
        } else {
            UNCOMMITTED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_id_from_raw_sentinel() {
        assert_eq!(VersionId::from_raw(-1), None);
        assert_eq!(VersionId::from_raw(0), None);
        assert_eq!(VersionId::from_raw(12).map(|id| id.value()), Some(12));
    }

    #[test]
    fn test_version_id_new_rejects_zero() {
        assert!(VersionId::new(0).is_err());
        assert_eq!(VersionId::new(3).unwrap().to_string(), "3");
    }

    #[test]
    fn test_version_ref_display() {
        let version_ref = VersionRef::new("Bench", "1.0").unwrap();
        assert_eq!(version_ref.to_string(), "Bench:1.0");
        assert_eq!(version_ref.application(), "Bench");
        assert_eq!(version_ref.version(), "1.0");
    }

    #[test]
    fn test_version_ref_rejects_blank_names() {
        assert!(VersionRef::new("", "1.0").is_err());
        assert!(VersionRef::new("Bench", "   ").is_err());
    }

    #[test]
    fn test_version_ref_rejects_long_names() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        let err = VersionRef::new(long, "1.0").unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_commit_status() {
        let mut version = ApplicationVersion {
            id: VersionId::new(1).unwrap(),
            name: "1.0".to_string(),
            application_id: Some(9),
            application_name: "Bench".to_string(),
            committed: false,
        };
        assert_eq!(version.status(), UNCOMMITTED);
        version.committed = true;
        assert_eq!(version.status(), COMMITTED);
        assert_eq!(version.display_name(), "Bench:1.0");
    }
}
