/// A folder of a filter set (e.g. a severity bucket such as "Critical")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub guid: String,
    pub name: String,
}

/// A named grouping configuration partitioning findings into folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub guid: String,
    pub name: String,
    pub folders: Vec<Folder>,
}

impl FilterSet {
    pub fn folder_names(&self) -> Vec<&str> {
        self.folders.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Number of findings grouped under one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderCount {
    pub folder: String,
    pub total_count: u64,
}

impl FolderCount {
    pub fn new(folder: impl Into<String>, total_count: u64) -> Self {
        Self {
            folder: folder.into(),
            total_count,
        }
    }

    /// Count for `folder` in a grouping result, 0 when the folder is absent
    pub fn count_for(counts: &[FolderCount], folder: &str) -> u64 {
        counts
            .iter()
            .find(|c| c.folder == folder)
            .map(|c| c.total_count)
            .unwrap_or(0)
    }
}

/// Restricts which findings are counted in a folder grouping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    pub new_only: bool,
    pub analysis_type: Option<String>,
}

impl IssueQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new_issues() -> Self {
        Self {
            new_only: true,
            analysis_type: None,
        }
    }

    pub fn with_analysis_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = Some(analysis_type.into());
        self
    }

    /// Search expression understood by the issue search endpoint,
    /// `None` when nothing restricts the query.
    pub fn search_expression(&self) -> Option<String> {
        let mut terms = Vec::new();
        if self.new_only {
            terms.push("[issue age]:NEW".to_string());
        }
        if let Some(analysis_type) = &self.analysis_type {
            let engine = match analysis_type.as_str() {
                "SAST" => "SCA",
                "DAST" => "WEBINSPECT",
                other => other,
            };
            terms.push(format!("[analysis type]:{}", engine));
        }
        if terms.is_empty() {
            None
        } else {
            Some(terms.join(" AND "))
        }
    }
}
