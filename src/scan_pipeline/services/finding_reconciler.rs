use crate::scan_pipeline::domain::{
    ChangedFile, CommitRef, DiffHunk, Finding, FindingDetails, FindingQuery, LineRange,
};
use std::collections::HashMap;

/// What to do when several target findings share one `issueInstanceId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateMatchPolicy {
    /// Match the duplicate with the lowest identifier
    #[default]
    LowestId,
    /// Treat the identity as ambiguous and leave the source finding unmatched
    Skip,
}

/// One finding query per changed-line range of a file in a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedLineQuery {
    pub file: String,
    pub range: LineRange,
    pub query: FindingQuery,
}

/// A finding located inside a changed-line range of a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFinding {
    pub finding_id: u64,
    pub file: String,
    pub range: LineRange,
    pub details: FindingDetails,
}

impl MatchedFinding {
    /// Line the review comment anchors to: the reported line, else the range start
    pub fn line(&self) -> u32 {
        self.details.line_number.unwrap_or(self.range.start())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMatches {
    pub commit: CommitRef,
    pub matches: Vec<MatchedFinding>,
    /// Files whose findings could not be read; their matches are missing
    pub warnings: Vec<String>,
}

/// Matches findings by their version-stable `issueInstanceId`
#[derive(Debug, Clone, Copy, Default)]
pub struct FindingReconciler {
    duplicate_policy: DuplicateMatchPolicy,
}

impl FindingReconciler {
    pub fn new(duplicate_policy: DuplicateMatchPolicy) -> Self {
        Self { duplicate_policy }
    }

    pub fn duplicate_policy(&self) -> DuplicateMatchPolicy {
        self.duplicate_policy
    }

    /// Rewrites source findings into handles valid for the target version.
    ///
    /// Each source finding takes the `id` and `revision` of the target finding
    /// with the same `issueInstanceId`. Source findings without a counterpart
    /// are dropped, so the result is never longer than `source`.
    pub fn transpose(&self, source: Vec<Finding>, target: &[Finding]) -> Vec<Finding> {
        let index = self.index_target(target);
        source
            .into_iter()
            .filter_map(|mut finding| {
                let counterpart = index.get(finding.issue_instance_id.as_str())?;
                finding.id = counterpart.id;
                finding.revision = counterpart.revision;
                Some(finding)
            })
            .collect()
    }

    fn index_target<'t>(&self, target: &'t [Finding]) -> HashMap<&'t str, &'t Finding> {
        let mut buckets: HashMap<&str, Vec<&Finding>> = HashMap::new();
        for finding in target {
            buckets
                .entry(finding.issue_instance_id.as_str())
                .or_default()
                .push(finding);
        }

        buckets
            .into_iter()
            .filter_map(|(iid, candidates)| {
                if candidates.len() == 1 {
                    return Some((iid, candidates[0]));
                }
                match self.duplicate_policy {
                    DuplicateMatchPolicy::LowestId => {
                        let chosen = candidates.iter().min_by_key(|f| f.id).copied()?;
                        tracing::warn!(
                            issue_instance_id = iid,
                            candidates = candidates.len(),
                            chosen_id = chosen.id,
                            "duplicate issueInstanceId in target version, using lowest id"
                        );
                        Some((iid, chosen))
                    }
                    DuplicateMatchPolicy::Skip => {
                        tracing::warn!(
                            issue_instance_id = iid,
                            candidates = candidates.len(),
                            "duplicate issueInstanceId in target version, skipping"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Builds the finding queries for every hunk of every file in `commit`.
    ///
    /// Files without a patch and hunks that cannot be parsed yield nothing.
    pub fn changed_line_queries(commit: &CommitRef, files: &[ChangedFile]) -> Vec<ChangedLineQuery> {
        files
            .iter()
            .filter_map(|file| file.patch.as_deref().map(|patch| (file, patch)))
            .flat_map(|(file, patch)| {
                DiffHunk::parse_patch(patch)
                    .into_iter()
                    .map(move |hunk| ChangedLineQuery {
                        file: file.filename.clone(),
                        range: hunk.range,
                        query: FindingQuery::changed_lines(&file.filename, hunk.range, &commit.sha),
                    })
            })
            .collect()
    }

    /// Whether a finding returned for `range` really lies inside it.
    /// Findings without a reported line are kept.
    pub fn within_range(range: LineRange, details: &FindingDetails) -> bool {
        details.line_number.map_or(true, |line| range.contains(line))
    }
}
