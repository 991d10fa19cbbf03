use regex::Regex;
use std::sync::OnceLock;

/// Inclusive range of changed lines on the new side of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: u32,
    end: u32,
}

impl LineRange {
    /// Builds the range covered by `length` lines from `start`.
    /// A zero length (pure deletion) covers nothing.
    pub fn from_start_and_length(start: u32, length: u32) -> Option<Self> {
        if length == 0 {
            return None;
        }
        Some(Self {
            start,
            end: start.saturating_add(length - 1),
        })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// One hunk of a unified diff, reduced to its new-file line range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffHunk {
    pub range: LineRange,
}

fn hunk_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"(?m)^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
            .expect("hunk header pattern is valid")
    })
}

impl DiffHunk {
    /// Extracts every well-formed hunk from a file patch.
    ///
    /// Headers that do not match `@@ -a[,b] +c[,d] @@` are skipped, as are
    /// hunks that only delete lines.
    pub fn parse_patch(patch: &str) -> Vec<DiffHunk> {
        hunk_header()
            .captures_iter(patch)
            .filter_map(|caps| {
                let start: u32 = caps.get(3)?.as_str().parse().ok()?;
                let length: u32 = match caps.get(4) {
                    Some(len) => len.as_str().parse().ok()?,
                    None => 1,
                };
                LineRange::from_start_and_length(start, length).map(|range| DiffHunk { range })
            })
            .collect()
    }
}
