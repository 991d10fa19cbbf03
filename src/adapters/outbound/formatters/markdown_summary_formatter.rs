use crate::application::read_models::{CountCell, GateStatus, JobSummary, LastScanView};
use crate::ports::outbound::SummaryFormatter;
use crate::shared::Result;
use chrono::{DateTime, Utc};

/// Highest security rating; also the number of rating symbols
const RATING_SCALE: usize = 5;

const RATING_TREND_QUERY: &str =
    "trend?versionTrendDateRange=YEAR&versionTrendParam=performanceIndicators%3A%3AFortifySecurityRating";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// MarkdownSummaryFormatter adapter rendering the job summary as
/// GitHub-flavoured Markdown
///
/// The output is meant for a workflow step summary, so it uses GitHub
/// emoji shortcodes.
pub struct MarkdownSummaryFormatter;

impl MarkdownSummaryFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    /// `n`, `n :new:` when every finding is new, `n (m :new:)` otherwise
    fn count_cell(cell: CountCell) -> String {
        if cell.total == 0 || cell.new == 0 {
            cell.total.to_string()
        } else if cell.total == cell.new {
            format!("{} :new:", cell.total)
        } else {
            format!("{} ({} :new:)", cell.total, cell.new)
        }
    }

    fn folder_header(folder: &str) -> String {
        let marker = match folder {
            "Critical" => ":red_circle:",
            "High" => ":orange_circle:",
            "Medium" => ":yellow_circle:",
            "Low" => ":white_circle:",
            _ => ":large_blue_circle:",
        };
        format!("{} {}", marker, Self::escape_markdown_table_cell(folder))
    }

    /// One star per started rating point, padded to the scale
    fn rating_stars(rating: f64) -> String {
        let stars = (rating.max(0.0).ceil() as usize).min(RATING_SCALE);
        ":star:".repeat(stars) + &":white_circle:".repeat(RATING_SCALE - stars)
    }

    fn gate_label(status: GateStatus) -> &'static str {
        match status {
            GateStatus::Passed => "Passed :white_check_mark:",
            GateStatus::Failed => "Failed :x:",
            GateStatus::Unknown => "Unknown :grey_question:",
        }
    }

    /// Display name of a scan engine
    fn scan_type_name(scan_type: &str) -> String {
        match scan_type {
            "SCA" => "Fortify SAST".to_string(),
            "WEBINSPECT" => "Fortify DAST".to_string(),
            other => {
                let lower = other.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    fn days_ago(now: DateTime<Utc>, date: DateTime<Utc>) -> String {
        match (now.date_naive() - date.date_naive()).num_days() {
            days if days <= 0 => "Today".to_string(),
            1 => "1 day ago".to_string(),
            days => format!("{} days ago", days),
        }
    }

    fn rating_url(version_url: &str) -> String {
        let base = version_url.strip_suffix("/audit").unwrap_or(version_url);
        format!("{}/{}", base, RATING_TREND_QUERY)
    }
}

impl Default for MarkdownSummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownSummaryFormatter {
    fn render_header(&self, output: &mut String, summary: &JobSummary) {
        output.push_str("# Security Scan Results\n\n");
        output.push_str(&format!(
            ":date: Summary Date: {}\n\n",
            summary.generated_at.format(DATE_FORMAT)
        ));
    }

    fn render_executive_summary(&self, output: &mut String, summary: &JobSummary) {
        output.push_str("## :clipboard: Executive Summary\n\n");
        output.push_str("| Application | Application Version |\n");
        output.push_str("|-------------|---------------------|\n");
        output.push_str(&format!(
            "| {} | [{}]({}) |\n\n",
            Self::escape_markdown_table_cell(&summary.application),
            Self::escape_markdown_table_cell(&summary.version),
            summary.version_url
        ));

        output.push_str(&format!(
            "**[Security Rating]({})**: {}\n\n",
            Self::rating_url(&summary.version_url),
            Self::rating_stars(summary.security_rating)
        ));
        output.push_str(&format!(
            "**[Security Gate Status]({})**: {}\n\n",
            summary.gate_url,
            Self::gate_label(summary.gate_status)
        ));

        self.render_last_scans(output, &summary.last_scans, summary.generated_at);
    }

    fn render_last_scans(&self, output: &mut String, scans: &[LastScanView], now: DateTime<Utc>) {
        if scans.is_empty() {
            return;
        }
        output.push_str("| Scan | Date |\n");
        output.push_str("|------|------|\n");
        for scan in scans {
            output.push_str(&format!(
                "| **Last Successful {} Scan** | {} ({}) |\n",
                Self::scan_type_name(&scan.scan_type),
                scan.date.format(DATE_FORMAT),
                Self::days_ago(now, scan.date)
            ));
        }
        output.push('\n');
    }

    fn render_findings(&self, output: &mut String, summary: &JobSummary) {
        output.push_str("## :signal_strength: Security Findings\n\n");
        output.push_str(&format!(
            ":telescope: **Filter Set**: {}\n\n",
            summary.filter_set
        ));

        let mut header = String::from("| :test_tube: Analysis Type |");
        let mut separator = String::from("|---|");
        for folder in &summary.folders {
            header.push_str(&format!(" {} |", Self::folder_header(folder)));
            separator.push_str("---|");
        }
        header.push_str(" Total |\n");
        separator.push_str("---|\n");
        output.push_str(&header);
        output.push_str(&separator);

        for row in &summary.rows {
            output.push_str(&format!("| {} |", Self::scan_type_name(&row.scan_type)));
            for cell in &row.cells {
                output.push_str(&format!(" {} |", Self::count_cell(*cell)));
            }
            output.push_str(&format!(" {} |\n", Self::count_cell(row.total())));
        }

        output.push_str("| **Total** |");
        for cell in summary.folder_totals() {
            output.push_str(&format!(" {} |", Self::count_cell(cell)));
        }
        output.push_str(&format!(" {} |\n", Self::count_cell(summary.grand_total())));
    }
}

impl SummaryFormatter for MarkdownSummaryFormatter {
    fn format(&self, summary: &JobSummary) -> Result<String> {
        let mut output = String::new();
        self.render_header(&mut output, summary);
        self.render_executive_summary(&mut output, summary);
        self.render_findings(&mut output, summary);
        Ok(output)
    }
}
