/// Formatters for rendering the job summary
mod markdown_summary_formatter;

pub use markdown_summary_formatter::MarkdownSummaryFormatter;
