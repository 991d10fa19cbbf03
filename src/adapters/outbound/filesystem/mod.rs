/// Filesystem adapters for presenting the job summary
mod job_summary_writer;
mod stdout_presenter;

pub use job_summary_writer::JobSummaryWriter;
pub use stdout_presenter::StdoutPresenter;
