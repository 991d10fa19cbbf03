use crate::ports::outbound::OutputPresenter;
use crate::shared::Result;
use anyhow::Context;
use std::io::{self, Write};

/// StdoutPresenter adapter printing the job summary to stdout
///
/// Used when the job runs outside a CI system that collects a summary file.
/// The summary always ends with a newline so later output starts on its own line.
#[derive(Default)]
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let stdout = io::stdout();
        write_summary(&mut stdout.lock(), content).context("Failed to write summary to stdout")
    }
}

fn write_summary<W: Write>(out: &mut W, content: &str) -> io::Result<()> {
    out.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
