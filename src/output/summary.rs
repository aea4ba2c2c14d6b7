use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::error::Result;

/// The job summary markdown file (`GITHUB_STEP_SUMMARY`).
#[derive(Debug, Clone, Default)]
pub struct StepSummary {
    path: Option<PathBuf>,
}

impl StepSummary {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Appends a top-level heading. Returns `false` when there is no summary
    /// file to write to.
    pub fn add_heading(&self, text: &str) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "# {text}")?;
        debug!("Summary written to: {}", path.display());
        Ok(true)
    }
}
