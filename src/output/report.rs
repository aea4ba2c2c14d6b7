use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::jenkins::BuildResult;
use crate::stages::StageSummary;

use super::summary::StepSummary;
use super::workflow::WorkflowCommands;

/// Final verdict for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Passed { stages: usize },
    /// Any result other than SUCCESS, including ABORTED and UNSTABLE
    Failed { result: String, last_command: String },
}

impl Report {
    pub fn new(result: &BuildResult, summary: &StageSummary) -> Self {
        match result {
            BuildResult::Success => Self::Passed {
                stages: summary.stage_count,
            },
            other => Self::Failed {
                result: other.to_string(),
                last_command: summary.last_command.clone(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Success goes to the step summary (or plain output when there is none),
    /// failure to the error channel.
    pub fn publish<W: Write>(
        &self,
        workflow: &mut WorkflowCommands<W>,
        summary: &StepSummary,
    ) -> Result<()> {
        let text = self.to_string();
        match self {
            Self::Passed { .. } => {
                if !summary.add_heading(&text)? {
                    workflow.info(&text)?;
                }
            }
            Self::Failed { .. } => workflow.error(&text)?,
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed { stages } => write!(f, "All {stages} stages passed"),
            Self::Failed {
                result,
                last_command,
            } => write!(f, "{result}: Last command: {last_command}"),
        }
    }
}
