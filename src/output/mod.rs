mod progress;
mod report;
mod styling;
mod summary;
mod workflow;

pub use progress::PhaseProgress;
pub use report::Report;
pub use summary::StepSummary;
pub use workflow::{Annotate, WorkflowCommands};

use styling::{dim, magenta_bold};

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔧 jenkins-pr"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Jenkins builds for pull requests")
    );
}
