use std::io::{self, Write};

/// Receiver of the structured log stream produced while tracking stages.
pub trait Annotate {
    fn group_start(&mut self, title: &str) -> io::Result<()>;
    fn group_end(&mut self) -> io::Result<()>;
    /// A raw log line shown as-is.
    fn content(&mut self, line: &str) -> io::Result<()>;
}

/// Writes GitHub Actions workflow commands.
///
/// See <https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions>.
pub struct WorkflowCommands<W: Write> {
    out: W,
}

impl WorkflowCommands<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WorkflowCommands<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::warning::{}", escape_data(message))
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_data(message))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Annotate for WorkflowCommands<W> {
    fn group_start(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "::group::{}", escape_data(title))
    }

    fn group_end(&mut self) -> io::Result<()> {
        writeln!(self.out, "::endgroup::")
    }

    fn content(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

/// Escapes a command's data so it stays on one line.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
