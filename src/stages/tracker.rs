use std::io;

use log::debug;

use crate::output::Annotate;

use super::sanitize::stage_title;

const PIPELINE_PREFIX: &str = "[Pipeline] ";
const SKIPPED_SUFFIX: &str = " skipped due to earlier failure(s)";
const SHELL_ECHO_PREFIX: &str = "+ ";

/// First line (1-based) that falls under an earlier failure.
///
/// Jenkins prints the skip notice two lines after the point where the
/// remaining pipeline was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(Option<usize>);

impl Cutoff {
    pub const UNBOUNDED: Self = Self(None);

    pub fn at(line: usize) -> Self {
        Self(Some(line))
    }

    pub fn line(&self) -> Option<usize> {
        self.0
    }

    /// Strictly before the cutoff line.
    fn is_before(&self, line: usize) -> bool {
        self.0.map_or(true, |cutoff| line < cutoff)
    }

    /// At or before the cutoff line.
    fn reaches(&self, line: usize) -> bool {
        self.0.map_or(true, |cutoff| line <= cutoff)
    }

    /// At or after the cutoff line.
    fn shadows(&self, line: usize) -> bool {
        !self.is_before(line)
    }
}

/// Result of reconstructing stages from a build log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage_count: usize,
    /// Last shell command echoed by an `sh` step at or before the cutoff
    pub last_command: String,
    /// 1-based index of the first stage opened at or after the cutoff
    pub first_affected_stage: Option<usize>,
    pub cutoff: Cutoff,
}

/// Strips the timestamp column: everything after the first two-space run, or
/// the whole line when there is none.
pub fn split_timestamp(line: &str) -> &str {
    line.split_once("  ").map_or(line, |(_, rest)| rest)
}

/// First pass: the last skip notice decides the cutoff.
pub fn find_cutoff(log: &str) -> Cutoff {
    log.lines()
        .enumerate()
        .filter(|(_, line)| line.ends_with(SKIPPED_SUFFIX))
        .last()
        .map_or(Cutoff::UNBOUNDED, |(index, _)| {
            Cutoff::at((index + 1).saturating_sub(2))
        })
}

#[derive(Default)]
struct ParseState<'a> {
    /// Marker of the previous line if it was a `[Pipeline]` line
    marker: Option<&'a str>,
    stage_count: usize,
    first_affected_stage: Option<usize>,
    last_command: &'a str,
}

/// Second pass: groups stages, passes content through, tracks the last
/// shell command.
///
/// A stage opens on the line after `[Pipeline] stage` and closes on
/// `[Pipeline] // stage` following `[Pipeline] }`. Stages past the cutoff get
/// no group; their content is still written.
pub fn track_stages<A>(log: &str, cutoff: Cutoff, sink: &mut A) -> io::Result<StageSummary>
where
    A: Annotate + ?Sized,
{
    let mut state = ParseState::default();

    for (index, line) in log.lines().enumerate() {
        let line_no = index + 1;
        let rest = split_timestamp(line);
        let prev = state.marker.take();

        if let Some(marker) = rest.strip_prefix(PIPELINE_PREFIX) {
            let marker = marker.trim();
            state.marker = Some(marker);

            match prev {
                Some("stage") => {
                    state.stage_count += 1;
                    if state.first_affected_stage.is_none() && cutoff.shadows(line_no) {
                        debug!("Stage {} is past the failure cutoff", state.stage_count);
                        state.first_affected_stage = Some(state.stage_count);
                    }
                    if cutoff.is_before(line_no) {
                        sink.group_start(&stage_title(marker))?;
                    }
                }
                Some("}") if marker == "// stage" => {
                    if cutoff.reaches(line_no) {
                        sink.group_end()?;
                    }
                }
                _ => {}
            }
            continue;
        }

        if prev == Some("sh") && cutoff.reaches(line_no) {
            if let Some(command) = rest.strip_prefix(SHELL_ECHO_PREFIX) {
                state.last_command = command;
            }
        }
        sink.content(rest)?;
    }

    Ok(StageSummary {
        stage_count: state.stage_count,
        last_command: state.last_command.to_string(),
        first_affected_stage: state.first_affected_stage,
        cutoff,
    })
}

/// Runs both passes over a complete log.
pub fn parse<A>(log: &str, sink: &mut A) -> io::Result<StageSummary>
where
    A: Annotate + ?Sized,
{
    let cutoff = find_cutoff(log);
    debug!("Failure cutoff: {:?}", cutoff.line());
    track_stages(log, cutoff, sink)
}
