use std::io::Write;

use log::{info, warn};

use crate::error::Result;
use crate::event::BuildRequest;
use crate::jenkins::{await_completion, resolve, JenkinsApi, PollPolicy};
use crate::output::{PhaseProgress, Report, StepSummary, WorkflowCommands};
use crate::stages;

/// Reads the trigger ref. Anything but a pull request is reported as a
/// warning and yields `None`; that is a clean exit, not a failure.
pub fn read_trigger<W: Write>(
    git_ref: Option<&str>,
    workflow: &mut WorkflowCommands<W>,
) -> Result<Option<BuildRequest>> {
    match BuildRequest::from_ref(git_ref) {
        Ok(request) => Ok(Some(request)),
        Err(reason) => {
            warn!("{reason}");
            workflow.warning(&reason.to_string())?;
            Ok(None)
        }
    }
}

/// Trigger → queue → completion → log, for a single build.
pub struct BuildFlow<'a, A: JenkinsApi + ?Sized> {
    pub api: &'a A,
    pub job: &'a str,
    pub queue_policy: PollPolicy,
    pub build_policy: PollPolicy,
    pub show_progress: bool,
}

impl<'a, A: JenkinsApi + ?Sized> BuildFlow<'a, A> {
    /// Runs the build for `request` and publishes the verdict.
    pub async fn run<W: Write>(
        &self,
        request: &BuildRequest,
        workflow: &mut WorkflowCommands<W>,
        summary: &StepSummary,
    ) -> Result<Report> {
        let report = self.build(request, workflow).await?;
        report.publish(workflow, summary)?;
        workflow.flush()?;
        Ok(report)
    }

    /// Triggers the job once, waits for it and folds its log into `workflow`.
    async fn build<W: Write>(
        &self,
        request: &BuildRequest,
        workflow: &mut WorkflowCommands<W>,
    ) -> Result<Report> {
        workflow.info(&format!(
            "Starting Job {} with branch={} pr={}",
            self.job, request.branch, request.pull_request
        ))?;

        let location = self.api.trigger(request).await?;
        info!("Build queued at {location}");

        let progress = self.show_progress.then(|| PhaseProgress::start_phase_1(self.job));
        let build = resolve(self.api, &location, self.queue_policy).await?;
        info!("Queue item resolved to build #{build}");

        info!(
            "Waiting up to {:?} for build #{build} to finish",
            self.build_policy.ceiling()
        );
        let progress = progress.map(|p| p.finish_phase_1_start_phase_2(build));
        let status = await_completion(self.api, build, self.build_policy).await?;
        let result = status.result();
        info!("Build #{build} finished: {result}");

        let progress = progress.map(|p| p.finish_phase_2_start_phase_3(&result.to_string()));
        let log = self.api.timestamped_log(build).await?;
        if let Some(progress) = progress {
            progress.finish_phase_3();
        }

        let summary = stages::parse(&log, workflow)?;
        info!(
            "Parsed {} stages, first affected stage: {:?}",
            summary.stage_count, summary.first_affected_stage
        );

        Ok(Report::new(&result, &summary))
    }
}
