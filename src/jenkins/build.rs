use log::debug;

use crate::error::{JenkinsPrError, Result};

use super::client::JenkinsApi;
use super::poll::{poll_until, Attempt, PollOutcome, PollPolicy};
use super::types::{BuildNumber, BuildStatus};

/// Waits until `build` is no longer in progress and returns its final status.
///
/// Running out of attempts is a [`JenkinsPrError::PollExhausted`] failure.
pub async fn await_completion<A>(api: &A, build: BuildNumber, policy: PollPolicy) -> Result<BuildStatus>
where
    A: JenkinsApi + ?Sized,
{
    let outcome = poll_until(policy, move |attempt| async move {
        let status = api.build_status(build).await?;
        debug!(
            "Build #{build} check {attempt}: in_progress={}",
            status.in_progress
        );
        Ok(if status.in_progress {
            Attempt::Pending
        } else {
            Attempt::Ready(status)
        })
    })
    .await?;

    match outcome {
        PollOutcome::Ready(status) => Ok(status),
        PollOutcome::Exhausted { attempts } => Err(JenkinsPrError::PollExhausted { build, attempts }),
    }
}
