use log::info;

use crate::error::{JenkinsPrError, Result};

use super::client::JenkinsApi;
use super::poll::{poll_until, Attempt, PollOutcome, PollPolicy};
use super::types::{BuildNumber, QueueLocation};

/// Waits for a queued request to be assigned a build number.
///
/// A blocked or cancelled item fails at once rather than waiting out the policy.
pub async fn resolve<A>(api: &A, location: &QueueLocation, policy: PollPolicy) -> Result<BuildNumber>
where
    A: JenkinsApi + ?Sized,
{
    let outcome = poll_until(policy, move |_| async move {
        let item = api.queue_item(location).await?;
        info!(
            "Job starting: {}",
            item.why.as_deref().unwrap_or("Job Spawning")
        );

        if item.blocked {
            return Err(JenkinsPrError::RequestBlocked(
                item.why.unwrap_or_else(|| location.to_string()),
            ));
        }
        if item.cancelled {
            return Err(JenkinsPrError::RequestCancelled(location.to_string()));
        }

        Ok(match item.build_number() {
            Some(number) => Attempt::Ready(number),
            None => Attempt::Pending,
        })
    })
    .await?;

    match outcome {
        PollOutcome::Ready(number) => Ok(number),
        PollOutcome::Exhausted { attempts } => Err(JenkinsPrError::ResolveTimeout {
            location: location.to_string(),
            attempts,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jenkins::fake::FakeJenkins;
    use crate::jenkins::types::QueueItem;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(1), max_attempts)
    }

    fn location() -> QueueLocation {
        QueueLocation("https://ci.example.com/queue/item/17/".to_string())
    }

    #[tokio::test]
    async fn test_resolves_after_waiting() {
        let fake = FakeJenkins::new()
            .queue(FakeJenkins::waiting("Waiting for next available executor"))
            .queue(FakeJenkins::waiting("In the quiet period"))
            .queue(FakeJenkins::assigned(7));

        let number = resolve(&fake, &location(), fast(20)).await.unwrap();

        assert_eq!(number, 7);
        assert_eq!(fake.queue_checks(), 3);
    }

    #[tokio::test]
    async fn test_blocked_fails_without_retry() {
        let fake = FakeJenkins::new().queue(QueueItem {
            blocked: true,
            why: Some("Build #6 is already in progress".to_string()),
            ..QueueItem::default()
        });

        let err = resolve(&fake, &location(), fast(20)).await.unwrap_err();

        assert!(matches!(err, JenkinsPrError::RequestBlocked(ref why) if why.contains("#6")));
        assert_eq!(fake.queue_checks(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_fails() {
        let fake = FakeJenkins::new().queue(QueueItem {
            cancelled: true,
            ..QueueItem::default()
        });

        let err = resolve(&fake, &location(), fast(20)).await.unwrap_err();
        assert!(matches!(err, JenkinsPrError::RequestCancelled(_)));
    }

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let fake = FakeJenkins::new().queue(FakeJenkins::waiting("Waiting"));

        let err = resolve(&fake, &location(), fast(20)).await.unwrap_err();

        assert!(matches!(
            err,
            JenkinsPrError::ResolveTimeout { attempts: 20, .. }
        ));
        assert_eq!(fake.queue_checks(), 20);
    }
}
