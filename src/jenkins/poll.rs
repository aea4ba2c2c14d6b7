use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::error::Result;

/// Fixed-interval polling bound: wait `interval`, check, repeat at most
/// `max_attempts` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Waiting for a queue item to get an executor.
    pub const QUEUE: Self = Self {
        interval: Duration::from_millis(2500),
        max_attempts: 20,
    };

    /// Waiting for a running build to finish.
    pub const BUILD: Self = Self {
        interval: Duration::from_secs(5),
        max_attempts: 1000,
    };

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Longest time a poll can run before giving up.
    pub fn ceiling(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Result of a single check.
#[derive(Debug, PartialEq, Eq)]
pub enum Attempt<T> {
    Ready(T),
    Pending,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    Exhausted { attempts: u32 },
}

/// Runs `check` until it reports ready, sleeping before every attempt.
///
/// Errors from `check` end the poll immediately; nothing is retried.
pub async fn poll_until<T, F, Fut>(policy: PollPolicy, mut check: F) -> Result<PollOutcome<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>>>,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;
        debug!("Poll attempt {attempt}/{}", policy.max_attempts);
        if let Attempt::Ready(value) = check(attempt).await? {
            return Ok(PollOutcome::Ready(value));
        }
    }

    Ok(PollOutcome::Exhausted {
        attempts: policy.max_attempts,
    })
}
