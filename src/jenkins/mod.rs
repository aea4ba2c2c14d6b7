mod build;
mod client;
#[cfg(test)]
pub mod fake;
mod poll;
mod queue;
mod types;

pub use build::await_completion;
pub use client::{JenkinsApi, JenkinsClient};
pub use poll::PollPolicy;
pub use queue::resolve;
pub use types::BuildResult;
