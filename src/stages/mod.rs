//! Reconstructs Jenkins pipeline stages from a timestamped console log.

mod sanitize;
mod tracker;

#[cfg(test)]
pub use tracker::Cutoff;
pub use tracker::{parse, StageSummary};
