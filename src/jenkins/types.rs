use serde::Deserialize;
use std::fmt;

/// Identifier of one concrete execution of a job.
pub type BuildNumber = u64;

/// Queue item URL returned in the `Location` header of a trigger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueLocation(pub String);

impl QueueLocation {
    /// URL of the queue item's JSON API.
    pub fn api_url(&self) -> String {
        format!("{}/api/json", self.0.trim_end_matches('/'))
    }
}

impl fmt::Display for QueueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Jenkins queue item as returned by `{queue}/api/json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueItem {
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub cancelled: bool,
    /// Human readable reason the item is still waiting
    pub why: Option<String>,
    /// Present once an executor has picked up the item
    pub executable: Option<Executable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Executable {
    pub number: BuildNumber,
}

impl QueueItem {
    pub fn build_number(&self) -> Option<BuildNumber> {
        self.executable.as_ref().map(|e| e.number)
    }
}

/// Terminal result of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResult {
    Success,
    Failure,
    /// ABORTED, UNSTABLE, NOT_BUILT or anything else the server reports
    Other(String),
}

impl From<&str> for BuildResult {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failure => f.write_str("FAILURE"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// A build as returned by `{server}/job/{job}/{build}/api/json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    pub in_progress: bool,
    /// `null` while the build is running
    pub result: Option<String>,
}

impl BuildStatus {
    pub fn result(&self) -> BuildResult {
        self.result.as_deref().map_or_else(
            || BuildResult::Other("UNKNOWN".to_string()),
            BuildResult::from,
        )
    }
}
