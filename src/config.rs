use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::error::JenkinsPrError;
use crate::jenkins::PollPolicy;

const CANDIDATES: [&str; 4] = [
    "jenkins-pr.toml",
    "jenkins-pr.json",
    "jenkins-pr.yaml",
    "jenkins-pr.yml",
];

/// Configuration file structure.
///
/// Every Jenkins setting can also come from the command line or the
/// environment, which take precedence over the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jenkins: JenkinsConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins base URL (e.g., 'https://ci.example.com')
    pub server: Option<String>,

    /// Name of the parameterized job to start
    pub job: Option<String>,

    pub username: Option<String>,

    /// Jenkins API token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollingConfig {
    #[serde(default = "default_queue_interval_ms")]
    pub queue_interval_ms: u64,

    #[serde(default = "default_queue_attempts")]
    pub queue_attempts: u32,

    #[serde(default = "default_build_interval_ms")]
    pub build_interval_ms: u64,

    #[serde(default = "default_build_attempts")]
    pub build_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            queue_interval_ms: default_queue_interval_ms(),
            queue_attempts: default_queue_attempts(),
            build_interval_ms: default_build_interval_ms(),
            build_attempts: default_build_attempts(),
        }
    }
}

fn default_queue_interval_ms() -> u64 {
    PollPolicy::QUEUE.interval.as_millis() as u64
}

fn default_queue_attempts() -> u32 {
    PollPolicy::QUEUE.max_attempts
}

fn default_build_interval_ms() -> u64 {
    PollPolicy::BUILD.interval.as_millis() as u64
}

fn default_build_attempts() -> u32 {
    PollPolicy::BUILD.max_attempts
}

impl PollingConfig {
    pub fn queue_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.queue_interval_ms),
            self.queue_attempts,
        )
    }

    pub fn build_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.build_interval_ms),
            self.build_attempts,
        )
    }
}

/// Connection settings with every required field present.
#[derive(Debug, Clone)]
pub struct JenkinsTarget {
    pub server: String,
    pub job: String,
    pub credentials: Credentials,
}

impl JenkinsConfig {
    /// Replaces file values with any value given on the command line.
    pub fn merge(self, overrides: JenkinsConfig) -> Self {
        Self {
            server: overrides.server.or(self.server),
            job: overrides.job.or(self.job),
            username: overrides.username.or(self.username),
            token: overrides.token.or(self.token),
        }
    }

    pub fn into_target(self) -> crate::error::Result<JenkinsTarget> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            let value = value.filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let server = require(self.server, "server");
        let job = require(self.job, "job");
        let username = require(self.username, "username");
        let token = require(self.token, "token");

        if !missing.is_empty() {
            return Err(JenkinsPrError::Config(format!(
                "missing Jenkins setting(s): {}",
                missing.join(", ")
            )));
        }

        Ok(JenkinsTarget {
            server,
            job,
            credentials: Credentials::new(username, token),
        })
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./jenkins-pr.toml, ./jenkins-pr.json, ./jenkins-pr.yaml, ./jenkins-pr.yml
    /// 3. `<config dir>/jenkins-pr/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_config = dirs::config_dir().map(|dir| dir.join("jenkins-pr").join("config.toml"));
        match Self::find(Path::new("."), user_config) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    fn find(dir: &Path, user_config: Option<PathBuf>) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .chain(user_config)
            .find(|path| path.exists())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str::<Self>(&contents)
                    .map_err(anyhow::Error::from)
                    .or_else(|_| serde_json::from_str(&contents).map_err(anyhow::Error::from))
                    .or_else(|_| serde_yaml::from_str(&contents).map_err(anyhow::Error::from))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}
