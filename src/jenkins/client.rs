use async_trait::async_trait;
use log::debug;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use url::Url;

use crate::auth::Credentials;
use crate::error::{JenkinsPrError, Result};
use crate::event::BuildRequest;

use super::types::{BuildNumber, BuildStatus, QueueItem, QueueLocation};

/// The Jenkins REST calls the build flow depends on.
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    /// Start the job. Called at most once per invocation.
    async fn trigger(&self, request: &BuildRequest) -> Result<QueueLocation>;

    async fn queue_item(&self, location: &QueueLocation) -> Result<QueueItem>;

    async fn build_status(&self, build: BuildNumber) -> Result<BuildStatus>;

    /// Full console log with per-line timestamps.
    async fn timestamped_log(&self, build: BuildNumber) -> Result<String>;
}

pub struct JenkinsClient {
    client: Client,
    server: Url,
    job: String,
    credentials: Credentials,
}

impl JenkinsClient {
    pub fn new(server: &str, job: &str, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jenkins-pr/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .build()
            .map_err(|e| JenkinsPrError::Config(format!("Failed to create HTTP client: {e}")))?;

        let server = Url::parse(server.trim_end_matches('/'))
            .map_err(|e| JenkinsPrError::Config(format!("Invalid server URL: {e}")))?;
        debug!("Connecting to {server} as {}", credentials.username());

        Ok(Self {
            client,
            server,
            job: job.to_string(),
            credentials,
        })
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// `{server}/job/{job}/{suffix}`
    pub fn job_url(&self, suffix: &str) -> String {
        format!(
            "{}/job/{}/{}",
            self.server.as_str().trim_end_matches('/'),
            self.job,
            suffix
        )
    }

    async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {url}");
        let response = self
            .credentials
            .apply(self.client.get(url))
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    Err(JenkinsPrError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl JenkinsApi for JenkinsClient {
    async fn trigger(&self, request: &BuildRequest) -> Result<QueueLocation> {
        let url = self.job_url("buildWithParameters");
        debug!("POST {url}");

        let response = self
            .credentials
            .apply(self.client.post(&url))
            .form(&[
                ("branch", request.branch.as_str()),
                ("pull_request", request.pull_request.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match location {
            Some(location) if status.is_success() || status.is_redirection() => {
                // Resolve relative locations against the server root.
                let absolute = self.server.join(&location)?;
                Ok(QueueLocation(absolute.to_string()))
            }
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(JenkinsPrError::TriggerFailed {
                    status: status.as_u16(),
                    message: if message.is_empty() {
                        "response carried no queue location".to_string()
                    } else {
                        message
                    },
                })
            }
        }
    }

    async fn queue_item(&self, location: &QueueLocation) -> Result<QueueItem> {
        Ok(self.get(&location.api_url()).await?.json().await?)
    }

    async fn build_status(&self, build: BuildNumber) -> Result<BuildStatus> {
        let url = self.job_url(&format!("{build}/api/json"));
        Ok(self.get(&url).await?.json().await?)
    }

    async fn timestamped_log(&self, build: BuildNumber) -> Result<String> {
        let url = self.job_url(&format!("{build}/timestamps/?appendLog"));
        Ok(self.get(&url).await?.text().await?)
    }
}
