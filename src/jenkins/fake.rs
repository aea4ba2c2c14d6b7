//! Scripted in-memory Jenkins for exercising the polling flow.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{JenkinsPrError, Result};
use crate::event::BuildRequest;

use super::client::JenkinsApi;
use super::types::{BuildNumber, BuildStatus, Executable, QueueItem, QueueLocation};

/// Replays queued responses in order; the last response of each kind repeats.
#[derive(Default)]
pub struct FakeJenkins {
    queue_items: Mutex<VecDeque<QueueItem>>,
    statuses: Mutex<VecDeque<BuildStatus>>,
    log: String,
    reject_trigger: bool,
    triggers: Mutex<Vec<BuildRequest>>,
    queue_checks: Mutex<u32>,
    status_checks: Mutex<u32>,
}

impl FakeJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(self, item: QueueItem) -> Self {
        self.queue_items.lock().unwrap().push_back(item);
        self
    }

    pub fn status(self, in_progress: bool, result: Option<&str>) -> Self {
        self.statuses.lock().unwrap().push_back(BuildStatus {
            in_progress,
            result: result.map(str::to_string),
        });
        self
    }

    pub fn log(mut self, log: &str) -> Self {
        self.log = log.to_string();
        self
    }

    pub fn reject_trigger(mut self) -> Self {
        self.reject_trigger = true;
        self
    }

    pub fn waiting(why: &str) -> QueueItem {
        QueueItem {
            why: Some(why.to_string()),
            ..QueueItem::default()
        }
    }

    pub fn assigned(number: BuildNumber) -> QueueItem {
        QueueItem {
            executable: Some(Executable { number }),
            ..QueueItem::default()
        }
    }

    pub fn triggers(&self) -> Vec<BuildRequest> {
        self.triggers.lock().unwrap().clone()
    }

    pub fn queue_checks(&self) -> u32 {
        *self.queue_checks.lock().unwrap()
    }

    pub fn status_checks(&self) -> u32 {
        *self.status_checks.lock().unwrap()
    }
}

fn next<T: Clone>(responses: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut responses = responses.lock().unwrap();
    if responses.len() > 1 {
        responses.pop_front()
    } else {
        responses.front().cloned()
    }
}

#[async_trait]
impl JenkinsApi for FakeJenkins {
    async fn trigger(&self, request: &BuildRequest) -> Result<QueueLocation> {
        self.triggers.lock().unwrap().push(request.clone());
        if self.reject_trigger {
            return Err(JenkinsPrError::TriggerFailed {
                status: 403,
                message: "No valid crumb was included in the request".to_string(),
            });
        }
        Ok(QueueLocation("https://ci.example.com/queue/item/17/".to_string()))
    }

    async fn queue_item(&self, _location: &QueueLocation) -> Result<QueueItem> {
        *self.queue_checks.lock().unwrap() += 1;
        Ok(next(&self.queue_items).unwrap_or_default())
    }

    async fn build_status(&self, build: BuildNumber) -> Result<BuildStatus> {
        *self.status_checks.lock().unwrap() += 1;
        next(&self.statuses).ok_or(JenkinsPrError::ApiError {
            status: 404,
            message: format!("no build #{build}"),
        })
    }

    async fn timestamped_log(&self, _build: BuildNumber) -> Result<String> {
        Ok(self.log.clone())
    }
}
