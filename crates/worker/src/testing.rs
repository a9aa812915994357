//! Test doubles shared by the worker test modules.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::fetch::{FetchedResponse, Fetcher};
use trailguide_core::Error;

/// Scripted outcome for a single URL.
#[derive(Debug, Clone)]
pub(crate) enum Script {
    /// Respond with this status and body.
    Respond(u16, &'static str),
    /// Fail at the transport level.
    Offline,
}

/// A fetcher that serves scripted responses and records every fetch.
pub(crate) struct RecordingFetcher {
    default: Script,
    scripts: HashMap<String, Script>,
    log: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    /// Every URL responds 200 with a small body.
    pub(crate) fn online() -> Self {
        Self { default: Script::Respond(200, "body"), scripts: HashMap::new(), log: Mutex::new(Vec::new()) }
    }

    /// Every URL fails at the transport level.
    pub(crate) fn offline() -> Self {
        Self { default: Script::Offline, scripts: HashMap::new(), log: Mutex::new(Vec::new()) }
    }

    /// Override the outcome for one URL.
    pub(crate) fn with(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    /// URLs fetched so far, in claim order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// How many times one URL was fetched.
    pub(crate) fn calls_for(&self, url: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, Error> {
        self.log.lock().unwrap().push(url.to_string());

        match self.scripts.get(url).unwrap_or(&self.default) {
            Script::Offline => Err(Error::FetchFailed("offline".into())),
            Script::Respond(status, body) => Ok(FetchedResponse {
                url: url.to_string(),
                status: *status,
                content_type: Some("application/octet-stream".into()),
                headers: Vec::new(),
                body: Bytes::from_static(body.as_bytes()),
            }),
        }
    }
}

/// Poll until `check` passes or the timeout elapses.
///
/// Used to observe fire-and-forget cache writes, which land on detached
/// tasks after the response has already been returned.
pub(crate) async fn wait_until<F, Fut>(check: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within timeout");
}
