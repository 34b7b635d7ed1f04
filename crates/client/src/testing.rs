//! Test doubles shared across the client test modules.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use pagelift_core::Error;

use crate::fetch::PageFetcher;
use crate::nav::{HistoryState, HostPage};

/// Fetcher that serves scripted bodies and records every request.
///
/// Pages without a scripted response fail with an HTTP error, which is how
/// tests drive the network-failure paths.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, page: &str, html: &str) {
        self.responses.lock().unwrap().insert(page.to_string(), html.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, page: &str) -> Result<String, Error> {
        self.requests.lock().unwrap().push(page.to_string());
        match self.responses.lock().unwrap().get(page) {
            Some(html) => Ok(html.clone()),
            None => Err(Error::HttpError("status 404".into())),
        }
    }
}

/// One observed call on the host surface, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HostCall {
    ReplaceDocument(String),
    PushHistory(String, HistoryState),
    ReplaceState(HistoryState),
    ScrollTo(f64),
}

/// Host surface that records calls and reports a preset scroll offset.
#[derive(Default)]
pub(crate) struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    scroll: Mutex<f64>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_scroll(&self, y: f64) {
        *self.scroll.lock().unwrap() = y;
    }

    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HostPage for RecordingHost {
    fn replace_document(&self, html: &str) {
        self.calls.lock().unwrap().push(HostCall::ReplaceDocument(html.to_string()));
    }

    fn push_history(&self, url: &str, state: &HistoryState) {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::PushHistory(url.to_string(), state.clone()));
    }

    fn replace_history_state(&self, state: &HistoryState) {
        self.calls.lock().unwrap().push(HostCall::ReplaceState(state.clone()));
    }

    fn scroll_y(&self) -> f64 {
        *self.scroll.lock().unwrap()
    }

    fn scroll_to(&self, y: f64) {
        self.calls.lock().unwrap().push(HostCall::ScrollTo(y));
    }
}

/// Yield enough times for spawned ready futures to run to completion under
/// the paused test runtime.
pub(crate) async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
