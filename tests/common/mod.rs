//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use restlet_link::http::{DelayFn, DelayFuture};
use restlet_link::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use restlet_link::AccountSettings;

pub type Reply = Result<TransportResponse, TransportError>;

/// In-memory transport that replays scripted replies and records every request.
///
/// Replies are consumed in order; the last one repeats once the script runs out.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Reply {
        self.seen.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

pub fn ok(body: &str) -> Reply {
    Ok(TransportResponse {
        status: 200,
        body: body.to_string(),
    })
}

pub fn fail(message: &str) -> Reply {
    Err(TransportError::new(message))
}

/// Delay that returns immediately and records what it was asked to wait.
pub fn recording_delay() -> (DelayFn, Arc<Mutex<Vec<Duration>>>) {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let sink = delays.clone();
    let delay: DelayFn = Arc::new(move |d: Duration| -> DelayFuture {
        sink.lock().unwrap().push(d);
        Box::pin(async {})
    });
    (delay, delays)
}

pub fn oauth_account() -> AccountSettings {
    AccountSettings::oauth1("TSTDRV1", "ck", "cs", "tk", "ts")
}

pub fn nlauth_account() -> AccountSettings {
    AccountSettings::nlauth("TSTDRV1", "ops@example.com", "hunter2")
}

pub fn header<'a>(request: &'a TransportRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
