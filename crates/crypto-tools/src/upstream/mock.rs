//! Mock Transport
//!
//! Scripted replies for testing and demo purposes. Each call pops the next
//! reply; once the script runs dry the fallback reply is returned forever.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{HttpTransport, RawResponse, TransportError};

/// One scripted reply
#[derive(Clone, Debug)]
pub enum MockReply {
    /// An HTTP response with status and raw body
    Response { status: u16, body: String },

    /// A transport-level failure
    Error { message: String },
}

impl MockReply {
    pub fn status(status: u16) -> Self {
        Self::Response {
            status,
            body: String::new(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::Response {
            status,
            body: body.to_string(),
        }
    }
}

/// A request seen by the mock
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub at: Instant,
}

/// Transport that replays a fixed script
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Empty script; unscripted calls answer 404
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::status(404),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then(mut self, reply: MockReply) -> Self {
        self.script.get_mut().push_back(reply);
        self
    }

    pub fn then_status(self, status: u16) -> Self {
        self.then(MockReply::status(status))
    }

    pub fn then_json(self, status: u16, body: serde_json::Value) -> Self {
        self.then(MockReply::json(status, &body))
    }

    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.then(MockReply::Error {
            message: message.into(),
        })
    }

    /// Reply used once the script is exhausted
    pub fn always(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().await.push(RecordedCall {
            url: url.to_string(),
            headers: headers.to_vec(),
            at: Instant::now(),
        });

        let reply = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Response { status, body } => Ok(RawResponse { status, body }),
            MockReply::Error { message } => Err(TransportError::new(message)),
        }
    }
}
