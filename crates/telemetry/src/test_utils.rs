//! Test utilities for exercising the SDK without a network
//!
//! [`MockTransport`] answers every request from a script of canned replies
//! and records what it was asked to send. Use it instead of a real HTTP
//! client to test the full send path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::ErrorKind;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// A scripted reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// HTTP response with this status
    Status(u16),
    /// Transport-level failure
    Fail(ErrorKind),
    /// No response at all
    Nothing,
}

/// Transport returning scripted replies
///
/// Once the script runs out, the fallback reply is used.
///
/// # Example
///
/// ```
/// use iot_telemetry::test_utils::{MockTransport, Reply};
///
/// let transport = MockTransport::new(Reply::Status(202));
/// transport.push(Reply::Status(500));
/// ```
#[derive(Debug)]
pub struct MockTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<HttpRequest>>,
    done_calls: AtomicUsize,
}

impl MockTransport {
    /// Create a transport that always answers with `fallback`
    pub fn new(fallback: Reply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
            done_calls: AtomicUsize::new(0),
        }
    }

    /// Queue a reply for the next unanswered request
    pub fn push(&self, reply: Reply) {
        self.script.lock().push_back(reply);
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of `done` calls
    pub fn done_count(&self) -> usize {
        self.done_calls.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Option<HttpResponse> {
        self.requests.lock().push(request.clone());
        let reply = self.script.lock().pop_front().unwrap_or(self.fallback);
        match reply {
            Reply::Status(status) => Some(HttpResponse::new(status)),
            Reply::Fail(kind) => Some(HttpResponse::failed(kind)),
            Reply::Nothing => None,
        }
    }

    fn done(&self, _response: Option<HttpResponse>) {
        self.done_calls.fetch_add(1, Ordering::SeqCst);
    }
}
