//! HTTP transport contract
//!
//! The SDK never opens sockets itself. Applications register a
//! [`Transport`] that performs requests and reports either an HTTP response
//! or a transport-level [`ErrorKind`]. Every `send` is followed by exactly
//! one `done` with the same response, so the transport can release whatever
//! it attached to the response handle.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::data::DataField;
use crate::error::{ErrorKind, SdkError};
use crate::state::SdkState;

/// Correlation headers applications attach to their own outgoing requests
pub const CORRELATION_HEADERS: [(&str, &str); 2] =
    [("ADRUM", "isAjax:true"), ("ADRUM_1", "isMobile:true")];

/// Content type for beacon payloads
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            other => Err(SdkError::invalid_input(format!("unknown http method '{other}'"))),
        }
    }
}

/// A single HTTP header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<Header> for DataField {
    fn from(header: Header) -> Self {
        DataField::new(header.key, header.value)
    }
}

/// Correlation headers as owned [`Header`] values
pub fn correlation_headers() -> Vec<Header> {
    CORRELATION_HEADERS
        .iter()
        .map(|(key, value)| Header::new(*key, *value))
        .collect()
}

/// Outgoing HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header
    #[inline]
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    /// Set the body
    #[inline]
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// POST of a JSON beacon with `Accept`, `Content-Type` and `Content-Length`
    pub fn beacon(url: impl Into<String>, payload: String) -> Self {
        let len = payload.len();
        Self::new(Method::Post, url)
            .header("Accept", JSON_CONTENT_TYPE)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .header("Content-Length", len.to_string())
            .body(payload)
    }

    /// First header value with a matching key, compared case-insensitively
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(key))
            .map(|h| h.value.as_str())
    }
}

/// Response returned by a transport
#[derive(Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
    /// Transport failure, distinct from an HTTP error status
    pub error: Option<ErrorKind>,
    /// Transport-owned state handed back in [`Transport::done`]
    pub handle: Option<Box<dyn Any + Send>>,
}

impl HttpResponse {
    /// Response with a status and no body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Response describing a transport failure
    pub fn failed(kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_handle(mut self, handle: Box<dyn Any + Send>) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Body length in bytes
    #[inline]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("error", &self.error)
            .field("has_handle", &self.handle.is_some())
            .finish()
    }
}

/// Pluggable HTTP client
pub trait Transport: Send + Sync {
    /// Perform `request`; `None` means no response could be produced
    fn send(&self, request: &HttpRequest) -> Option<HttpResponse>;

    /// Release resources tied to a response from [`send`](Self::send)
    fn done(&self, response: Option<HttpResponse>) {
        drop(response);
    }
}

/// How the SDK reacts to a collector status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// Permanent rejection that disables the SDK
    Rejected(SdkState),
    /// Anything else
    Failed,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        if (200..300).contains(&status) {
            return Self::Success;
        }
        match SdkState::disabled_for_status(status) {
            Some(state) => Self::Rejected(state),
            None => Self::Failed,
        }
    }
}
