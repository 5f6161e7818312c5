//! Blocking HTTP transport backed by reqwest

use std::time::Duration;

use iot_telemetry::{ErrorKind, Header, HttpRequest, HttpResponse, Method, Transport};
use reqwest::blocking::Client;
use tracing::{debug, warn};

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] implemented with `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Option<HttpResponse> {
        let mut builder = self.client.request(to_reqwest(request.method), &request.url);
        for header in &request.headers {
            builder = builder.header(header.key.as_str(), header.value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = request.method.as_str(), url = %request.url, "sending http request");

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %request.url, error = %e, "http request failed");
                return Some(HttpResponse::failed(error_kind(&e)));
            }
        };

        let mut result = HttpResponse::new(response.status().as_u16());
        result.headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| Header::new(key.as_str(), value))
            })
            .collect();

        match response.bytes() {
            Ok(body) => result.body = body.to_vec(),
            Err(e) => warn!(url = %request.url, error = %e, "failed to read response body"),
        }

        Some(result)
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

fn error_kind(error: &reqwest::Error) -> ErrorKind {
    if error.is_connect() {
        ErrorKind::NetworkUnreachable
    } else if error.is_builder() {
        ErrorKind::InvalidInput
    } else {
        ErrorKind::NetworkError
    }
}
