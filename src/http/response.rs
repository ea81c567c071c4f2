//! The outcome of a single request.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use super::content_type::ContentType;

/// Status reported when no response was obtained at all.
pub const TRANSPORT_FAILURE_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// Response of a request, or the description of why there is none.
///
/// A server that answered with any status produces a fully populated value with
/// `error_message() == None`. A transport failure (DNS, refused connection,
/// timeout, TLS, invalid URL or header) produces a value with
/// [`TRANSPORT_FAILURE_STATUS`], no headers, an empty body and the error text.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    status: StatusCode,
    is_success: bool,
    body: String,
    headers: Option<HeaderMap>,
    error_message: Option<String>,
}

impl ClientResponse {
    /// Builds the response for a server reply.
    pub fn new(status: StatusCode, headers: HeaderMap, body: String) -> Self {
        Self {
            status,
            is_success: status.is_success(),
            body,
            headers: Some(headers),
            error_message: None,
        }
    }

    /// Builds the response for a request that never got a reply.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            status: TRANSPORT_FAILURE_STATUS,
            is_success: false,
            body: String::new(),
            headers: None,
            error_message: Some(message.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the response, returning the body without copying it.
    pub fn into_body(self) -> String {
        self.body
    }

    /// Response headers; `None` after a transport failure.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Coarse classification of the body, derived from the `Content-Type` header.
    ///
    /// `None` when there are no headers, i.e. after a transport failure.
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers.as_ref().map(ContentType::from_headers)
    }
}
