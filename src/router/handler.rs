//! Application handlers ("services") and the response context they see.

use crate::http::mime::DEFAULT_HANDLER_TYPE;
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// Logic invoked for a matched route.
///
/// The returned string becomes the response body. Any closure of shape
/// `Fn(&Request, &mut ResponseContext) -> String` is a handler, so named
/// types are only needed when a handler carries state.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request, response: &mut ResponseContext) -> String;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut ResponseContext) -> String + Send + Sync + 'static,
{
    fn handle(&self, request: &Request, response: &mut ResponseContext) -> String {
        self(request, response)
    }
}

/// Mutable carrier handed to a handler alongside the request.
///
/// Starts as `200 OK` with `application/json`; a handler may change either
/// or add headers before returning its body.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    status: StatusCode,
    content_type: String,
    headers: Vec<(String, String)>,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self {
            status: StatusCode::Ok,
            content_type: DEFAULT_HANDLER_TYPE.to_string(),
            headers: Vec::new(),
        }
    }
}

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push((key.into(), value.into()));
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
