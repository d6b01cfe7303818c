//! Transport adapter over decoded form fields.

use ajane_core::{Transport, TransportResult};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;

/// Content type of sync responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of page responses.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A [`Transport`] reading the fields of a form-encoded request and
/// collecting the response body in memory.
#[derive(Debug, Default)]
pub struct FormTransport {
    fields: HashMap<String, String>,
    markup: bool,
    body: Vec<u8>,
}

impl FormTransport {
    /// Creates a transport for one request.
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self {
            fields,
            markup: false,
            body: Vec::new(),
        }
    }

    /// Response body written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Content type chosen by the engine.
    pub fn content_type(&self) -> &'static str {
        if self.markup {
            HTML_CONTENT_TYPE
        } else {
            JSON_CONTENT_TYPE
        }
    }
}

impl Transport for FormTransport {
    fn read_field(&self, name: &str) -> TransportResult<Option<&str>> {
        Ok(self.fields.get(name).map(String::as_str))
    }

    fn begin_response(&mut self, is_markup: bool) -> TransportResult<()> {
        self.markup = is_markup;
        self.body.clear();
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> TransportResult<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

impl IntoResponse for FormTransport {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type()),
                (header::CACHE_CONTROL, "no-store"),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn reads_fields() {
        let mut fields = HashMap::new();
        fields.insert("revision".to_string(), "4".to_string());
        let transport = FormTransport::new(fields);
        assert_eq!(transport.read_field("revision").unwrap(), Some("4"));
        assert_eq!(transport.read_field("name").unwrap(), None);
    }

    #[test]
    fn response_headers() {
        let mut transport = FormTransport::default();
        transport.begin_response(false).unwrap();
        transport.write_bytes(b"{}").unwrap();
        assert_eq!(transport.body(), b"{}");

        let response = transport.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JSON_CONTENT_TYPE
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }
}
