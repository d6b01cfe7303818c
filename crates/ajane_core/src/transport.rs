//! Transport adapter abstraction.
//!
//! The engine never talks to a web server directly. Each request is handed
//! to it as a [`Transport`] that can read named request fields and write
//! the response body.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors reported by a transport adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A request field could not be read.
    #[error("failed to read request: {0}")]
    Read(String),

    /// The response could not be written.
    #[error("failed to write response: {0}")]
    Write(String),

    /// The connection is gone.
    #[error("connection closed")]
    Closed,

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single request/response exchange with a client.
///
/// Implementations are supplied by the embedding web server. The engine
/// reads fields by name and streams the response through `write_bytes`.
pub trait Transport {
    /// Returns the value of a request field, or `None` if it is absent.
    fn read_field(&self, name: &str) -> TransportResult<Option<&str>>;

    /// Starts the response. `is_markup` selects HTML over JSON content.
    fn begin_response(&mut self, is_markup: bool) -> TransportResult<()>;

    /// Appends bytes to the response body.
    fn write_bytes(&mut self, bytes: &[u8]) -> TransportResult<()>;
}

/// Adapts a [`Transport`] to [`fmt::Write`] so encoders can stream into it.
///
/// `fmt::Error` carries no detail, so the first transport error is kept and
/// can be recovered with [`TransportWriter::into_error`].
pub struct TransportWriter<'t, T: Transport + ?Sized> {
    transport: &'t mut T,
    error: Option<TransportError>,
}

impl<'t, T: Transport + ?Sized> TransportWriter<'t, T> {
    /// Wraps a transport.
    pub fn new(transport: &'t mut T) -> Self {
        Self {
            transport,
            error: None,
        }
    }

    /// Returns the first transport error, if any write failed.
    pub fn into_error(self) -> Option<TransportError> {
        self.error
    }
}

impl<T: Transport + ?Sized> fmt::Write for TransportWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.transport.write_bytes(s.as_bytes()).map_err(|error| {
            self.error = Some(error);
            fmt::Error
        })
    }
}

/// An in-memory transport for tests and offline rendering.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    fields: HashMap<String, String>,
    body: Vec<u8>,
    markup: Option<bool>,
    closed: bool,
}

impl MemoryTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set_field(name, value);
        self
    }

    /// Sets a request field.
    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// Removes all request fields.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Returns the content kind of the response, if it was started.
    pub fn is_markup(&self) -> Option<bool> {
        self.markup
    }

    /// Response body written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body as text.
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }

    /// Takes the response body, leaving the transport ready for the next
    /// response.
    pub fn take_body(&mut self) -> String {
        self.markup = None;
        String::from_utf8_lossy(&std::mem::take(&mut self.body)).into_owned()
    }

    /// Clears fields and response.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.body.clear();
        self.markup = None;
    }

    /// Simulates a dropped connection: every later call fails.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for MemoryTransport {
    fn read_field(&self, name: &str) -> TransportResult<Option<&str>> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        Ok(self.fields.get(name).map(String::as_str))
    }

    fn begin_response(&mut self, is_markup: bool) -> TransportResult<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.markup = Some(is_markup);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> TransportResult<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn memory_transport_fields() {
        let mut transport = MemoryTransport::new().with_field("revision", "3");
        assert_eq!(transport.read_field("revision").unwrap(), Some("3"));
        assert_eq!(transport.read_field("missing").unwrap(), None);

        transport.clear_fields();
        assert_eq!(transport.read_field("revision").unwrap(), None);
    }

    #[test]
    fn memory_transport_body() {
        let mut transport = MemoryTransport::new();
        transport.begin_response(false).unwrap();
        transport.write_bytes(b"{}").unwrap();
        assert_eq!(transport.is_markup(), Some(false));
        assert_eq!(transport.body_str(), "{}");

        assert_eq!(transport.take_body(), "{}");
        assert!(transport.body().is_empty());
        assert_eq!(transport.is_markup(), None);
    }

    #[test]
    fn closed_transport_fails() {
        let mut transport = MemoryTransport::new().with_field("a", "b");
        transport.close();
        assert!(matches!(transport.read_field("a"), Err(TransportError::Closed)));
        assert!(matches!(
            transport.write_bytes(b"x"),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn writer_keeps_first_error() {
        let mut transport = MemoryTransport::new();
        {
            let mut writer = TransportWriter::new(&mut transport);
            write!(writer, "{}", 42).unwrap();
            assert!(writer.into_error().is_none());
        }
        assert_eq!(transport.body_str(), "42");

        transport.close();
        let mut writer = TransportWriter::new(&mut transport);
        assert!(writer.write_str("more").is_err());
        assert!(matches!(writer.into_error(), Some(TransportError::Closed)));
    }
}
