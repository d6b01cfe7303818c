//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the panel server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// URL path serving both the page (GET) and sync requests (POST).
    pub path: String,
    /// Page title.
    pub title: String,
    /// Extra markup inserted into the page head, e.g. a stylesheet.
    pub header_add: String,
    /// Interval between client polls.
    pub poll_interval: Duration,
    /// Inactivity the client waits for before sending typed text.
    pub input_debounce: Duration,
    /// Consecutive unanswered requests after which the client shows the
    /// connection as broken.
    pub connection_failure_threshold: u32,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            path: "/".to_string(),
            title: "Ajane".to_string(),
            header_add: String::new(),
            poll_interval: Duration::from_secs(1),
            input_debounce: Duration::from_secs(1),
            connection_failure_threshold: 5,
        }
    }

    /// Sets the URL path. A leading `/` is added if missing.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// Sets the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets extra head markup.
    pub fn with_header_add(mut self, markup: impl Into<String>) -> Self {
        self.header_add = markup.into();
        self
    }

    /// Sets the client poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the client input debounce.
    pub fn with_input_debounce(mut self, debounce: Duration) -> Self {
        self.input_debounce = debounce;
        self
    }

    /// Sets the connection failure threshold.
    pub fn with_connection_failure_threshold(mut self, threshold: u32) -> Self {
        self.connection_failure_threshold = threshold;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.path, "/");
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.connection_failure_threshold, 5);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_path("panel")
            .with_title("Pump")
            .with_poll_interval(Duration::from_millis(500))
            .with_connection_failure_threshold(3);

        assert_eq!(config.path, "/panel");
        assert_eq!(config.title, "Pump");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.connection_failure_threshold, 3);
    }
}
