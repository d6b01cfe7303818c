//! Panel configuration.

use ajane_protocol::Revision;

/// Configuration for building a panel.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Revision the change clock starts at.
    pub initial_revision: Revision,

    /// Capacity of the node arena. The arena is allocated once, up front.
    pub max_nodes: usize,

    /// Whether a poll first commits pending server-side changes.
    ///
    /// When false, server code decides when a batch becomes visible by
    /// calling [`Panel::commit`](crate::Panel::commit).
    pub commit_on_poll: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            initial_revision: Revision::INITIAL,
            max_nodes: 256,
            commit_on_poll: false,
        }
    }
}

impl PanelConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial revision.
    #[must_use]
    pub const fn initial_revision(mut self, revision: Revision) -> Self {
        self.initial_revision = revision;
        self
    }

    /// Sets the node capacity.
    #[must_use]
    pub const fn max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    /// Sets whether polls commit pending changes.
    #[must_use]
    pub const fn commit_on_poll(mut self, value: bool) -> Self {
        self.commit_on_poll = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.initial_revision, Revision::INITIAL);
        assert_eq!(config.max_nodes, 256);
        assert!(!config.commit_on_poll);
    }

    #[test]
    fn builder_pattern() {
        let config = PanelConfig::new()
            .initial_revision(Revision::new(100))
            .max_nodes(8)
            .commit_on_poll(true);

        assert_eq!(config.initial_revision, Revision::new(100));
        assert_eq!(config.max_nodes, 8);
        assert!(config.commit_on_poll);
    }
}
