//! Store configuration.

/// Configuration for an [`EntityStore`](crate::EntityStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether every mutation is written through to durable storage.
    ///
    /// When false, changed fields are remembered and written by
    /// [`EntityStore::flush`](crate::EntityStore::flush).
    pub persist_on_change: bool,

    /// How many change events the feed keeps for polling.
    pub max_event_history: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist_on_change: true,
            max_event_history: 1024,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether mutations are written through immediately.
    #[must_use]
    pub const fn persist_on_change(mut self, value: bool) -> Self {
        self.persist_on_change = value;
        self
    }

    /// Sets the change feed history limit.
    #[must_use]
    pub const fn max_event_history(mut self, value: usize) -> Self {
        self.max_event_history = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert!(config.persist_on_change);
        assert_eq!(config.max_event_history, 1024);
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .persist_on_change(false)
            .max_event_history(8);
        assert!(!config.persist_on_change);
        assert_eq!(config.max_event_history, 8);
    }
}
