//! Builders for test configurations.

use crate::config::StoreConfig;

/// Builder for creating test store configurations.
#[derive(Debug)]
pub struct TestStoreConfigBuilder {
    path: String,
    create_if_missing: bool,
    auto_migrate: bool,
    max_connections: u32,
}

impl TestStoreConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            path: "historic.db".to_string(),
            create_if_missing: true,
            auto_migrate: false,
            max_connections: 2,
        }
    }

    /// Sets the database path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub fn with_auto_migrate(mut self, auto_migrate: bool) -> Self {
        self.auto_migrate = auto_migrate;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Builds the store configuration.
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            path: self.path,
            create_if_missing: self.create_if_missing,
            auto_migrate: self.auto_migrate,
            max_connections: self.max_connections,
        }
    }
}

impl Default for TestStoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
