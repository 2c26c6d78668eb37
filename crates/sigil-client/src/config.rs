//! Client configuration.
//!
//! Provides [`ClientConfig`] with defaults for the data directory, the
//! optional remote endpoint, and logging. Configuration is programmatic;
//! the CLI maps flags onto it.

use std::path::PathBuf;

/// Configuration for a client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// HTTP endpoint of the remote progression record; `None` runs offline.
    pub remote_url: Option<String>,
    /// Log level filter string (e.g. "info", "debug", "sigil_client=trace").
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sigil");

        Self {
            data_dir,
            remote_url: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Path to the local key-value store directory.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_offline() {
        let cfg = ClientConfig::default();
        assert!(cfg.remote_url.is_none());
    }

    #[test]
    fn default_log_level_is_info() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn default_data_dir_ends_with_sigil() {
        let cfg = ClientConfig::default();
        assert!(cfg.data_dir.ends_with("sigil"));
    }

    #[test]
    fn store_path_under_data_dir() {
        let cfg = ClientConfig::default();
        assert!(cfg.store_path().starts_with(&cfg.data_dir));
    }
}
