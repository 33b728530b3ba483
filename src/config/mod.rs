//! # Configuration
//!
//! Environment-driven subscriber settings. Variables use the `SYNC_` prefix,
//! e.g. `SYNC_POLL_INTERVAL_SECS=5` or `SYNC_SHUTDOWN_MODE=drain`; anything
//! unset falls back to the defaults baked into [`SubscriberConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::subscriber::{ShutdownMode, SubscriberOptions};

const ENV_PREFIX: &str = "SYNC";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Subscriber settings as loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_messages_limit")]
    pub messages_limit: usize,

    #[serde(default = "default_partition_count")]
    pub partition_count: usize,

    #[serde(default)]
    pub shutdown_mode: ShutdownMode,
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_messages_limit() -> usize {
    1
}

fn default_partition_count() -> usize {
    1
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        SubscriberConfig {
            poll_interval_secs: default_poll_interval_secs(),
            messages_limit: default_messages_limit(),
            partition_count: default_partition_count(),
            shutdown_mode: ShutdownMode::default(),
        }
    }
}

impl SubscriberConfig {
    /// Load from `SYNC_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Convert into the runtime options the subscriber consumes.
    pub fn options(&self) -> SubscriberOptions {
        SubscriberOptions {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            messages_limit: self.messages_limit,
            partition_count: self.partition_count,
            shutdown_mode: self.shutdown_mode,
        }
    }
}
