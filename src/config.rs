use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::TableSetError;

/// How long a pooled connection may be reused before it is closed.
pub const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Connection settings for one database.
///
/// Can be deserialized from a config file or flattened into a `clap` parser:
/// ```rust
/// use sql_tableset::config::DbConfig;
///
/// let cfg: DbConfig = serde_json::from_str(
///     r#"{"DataType": "sqlite", "ConnectionString": "app.db", "PoolMaxSize": 4}"#,
/// )
/// .unwrap();
/// assert_eq!(cfg.pool_max_size, 4);
/// assert_eq!(cfg.pool_min_size, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Args)]
pub struct DbConfig {
    /// Backend kind: mysql, postgresql, sqlite or sqlserver (any case).
    #[serde(alias = "DataType")]
    #[arg(long, env = "TABLESET_DATA_TYPE")]
    pub data_type: String,
    /// Backend-specific connection string.
    #[serde(alias = "ConnectionString")]
    #[arg(long, env = "TABLESET_CONNECTION_STRING")]
    pub connection_string: String,
    /// Minimum idle connections kept by the pool; 0 leaves the pool default.
    #[serde(default, alias = "PoolMinSize")]
    #[arg(long, env = "TABLESET_POOL_MIN_SIZE", default_value_t = 0)]
    pub pool_min_size: u32,
    /// Maximum open connections; 0 leaves the pool default.
    #[serde(default, alias = "PoolMaxSize")]
    #[arg(long, env = "TABLESET_POOL_MAX_SIZE", default_value_t = 0)]
    pub pool_max_size: u32,
}

impl DbConfig {
    #[must_use]
    pub fn new(data_type: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            connection_string: connection_string.into(),
            pool_min_size: 0,
            pool_max_size: 0,
        }
    }

    #[must_use]
    pub fn with_pool_bounds(mut self, pool_min_size: u32, pool_max_size: u32) -> Self {
        self.pool_min_size = pool_min_size;
        self.pool_max_size = pool_max_size;
        self
    }

    /// Pool limits derived from this configuration.
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings::from_config(self)
    }
}

/// Limits applied to a backend pool when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Idle connections the pool keeps ready; `None` keeps the pool default.
    pub min_idle: Option<u32>,
    /// Upper bound on open connections; `None` keeps the pool default.
    pub max_open: Option<u32>,
    pub max_lifetime: Duration,
}

impl PoolSettings {
    /// Bound used by `bb8` when no maximum is configured.
    pub const DEFAULT_MAX_OPEN: u32 = 10;

    #[must_use]
    pub fn from_config(config: &DbConfig) -> Self {
        Self {
            min_idle: (config.pool_min_size > 0).then_some(config.pool_min_size),
            max_open: (config.pool_max_size > 0).then_some(config.pool_max_size),
            max_lifetime: MAX_CONNECTION_LIFETIME,
        }
    }

    /// Reject bounds the pool builder cannot honour.
    ///
    /// Only explicit bounds are compared; an idle minimum without a maximum
    /// raises the pool size instead (see [`effective_max_open`](Self::effective_max_open)).
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` when the idle minimum exceeds the open maximum.
    pub fn validate(&self) -> Result<(), TableSetError> {
        match (self.min_idle, self.max_open) {
            (Some(min_idle), Some(max_open)) if min_idle > max_open => {
                Err(TableSetError::ConfigError(format!(
                    "pool minimum size {min_idle} exceeds maximum size {max_open}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Maximum pool size handed to `bb8`: the configured bound, or the `bb8`
    /// default raised to the idle minimum when only a minimum is set.
    #[must_use]
    pub fn effective_max_open(&self) -> u32 {
        self.max_open.unwrap_or_else(|| {
            self.min_idle
                .map_or(Self::DEFAULT_MAX_OPEN, |min| min.max(Self::DEFAULT_MAX_OPEN))
        })
    }

    /// Apply these limits to a `bb8` pool builder.
    #[must_use]
    pub fn apply<M: bb8::ManageConnection>(&self, builder: bb8::Builder<M>) -> bb8::Builder<M> {
        builder
            .min_idle(self.min_idle)
            .max_lifetime(Some(self.max_lifetime))
            .max_size(self.effective_max_open())
    }
}
