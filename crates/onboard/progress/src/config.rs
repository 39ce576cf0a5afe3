//! Progress evaluation configuration.
//!
//! Defines how stages are scanned, how often watchers poll and where the
//! gateway lives. Loaded from defaults, an optional file and `ONBOARD_*`
//! environment variables, in that order.

use std::time::Duration;

use onboard_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};

use crate::error::ProgressResult;
use crate::evaluator::{CompletionPolicy, ExecutionMode};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Remote Resource Gateway connection.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Stage scanning behaviour.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Watcher polling.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            evaluation: EvaluationConfig::default(),
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProgressConfig {
    /// Load configuration from defaults, an optional file and the
    /// environment (`ONBOARD_POLLING__INTERVAL_SECS=30`, ...).
    pub fn load(path: Option<&str>) -> ProgressResult<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&ProgressConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with ONBOARD_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ONBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// How a stage set is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// How `current_stage` is derived from the passed stages.
    #[serde(default)]
    pub policy: CompletionPolicy,

    /// Sequential (stage order) or concurrent predicate execution.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Upper bound on a single predicate; a timed-out predicate counts as false.
    #[serde(default = "default_predicate_timeout")]
    pub predicate_timeout_ms: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            policy: CompletionPolicy::default(),
            mode: ExecutionMode::default(),
            predicate_timeout_ms: default_predicate_timeout(),
        }
    }
}

impl EvaluationConfig {
    pub fn predicate_timeout(&self) -> Duration {
        Duration::from_millis(self.predicate_timeout_ms)
    }
}

/// Watcher polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between evaluations.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Capacity of the watcher event channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl PollingConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval_secs: interval.as_secs().max(1),
            ..Default::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_predicate_timeout() -> u64 {
    10_000
}

fn default_poll_interval() -> u64 {
    15
}

fn default_event_capacity() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}
