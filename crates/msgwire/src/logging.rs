//! Subscriber setup for hosts that want the registry and handler startup
//! diagnostics on stderr.
//!
//! ```ignore
//! let logging: LoggingConfig = serde_json::from_str(r#"{"format":"json","level":"debug"}"#)?;
//! let protocol = Protocol::prepare_logged(&logging, handlers)?;
//! ```

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Most verbose level emitted. Per-descriptor and per-binding lines are
/// logged at `debug`, the startup summary at `info`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// The `logging` section of a host's configuration, loaded next to
/// [`RegistryConfig`](crate::RegistryConfig).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix each line with the emitting module, e.g. `msgwire_registry::registry`.
    pub targets: bool,
}

impl LoggingConfig {
    /// Install a stderr subscriber for this configuration.
    ///
    /// Returns `false` when the process already has a global subscriber, in
    /// which case that one keeps receiving events.
    pub fn install(&self) -> bool {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(LevelFilter::from(self.level))
            .with_target(self.targets);

        match self.format {
            LogFormat::Text => builder.try_init().is_ok(),
            LogFormat::Json => builder.json().try_init().is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerDecl, Protocol};

    #[test]
    fn empty_section_uses_defaults() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(LevelFilter::from(config.level), LevelFilter::INFO);
        assert!(!config.targets);
    }

    #[test]
    fn section_names_are_lowercase() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"format":"json","level":"off","targets":true}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(LevelFilter::from(config.level), LevelFilter::OFF);
        assert!(config.targets);
        assert!(serde_json::from_str::<LoggingConfig>(r#"{"level":"verbose"}"#).is_err());
    }

    #[test]
    fn startup_installs_subscriber_once() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            ..LoggingConfig::default()
        };
        let protocol = Protocol::prepare_logged(&config, Vec::<HandlerDecl>::new()).unwrap();
        assert!(protocol.handlers().is_empty());

        // A second install finds the subscriber from the first.
        assert!(!config.install());
    }
}
