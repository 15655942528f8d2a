//! Tracing subscriber setup
//!
//! Precedence: `--log-level` / `--verbose` > `NOTEPORT_LOG` > `[logging] level` > `warn`.
//! The environment variable is already folded into the loaded config by
//! `ConfigLoader`, so only the flag and the config value are consulted here.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter for the requested flag level or configured directive
pub fn build_filter(requested: Option<LevelFilter>, configured: &str) -> EnvFilter {
    if let Some(level) = requested {
        return EnvFilter::new(level.to_string());
    }

    let configured = configured.trim();
    if configured.is_empty() {
        return EnvFilter::new(DEFAULT_DIRECTIVE);
    }

    EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
///
/// Fails when a global subscriber is already set.
pub fn init(requested: Option<LevelFilter>, configured: &str) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(requested, configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_config() {
        let filter = build_filter(Some(LevelFilter::DEBUG), "error");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_config_directive_used_without_flag() {
        let filter = build_filter(None, "info");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = init(None, "warn");
        assert!(init(Some(LevelFilter::INFO), "warn").is_err());
    }

    #[test]
    fn test_empty_config_falls_back_to_warn() {
        let filter = build_filter(None, "  ");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
