//! Tracing setup for the `stepwise` binary.
//!
//! The terminal wizard owns the screen, so `run` writes to
//! `<paths.state>/logs/stepwise-{datetime}.log`. Every other command logs to
//! stderr.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the file writer alive; buffered lines are flushed when it drops.
pub struct LoggingHandle {
    _guard: Option<WorkerGuard>,

    /// Set only when logging goes to a file
    pub log_file_path: Option<PathBuf>,
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sink {
    Stderr,
    File { dir: PathBuf, name: String },
}

impl Sink {
    fn choose(config: &Config, owns_terminal: bool, timestamp: &str) -> Self {
        if owns_terminal && config.logging.to_file {
            Sink::File {
                dir: config.logs_path(),
                name: format!("stepwise-{timestamp}.log"),
            }
        } else {
            Sink::Stderr
        }
    }
}

/// Level directive: `--debug` beats the configured level.
fn level_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the level.
pub fn init_logging(
    config: &Config,
    owns_terminal: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let directive =
        std::env::var("RUST_LOG").unwrap_or_else(|_| level_directive(config, debug_override));
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter {directive:?}"))?;

    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    match Sink::choose(config, owns_terminal, &timestamp) {
        Sink::File { dir, name } => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, &name));

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();

            Ok(LoggingHandle {
                _guard: Some(guard),
                log_file_path: Some(dir.join(name)),
            })
        }
        Sink::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();

            Ok(LoggingHandle {
                _guard: None,
                log_file_path: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        config
    }

    #[test]
    fn test_terminal_run_logs_to_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        match Sink::choose(&config, true, "20260101T000000Z") {
            Sink::File { dir, name } => {
                assert!(dir.starts_with(temp_dir.path()));
                assert!(dir.ends_with("logs"));
                assert_eq!(name, "stepwise-20260101T000000Z.log");
            }
            Sink::Stderr => panic!("expected a log file"),
        }
    }

    #[test]
    fn test_other_commands_log_to_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        assert_eq!(Sink::choose(&config, false, "t"), Sink::Stderr);
    }

    #[test]
    fn test_file_logging_can_be_turned_off() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.logging.to_file = false;
        assert_eq!(Sink::choose(&config, true, "t"), Sink::Stderr);
    }

    #[test]
    fn test_debug_flag_overrides_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();
        assert_eq!(level_directive(&config, false), "warn");
        assert_eq!(level_directive(&config, true), "debug");
    }
}
