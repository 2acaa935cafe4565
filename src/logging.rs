//! Structured logging setup.
//!
//! Mirrors the registry + `EnvFilter` + fmt-layer wiring used elsewhere in
//! this codebase, but picks its filter from the parsed config's
//! `logging.level` instead of only `RUST_LOG`, and optionally mirrors output
//! to a rolling file via `tracing-appender` when `logging.write_to_file` is
//! set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Guard returned by [`init`]. Must be kept alive for the lifetime of the
/// process when file logging is enabled, or buffered log lines are dropped
/// on exit.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

pub fn init(config: &LoggingConfig) -> LoggingGuard {
    let filter = level_filter(&config.level);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false));

    if config.write_to_file {
        let file_appender = tracing_appender::rolling::daily("./logs", "boardrelay.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        registry
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();
        LoggingGuard {
            _file_guard: Some(guard),
        }
    } else {
        registry.init();
        LoggingGuard { _file_guard: None }
    }
}

fn level_filter(level: &str) -> EnvFilter {
    let directive = match level.to_ascii_uppercase().as_str() {
        "DEBUG" => "boardrelay=debug",
        "INFO" => "boardrelay=info",
        other => {
            eprintln!("unrecognised logging.level '{other}', defaulting to info");
            "boardrelay=info"
        }
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}
