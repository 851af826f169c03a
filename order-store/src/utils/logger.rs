//! Logging Infrastructure
//!
//! Structured logging to stdout, or to a daily rolling file when a log
//! directory is configured. `RUST_LOG` directives take precedence over the
//! configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// Falls back to stdout when `log_dir` does not exist. Calling this twice
/// keeps the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, rust_log.as_deref()))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "order-store");
            let _ = subscriber.with_writer(file_appender).try_init();
            return;
        }
        eprintln!("Log directory {} does not exist, logging to stdout", dir);
    }

    let _ = subscriber.try_init();
}

/// `RUST_LOG` directives if present and valid, otherwise `level`
fn build_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_configured_level() {
        let filter = build_filter("debug", None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = build_filter("debug", Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
