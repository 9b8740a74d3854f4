use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const CONSOLE_FILTER: &str = "info,entity=warn,news=warn";
const FILE_FILTER: &str = "debug";

/// Console logging on stderr (stdout carries results) plus a daily log file under `log_dir`.
///
/// `RUST_LOG` overrides the console filter.
pub fn configure_logging(log_dir: &Path) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(CONSOLE_FILTER));

    let stderr_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    let file_appender = rolling::daily(log_dir, "medwire.log");
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(stderr_log)
        .with(file_log)
        .init();
}
