use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging for the CLI: human-readable console output on
/// stderr plus daily-rotated JSON logs under `logs/`.
///
/// Stdout stays reserved for result output.
pub fn init_logging() {
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "normalizer.log");
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("gamecode_normalizer=info".parse().unwrap()),
        )
        .with(file_layer)
        .with(console_layer)
        .init();

    // Keep the guard alive so buffered file logs flush on exit
    std::mem::forget(_guard);
}
