use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logger() -> impl Drop {
    // Attempt to read the tracing level from the `SNAPCHECK_LOG` environment
    // variable. Default to `info` if not specified.
    let default_filter = "info";
    let filter = env::var("SNAPCHECK_LOG").unwrap_or_else(|_| default_filter.to_string());
    let filter_layer = EnvFilter::new(filter);

    // Attempt to read the log file path from the `LOG_FILE_PATH` environment
    // variable. Default to `./logs/snapcheck.log` if not specified.
    let default_log_path = "./logs/snapcheck.log";
    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| default_log_path.to_string());

    // Set up file logging
    let file_appender = tracing_appender::rolling::never("./", log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Combine everything together. Console logging goes to stderr so the
    // check output on stdout stays clean for the notification system.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .pretty()
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking) // Log to file
                .with_ansi(false),
        ) // Disable ANSI escape codes for the file logger
        .with(filter_layer)
        .init();

    guard // Return the guard to keep it alive
}
