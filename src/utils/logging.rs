// file: src/utils/logging.rs
// description: Tracing subscriber initialization on stderr with optional ANSI coloring

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Picks the filter directive: `--debug`, then `--verbose`, then `LOG_LEVEL`, then `warn`.
pub fn resolve_level(debug: bool, verbose: bool, env_level: Option<&str>) -> String {
    if debug {
        "debug".to_string()
    } else if verbose {
        "info".to_string()
    } else {
        env_level
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "warn".to_string())
    }
}

pub fn init_logger(colored_output: bool, level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the markdown
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .without_time()
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}
