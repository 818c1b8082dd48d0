//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for a level, restricted to this workspace's crates.
///
/// Keeps HTTP client internals quiet at `debug` and `trace`.
pub fn default_filter(level: &str) -> String {
    format!(
        "warn,reversal={level},reversal_backtest={level},\
         reversal_data={level},reversal_signals={level}"
    )
}

/// Setup logging with the given level.
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so that
/// reports printed to stdout can be piped.
pub fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let directive = default_filter("debug");
        assert!(directive.contains("reversal_data=debug"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
