//! Log filtering for the server process.

use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or cannot be parsed.
///
/// `info` keeps the per-mutation audit events of the review engine visible.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the log filter from the value of `RUST_LOG`, if any.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_info_by_default() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_wins() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("warn,catalog_core=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
