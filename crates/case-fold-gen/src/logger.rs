use std::env;
use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Overrides the level chosen with `-v`, e.g. `CASE_FOLD_GEN_LOG=trace` or
/// `CASE_FOLD_GEN_LOG=casefold_tables=trace`.
pub const LOG_ENV_VAR: &str = "CASE_FOLD_GEN_LOG";

/// The level for the number of `-v` flags.
pub fn level_from_verbosity(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The filter for `directives` taken from `LOG_ENV_VAR`, falling back to the
/// `verbosity` level when they are missing or malformed.
pub fn filter(directives: Option<&str>, verbosity: usize) -> EnvFilter {
    let builder =
        EnvFilter::builder().with_default_directive(level_from_verbosity(verbosity).into());
    match directives {
        Some(directives) => builder
            .parse(directives)
            .unwrap_or_else(|_| builder.parse_lossy("")),
        None => builder.parse_lossy(""),
    }
}

/// Log to stderr.
///
/// Records from the `log` facade, which `casefold-tables` uses, are forwarded
/// to the subscriber.
pub fn init(verbosity: usize) {
    let directives = env::var(LOG_ENV_VAR).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter(directives.as_deref(), verbosity))
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), LevelFilter::WARN);
        assert_eq!(level_from_verbosity(1), LevelFilter::INFO);
        assert_eq!(level_from_verbosity(2), LevelFilter::DEBUG);
        assert_eq!(level_from_verbosity(3), LevelFilter::TRACE);
        assert_eq!(level_from_verbosity(10), LevelFilter::TRACE);
    }

    #[test]
    fn test_filter() {
        assert_eq!(filter(None, 0).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(filter(None, 2).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            filter(Some("trace"), 0).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
        assert_eq!(filter(Some("off"), 3).max_level_hint(), Some(LevelFilter::OFF));
        // Malformed directives fall back to the verbosity.
        assert_eq!(
            filter(Some("casefold_tables=loud"), 1).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
