//! Diagnostic logging to stderr.
//!
//! Output stays quiet by default so it never interleaves with tables or JSON
//! on stdout. `-v` raises the level, and `RUST_LOG` overrides everything.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Level implied by the number of `-v` flags.
#[must_use]
pub(crate) fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub(crate) fn init_logging(verbose: u8) {
    let level = level_for(verbose);
    let default_filter = format!("pour={level},pour_core={level}");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose > 0)
            .without_time(),
    );

    // A subscriber may already be installed (tests).
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::DEBUG);
        assert_eq!(level_for(2), Level::TRACE);
        assert_eq!(level_for(9), Level::TRACE);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(0);
        init_logging(2);
    }
}
