//! Diagnostic logging setup.
//!
//! Human-facing messages go through the functions in [`crate::output`];
//! `tracing` events carry the diagnostics underneath them (anchors found,
//! counts, redrawn identifiers). Events are written to stderr and filtered
//! by `PBXSYNC_LOG` when it is set, otherwise by the verbosity level.

use super::Verbosity;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive (e.g. `pbxsync=trace`)
pub const LOG_ENV: &str = "PBXSYNC_LOG";

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Filter directive used when `PBXSYNC_LOG` is not set
#[must_use]
pub const fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "pbxsync=debug",
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbosity: Verbosity) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_verbosity() {
        assert_eq!(default_directive(Verbosity::Quiet), "error");
        assert_eq!(default_directive(Verbosity::Normal), "warn");
        assert_eq!(default_directive(Verbosity::Verbose), "pbxsync=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(Verbosity::Normal);
        init(Verbosity::Verbose);
    }
}
