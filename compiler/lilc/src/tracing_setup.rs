//! Logging setup for the binary.

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Map `--log=N` to a level: 0=error, 1=warn, 2=info, 3=debug, 4+=trace.
pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Safe to call more than once.
///
/// `RUST_LOG` wins when set; otherwise `level` (from `--log=N`) applies,
/// defaulting to warnings.
pub fn init_tracing(level: Option<u8>) {
    TRACING_INIT.call_once(|| {
        let fallback = level_filter(level.unwrap_or(1));
        let filter = EnvFilter::builder()
            .with_default_directive(fallback.into())
            .from_env_lossy();
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}
