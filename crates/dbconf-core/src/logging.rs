//! Process-wide tracing setup for the dbconf CLI

use std::sync::OnceLock;
use tracing::Level;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "DBCONF_LOG";

static SUBSCRIBER: OnceLock<Level> = OnceLock::new();

/// Level named by `raw`, or `INFO` when unset or unrecognized
fn parse_level(raw: Option<&str>) -> Level {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(Level::INFO)
}

/// Install a stderr subscriber at the level from [`LOG_ENV`]
///
/// Stdout is left for command output. Only the first call installs anything;
/// the level it chose is returned on every call.
pub fn init() -> Level {
    *SUBSCRIBER.get_or_init(|| {
        let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
        // Another subscriber may already be set (tests, embedding binaries)
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        level
    })
}
