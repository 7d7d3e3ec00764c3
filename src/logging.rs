//! Log subscriber setup.
//!
//! The client only emits `tracing` events; applications decide where they go.
//! [`init`] is a convenience for scripts that want the usual stderr output.
//!
//! Every client operation runs inside a `shopify_http` span whose `module`
//! field defaults to [`entry_point_name`], so log lines from several scripts
//! sharing one log sink can be told apart.

use std::io;
use std::path::Path;

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Installs a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. An unparsable `level` falls back
/// to `info`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// shopify_http_client::logging::init("info").expect("logging already initialized");
/// ```
pub fn init(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .try_init()
}

/// Returns the file stem of the running executable, or `"shopify"` when it
/// cannot be determined.
#[must_use]
pub fn entry_point_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_stem())
        .map_or_else(
            || "shopify".to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_name_is_not_empty() {
        let name = entry_point_name();
        assert!(!name.is_empty());
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_second_init_fails() {
        let _ = init("debug");
        assert!(init("debug").is_err());
    }
}
