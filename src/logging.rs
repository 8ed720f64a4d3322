//! Optional `tracing` subscriber setup for binaries and tests embedding the tutor.
//!
//! The library itself only emits events; nothing is printed unless a
//! subscriber is installed.

use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt, EnvFilter};

/// The formatted subscriber [`init`] installs. `RUST_LOG` overrides `level`
/// when set.
pub fn subscriber(level: Level) -> impl Subscriber + Send + Sync + 'static {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish()
}

/// Install [`subscriber`] globally.
///
/// Returns `false` when a global subscriber was already installed, which makes
/// repeated calls harmless.
pub fn init(level: Level) -> bool {
    tracing::subscriber::set_global_default(subscriber(level)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_filters_below_the_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        tracing::subscriber::with_default(subscriber(Level::WARN), || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::DEBUG));
        });
        assert!(!tracing::dispatcher::has_been_set(), "scoped use installs nothing globally");
    }
}
