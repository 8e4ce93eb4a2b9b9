//! Tracing setup shared by every command.
//!
//! Log output goes through [`crate::stderr_buffer`] so that nothing is
//! printed over the terminal UI while it is running.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Only the first call takes effect.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(crate::stderr_buffer::writer),
        )
        .try_init()
        .ok();
}
