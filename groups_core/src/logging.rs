//! Logging to stdout through `tracing`.
//!

pub use tracing::metadata::LevelFilter;
pub use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` isn't set. The http stack is noisy at debug.
const DEFAULT_DIRECTIVES: &str = "reqwest=warn";

/// Install the global subscriber. `level` caps what gets printed, INFO if unset.
/// Calling this more than once leaves the first subscriber in place.
pub fn setup(level: Option<LevelFilter>) {
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_owned());
    let printed = tracing_subscriber::fmt::layer().with_filter(level.unwrap_or(LevelFilter::INFO));

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(printed)
        .try_init();

    match installed {
        Ok(()) => debug!("logging set up"),
        Err(_) => debug!("a subscriber was already installed"),
    }
}
