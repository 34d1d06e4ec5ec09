//! Log output for the markhub binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a compact stderr subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is malformed and the fallback filter
/// cannot be built, or if a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
