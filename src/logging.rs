use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither an explicit level nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr `fmt` subscriber.
///
/// `level` wins over `RUST_LOG`, which wins over [`DEFAULT_FILTER`]. Calling
/// this again once a subscriber is installed does nothing.
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log filter {level:?}"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}
