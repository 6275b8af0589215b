//! Logging setup.
//!
//! Call `logging::init()` at the start of `main()`. The filter comes from
//! `RUST_LOG` when set, otherwise `info` for Launchpad crates and `warn`
//! for everything else.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,padcore=info,padtrash=info,padfiles=info";

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
