//! Logger set-up for the `warden` binary and tests.

use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

/// Default filter for the given verbosity.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and
/// the default is info. Calling this again keeps the first logger.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        debug!("logger already initialised");
    }
}
