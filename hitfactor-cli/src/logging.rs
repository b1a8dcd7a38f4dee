//! Process-wide log subscriber for the `hitfactor` binary.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Records emitted through the `log` facade by the library crates are
/// forwarded to the same subscriber. A second call keeps the first
/// subscriber and logs the refusal at debug level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        log::debug!("log subscriber already installed: {err}");
    }
}
