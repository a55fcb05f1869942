use tracing_subscriber::EnvFilter;

/// Filter directives for stderr logging, e.g. `VOLSTAT_LOG=debug`.
pub const LOG_ENV: &str = "VOLSTAT_LOG";

/// Initialize stderr logging when VOLSTAT_LOG is set. Returns whether it was.
pub fn init_logging() -> bool {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return false;
    };

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("volstat logging initialized");
    }
    installed
}
