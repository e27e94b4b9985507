use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Verbosity is controlled through `JBIND_LOG` (standard env-filter syntax);
/// repeated initialisation is a no-op so tests can call this freely.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("JBIND_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
