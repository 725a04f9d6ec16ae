use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber for the binary. `RUST_LOG` wins over
/// `default_level`. Calling it twice is harmless.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
