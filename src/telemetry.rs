use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the daemon. `RUST_LOG` overrides the default
/// `rootrelay=info` filter.
pub fn init() {
    init_with("rootrelay=info");
}

/// Initialize tracing with `default_filter` unless `RUST_LOG` is set.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place and return `false`.
pub fn init_with(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
