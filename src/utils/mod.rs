pub mod paths;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "warn,spendly_core=info";

/// Installs the global fmt subscriber once.
///
/// A valid `RUST_LOG` replaces the default filter, which logs this crate at
/// `info` and everything else at `warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());

        // A host that already installed a subscriber keeps it.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
