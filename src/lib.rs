#![doc(test(attr(deny(warnings))))]

//! Spendly Core holds the platform-independent pieces of the Spendly
//! personal-finance client: reporting periods, the onboarding flow, the
//! authenticated session, and the REST collaborators behind them.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod onboarding;
pub mod period;
pub mod ports;
pub mod time;
pub mod utils;

use std::sync::Once;

pub use errors::SpendlyError;

static INIT_TRACING: Once = Once::new();

/// `version (git-hash status, target profile)` as stamped by `build.rs`.
pub fn build_summary() -> String {
    format!(
        "{} ({} {}, {} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("SPENDLY_BUILD_HASH").unwrap_or("unknown"),
        option_env!("SPENDLY_BUILD_STATUS").unwrap_or("unknown"),
        option_env!("SPENDLY_BUILD_TARGET").unwrap_or("unknown"),
        option_env!("SPENDLY_BUILD_PROFILE").unwrap_or("unknown"),
    )
}

/// Initializes global tracing and logs what build is running.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(
            build = %build_summary(),
            built_at = option_env!("SPENDLY_BUILD_TIMESTAMP").unwrap_or("unknown"),
            rustc = option_env!("SPENDLY_BUILD_RUSTC").unwrap_or("unknown"),
            "Spendly Core tracing initialized."
        );
    });
}
