//! Test logging
//!
//! Installs a tracing subscriber once per test binary. The filter comes from
//! `RUST_LOG` and defaults to `warn`, so the warnings emitted on rejected
//! postings show up in failing test output.

use once_cell::sync::Lazy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Another subscriber may already be installed by the test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_target(true))
        .try_init();
});

/// Initializes tracing for tests; safe to call from every test
pub fn init_test_logging() {
    Lazy::force(&TRACING);
}
