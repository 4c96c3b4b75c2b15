//! Log output for tests
//!
//! Tests that want to see repository logs call [`init_test_tracing`] first.
//! Output goes through the test writer, so it is only shown for failing
//! tests or with `--nocapture`. The filter is read from `RUST_LOG` and
//! defaults to debug output for the database layer.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "infra_db=debug,warn";

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Another harness may already have installed a global subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs the test log subscriber once per process
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}
