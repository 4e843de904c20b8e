//! Shared setup for integration tests.

use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Filter with `RUST_LOG`,
/// e.g. `RUST_LOG=bucketpipe=trace`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
