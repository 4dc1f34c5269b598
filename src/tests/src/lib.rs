//! Integration tests for the ripple core.

pub mod amount_tests;
pub mod codec_tests;
pub mod identity_tests;
pub mod signing_tests;
pub mod trie_tests;
pub mod txset_tests;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
