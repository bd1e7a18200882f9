//! Test logging setup

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Install a fmt subscriber writing through the test harness
///
/// Honors `RUST_LOG`. Returns `false` if a global subscriber was already
/// installed, which makes it safe to call from every test.
pub fn init_test_logging() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_logging();
        assert!(!init_test_logging());
    }
}
