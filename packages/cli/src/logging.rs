// ABOUTME: Tracing subscriber setup for the elbitat binary
// ABOUTME: RUST_LOG wins, then ELBITAT_LOG, then warnings only

use elbitat_config::{constants, env_non_empty};
use tracing_subscriber::EnvFilter;

fn fallback_directive() -> String {
    env_non_empty(constants::ELBITAT_LOG).unwrap_or_else(|| "warn".to_string())
}

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_directive()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_fallback_directive() {
        std::env::remove_var(constants::ELBITAT_LOG);
        assert_eq!(fallback_directive(), "warn");

        std::env::set_var(constants::ELBITAT_LOG, "elbitat_creative=debug");
        assert_eq!(fallback_directive(), "elbitat_creative=debug");
        std::env::remove_var(constants::ELBITAT_LOG);
    }
}
