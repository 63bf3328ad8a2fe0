//! `tracing` subscriber setup.

use sidearms_core::config::GeneralConfig;
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber for the sidearms log output.
///
/// `RUST_LOG` wins over `config.log_level` when set. Returns `false` if a
/// global subscriber was already installed, which leaves that one in place.
pub fn init_tracing(config: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = GeneralConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
