//! Process-wide default registry.
//!
//! Nothing in this crate depends on it; applications that prefer to pass a
//! [`Registry`] around can ignore this module entirely.

use once_cell::sync::Lazy;
use tracing::warn;

use crate::config::RegistryConfig;
use crate::registry::Registry;

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let config = RegistryConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring TYPEPATH_* environment, using default configuration");
        RegistryConfig::default()
    });
    Registry::from_config(config)
});

/// The process-wide registry, built on first use from `TYPEPATH_*`
/// environment variables (see [`RegistryConfig::from_env`]).
pub fn registry() -> &'static Registry {
    &REGISTRY
}
