use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance, `None` before [`init_config`].
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().map(|config| config.load_full())
}

/// Initialize the global configuration
///
/// Loads configuration from the given TOML file (or "config.toml" in the
/// current directory) and `FG__*` environment variables. Missing files fall
/// back to in-memory defaults. Later calls are no-ops.
///
/// # Examples
/// ```no_run
/// use foodgram::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(path)))
        .load_full()
}
