//! Logging setup

use crate::config::DashboardConfig;
use log::{debug, info};

/// Initialize `env_logger`. `RUST_LOG` wins over the default level.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the effective configuration.
pub fn log_config_info(config: &DashboardConfig) {
    info!(
        "Configuration: data={}, total_column={}, restrict_regions={}",
        config.data_path.display(),
        config.total_column,
        config.restrict_regions
    );
    info!("Analysis: top_n={}, horizon={}", config.top_n, config.horizon);
}
