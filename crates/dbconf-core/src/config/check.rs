//! Consumer-boundary checks
//!
//! The resolver absorbs bad input rather than failing. Consumers that prefer
//! to refuse a flawed configuration up front call [`check`] before handing the
//! value to the driver.

use super::resolve::{Anomaly, Resolution};
use thiserror::Error;

/// A problem in a resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    /// No endpoint outside a build phase; the driver cannot connect
    #[error("endpoint URI is empty (set MONGODB_URI)")]
    EmptyEndpoint,

    /// Minimum pool size above the maximum
    #[error("minimum pool size {min} exceeds maximum pool size {max}")]
    PoolBounds { min: u32, max: u32 },

    /// Critical pool alert would fire before the warning
    #[error("pool critical threshold {critical}% is below warning threshold {warning}%")]
    PoolAlertOrder { warning: u32, critical: u32 },

    /// An override was present but could not be applied
    #[error("malformed value for {key}: '{raw}'")]
    MalformedOverride { key: &'static str, raw: String },
}

/// Report every issue in `resolution`; empty means the value is usable
pub fn check(resolution: &Resolution) -> Vec<ConfigIssue> {
    let config = &resolution.config;
    let mut issues = Vec::new();

    if config.uri.trim().is_empty() && !resolution.mode.is_build_phase() {
        issues.push(ConfigIssue::EmptyEndpoint);
    }

    if config.pool.min_pool_size > config.pool.max_pool_size {
        issues.push(ConfigIssue::PoolBounds {
            min: config.pool.min_pool_size,
            max: config.pool.max_pool_size,
        });
    }

    let pool_alert = config.monitoring.alerts.connection_pool;
    if pool_alert.enabled && pool_alert.critical_threshold < pool_alert.warning_threshold {
        issues.push(ConfigIssue::PoolAlertOrder {
            warning: pool_alert.warning_threshold,
            critical: pool_alert.critical_threshold,
        });
    }

    issues.extend(resolution.anomalies.iter().map(|anomaly| match anomaly {
        Anomaly::MalformedOverride { key, raw } => ConfigIssue::MalformedOverride {
            key: *key,
            raw: raw.clone(),
        },
    }));

    issues
}
