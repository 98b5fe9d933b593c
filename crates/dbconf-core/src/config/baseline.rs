//! Compiled-in baselines and the build-time overlay
//!
//! Baselines are complete values. Their identity and retry fields are
//! placeholders that the required-field stage always replaces.

use super::patch::{
    ConfigPatch, LogPatch, MonitoringPatch, PoolAlertPatch, PoolPatch, QueryAlertPatch,
    ReplicationAlertPatch, TimeoutPatch,
};
use super::types::{
    Alerts, Compressor, Configuration, LogLevel, Monitoring, MonitoringLog, PoolAlert, PoolSettings,
    QueryPerformanceAlert, ReadPreference, ReplicationAlert, RetryPolicy, TimeoutSettings,
    WriteConcern,
};

/// Fallback logical database name
pub(crate) const DEFAULT_DATABASE: &str = "padeliga";
/// Authentication database, never overridden
pub(crate) const AUTH_SOURCE: &str = "admin";
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 5;
pub(crate) const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

fn placeholder_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: DEFAULT_MAX_RETRIES,
        retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        retry_writes: true,
        retry_reads: true,
    }
}

/// Production baseline, tuned for managed cloud clusters
pub fn production_baseline() -> Configuration {
    Configuration {
        uri: String::new(),
        database_name: DEFAULT_DATABASE.to_string(),
        auth_source: AUTH_SOURCE.to_string(),
        pool: PoolSettings {
            max_pool_size: 50,
            min_pool_size: 10,
            max_idle_time_ms: 60_000,
        },
        timeouts: TimeoutSettings {
            server_selection_ms: 15_000,
            socket_ms: 60_000,
            connect_ms: 30_000,
        },
        write_concern: WriteConcern::Majority,
        read_preference: ReadPreference::PrimaryPreferred,
        ssl: true,
        compressors: vec![Compressor::Zlib, Compressor::Snappy],
        auto_index: false,
        auto_create: false,
        retry: placeholder_retry(),
        monitoring: Monitoring {
            enabled: true,
            metrics_interval_secs: 60,
            alerts: Alerts {
                query_performance: QueryPerformanceAlert {
                    enabled: true,
                    slow_query_threshold_ms: 200,
                    aggregation_threshold_ms: 2000,
                },
                connection_pool: PoolAlert {
                    enabled: true,
                    warning_threshold: 80,
                    critical_threshold: 90,
                },
                replication: ReplicationAlert {
                    enabled: true,
                    max_lag_secs: 10,
                },
            },
            logging: MonitoringLog {
                slow_query_threshold_ms: 200,
                rotation_days: 7,
                level: LogLevel::Warn,
                profile_level: 1,
            },
        },
        log_operations: false,
    }
}

/// Development baseline, tuned for a local single-node server
pub fn development_baseline() -> Configuration {
    Configuration {
        uri: String::new(),
        database_name: DEFAULT_DATABASE.to_string(),
        auth_source: AUTH_SOURCE.to_string(),
        pool: PoolSettings {
            max_pool_size: 10,
            min_pool_size: 1,
            max_idle_time_ms: 180_000,
        },
        timeouts: TimeoutSettings {
            server_selection_ms: 30_000,
            socket_ms: 90_000,
            connect_ms: 45_000,
        },
        write_concern: WriteConcern::Acknowledged(1),
        read_preference: ReadPreference::Primary,
        ssl: false,
        compressors: vec![Compressor::Zlib],
        auto_index: true,
        auto_create: true,
        retry: placeholder_retry(),
        monitoring: Monitoring {
            enabled: false,
            metrics_interval_secs: 60,
            alerts: Alerts {
                query_performance: QueryPerformanceAlert {
                    enabled: true,
                    slow_query_threshold_ms: 300,
                    aggregation_threshold_ms: 3000,
                },
                connection_pool: PoolAlert {
                    enabled: false,
                    warning_threshold: 80,
                    critical_threshold: 90,
                },
                replication: ReplicationAlert {
                    enabled: false,
                    max_lag_secs: 10,
                },
            },
            logging: MonitoringLog {
                slow_query_threshold_ms: 300,
                rotation_days: 1,
                level: LogLevel::Debug,
                profile_level: 1,
            },
        },
        log_operations: true,
    }
}

/// Overlay for build-time and static-generation runs
///
/// Builds run in short-lived, network-isolated sandboxes: pools are minimal,
/// timeouts fail fast, TLS is off and all monitoring is silenced.
pub fn build_time_overlay() -> ConfigPatch {
    ConfigPatch {
        pool: PoolPatch {
            max_pool_size: Some(2),
            min_pool_size: Some(1),
            max_idle_time_ms: None,
        },
        timeouts: TimeoutPatch {
            server_selection_ms: Some(5_000),
            socket_ms: Some(10_000),
            connect_ms: Some(5_000),
        },
        ssl: Some(false),
        monitoring: MonitoringPatch {
            enabled: Some(false),
            metrics_interval_secs: Some(0),
            query: QueryAlertPatch {
                enabled: Some(false),
                slow_query_threshold_ms: Some(0),
                aggregation_threshold_ms: Some(0),
            },
            pool: PoolAlertPatch {
                enabled: Some(false),
                warning_threshold: Some(0),
                critical_threshold: Some(0),
            },
            replication: ReplicationAlertPatch {
                enabled: Some(false),
                max_lag_secs: Some(0),
            },
            logging: LogPatch {
                slow_query_threshold_ms: Some(0),
                rotation_days: Some(1),
                level: Some(LogLevel::Error),
                profile_level: Some(0),
            },
        },
        log_operations: Some(false),
        ..ConfigPatch::default()
    }
}
