//! Partial configuration layers
//!
//! A [`ConfigPatch`] names the fields a layer sets. Applying it consumes a
//! base [`Configuration`] and returns a new one in which exactly the `Some`
//! fields differ. Every field group has its own merge function so a layer can
//! touch one nested threshold without restating its siblings.

use super::types::{
    Alerts, Compressor, Configuration, LogLevel, Monitoring, MonitoringLog, PoolAlert, PoolSettings,
    QueryPerformanceAlert, ReadPreference, ReplicationAlert, RetryPolicy, TimeoutSettings,
    WriteConcern,
};

/// A partial configuration layer; `Default` touches nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub uri: Option<String>,
    pub database_name: Option<String>,
    pub auth_source: Option<String>,
    pub pool: PoolPatch,
    pub timeouts: TimeoutPatch,
    pub write_concern: Option<WriteConcern>,
    pub read_preference: Option<ReadPreference>,
    pub ssl: Option<bool>,
    pub compressors: Option<Vec<Compressor>>,
    pub auto_index: Option<bool>,
    pub auto_create: Option<bool>,
    pub retry: RetryPatch,
    pub monitoring: MonitoringPatch,
    pub log_operations: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolPatch {
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    pub max_idle_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutPatch {
    pub server_selection_ms: Option<u64>,
    pub socket_ms: Option<u64>,
    pub connect_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPatch {
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub retry_writes: Option<bool>,
    pub retry_reads: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitoringPatch {
    pub enabled: Option<bool>,
    pub metrics_interval_secs: Option<u64>,
    pub query: QueryAlertPatch,
    pub pool: PoolAlertPatch,
    pub replication: ReplicationAlertPatch,
    pub logging: LogPatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryAlertPatch {
    pub enabled: Option<bool>,
    pub slow_query_threshold_ms: Option<u64>,
    pub aggregation_threshold_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolAlertPatch {
    pub enabled: Option<bool>,
    pub warning_threshold: Option<u32>,
    pub critical_threshold: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicationAlertPatch {
    pub enabled: Option<bool>,
    pub max_lag_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogPatch {
    pub slow_query_threshold_ms: Option<u64>,
    pub rotation_days: Option<u32>,
    pub level: Option<LogLevel>,
    pub profile_level: Option<u8>,
}

impl ConfigPatch {
    /// Patch that only sets the secure-transport flag
    pub fn ssl(enabled: bool) -> Self {
        Self {
            ssl: Some(enabled),
            ..Self::default()
        }
    }

    /// True if applying this patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold this layer over `base`
    pub fn apply(self, base: Configuration) -> Configuration {
        Configuration {
            uri: self.uri.unwrap_or(base.uri),
            database_name: self.database_name.unwrap_or(base.database_name),
            auth_source: self.auth_source.unwrap_or(base.auth_source),
            pool: self.pool.apply(base.pool),
            timeouts: self.timeouts.apply(base.timeouts),
            write_concern: self.write_concern.unwrap_or(base.write_concern),
            read_preference: self.read_preference.unwrap_or(base.read_preference),
            ssl: self.ssl.unwrap_or(base.ssl),
            compressors: self.compressors.unwrap_or(base.compressors),
            auto_index: self.auto_index.unwrap_or(base.auto_index),
            auto_create: self.auto_create.unwrap_or(base.auto_create),
            retry: self.retry.apply(base.retry),
            monitoring: self.monitoring.apply(base.monitoring),
            log_operations: self.log_operations.unwrap_or(base.log_operations),
        }
    }
}

impl PoolPatch {
    pub fn apply(self, base: PoolSettings) -> PoolSettings {
        PoolSettings {
            max_pool_size: self.max_pool_size.unwrap_or(base.max_pool_size),
            min_pool_size: self.min_pool_size.unwrap_or(base.min_pool_size),
            max_idle_time_ms: self.max_idle_time_ms.unwrap_or(base.max_idle_time_ms),
        }
    }
}

impl TimeoutPatch {
    pub fn apply(self, base: TimeoutSettings) -> TimeoutSettings {
        TimeoutSettings {
            server_selection_ms: self.server_selection_ms.unwrap_or(base.server_selection_ms),
            socket_ms: self.socket_ms.unwrap_or(base.socket_ms),
            connect_ms: self.connect_ms.unwrap_or(base.connect_ms),
        }
    }
}

impl RetryPatch {
    pub fn apply(self, base: RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(base.max_retries),
            retry_delay_ms: self.retry_delay_ms.unwrap_or(base.retry_delay_ms),
            retry_writes: self.retry_writes.unwrap_or(base.retry_writes),
            retry_reads: self.retry_reads.unwrap_or(base.retry_reads),
        }
    }
}

impl MonitoringPatch {
    pub fn apply(self, base: Monitoring) -> Monitoring {
        Monitoring {
            enabled: self.enabled.unwrap_or(base.enabled),
            metrics_interval_secs: self
                .metrics_interval_secs
                .unwrap_or(base.metrics_interval_secs),
            alerts: Alerts {
                query_performance: self.query.apply(base.alerts.query_performance),
                connection_pool: self.pool.apply(base.alerts.connection_pool),
                replication: self.replication.apply(base.alerts.replication),
            },
            logging: self.logging.apply(base.logging),
        }
    }
}

impl QueryAlertPatch {
    pub fn apply(self, base: QueryPerformanceAlert) -> QueryPerformanceAlert {
        QueryPerformanceAlert {
            enabled: self.enabled.unwrap_or(base.enabled),
            slow_query_threshold_ms: self
                .slow_query_threshold_ms
                .unwrap_or(base.slow_query_threshold_ms),
            aggregation_threshold_ms: self
                .aggregation_threshold_ms
                .unwrap_or(base.aggregation_threshold_ms),
        }
    }
}

impl PoolAlertPatch {
    pub fn apply(self, base: PoolAlert) -> PoolAlert {
        PoolAlert {
            enabled: self.enabled.unwrap_or(base.enabled),
            warning_threshold: self.warning_threshold.unwrap_or(base.warning_threshold),
            critical_threshold: self.critical_threshold.unwrap_or(base.critical_threshold),
        }
    }
}

impl ReplicationAlertPatch {
    pub fn apply(self, base: ReplicationAlert) -> ReplicationAlert {
        ReplicationAlert {
            enabled: self.enabled.unwrap_or(base.enabled),
            max_lag_secs: self.max_lag_secs.unwrap_or(base.max_lag_secs),
        }
    }
}

impl LogPatch {
    pub fn apply(self, base: MonitoringLog) -> MonitoringLog {
        MonitoringLog {
            slow_query_threshold_ms: self
                .slow_query_threshold_ms
                .unwrap_or(base.slow_query_threshold_ms),
            rotation_days: self.rotation_days.unwrap_or(base.rotation_days),
            level: self.level.unwrap_or(base.level),
            profile_level: self.profile_level.unwrap_or(base.profile_level),
        }
    }
}
