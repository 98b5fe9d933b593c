//! Configuration types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fully-resolved database-client configuration
///
/// Every field is populated. The value is never patched after resolution;
/// re-resolving produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Connection string (may be empty; only usable in build phase)
    pub uri: String,
    /// Logical database name
    pub database_name: String,
    /// Authentication database
    pub auth_source: String,
    /// Connection pool sizing
    pub pool: PoolSettings,
    /// Driver timeouts
    pub timeouts: TimeoutSettings,
    /// Write acknowledgement level
    pub write_concern: WriteConcern,
    /// Replica roles reads may be served from
    pub read_preference: ReadPreference,
    /// Secure transport (TLS) flag
    pub ssl: bool,
    /// Wire compression codecs, in preference order
    pub compressors: Vec<Compressor>,
    /// Build indexes implicitly on model registration
    pub auto_index: bool,
    /// Create collections implicitly on first use
    pub auto_create: bool,
    /// Retry policy
    pub retry: RetryPolicy,
    /// Monitoring and alerting
    pub monitoring: Monitoring,
    /// Log every driver operation (development aid)
    pub log_operations: bool,
}

/// Connection pool sizing
///
/// `min_pool_size <= max_pool_size` is expected but not enforced here; the
/// driver reports a violation at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSettings {
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    /// Milliseconds an idle connection is kept before closing
    pub max_idle_time_ms: u64,
}

/// Driver timeouts, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutSettings {
    pub server_selection_ms: u64,
    pub socket_ms: u64,
    pub connect_ms: u64,
}

/// Retry policy for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub retry_writes: bool,
    pub retry_reads: bool,
}

/// Monitoring configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitoring {
    pub enabled: bool,
    pub metrics_interval_secs: u64,
    pub alerts: Alerts,
    pub logging: MonitoringLog,
}

/// Alert thresholds, each group independently enable-able
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alerts {
    pub query_performance: QueryPerformanceAlert,
    pub connection_pool: PoolAlert,
    pub replication: ReplicationAlert,
}

/// Slow query and aggregation alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPerformanceAlert {
    pub enabled: bool,
    pub slow_query_threshold_ms: u64,
    pub aggregation_threshold_ms: u64,
}

/// Connection pool utilization alerting, thresholds in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAlert {
    pub enabled: bool,
    pub warning_threshold: u32,
    pub critical_threshold: u32,
}

/// Replication lag alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationAlert {
    pub enabled: bool,
    pub max_lag_secs: u64,
}

/// Monitoring log policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringLog {
    /// Kept equal to the query-performance alert threshold
    pub slow_query_threshold_ms: u64,
    pub rotation_days: u32,
    pub level: LogLevel,
    /// Database profiler verbosity (0 = off, 1 = slow ops, 2 = all ops)
    pub profile_level: u8,
}

/// Error returned when a wire string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseEnumError {
    /// Human-readable name of the enumeration
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Write acknowledgement level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WriteConcernRepr", into = "WriteConcernRepr")]
pub enum WriteConcern {
    /// Acknowledged by this many members
    Acknowledged(u32),
    /// Acknowledged by a majority of voting members
    Majority,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WriteConcernRepr {
    Count(u32),
    Name(String),
}

impl TryFrom<WriteConcernRepr> for WriteConcern {
    type Error = ParseEnumError;

    fn try_from(repr: WriteConcernRepr) -> Result<Self, Self::Error> {
        match repr {
            WriteConcernRepr::Count(n) => Ok(Self::Acknowledged(n)),
            WriteConcernRepr::Name(name) => name.parse(),
        }
    }
}

impl From<WriteConcern> for WriteConcernRepr {
    fn from(concern: WriteConcern) -> Self {
        match concern {
            WriteConcern::Acknowledged(n) => Self::Count(n),
            WriteConcern::Majority => Self::Name("majority".to_string()),
        }
    }
}

impl FromStr for WriteConcern {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "majority" {
            return Ok(Self::Majority);
        }
        s.parse::<u32>()
            .map(Self::Acknowledged)
            .map_err(|_| ParseEnumError::new("write concern", s))
    }
}

impl fmt::Display for WriteConcern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acknowledged(n) => write!(f, "{n}"),
            Self::Majority => f.write_str("majority"),
        }
    }
}

/// Which replica roles a read may be served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreference {
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadPreference {
    /// Wire name understood by the driver
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PrimaryPreferred => "primaryPreferred",
            Self::Secondary => "secondary",
            Self::SecondaryPreferred => "secondaryPreferred",
            Self::Nearest => "nearest",
        }
    }
}

impl FromStr for ReadPreference {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "primaryPreferred" => Ok(Self::PrimaryPreferred),
            "secondary" => Ok(Self::Secondary),
            "secondaryPreferred" => Ok(Self::SecondaryPreferred),
            "nearest" => Ok(Self::Nearest),
            other => Err(ParseEnumError::new("read preference", other)),
        }
    }
}

impl fmt::Display for ReadPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compressor {
    Zlib,
    Snappy,
    Zstd,
}

impl Compressor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zlib => "zlib",
            Self::Snappy => "snappy",
            Self::Zstd => "zstd",
        }
    }
}

impl FromStr for Compressor {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zlib" => Ok(Self::Zlib),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            other => Err(ParseEnumError::new("compressor", other)),
        }
    }
}

impl fmt::Display for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity recorded by the monitoring log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(ParseEnumError::new("log level", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::production_baseline;

    #[test]
    fn test_write_concern_parse() {
        assert_eq!("majority".parse::<WriteConcern>(), Ok(WriteConcern::Majority));
        assert_eq!("1".parse::<WriteConcern>(), Ok(WriteConcern::Acknowledged(1)));

        let err = "all".parse::<WriteConcern>().unwrap_err();
        assert_eq!(err.kind, "write concern");
        assert_eq!(err.to_string(), "invalid write concern 'all'");
    }

    #[test]
    fn test_write_concern_serializes_as_number_or_name() {
        assert_eq!(
            serde_json::to_value(WriteConcern::Majority).unwrap(),
            serde_json::json!("majority")
        );
        assert_eq!(
            serde_json::to_value(WriteConcern::Acknowledged(1)).unwrap(),
            serde_json::json!(1)
        );

        let parsed: WriteConcern = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, WriteConcern::Acknowledged(2));
        assert!(serde_json::from_str::<WriteConcern>("\"quorum\"").is_err());
    }

    #[test]
    fn test_read_preference_wire_names() {
        for pref in [
            ReadPreference::Primary,
            ReadPreference::PrimaryPreferred,
            ReadPreference::Secondary,
            ReadPreference::SecondaryPreferred,
            ReadPreference::Nearest,
        ] {
            assert_eq!(pref.as_str().parse::<ReadPreference>(), Ok(pref));
            assert_eq!(
                serde_json::to_value(pref).unwrap(),
                serde_json::json!(pref.as_str())
            );
        }
        // Wire names are case-sensitive
        assert!("PRIMARY".parse::<ReadPreference>().is_err());
    }

    #[test]
    fn test_log_level_rejects_unknown() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_configuration_camel_case_json() {
        let config = production_baseline();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["pool"]["maxPoolSize"], 50);
        assert_eq!(value["readPreference"], "primaryPreferred");
        assert_eq!(value["compressors"], serde_json::json!(["zlib", "snappy"]));
        assert_eq!(
            value["monitoring"]["alerts"]["connectionPool"]["criticalThreshold"],
            90
        );
    }

    #[test]
    fn test_configuration_toml_round_trip() {
        let config = production_baseline();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Configuration = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }
}
