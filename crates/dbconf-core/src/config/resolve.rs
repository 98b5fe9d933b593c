//! Layered configuration resolution
//!
//! Resolution is a left-to-right fold over [`Stage::ORDER`]. The baseline
//! stage produces a complete value; every later stage produces a
//! [`ConfigPatch`] that is merged over the running value, so a later stage
//! always wins over an earlier one for the fields it names.

use super::baseline::{
    AUTH_SOURCE, DEFAULT_DATABASE, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS,
    build_time_overlay, development_baseline, production_baseline,
};
use super::endpoint::is_loopback_endpoint;
use super::env::{EnvSnapshot, keys, parse_flag, parse_number};
use super::mode::RuntimeMode;
use super::patch::{
    ConfigPatch, LogPatch, MonitoringPatch, PoolAlertPatch, PoolPatch, QueryAlertPatch,
    ReplicationAlertPatch, RetryPatch, TimeoutPatch,
};
use super::types::{Configuration, LogLevel};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A resolution stage; later stages win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Always applies. Build phase selects development, otherwise production
    /// if the production flag is set, otherwise development.
    Baseline,
    /// Applies in build phase only. Minimal pool, fail-fast timeouts, TLS
    /// off, monitoring silenced.
    BuildTimeOverlay,
    /// Always applies. Identity and retry policy from the environment with
    /// hardcoded fallbacks; disjoint from the baseline's tunables.
    RequiredFields,
    /// Applies when the resolved endpoint is a loopback target. TLS off.
    LoopbackTransport,
    /// Applies in build phase only. TLS off, whatever earlier stages set.
    BuildTimeTransport,
    /// Applies when any recognized tunable key is set. Each key is
    /// independent; `MONGODB_SSL` is ignored for loopback targets.
    Environment,
}

impl Stage {
    /// Every stage in application order
    pub const ORDER: [Stage; 6] = [
        Stage::Baseline,
        Stage::BuildTimeOverlay,
        Stage::RequiredFields,
        Stage::LoopbackTransport,
        Stage::BuildTimeTransport,
        Stage::Environment,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Baseline => "baseline",
            Stage::BuildTimeOverlay => "build-time overlay",
            Stage::RequiredFields => "required fields",
            Stage::LoopbackTransport => "loopback transport",
            Stage::BuildTimeTransport => "build-time transport",
            Stage::Environment => "environment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input problem absorbed during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Anomaly {
    /// The value of `key` could not be parsed and was not applied
    MalformedOverride { key: &'static str, raw: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::MalformedOverride { key, raw } => {
                write!(f, "malformed value for {key}: '{raw}'")
            }
        }
    }
}

/// Resolved configuration plus a trace of how it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Mode the configuration was resolved for
    pub mode: RuntimeMode,
    pub config: Configuration,
    /// True if the endpoint was detected as a loopback target
    pub loopback: bool,
    /// Stages whose overlay fired, in order
    pub applied: Vec<Stage>,
    /// Environment keys whose values were applied
    pub overrides: Vec<&'static str>,
    pub anomalies: Vec<Anomaly>,
}

/// Resolve the configuration for `mode` from the environment snapshot
///
/// Total: never fails. Malformed overrides are skipped and reported in
/// [`Resolution::anomalies`].
///
/// ```
/// use dbconf_core::{EnvSnapshot, RuntimeMode, resolve};
///
/// let env = EnvSnapshot::from_pairs([("MONGODB_URI", "mongodb://localhost:27017/db")]);
/// let resolution = resolve(RuntimeMode::production(), &env);
///
/// assert!(resolution.loopback);
/// assert!(!resolution.config.ssl);
/// assert_eq!(resolution.config.pool.max_pool_size, 50);
/// ```
pub fn resolve(mode: RuntimeMode, env: &EnvSnapshot) -> Resolution {
    let mut resolver = Resolver {
        mode,
        env,
        loopback: false,
        overrides: Vec::new(),
        anomalies: Vec::new(),
    };

    let mut config = resolver.baseline();
    let mut applied = vec![Stage::Baseline];
    debug!(stage = %Stage::Baseline, production = mode.production, "selected baseline");

    for stage in Stage::ORDER.into_iter().skip(1) {
        let Some(patch) = resolver.overlay(stage, &config) else {
            continue;
        };
        if patch.is_empty() {
            continue;
        }
        debug!(%stage, "applying configuration stage");
        config = patch.apply(config);
        applied.push(stage);
    }

    Resolution {
        mode,
        config,
        loopback: resolver.loopback,
        applied,
        overrides: resolver.overrides,
        anomalies: resolver.anomalies,
    }
}

/// Resolve and discard the trace
pub fn resolve_config(mode: RuntimeMode, env: &EnvSnapshot) -> Configuration {
    resolve(mode, env).config
}

/// Per-call resolution state; never shared between calls
struct Resolver<'a> {
    mode: RuntimeMode,
    env: &'a EnvSnapshot,
    loopback: bool,
    overrides: Vec<&'static str>,
    anomalies: Vec<Anomaly>,
}

impl Resolver<'_> {
    fn baseline(&self) -> Configuration {
        if self.mode.is_build_phase() || !self.mode.production {
            development_baseline()
        } else {
            production_baseline()
        }
    }

    fn overlay(&mut self, stage: Stage, current: &Configuration) -> Option<ConfigPatch> {
        match stage {
            Stage::Baseline => None,
            Stage::BuildTimeOverlay => {
                if !self.mode.is_build_phase() {
                    return None;
                }
                info!("Using build-time configuration");
                Some(build_time_overlay())
            }
            Stage::RequiredFields => Some(self.required_fields()),
            Stage::LoopbackTransport => {
                self.loopback = is_loopback_endpoint(&current.uri);
                if !self.loopback {
                    return None;
                }
                info!("Localhost connection detected, disabling SSL");
                Some(ConfigPatch::ssl(false))
            }
            Stage::BuildTimeTransport => {
                if !self.mode.is_build_phase() {
                    return None;
                }
                info!("Build-time operation detected, disabling SSL");
                Some(ConfigPatch::ssl(false))
            }
            Stage::Environment => Some(self.environment()),
        }
    }

    fn required_fields(&mut self) -> ConfigPatch {
        let uri = self.required_text(keys::URI).unwrap_or_default();
        let database_name = self
            .required_text(keys::DATABASE)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        ConfigPatch {
            uri: Some(uri),
            database_name: Some(database_name),
            auth_source: Some(AUTH_SOURCE.to_string()),
            retry: RetryPatch {
                max_retries: Some(self.required_number(keys::MAX_RETRIES, DEFAULT_MAX_RETRIES)),
                retry_delay_ms: Some(
                    self.required_number(keys::RETRY_DELAY, DEFAULT_RETRY_DELAY_MS),
                ),
                retry_writes: Some(true),
                retry_reads: Some(true),
            },
            ..ConfigPatch::default()
        }
    }

    fn environment(&mut self) -> ConfigPatch {
        let ssl = if self.loopback {
            if self.env.contains(keys::SSL) {
                debug!(key = keys::SSL, "ignoring transport override for loopback endpoint");
            }
            None
        } else {
            self.present_flag(keys::SSL)
        };

        // One slow-query concept, observed by both alerting and logging
        let slow_query = self.number(keys::SLOW_QUERY_THRESHOLD);

        ConfigPatch {
            pool: PoolPatch {
                max_pool_size: self.number(keys::MAX_POOL_SIZE),
                min_pool_size: self.number(keys::MIN_POOL_SIZE),
                max_idle_time_ms: self.number(keys::MAX_IDLE_TIME),
            },
            timeouts: TimeoutPatch {
                server_selection_ms: self.number(keys::SERVER_SELECTION_TIMEOUT),
                socket_ms: self.number(keys::SOCKET_TIMEOUT),
                connect_ms: self.number(keys::CONNECTION_TIMEOUT),
            },
            ssl,
            monitoring: MonitoringPatch {
                enabled: self.flag(keys::MONITORING_ENABLED),
                metrics_interval_secs: self.number(keys::METRICS_INTERVAL),
                query: QueryAlertPatch {
                    slow_query_threshold_ms: slow_query,
                    aggregation_threshold_ms: self.number(keys::AGGREGATION_THRESHOLD),
                    ..QueryAlertPatch::default()
                },
                pool: PoolAlertPatch {
                    warning_threshold: self.number(keys::ALERT_POOL_THRESHOLD),
                    critical_threshold: self.number(keys::ALERT_POOL_CRITICAL),
                    ..PoolAlertPatch::default()
                },
                replication: ReplicationAlertPatch {
                    max_lag_secs: self.number(keys::MAX_REPLICATION_LAG),
                    ..ReplicationAlertPatch::default()
                },
                logging: LogPatch {
                    slow_query_threshold_ms: slow_query,
                    level: self.parsed::<LogLevel>(keys::LOG_LEVEL),
                    ..LogPatch::default()
                },
            },
            log_operations: self.flag(keys::LOG_OPERATIONS),
            ..ConfigPatch::default()
        }
    }

    fn required_text(&mut self, key: &'static str) -> Option<String> {
        let env = self.env;
        let value = env.get_non_empty(key)?;
        self.overrides.push(key);
        Some(value.to_string())
    }

    fn required_number<T: FromStr>(&mut self, key: &'static str, fallback: T) -> T {
        let env = self.env;
        let Some(raw) = env.get_non_empty(key) else {
            return fallback;
        };
        match parse_number(raw) {
            Some(value) => {
                self.overrides.push(key);
                value
            }
            None => {
                self.malformed(key, raw);
                fallback
            }
        }
    }

    fn number<T: FromStr>(&mut self, key: &'static str) -> Option<T> {
        let env = self.env;
        let raw = env.get_non_empty(key)?;
        let parsed = parse_number(raw);
        match parsed {
            Some(_) => self.overrides.push(key),
            None => self.malformed(key, raw),
        }
        parsed
    }

    fn parsed<T: FromStr>(&mut self, key: &'static str) -> Option<T> {
        let env = self.env;
        let raw = env.get_non_empty(key)?;
        match raw.trim().parse() {
            Ok(value) => {
                self.overrides.push(key);
                Some(value)
            }
            Err(_) => {
                self.malformed(key, raw);
                None
            }
        }
    }

    fn flag(&mut self, key: &'static str) -> Option<bool> {
        let raw = self.env.get_non_empty(key)?;
        self.overrides.push(key);
        Some(parse_flag(raw))
    }

    /// Boolean override where an empty value still counts as set
    fn present_flag(&mut self, key: &'static str) -> Option<bool> {
        let raw = self.env.get(key)?;
        self.overrides.push(key);
        Some(parse_flag(raw))
    }

    fn malformed(&mut self, key: &'static str, raw: &str) {
        warn!(key, value = raw, "ignoring malformed configuration override");
        self.anomalies.push(Anomaly::MalformedOverride {
            key,
            raw: raw.to_string(),
        });
    }
}
