//! Environment snapshot and recognized override keys

use std::collections::BTreeMap;
use std::str::FromStr;

/// Recognized environment keys
pub mod keys {
    /// Runtime environment name (`production`, `development`, `test`)
    pub const APP_ENV: &str = "APP_ENV";
    /// Build phase marker (`build`, `static`)
    pub const APP_BUILD_PHASE: &str = "APP_BUILD_PHASE";

    pub const URI: &str = "MONGODB_URI";
    pub const DATABASE: &str = "MONGODB_DATABASE";
    pub const MAX_RETRIES: &str = "MONGODB_MAX_RETRIES";
    pub const RETRY_DELAY: &str = "MONGODB_RETRY_DELAY";

    pub const MAX_POOL_SIZE: &str = "MONGODB_MAX_POOL_SIZE";
    pub const MIN_POOL_SIZE: &str = "MONGODB_MIN_POOL_SIZE";
    pub const CONNECTION_TIMEOUT: &str = "MONGODB_CONNECTION_TIMEOUT";
    pub const SERVER_SELECTION_TIMEOUT: &str = "MONGODB_SERVER_SELECTION_TIMEOUT";
    pub const SOCKET_TIMEOUT: &str = "MONGODB_SOCKET_TIMEOUT";
    pub const MAX_IDLE_TIME: &str = "MONGODB_MAX_IDLE_TIME";
    pub const SSL: &str = "MONGODB_SSL";
    pub const MONITORING_ENABLED: &str = "MONGODB_MONITORING_ENABLED";
    pub const METRICS_INTERVAL: &str = "MONGODB_METRICS_INTERVAL";
    pub const SLOW_QUERY_THRESHOLD: &str = "MONGODB_SLOW_QUERY_THRESHOLD";
    pub const AGGREGATION_THRESHOLD: &str = "MONGODB_AGGREGATION_THRESHOLD";
    pub const ALERT_POOL_THRESHOLD: &str = "MONGODB_ALERT_POOL_THRESHOLD";
    pub const ALERT_POOL_CRITICAL: &str = "MONGODB_ALERT_POOL_CRITICAL";
    pub const MAX_REPLICATION_LAG: &str = "MONGODB_MAX_REPLICATION_LAG";
    pub const LOG_LEVEL: &str = "MONGODB_LOG_LEVEL";
    pub const LOG_OPERATIONS: &str = "MONGODB_LOG_OPERATIONS";

    /// Keys read by the environment override stage
    pub const TUNABLE: [&str; 16] = [
        MAX_POOL_SIZE,
        MIN_POOL_SIZE,
        CONNECTION_TIMEOUT,
        SERVER_SELECTION_TIMEOUT,
        SOCKET_TIMEOUT,
        MAX_IDLE_TIME,
        SSL,
        MONITORING_ENABLED,
        METRICS_INTERVAL,
        SLOW_QUERY_THRESHOLD,
        AGGREGATION_THRESHOLD,
        ALERT_POOL_THRESHOLD,
        ALERT_POOL_CRITICAL,
        MAX_REPLICATION_LAG,
        LOG_LEVEL,
        LOG_OPERATIONS,
    ];
}

/// Immutable snapshot of environment variables
///
/// An absent key means "no override", never "override to empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    ///
    /// Entries whose key or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value for `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Raw value for `key`, treating an empty string as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Boolean override: only the literal `"true"` enables
pub(crate) fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

/// Base-10 integer override of the trimmed value
pub(crate) fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_absent_and_empty_keys() {
        let snapshot = EnvSnapshot::from_pairs([(keys::URI, ""), (keys::SSL, "true")]);

        assert!(snapshot.contains(keys::URI));
        assert_eq!(snapshot.get(keys::URI), Some(""));
        assert_eq!(snapshot.get_non_empty(keys::URI), None);
        assert_eq!(snapshot.get(keys::DATABASE), None);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_iter_is_key_ordered() {
        let snapshot: EnvSnapshot = [("B", "2"), ("A", "1")].into_iter().collect();
        let names: Vec<_> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    #[serial]
    fn test_from_process_captures_vars() {
        let original = env::var("DBCONF_SNAPSHOT_PROBE").ok();
        unsafe { env::set_var("DBCONF_SNAPSHOT_PROBE", "42") };

        let snapshot = EnvSnapshot::from_process();
        assert_eq!(snapshot.get("DBCONF_SNAPSHOT_PROBE"), Some("42"));

        unsafe {
            match original {
                Some(v) => env::set_var("DBCONF_SNAPSHOT_PROBE", v),
                None => env::remove_var("DBCONF_SNAPSHOT_PROBE"),
            }
        }
    }

    #[test]
    fn test_parse_flag_literal_true_only() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>(" 40 "), Some(40));
        assert_eq!(parse_number::<u32>("-1"), None);
        assert_eq!(parse_number::<u64>("10s"), None);
        assert_eq!(parse_number::<u64>(""), None);
    }
}
