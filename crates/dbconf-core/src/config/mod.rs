//! Configuration resolution
//!
//! Resolves the database-client configuration from multiple layers with
//! priority (later wins):
//! 1. Mode baseline (production or development)
//! 2. Build-time overlay (build or static-generation phase only)
//! 3. Required identity and retry fields
//! 4. Loopback transport overlay
//! 5. Build-time transport overlay
//! 6. Environment variable overrides

mod baseline;
mod check;
mod endpoint;
mod env;
mod mode;
mod patch;
mod resolve;
mod types;

pub use baseline::{build_time_overlay, development_baseline, production_baseline};
pub use check::{ConfigIssue, check};
pub use endpoint::is_loopback_endpoint;
pub use env::{EnvSnapshot, keys};
pub use mode::RuntimeMode;
pub use patch::{
    ConfigPatch, LogPatch, MonitoringPatch, PoolAlertPatch, PoolPatch, QueryAlertPatch,
    ReplicationAlertPatch, RetryPatch, TimeoutPatch,
};
pub use resolve::{Anomaly, Resolution, Stage, resolve, resolve_config};
pub use types::{
    Alerts, Compressor, Configuration, LogLevel, Monitoring, MonitoringLog, ParseEnumError,
    PoolAlert, PoolSettings, QueryPerformanceAlert, ReadPreference, ReplicationAlert, RetryPolicy,
    TimeoutSettings, WriteConcern,
};
