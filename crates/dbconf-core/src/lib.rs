//! Core library for dbconf: layered database-client configuration
//!
//! This crate resolves a fully-populated MongoDB client configuration from
//! three sources, in strict precedence order:
//! - A compiled-in baseline for the runtime mode (production / development)
//! - Structural overlays (build-time execution, loopback endpoints)
//! - Process environment overrides, applied field by field
//!
//! Resolution is a pure function of its inputs. It never fails; anomalies are
//! absorbed into the result and reported alongside it.

pub mod config;
pub mod logging;

pub use config::{
    ConfigIssue, Configuration, EnvSnapshot, Resolution, RuntimeMode, Stage, check, resolve,
    resolve_config,
};
