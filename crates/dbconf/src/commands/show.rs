//! Show command implementation

use anyhow::Result;
use clap::Args;
use dbconf_core::{Configuration, Resolution};

use super::{ModeArgs, resolve_from_process};

/// Print the resolved configuration
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    mode: ModeArgs,

    /// Output the full resolution (configuration and trace) as JSON, credentials redacted
    #[arg(long, conflicts_with = "toml")]
    json: bool,

    /// Output the configuration as TOML, credentials redacted
    #[arg(long)]
    toml: bool,
}

/// Execute the show command
pub fn execute(args: ShowArgs) -> Result<()> {
    let mut resolution = resolve_from_process(&args.mode);
    // Credentials never reach stdout, whatever the format
    resolution.config.uri = redact_credentials(&resolution.config.uri);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else if args.toml {
        print!("{}", toml::to_string(&resolution.config)?);
    } else {
        print_text(&resolution);
    }

    Ok(())
}

fn print_text(resolution: &Resolution) {
    let config: &Configuration = &resolution.config;
    let stages: Vec<&str> = resolution.applied.iter().map(|s| s.as_str()).collect();

    println!("Configuration:");
    println!("  uri: {}", display_uri(&config.uri));
    println!("  database: {} (auth source {})", config.database_name, config.auth_source);
    println!(
        "  pool: max {} / min {} / idle {}ms",
        config.pool.max_pool_size, config.pool.min_pool_size, config.pool.max_idle_time_ms
    );
    println!(
        "  timeouts: selection {}ms / socket {}ms / connect {}ms",
        config.timeouts.server_selection_ms, config.timeouts.socket_ms, config.timeouts.connect_ms
    );
    println!(
        "  write concern: {}, read preference: {}",
        config.write_concern, config.read_preference
    );
    let compressors: Vec<&str> = config.compressors.iter().map(|c| c.as_str()).collect();
    println!("  ssl: {}, compressors: [{}]", config.ssl, compressors.join(", "));
    println!(
        "  retry: {} attempts, {}ms delay (writes {}, reads {})",
        config.retry.max_retries,
        config.retry.retry_delay_ms,
        config.retry.retry_writes,
        config.retry.retry_reads
    );

    let monitoring = &config.monitoring;
    let alerts = &monitoring.alerts;
    println!(
        "  monitoring: {} (every {}s)",
        enabled(monitoring.enabled),
        monitoring.metrics_interval_secs
    );
    println!(
        "    slow query: {}ms, aggregation: {}ms ({})",
        alerts.query_performance.slow_query_threshold_ms,
        alerts.query_performance.aggregation_threshold_ms,
        enabled(alerts.query_performance.enabled)
    );
    println!(
        "    pool utilization: warn {}% / critical {}% ({})",
        alerts.connection_pool.warning_threshold,
        alerts.connection_pool.critical_threshold,
        enabled(alerts.connection_pool.enabled)
    );
    println!(
        "    replication lag: {}s ({})",
        alerts.replication.max_lag_secs,
        enabled(alerts.replication.enabled)
    );
    println!(
        "    log: {} level, {} day rotation, profile level {}",
        monitoring.logging.level, monitoring.logging.rotation_days, monitoring.logging.profile_level
    );
    println!("  log operations: {}", config.log_operations);
    println!();
    println!("Stages: {}", stages.join(" -> "));
    if resolution.overrides.is_empty() {
        println!("Overrides: (none)");
    } else {
        println!("Overrides: {}", resolution.overrides.join(", "));
    }
    for anomaly in &resolution.anomalies {
        println!("Warning: {anomaly}");
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

fn display_uri(uri: &str) -> &str {
    if uri.is_empty() { "(not set)" } else { uri }
}

/// Replace the userinfo part of a connection string with `***`
fn redact_credentials(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => uri.to_string(),
    }
}
