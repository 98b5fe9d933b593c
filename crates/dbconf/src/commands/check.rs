//! Check command implementation

use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::error::CommandError;
use super::{ModeArgs, resolve_from_process};

/// Resolve the configuration and report problems
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    mode: ModeArgs,

    /// Output issues as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let resolution = resolve_from_process(&args.mode);
    let issues = dbconf_core::check(&resolution);

    if args.json {
        let output = json!({
            "ok": issues.is_empty(),
            "issues": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if issues.is_empty() {
        println!("Configuration OK");
    } else {
        for issue in &issues {
            println!("  - {issue}");
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CommandError::CheckFailed {
            count: issues.len(),
        }
        .into())
    }
}
