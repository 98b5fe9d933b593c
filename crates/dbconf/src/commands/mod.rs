//! CLI command dispatch and execution

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dbconf_core::{EnvSnapshot, Resolution, RuntimeMode, resolve};
use tracing::debug;

mod check;
mod error;
mod show;

/// dbconf - resolve database-client configuration from mode and environment
#[derive(Parser, Debug)]
#[command(
    name = "dbconf",
    version,
    about = "Resolve database-client configuration from mode and environment",
    long_about = "Layers a mode baseline, structural overlays and MONGODB_* environment \
                  overrides into one database-client configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved configuration
    Show(show::ShowArgs),

    /// Resolve and report problems; exits non-zero if any are found
    Check(check::CheckArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Show(args) => show::execute(args),
            Commands::Check(args) => check::execute(args),
        }
    }
}

/// Runtime environment selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeName {
    Production,
    Development,
    Test,
}

/// Mode flags shared by every command
///
/// Without flags the mode is detected from `APP_ENV` and `APP_BUILD_PHASE`.
#[derive(Args, Debug, Default)]
struct ModeArgs {
    /// Runtime environment (overrides APP_ENV)
    #[arg(long, value_enum)]
    mode: Option<ModeName>,

    /// Resolve as a build-time run
    #[arg(long)]
    build_time: bool,

    /// Resolve as a static-generation run
    #[arg(long)]
    static_generation: bool,
}

impl ModeArgs {
    fn runtime_mode(&self, env: &EnvSnapshot) -> RuntimeMode {
        let detected = RuntimeMode::detect(env);
        let mut mode = match self.mode {
            Some(ModeName::Production) => RuntimeMode::production(),
            Some(ModeName::Development) => RuntimeMode::development(),
            Some(ModeName::Test) => RuntimeMode::test(),
            None => detected,
        };
        mode.build_time |= self.build_time || detected.build_time;
        mode.static_generation |= self.static_generation || detected.static_generation;
        mode
    }
}

/// Snapshot the process environment and resolve against it
fn resolve_from_process(args: &ModeArgs) -> Resolution {
    let env = EnvSnapshot::from_process();
    let mode = args.runtime_mode(&env);
    debug!(?mode, vars = env.len(), "resolving from process environment");
    resolve(mode, &env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_mode_overrides_detection() {
        let env = EnvSnapshot::from_pairs([("APP_ENV", "production")]);
        let args = ModeArgs {
            mode: Some(ModeName::Development),
            ..ModeArgs::default()
        };

        let mode = args.runtime_mode(&env);
        assert!(mode.development);
        assert!(!mode.production);
    }

    #[test]
    fn test_build_flags_combine_with_detection() {
        let env = EnvSnapshot::from_pairs([("APP_BUILD_PHASE", "static")]);
        let args = ModeArgs {
            mode: Some(ModeName::Production),
            build_time: true,
            ..ModeArgs::default()
        };

        let mode = args.runtime_mode(&env);
        assert!(mode.production);
        assert!(mode.build_time);
        assert!(mode.static_generation);
    }

    #[test]
    fn test_cli_parses_show_flags() {
        let cli = Cli::try_parse_from(["dbconf", "show", "--json", "--mode", "production"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["dbconf", "show", "--json", "--toml"]);
        assert!(cli.is_err(), "--json and --toml are mutually exclusive");
    }
}
