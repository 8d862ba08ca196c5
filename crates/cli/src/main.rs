// rinkdata CLI - cross-source reconciliation for per-game data feeds

mod analyze;
mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rinkdata")]
#[command(about = "Reconcile game event data across heterogeneous source feeds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation analysis from a TOML config file
    #[command(after_help = "\
Examples:
  rinkdata analyze game.recon.toml
  rinkdata analyze game.recon.toml --json
  rinkdata analyze game.recon.toml --output result.json --csv comparison.csv")]
    Analyze {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of the human report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the comparison table as CSV to file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Suppress the human report and progress messages
        #[arg(long)]
        quiet: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  rinkdata validate game.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: rinkdata <command> [options]");
            eprintln!("       rinkdata --help for more information");
            Err(CliError {
                code: EXIT_USAGE,
                message: String::new(),
                hint: None,
            })
        }
        Some(Commands::Analyze {
            config,
            json,
            output,
            csv,
            quiet,
        }) => analyze::cmd_analyze(config, json, output, csv, quiet),
        Some(Commands::Validate { config }) => analyze::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_RUNTIME,
            message: msg.into(),
            hint: None,
        }
    }
}
