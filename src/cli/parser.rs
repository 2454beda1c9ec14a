use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for sheet-invoicer
/// Turns unsent billing rows of a Google Sheet into PDF invoices
#[derive(Parser, Debug)]
#[command(
    name = "sheet-invoicer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate PDF invoices for unsent rows of a Google Sheet and mark them as sent",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (JSON, or YAML when the extension is .yaml/.yml)
    #[arg(global = true, short = 'c', long = "config", default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// More diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate invoices for every row whose Sent column is "N"
    Run {
        #[arg(long = "dry-run", help = "Write the PDFs but do not update the Sent column")]
        dry_run: bool,

        #[arg(
            long = "keep-going",
            help = "Continue with the next row when one row fails"
        )]
        keep_going: bool,

        #[arg(
            long = "strict-status",
            help = "Fail on Sent values other than Y/N instead of skipping the row"
        )]
        strict_status: bool,
    },

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the parsed configuration")]
        print_config: bool,

        #[arg(
            long = "check",
            help = "Validate the configuration and the paths it references"
        )]
        check: bool,
    },
}

impl Commands {
    /// The command run when none is given on the command line.
    pub fn default_run() -> Self {
        Commands::Run {
            dry_run: false,
            keep_going: false,
            strict_status: false,
        }
    }
}
