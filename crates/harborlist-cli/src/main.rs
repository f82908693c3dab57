mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::dealer::PermissionsArgs;
use commands::finance::{AffordArgs, CompareArgs, LoanArgs};

/// Boat finance calculations for HarborList
#[derive(Parser)]
#[command(
    name = "harbor",
    version,
    about = "Boat finance calculations for HarborList",
    long_about = "A CLI for the HarborList finance tools with decimal precision. \
                  Quotes fixed-rate boat loans, expands payment schedules, compares \
                  loan scenarios, estimates affordability and checks dealer \
                  sub-account permissions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", env = "HARBOR_OUTPUT", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a fixed-rate boat loan
    Loan(LoanArgs),
    /// Print the month-by-month payment schedule of a loan
    Schedule(LoanArgs),
    /// Compare loan scenarios side by side
    Compare(CompareArgs),
    /// Estimate the boat price a monthly budget can finance
    Afford(AffordArgs),
    /// Look up dealer sub-account permissions
    Permissions(PermissionsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, LevelFilter::Warn)
        .filter(Some("harborlist_core"), level)
        .filter(Some("harbor"), level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::finance::run_loan(args),
        Commands::Schedule(args) => commands::finance::run_schedule(args),
        Commands::Compare(args) => commands::finance::run_compare(args),
        Commands::Afford(args) => commands::finance::run_afford(args),
        Commands::Permissions(args) => commands::dealer::run_permissions(args),
        Commands::Version => {
            println!("harbor {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
