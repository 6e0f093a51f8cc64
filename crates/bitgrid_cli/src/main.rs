//! bitgrid CLI: builds the reference array designs and prints their IR.

#![warn(missing_docs)]

mod list;
mod show;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// bitgrid: symbolic bit-vector arrays for hardware construction.
#[derive(Parser, Debug)]
#[command(name = "bitgrid", version, about = "bitgrid array design explorer")]
pub struct Cli {
    /// Print nothing but errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More logging; repeat for trace output.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding `bitgrid.toml`; the working directory if omitted.
    #[arg(long = "config", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the reference designs.
    List,
    /// Build one design and print its IR.
    Show(ShowArgs),
}

/// `bitgrid show` arguments.
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Name of the design (see `bitgrid list`).
    pub design: String,

    /// How to print the module.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Lower without barrier wires whatever the configuration says.
    #[arg(long)]
    pub no_wire: bool,
}

/// How `show` prints a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Textual IR dump.
    Text,
    /// The serialized module as JSON.
    Json,
}

/// What every subcommand needs besides its own arguments.
pub struct Session {
    /// Suppress normal output.
    pub quiet: bool,
    /// Where `bitgrid.toml` is looked up.
    pub project_dir: PathBuf,
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session {
        quiet: cli.quiet,
        project_dir: match cli.config_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        },
    };
    match &cli.command {
        Command::List => list::run(&session),
        Command::Show(args) => show::run(args, &session),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::builder()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
