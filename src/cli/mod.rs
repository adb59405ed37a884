pub mod args;
pub mod commands;

pub use args::{CheckArgs, OutputFormat, RunArgs, TransformArgs};
use clap::{Parser, Subcommand};
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
PIPELINE COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "ductus")]
#[command(version = crate::VERSION)]
#[command(about = "Composable content pipelines with XSLT steps and fallback alternatives")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: describe steps in ductus.toml, validate it with check, then run it over your documents."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Run the configured pipeline over input documents",
        long_about = "Run loads the pipeline definition, reads every input as one content value and applies each step in order. A step with a fallback is retried with the fallback on the original input when it fails.",
        after_help = "Example:\n    ductus run --config ductus.toml report.xml --format json"
    )]
    Run(RunArgs),
    #[command(
        about = "Apply a single stylesheet without a config file",
        long_about = "Transform builds a one-step pipeline from --stylesheet, optionally paired with --fallback-stylesheet, and runs it over the inputs.",
        after_help = "Example:\n    ductus transform --stylesheet to-html.xsl --param title=Report report.xml"
    )]
    Transform(TransformArgs),
    #[command(
        about = "Validate a pipeline definition",
        long_about = "Check loads and validates the pipeline definition, then lists its entries in execution order.",
        after_help = "Example:\n    ductus check --config ductus.toml"
    )]
    Check(CheckArgs),
}

impl Command {
    /// Pipeline definition file the command reads, if any.
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Run(args) => args.config.as_deref(),
            Command::Check(args) => args.config.as_deref(),
            Command::Transform(_) => None,
        }
    }
}

pub fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Run(run_args) => commands::run(run_args),
        Command::Transform(transform_args) => commands::transform(transform_args),
        Command::Check(check_args) => commands::check(check_args),
    }
}
