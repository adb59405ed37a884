use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input documents; one input runs as a single value, several as a sequence
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Pipeline definition file (default: ./ductus.toml)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Write each result next to its input name in this directory instead of printing
    #[arg(long, value_name = "DIR", help_heading = "Output Options")]
    pub output_dir: Option<PathBuf>,

    /// Emit either plain text or machine-readable JSON
    #[arg(long, default_value = "text", value_name = "FORMAT", help_heading = "Output Options")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input documents; one input runs as a single value, several as a sequence
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Stylesheet applied to every input
    #[arg(long, value_name = "FILE")]
    pub stylesheet: PathBuf,

    /// Stylesheet parameter, repeatable (string value)
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Stylesheet run on the original input when the main one fails
    #[arg(long, value_name = "FILE")]
    pub fallback_stylesheet: Option<PathBuf>,

    /// Binary used to run transformations (default: xsltproc, env DUCTUS_XSLTPROC)
    #[arg(long, value_name = "PATH", help_heading = "Configuration")]
    pub xsltproc: Option<PathBuf>,

    /// Write each result next to its input name in this directory instead of printing
    #[arg(long, value_name = "DIR", help_heading = "Output Options")]
    pub output_dir: Option<PathBuf>,

    /// Emit either plain text or machine-readable JSON
    #[arg(long, default_value = "text", value_name = "FORMAT", help_heading = "Output Options")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Pipeline definition file (default: ./ductus.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Results separated by newlines
    Text,
    /// `{ "outputs": [...] }` payload suitable for downstream tooling
    Json,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
