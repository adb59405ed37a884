use anyhow::Context;
use clap::Parser;
use ductus::cli::{self, Args};
use ductus::core::ConfigLoader;
use ductus::logging::{self, LoggingConfig};

fn main() -> ductus::Result<()> {
    let args = Args::parse();

    let config_path = ConfigLoader::resolve_path(args.command.config_path());
    let logging_config = LoggingConfig::load(Some(&config_path))?;
    let _guard = logging::init(&logging_config).context("failed to initialize logging")?;

    cli::run(args)
}
