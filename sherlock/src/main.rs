use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod layout;

use commands::Command;

/// Run searches and games against pacman layout files
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.command.run()
}
