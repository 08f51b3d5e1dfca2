mod commands;
mod ops;
mod reports;

use clap::Parser;
use commands::Cli;
use eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    cli.init_tracing();
    cli.run()
}
