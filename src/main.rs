use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    dobble::logger::init_cli_logger(cli.verbose);
    cli::run(cli)
}
