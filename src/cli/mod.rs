//! Command-line interface wiring for the `dobble` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod card;
pub mod common;
pub mod generate;
pub mod layout;
pub mod symbols;
pub mod utils;

/// Parsed CLI entrypoint for the `dobble` binary.
#[derive(Parser, Debug)]
#[command(name = "dobble", version, about = "Print circular picture cards onto pages")]
pub struct Cli {
    /// Log per-card and per-page progress.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a game's symbols into a multi-page PDF.
    Generate(generate::GenerateArgs),
    /// Render a single card preview as PNG.
    Card(card::CardArgs),
    /// Show the page grid and card counts without rendering.
    Layout(layout::LayoutArgs),
    /// List the symbols of a directory in load order.
    Symbols(symbols::SymbolsArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args),
        Command::Card(args) => card::handle(args),
        Command::Layout(args) => layout::handle(args),
        Command::Symbols(args) => symbols::handle(args),
    }
}
