//! `dobble card`: preview one card with its cut guide.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use dobble::{Symbol, compose_card, load_symbols};

use crate::cli::common::LayoutOptions;
use crate::cli::utils::ensure_parent_dir;

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Directory holding the symbol images.
    #[arg(long)]
    pub images: PathBuf,
    /// Index of the first symbol on the card (in load order).
    #[arg(long, default_value_t = 0)]
    pub start: usize,
    /// Output PNG path.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    #[command(flatten)]
    pub layout: LayoutOptions,
}

pub fn handle(args: CardArgs) -> Result<()> {
    let config = args.layout.resolve()?;
    let geometry = config.geometry().context("invalid page layout")?;
    let pool = load_symbols(&args.images)?;
    if args.start >= pool.len() {
        return Err(anyhow!(
            "--start {} is past the {} symbol(s) in {}",
            args.start,
            pool.len(),
            args.images.display()
        ));
    }
    let end = (args.start + config.per_card).min(pool.len());
    let symbols: Vec<&Symbol> = pool[args.start..end].iter().collect();

    let card = compose_card(&symbols, geometry.diameter, &config.card)?;
    ensure_parent_dir(&args.output)?;
    card.with_cut_guide()
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Rendered a {}pt card with {} symbol(s) to {}",
        geometry.diameter,
        symbols.len(),
        args.output.display()
    );
    Ok(())
}
