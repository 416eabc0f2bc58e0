//! `dobble layout`: print the derived grid without rendering anything.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use dobble::{plan_document, symbol_paths, symbols_per_page};

use crate::cli::common::LayoutOptions;

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Number of symbols to plan for.
    #[arg(long, conflicts_with = "images")]
    pub symbols: Option<usize>,
    /// Count the symbols in this directory instead.
    #[arg(long)]
    pub images: Option<PathBuf>,
    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub layout: LayoutOptions,
}

pub fn handle(args: LayoutArgs) -> Result<()> {
    let config = args.layout.resolve()?;
    let geometry = config.geometry().context("invalid page layout")?;
    let pool_len = match (args.symbols, &args.images) {
        (Some(count), _) => count,
        (None, Some(dir)) => symbol_paths(dir)?.len(),
        (None, None) => symbols_per_page(&geometry, config.per_card)?,
    };
    if pool_len == 0 {
        return Err(anyhow!("nothing to lay out: the symbol pool is empty"));
    }
    let plan = plan_document(pool_len, config.per_card, &geometry)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "Page        {} x {} pt, padding {}",
        geometry.page_width, geometry.page_height, geometry.padding
    );
    println!("Card        {} pt diameter", geometry.diameter);
    println!(
        "Grid        {} per row x {} rows = {} cards/page",
        geometry.circles_per_row,
        geometry.rows_per_page,
        geometry.cards_per_page()
    );
    println!(
        "Symbols     {} supplied, {} after padding ({} round(s))",
        plan.original_len, plan.padded_len, plan.padding_rounds
    );
    println!(
        "Output      {} card(s) of {} on {} page(s)",
        plan.card_count(),
        plan.per_card,
        plan.pages.len()
    );
    Ok(())
}
