//! `dobble symbols`: inspect a symbol directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dobble::{load_symbols, resize_to_width};

#[derive(Args, Debug)]
pub struct SymbolsArgs {
    /// Directory holding the symbol images.
    #[arg(long)]
    pub images: PathBuf,
    /// Write a resized copy of every symbol into this directory.
    #[arg(long)]
    pub thumbnails: Option<PathBuf>,
    /// Thumbnail width in pixels.
    #[arg(long, default_value_t = 100)]
    pub width: u32,
}

pub fn handle(args: SymbolsArgs) -> Result<()> {
    let pool = load_symbols(&args.images)?;
    if let Some(dir) = &args.thumbnails {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create thumbnail directory {}", dir.display()))?;
    }

    for (idx, symbol) in pool.iter().enumerate() {
        let name = symbol
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(in memory)".to_string());
        let marker = if symbol.is_placeholder() { "  [placeholder]" } else { "" };
        println!(
            "{:>4}  {:<32} {:>5} x {:<5}{}",
            idx + 1,
            name,
            symbol.width(),
            symbol.height(),
            marker
        );

        if let Some(dir) = &args.thumbnails {
            let target = dir.join(format!("{:04}.png", idx + 1));
            resize_to_width(symbol.image(), args.width)
                .save(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
    }
    println!("{} symbol(s) in {}", pool.len(), args.images.display());
    Ok(())
}
