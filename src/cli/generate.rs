//! `dobble generate`: symbols directory in, printable PDF out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dobble::{Game, generate_document, write_page_images};

use crate::cli::common::LayoutOptions;
use crate::cli::utils::{ensure_parent_dir, resolve_paths};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory holding the symbol images.
    #[arg(long, conflicts_with = "game_id")]
    pub images: Option<PathBuf>,
    /// Game id from the record store; images are read from `<root>/images/<id>`.
    #[arg(long = "game-id", requires = "name")]
    pub game_id: Option<i64>,
    /// Game name, used for the output file name and PDF title.
    #[arg(long)]
    pub name: Option<String>,
    /// Root of the game library.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Output PDF path.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Also export every page as PNG into this directory.
    #[arg(long = "pages-dir")]
    pub pages_dir: Option<PathBuf>,
    #[command(flatten)]
    pub layout: LayoutOptions,
}

pub fn handle(args: GenerateArgs) -> Result<()> {
    let config = args.layout.resolve()?;
    let game = match (args.game_id, args.name) {
        (Some(id), Some(name)) => Some(Game::new(id, name, String::new())),
        _ => None,
    };
    let paths = resolve_paths(args.images, args.output, game, &args.root)?;

    ensure_parent_dir(&paths.output)?;
    let generated = generate_document(&paths.images, &paths.output, &config, &paths.title)
        .with_context(|| format!("failed to generate cards from {}", paths.images.display()))?;

    if let Some(dir) = args.pages_dir {
        let written = write_page_images(&generated.document, &dir)?;
        println!("Exported {} page image(s) to {}", written.len(), dir.display());
    }

    println!(
        "Wrote {} page(s) with {} symbol(s) to {}",
        generated.document.pages.len(),
        generated.symbols,
        paths.output.display()
    );
    if generated.placeholders > 0 {
        println!(
            "{} symbol(s) could not be decoded and were replaced by placeholders",
            generated.placeholders
        );
    }
    Ok(())
}
