//! Core library for laying out circular picture cards and printing them.

mod config;
mod document;
mod error;
mod game;
mod geometry;
mod graphics;
mod layout;
pub mod logger;
mod symbols;

use std::path::Path;

pub use config::LayoutConfig;
pub use document::{Document, Page, write_document, write_page_images};
pub use error::{DobbleError, Result, Stage};
pub use game::{DOCUMENTS_DIR, Game, IMAGES_DIR};
pub use geometry::{PageGeometry, SlotOrigin};
pub use graphics::{
    CardImage, CardStyle, CutGuide, PlacementMode, apply_mask, compose_card, create_circular_mask,
    render_page, symbol_offset,
};
pub use layout::{
    CardSlot, CardSpec, DEFAULT_SYMBOLS_PER_CARD, DocumentPlan, MAX_SYMBOLS_PER_PAGE, PagePlan,
    pack, pad_pool, padding_plan, plan_document, symbols_per_page,
};
pub use symbols::{
    SUPPORTED_EXTENSIONS, Symbol, SymbolPool, load_symbols, normalize, placeholder,
    resize_to_width, symbol_paths,
};

/// What [`generate_document`] produced.
#[derive(Debug, Clone)]
pub struct Generated {
    pub document: Document,
    /// Symbols loaded from the directory, placeholders included.
    pub symbols: usize,
    pub placeholders: usize,
}

/// Load the symbols in `images`, pack them per `config` and write the PDF.
///
/// Returns the rendered document so callers can inspect or export it further.
pub fn generate_document(
    images: &Path,
    output: &Path,
    config: &LayoutConfig,
    title: &str,
) -> Result<Generated> {
    let geometry = config.geometry()?;
    let pool = load_symbols(images)?;
    if pool.is_empty() {
        return Err(DobbleError::Configuration(format!(
            "no .jpg, .jpeg or .png files found in {}",
            images.display()
        )));
    }
    let placeholders = pool.iter().filter(|s| s.is_placeholder()).count();

    let document = pack(&pool, config.per_card, &geometry, &config.card)?;
    write_document(&document, output, title)?;
    Ok(Generated {
        document,
        symbols: pool.len(),
        placeholders,
    })
}
