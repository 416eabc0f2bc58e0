//! Raster composition of cards and pages.

mod card;
mod page;

pub use card::{
    CardImage, CardStyle, CutGuide, PlacementMode, apply_mask, compose_card,
    create_circular_mask, symbol_offset,
};
pub use page::render_page;
