//! Page geometry: card diameter and the row/column grid derived from the page size.
//!
//! Every length is in points. Pages are rasterised at one pixel per point, so the
//! same numbers double as pixel coordinates on the page canvas.

use serde::{Deserialize, Serialize};

use crate::error::{DobbleError, Result};

/// A4 at 72 points per inch.
pub const A4_WIDTH_PT: u32 = 595;
pub const A4_HEIGHT_PT: u32 = 842;
pub const DEFAULT_PADDING_PT: u32 = 15;
pub const DEFAULT_COLUMNS: u32 = 3;

/// Derived page layout shared by every page of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: u32,
    pub page_height: u32,
    pub padding: u32,
    pub diameter: u32,
    pub circles_per_row: u32,
    pub rows_per_page: u32,
}

/// Grid cell a card occupies on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotOrigin {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
}

impl PageGeometry {
    /// Size the cards so that `columns` of them fit across the page with
    /// `padding` between each other and the page edges.
    pub fn new(page_width: u32, page_height: u32, padding: u32, columns: u32) -> Result<Self> {
        if columns == 0 {
            return Err(DobbleError::Configuration(
                "column count must be at least 1".to_string(),
            ));
        }
        let gutters = columns
            .checked_add(1)
            .and_then(|gaps| gaps.checked_mul(padding))
            .filter(|&g| g < page_width)
            .ok_or_else(|| {
                DobbleError::Configuration(format!(
                    "padding {padding} leaves no room for {columns} column(s) on a {page_width}pt wide page"
                ))
            })?;
        let diameter = (page_width - gutters) / columns;
        Self::with_diameter(page_width, page_height, padding, diameter)
    }

    /// Use an explicit card diameter instead of deriving it from a column count.
    pub fn with_diameter(
        page_width: u32,
        page_height: u32,
        padding: u32,
        diameter: u32,
    ) -> Result<Self> {
        if diameter == 0 {
            return Err(DobbleError::Configuration(
                "card diameter must be positive".to_string(),
            ));
        }
        let pitch = diameter.checked_add(padding).ok_or_else(|| {
            DobbleError::Configuration(format!(
                "card diameter {diameter} plus padding {padding} is out of range"
            ))
        })?;
        let circles_per_row = page_width / pitch;
        let rows_per_page = page_height / pitch;
        if circles_per_row == 0 || rows_per_page == 0 {
            return Err(DobbleError::Configuration(format!(
                "a {diameter}pt card with {padding}pt padding does not fit on a {page_width}x{page_height}pt page \
                 ({circles_per_row} per row, {rows_per_page} rows)"
            )));
        }
        Ok(Self {
            page_width,
            page_height,
            padding,
            diameter,
            circles_per_row,
            rows_per_page,
        })
    }

    /// A4 with the default padding and three cards per row.
    pub fn a4() -> Result<Self> {
        Self::new(A4_WIDTH_PT, A4_HEIGHT_PT, DEFAULT_PADDING_PT, DEFAULT_COLUMNS)
    }

    pub fn cards_per_page(&self) -> usize {
        self.circles_per_row as usize * self.rows_per_page as usize
    }

    /// Row-major placement of the `index`-th card on a page.
    pub fn slot_origin(&self, index: usize) -> SlotOrigin {
        let per_row = self.circles_per_row as usize;
        let row = (index / per_row) as u32;
        let col = (index % per_row) as u32;
        let pitch = self.diameter + self.padding;
        SlotOrigin {
            row,
            col,
            x: self.padding + col * pitch,
            y: self.padding + row * pitch,
        }
    }
}
