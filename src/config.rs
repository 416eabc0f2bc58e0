//! Layout settings, loadable from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DobbleError, Result, Stage};
use crate::geometry::{
    A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_COLUMNS, DEFAULT_PADDING_PT, PageGeometry,
};
use crate::graphics::CardStyle;
use crate::layout::DEFAULT_SYMBOLS_PER_CARD;

/// Page size, grid and card settings for one document.
///
/// Every field is optional in the JSON form; missing fields take the A4
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: u32,
    pub page_height: u32,
    pub padding: u32,
    pub columns: u32,
    /// Fixed card diameter; derived from `columns` when absent.
    pub diameter: Option<u32>,
    pub per_card: usize,
    pub card: CardStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            padding: DEFAULT_PADDING_PT,
            columns: DEFAULT_COLUMNS,
            diameter: None,
            per_card: DEFAULT_SYMBOLS_PER_CARD,
            card: CardStyle::default(),
        }
    }
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).map_err(|err| DobbleError::io(Stage::LoadConfig, path, err))?;
        serde_json::from_str(&raw).map_err(|source| DobbleError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the page settings into a geometry.
    pub fn geometry(&self) -> Result<PageGeometry> {
        match self.diameter {
            Some(diameter) => {
                PageGeometry::with_diameter(self.page_width, self.page_height, self.padding, diameter)
            }
            None => PageGeometry::new(self.page_width, self.page_height, self.padding, self.columns),
        }
    }
}
