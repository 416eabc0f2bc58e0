//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dobble::{LayoutConfig, PlacementMode};

/// How symbols sit on their radial anchor.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PlacementArg {
    Corner,
    Centered,
}

impl From<PlacementArg> for PlacementMode {
    fn from(value: PlacementArg) -> PlacementMode {
        match value {
            PlacementArg::Corner => PlacementMode::Corner,
            PlacementArg::Centered => PlacementMode::Centered,
        }
    }
}

/// Layout flags accepted by every command that lays out cards.
///
/// Values given on the command line override the config file, which in turn
/// overrides the built-in A4 defaults.
#[derive(Args, Debug, Default)]
pub struct LayoutOptions {
    /// JSON layout file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Symbols per card.
    #[arg(long = "per-card")]
    pub per_card: Option<usize>,
    /// Spacing between cards and page edges, in points.
    #[arg(long)]
    pub padding: Option<u32>,
    /// Cards across the page; sets the diameter.
    #[arg(long)]
    pub columns: Option<u32>,
    /// Explicit card diameter in points (overrides --columns).
    #[arg(long)]
    pub diameter: Option<u32>,
    /// Page width in points.
    #[arg(long = "page-width")]
    pub page_width: Option<u32>,
    /// Page height in points.
    #[arg(long = "page-height")]
    pub page_height: Option<u32>,
    /// Symbol anchoring on the card ring.
    #[arg(long, value_enum)]
    pub placement: Option<PlacementArg>,
    /// Inset of the symbol ring from the card edge.
    #[arg(long)]
    pub margin: Option<u32>,
}

impl LayoutOptions {
    pub fn resolve(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::load(path)
                .with_context(|| format!("failed to load layout {}", path.display()))?,
            None => LayoutConfig::default(),
        };
        if let Some(per_card) = self.per_card {
            config.per_card = per_card;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
            config.diameter = None;
        }
        if self.diameter.is_some() {
            config.diameter = self.diameter;
        }
        if let Some(width) = self.page_width {
            config.page_width = width;
        }
        if let Some(height) = self.page_height {
            config.page_height = height;
        }
        if let Some(placement) = self.placement {
            config.card.placement = placement.into();
        }
        if let Some(margin) = self.margin {
            config.card.margin = margin;
        }
        Ok(config)
    }
}
