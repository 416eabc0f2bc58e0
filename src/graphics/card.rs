use image::imageops::{self, FilterType, overlay};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_hollow_ellipse_mut};
use serde::{Deserialize, Serialize};

use crate::error::{DobbleError, Result};
use crate::symbols::Symbol;

pub const DEFAULT_MARGIN: u32 = 30;
pub const DEFAULT_SYMBOL_DIVISOR: u32 = 3;
pub const DEFAULT_GUIDE_OFFSET: u32 = 5;
pub const DEFAULT_GUIDE_COLOR: [u8; 3] = [0x9a, 0x9a, 0x9a];

const CARD_BG: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const TRANSPARENT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0x00]);

/// Where a symbol sits relative to its radial anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Top-left corner on the anchor; symbols drift outward by half their size.
    #[default]
    Corner,
    /// Symbol centred on the anchor.
    Centered,
}

/// Visual knobs for composing a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    /// Inset of the placement ring from the card edge.
    pub margin: u32,
    /// A symbol's longer side is at most `diameter / symbol_divisor`.
    pub symbol_divisor: u32,
    pub placement: PlacementMode,
    /// Distance of the cut guide outside the card bounds.
    pub guide_offset: u32,
    pub guide_color: [u8; 3],
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            symbol_divisor: DEFAULT_SYMBOL_DIVISOR,
            placement: PlacementMode::Corner,
            guide_offset: DEFAULT_GUIDE_OFFSET,
            guide_color: DEFAULT_GUIDE_COLOR,
        }
    }
}

/// Thin ellipse drawn around a placed card to show where to cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutGuide {
    pub diameter: u32,
    pub offset: u32,
    pub color: Rgba<u8>,
}

impl CutGuide {
    /// Stroke the guide around a card whose top-left corner is at `(x, y)`.
    pub fn stroke(&self, canvas: &mut RgbaImage, x: i32, y: i32) {
        let half = (self.diameter / 2) as i32;
        let radius = half + self.offset as i32;
        draw_hollow_ellipse_mut(canvas, (x + half, y + half), radius, radius, self.color);
    }

    /// Side of the square that holds the card plus its guide.
    pub fn outer_size(&self) -> u32 {
        self.diameter + 2 * (self.offset + 1)
    }
}

/// A composed card: the masked square and the guide to stroke around it.
#[derive(Debug, Clone)]
pub struct CardImage {
    pub image: RgbaImage,
    pub cut_guide: CutGuide,
}

impl CardImage {
    pub fn diameter(&self) -> u32 {
        self.image.width()
    }

    /// Standalone preview with the guide painted around the card.
    pub fn with_cut_guide(&self) -> RgbaImage {
        let size = self.cut_guide.outer_size();
        let inset = (self.cut_guide.offset + 1) as i32;
        let mut canvas = ImageBuffer::from_pixel(size, size, TRANSPARENT);
        overlay(&mut canvas, &self.image, inset as i64, inset as i64);
        self.cut_guide.stroke(&mut canvas, inset, inset);
        canvas
    }
}

/// Arrange `symbols` on a ring inside a circular card of side `diameter`.
///
/// Symbol `i` sits at `i * 360 / n` degrees, measured from the +x axis and
/// turning clockwise on screen. Everything outside the inscribed circle ends up
/// fully transparent.
pub fn compose_card(symbols: &[&Symbol], diameter: u32, style: &CardStyle) -> Result<CardImage> {
    if symbols.is_empty() {
        return Err(DobbleError::InvalidCard(
            "a card needs at least one symbol".to_string(),
        ));
    }
    if diameter == 0 {
        return Err(DobbleError::InvalidCard(
            "card diameter must be positive".to_string(),
        ));
    }

    let mut card = ImageBuffer::from_pixel(diameter, diameter, CARD_BG);

    let angle_step = 360.0 / symbols.len() as f64;
    let radius = (diameter / 2).saturating_sub(style.margin) as f64;
    let max_side = (diameter / style.symbol_divisor.max(1)).max(1);

    for (idx, symbol) in symbols.iter().enumerate() {
        let scaled = fit_within(symbol, max_side);
        let angle = (idx as f64 * angle_step).to_radians();
        let (x, y) = symbol_offset(
            radius,
            angle,
            scaled.width(),
            scaled.height(),
            style.placement,
        );
        overlay(&mut card, &scaled, x, y);
    }

    let mask = create_circular_mask(diameter, diameter);
    let image = apply_mask(&card, &mask)?;
    let [r, g, b] = style.guide_color;

    Ok(CardImage {
        image,
        cut_guide: CutGuide {
            diameter,
            offset: style.guide_offset,
            color: Rgba([r, g, b, 0xff]),
        },
    })
}

/// Top-left pixel at which a `width x height` symbol is pasted.
pub fn symbol_offset(
    radius: f64,
    angle: f64,
    width: u32,
    height: u32,
    placement: PlacementMode,
) -> (i64, i64) {
    let x = (radius + radius * angle.cos()).trunc() as i64;
    let y = (radius + radius * angle.sin()).trunc() as i64;
    match placement {
        PlacementMode::Corner => (x, y),
        PlacementMode::Centered => (x - (width / 2) as i64, y - (height / 2) as i64),
    }
}

/// Single-channel mask: 255 inside the inscribed ellipse, 0 elsewhere.
pub fn create_circular_mask(width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let rx = (width / 2) as i32;
    let ry = (height / 2) as i32;
    draw_filled_ellipse_mut(&mut mask, (rx, ry), rx, ry, Luma([u8::MAX]));
    mask
}

/// Composite `image` over a transparent background through `mask`.
///
/// The mask must have the same dimensions as the image.
pub fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> Result<RgbaImage> {
    if image.dimensions() != mask.dimensions() {
        let (iw, ih) = image.dimensions();
        let (mw, mh) = mask.dimensions();
        return Err(DobbleError::InvalidCard(format!(
            "mask is {mw}x{mh} but the card is {iw}x{ih}"
        )));
    }
    let mut out = ImageBuffer::from_pixel(image.width(), image.height(), TRANSPARENT);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let weight = mask.get_pixel(x, y).0[0] as u32;
        if weight == 0 {
            continue;
        }
        let src = image.get_pixel(x, y).0;
        let mut blended = [0u8; 4];
        for (channel, value) in blended.iter_mut().enumerate() {
            let under = TRANSPARENT.0[channel] as u32;
            *value = ((src[channel] as u32 * weight + under * (255 - weight) + 127) / 255) as u8;
        }
        *pixel = Rgba(blended);
    }
    Ok(out)
}

/// Shrink (never enlarge) so the longer side is at most `max_side`.
fn fit_within(symbol: &Symbol, max_side: u32) -> RgbaImage {
    let rgba = DynamicImage::ImageRgb8(symbol.image().clone()).to_rgba8();
    let (w, h) = rgba.dimensions();
    if w <= max_side && h <= max_side {
        return rgba;
    }
    let longer = w.max(h) as f64;
    let nw = ((w as f64 * max_side as f64 / longer).round() as u32).clamp(1, max_side);
    let nh = ((h as f64 * max_side as f64 / longer).round() as u32).clamp(1, max_side);
    imageops::resize(&rgba, nw, nh, FilterType::Triangle)
}
