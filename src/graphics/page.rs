use image::imageops::overlay;
use image::{DynamicImage, ImageBuffer, Rgba, RgbImage};
use tracing::debug;

use crate::error::{DobbleError, Result};
use crate::geometry::PageGeometry;
use crate::graphics::card::{CardStyle, compose_card};
use crate::layout::PagePlan;
use crate::symbols::Symbol;

const PAGE_BG: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Render one page: compose each planned card and paste it at its slot.
pub fn render_page(
    pool: &[Symbol],
    plan: &PagePlan,
    geometry: &PageGeometry,
    style: &CardStyle,
) -> Result<RgbImage> {
    let mut page = ImageBuffer::from_pixel(geometry.page_width, geometry.page_height, PAGE_BG);

    for slot in &plan.slots {
        let symbols = slot
            .card
            .symbols
            .iter()
            .map(|&idx| {
                pool.get(idx).ok_or_else(|| {
                    DobbleError::InvalidCard(format!(
                        "symbol index {idx} is outside a pool of {}",
                        pool.len()
                    ))
                })
            })
            .collect::<Result<Vec<&Symbol>>>()?;

        let card = compose_card(&symbols, geometry.diameter, style)?;
        let (x, y) = (slot.origin.x as i32, slot.origin.y as i32);
        overlay(&mut page, &card.image, x as i64, y as i64);
        card.cut_guide.stroke(&mut page, x, y);
        debug!(
            row = slot.origin.row,
            col = slot.origin.col,
            symbols = symbols.len(),
            "placed card"
        );
    }

    Ok(DynamicImage::ImageRgba8(page).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SlotOrigin;
    use crate::layout::{CardSlot, CardSpec};
    use image::Rgb;

    fn pool() -> Vec<Symbol> {
        vec![Symbol::new(RgbImage::from_pixel(30, 30, Rgb([0, 0, 0])))]
    }

    fn single_slot(x: u32, y: u32) -> PagePlan {
        PagePlan {
            slots: vec![CardSlot {
                origin: SlotOrigin { row: 0, col: 0, x, y },
                card: CardSpec { symbols: vec![0] },
            }],
        }
    }

    #[test]
    fn page_keeps_background_outside_cards() {
        let geometry = PageGeometry::with_diameter(300, 300, 20, 100).unwrap();
        let page = render_page(&pool(), &single_slot(20, 20), &geometry, &CardStyle::default())
            .unwrap();
        assert_eq!(page.dimensions(), (300, 300));
        // Square corner of the card lies outside its circle.
        assert_eq!(page.get_pixel(20, 20), &Rgb([0xff, 0xff, 0xff]));
        assert_eq!(page.get_pixel(250, 250), &Rgb([0xff, 0xff, 0xff]));
    }

    #[test]
    fn cut_guide_is_stroked_around_the_card() {
        let geometry = PageGeometry::with_diameter(300, 300, 20, 100).unwrap();
        let page = render_page(&pool(), &single_slot(20, 20), &geometry, &CardStyle::default())
            .unwrap();
        // Centre (70, 70), guide radius 55.
        assert_eq!(page.get_pixel(15, 70), &Rgb([0x9a, 0x9a, 0x9a]));
        assert_eq!(page.get_pixel(70, 125), &Rgb([0x9a, 0x9a, 0x9a]));
    }

    #[test]
    fn unknown_symbol_index_is_rejected() {
        let geometry = PageGeometry::with_diameter(300, 300, 20, 100).unwrap();
        let mut plan = single_slot(20, 20);
        plan.slots[0].card.symbols = vec![3];
        assert!(matches!(
            render_page(&pool(), &plan, &geometry, &CardStyle::default()),
            Err(DobbleError::InvalidCard(_))
        ));
    }
}
