//! Grouping symbols into cards and cards into pages.
//!
//! Planning works on symbol indices only, so it is cheap to inspect without
//! rendering. [`pack`] renders a plan into page canvases.

use serde::Serialize;
use tracing::{debug, info};

use crate::document::{Document, Page};
use crate::error::{DobbleError, Result};
use crate::geometry::{PageGeometry, SlotOrigin};
use crate::graphics::{CardStyle, render_page};
use crate::symbols::Symbol;

pub const DEFAULT_SYMBOLS_PER_CARD: usize = 5;
/// Upper bound on symbol slots per page; padding materialises this many entries.
pub const MAX_SYMBOLS_PER_PAGE: usize = 1 << 20;

/// Indices into the original pool, in placement order around the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSpec {
    pub symbols: Vec<usize>,
}

/// A card and the grid cell it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSlot {
    pub origin: SlotOrigin,
    pub card: CardSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub slots: Vec<CardSlot>,
}

/// Everything needed to render a document, minus the pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPlan {
    pub geometry: PageGeometry,
    pub per_card: usize,
    pub original_len: usize,
    pub padded_len: usize,
    pub padding_rounds: usize,
    pub pages: Vec<PagePlan>,
}

impl DocumentPlan {
    pub fn card_count(&self) -> usize {
        self.pages.iter().map(|page| page.slots.len()).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardSpec> {
        self.pages
            .iter()
            .flat_map(|page| page.slots.iter().map(|slot| &slot.card))
    }
}

/// Lengths appended by each round of prefix doubling.
///
/// Every round appends `min(target - len, len)` items taken from the front of
/// the pool, so the pool at most doubles per round and stops at `target`.
pub fn padding_plan(original_len: usize, target: usize) -> Vec<usize> {
    let mut rounds = Vec::new();
    if original_len == 0 {
        return rounds;
    }
    let mut len = original_len;
    while len < target {
        let extra = (target - len).min(len);
        rounds.push(extra);
        len += extra;
    }
    rounds
}

/// Repeat the front of `items` until it holds at least `target` entries.
///
/// Item `i` of the result is `items[i % items.len()]`.
pub fn pad_pool<T: Clone>(items: &[T], target: usize) -> Result<Vec<T>> {
    if items.is_empty() {
        return Err(DobbleError::Configuration(
            "cannot pad an empty symbol pool".to_string(),
        ));
    }
    let mut padded = items.to_vec();
    for extra in padding_plan(items.len(), target) {
        padded.extend_from_within(..extra);
    }
    Ok(padded)
}

/// Symbol slots on one full page, rejecting grids too large to plan.
pub fn symbols_per_page(geometry: &PageGeometry, per_card: usize) -> Result<usize> {
    geometry
        .cards_per_page()
        .checked_mul(per_card)
        .filter(|&slots| slots <= MAX_SYMBOLS_PER_PAGE)
        .ok_or_else(|| {
            DobbleError::Configuration(format!(
                "{} cards of {per_card} symbols per page exceeds the limit of {MAX_SYMBOLS_PER_PAGE} symbols",
                geometry.cards_per_page()
            ))
        })
}

/// Decide which symbols go on which card and where each card lands.
pub fn plan_document(
    pool_len: usize,
    per_card: usize,
    geometry: &PageGeometry,
) -> Result<DocumentPlan> {
    if per_card == 0 {
        return Err(DobbleError::Configuration(
            "symbols per card must be at least 1".to_string(),
        ));
    }
    if pool_len == 0 {
        return Err(DobbleError::Configuration(
            "symbol pool is empty".to_string(),
        ));
    }
    let cards_per_page = geometry.cards_per_page();
    if cards_per_page == 0 {
        return Err(DobbleError::Configuration(
            "page geometry holds no cards".to_string(),
        ));
    }

    let target = symbols_per_page(geometry, per_card)?;
    let indices: Vec<usize> = (0..pool_len).collect();
    let padding_rounds = padding_plan(pool_len, target).len();
    let padded = pad_pool(&indices, target)?;

    let cards: Vec<CardSpec> = padded
        .chunks(per_card)
        .map(|chunk| CardSpec {
            symbols: chunk.to_vec(),
        })
        .collect();

    let pages = cards
        .chunks(cards_per_page)
        .map(|chunk| PagePlan {
            slots: chunk
                .iter()
                .enumerate()
                .map(|(idx, card)| CardSlot {
                    origin: geometry.slot_origin(idx),
                    card: card.clone(),
                })
                .collect(),
        })
        .collect();

    Ok(DocumentPlan {
        geometry: *geometry,
        per_card,
        original_len: pool_len,
        padded_len: padded.len(),
        padding_rounds,
        pages,
    })
}

/// Lay out `pool` on pages and render every card.
pub fn pack(
    pool: &[Symbol],
    per_card: usize,
    geometry: &PageGeometry,
    style: &CardStyle,
) -> Result<Document> {
    let plan = plan_document(pool.len(), per_card, geometry)?;
    info!(
        symbols = plan.original_len,
        padded = plan.padded_len,
        cards = plan.card_count(),
        pages = plan.pages.len(),
        diameter = geometry.diameter,
        "packing document"
    );

    let mut pages = Vec::with_capacity(plan.pages.len());
    for (page_idx, page_plan) in plan.pages.iter().enumerate() {
        debug!(page = page_idx + 1, cards = page_plan.slots.len(), "rendering page");
        let image = render_page(pool, page_plan, geometry, style)?;
        pages.push(Page {
            image,
            slots: page_plan.slots.clone(),
        });
    }

    Ok(Document {
        geometry: *geometry,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn a4_165() -> PageGeometry {
        PageGeometry::with_diameter(595, 842, 15, 165).unwrap()
    }

    #[test]
    fn three_symbols_pad_round_robin_to_a_full_page() {
        assert_eq!(padding_plan(3, 30), vec![3, 6, 12, 6]);
        let padded = pad_pool(&[0, 1, 2], 30).unwrap();
        assert_eq!(padded.len(), 30);
        for (i, value) in padded.iter().enumerate() {
            assert_eq!(*value, i % 3);
        }
    }

    #[test]
    fn padding_never_more_than_doubles_per_round_and_stops_at_target() {
        for original in 1..40 {
            for target in 0..200 {
                let rounds = padding_plan(original, target);
                let mut len = original;
                for extra in &rounds {
                    assert!(*extra > 0 && *extra <= len);
                    len += extra;
                }
                assert_eq!(len, original.max(target));
                assert!(len < 2 * target.max(original));
            }
        }
    }

    #[test]
    fn large_pool_is_not_padded() {
        assert!(padding_plan(31, 30).is_empty());
        assert_eq!(pad_pool(&[7; 31], 30).unwrap().len(), 31);
    }

    #[test]
    fn empty_pool_cannot_be_padded() {
        let empty: [u8; 0] = [];
        assert!(pad_pool(&empty, 10).is_err());
    }

    #[test]
    fn scenario_three_symbols_five_per_card() {
        let plan = plan_document(3, 5, &a4_165()).unwrap();
        assert_eq!(plan.padded_len, 30);
        assert!(plan.padding_rounds <= 5);
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.card_count(), 6);
        let flat: Vec<usize> = plan.cards().flat_map(|c| c.symbols.clone()).collect();
        assert_eq!(flat, (0..30).map(|i| i % 3).collect::<Vec<_>>());
    }

    #[test]
    fn exact_capacity_pool_fills_one_page_without_padding() {
        let geometry = a4_165();
        let plan = plan_document(60, 5, &geometry).unwrap();
        assert_eq!(plan.padding_rounds, 0);
        assert_eq!(plan.padded_len, 60);
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.pages[0].slots.len(), 12);
    }

    #[test]
    fn only_the_last_page_may_be_partial() {
        let geometry = a4_165();
        for pool_len in [1, 7, 59, 60, 61, 121, 250] {
            let plan = plan_document(pool_len, 5, &geometry).unwrap();
            let (last, full) = plan.pages.split_last().unwrap();
            for page in full {
                assert_eq!(page.slots.len(), geometry.cards_per_page());
            }
            assert!(!last.slots.is_empty());
            let symbol_slots: usize = plan.cards().map(|c| c.symbols.len()).sum();
            assert!(plan.card_count() * 5 >= pool_len.max(60));
            assert_eq!(symbol_slots, pool_len.max(60));
        }
    }

    #[test]
    fn short_trailing_card_only_when_pool_does_not_divide() {
        let plan = plan_document(62, 5, &a4_165()).unwrap();
        let cards: Vec<&CardSpec> = plan.cards().collect();
        assert_eq!(cards.len(), 13);
        assert_eq!(cards[12].symbols, vec![60, 61]);
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[1].slots[0].origin, geometry_origin(0));
    }

    fn geometry_origin(index: usize) -> SlotOrigin {
        a4_165().slot_origin(index)
    }

    #[test]
    fn slots_follow_row_major_order() {
        let plan = plan_document(60, 5, &a4_165()).unwrap();
        let origins: Vec<(u32, u32)> = plan.pages[0]
            .slots
            .iter()
            .map(|slot| (slot.origin.x, slot.origin.y))
            .collect();
        assert_eq!(&origins[..4], &[(15, 15), (195, 15), (375, 15), (15, 195)]);
    }

    #[test]
    fn oversized_pages_are_rejected_before_padding() {
        let tiny_cards = PageGeometry::with_diameter(200_000, 200_000, 0, 1).unwrap();
        assert!(matches!(
            plan_document(3, 5, &tiny_cards),
            Err(DobbleError::Configuration(_))
        ));
        assert!(matches!(
            symbols_per_page(&a4_165(), usize::MAX),
            Err(DobbleError::Configuration(_))
        ));
        assert_eq!(symbols_per_page(&a4_165(), 5).unwrap(), 60);
    }

    #[test]
    fn rejects_zero_symbols_per_card() {
        assert!(matches!(
            plan_document(10, 0, &a4_165()),
            Err(DobbleError::Configuration(_))
        ));
        assert!(matches!(
            plan_document(0, 5, &a4_165()),
            Err(DobbleError::Configuration(_))
        ));
    }
}
