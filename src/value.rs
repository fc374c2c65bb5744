use std::collections::HashMap;

use crate::card::Card;
use crate::collection::CollectionItem;

/// Market price of a single copy, in cents. With `prefer_foil` the foil price
/// wins when present, else the regular price, else zero. Absent data is never
/// an error here; it prices at zero.
pub fn price_cents(card: &Card, prefer_foil: bool) -> u32 {
    if prefer_foil {
        if let Some(foil) = card.prices.usd_foil {
            return foil;
        }
    }
    card.prices.usd.unwrap_or(0)
}

/// Value of one collection row: regular copies at the regular rate, foil
/// copies at the foil rate falling back to the regular rate.
pub fn item_value_cents(item: &CollectionItem) -> u64 {
    let regular = price_cents(&item.card, false) as u64;
    let foil = price_cents(&item.card, true) as u64;
    item.quantity as u64 * regular + item.foil_quantity as u64 * foil
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionTotals {
    pub unique: u32,
    pub count: u32,
    pub value_cents: u64,
    pub avg_cmc: f64,
}

/// Ownership and value totals across the collection. Rows with zero combined
/// quantity are ignored; the average mana value is weighted by owned copies
/// and rounded half-up at the hundredth.
pub fn collection_totals(items: &[CollectionItem]) -> CollectionTotals {
    let mut unique = 0u32;
    let mut count = 0u32;
    let mut value_cents = 0u64;
    let mut weighted_cmc = 0f64;

    for item in items {
        let copies = item.copies();
        if copies == 0 {
            continue;
        }
        unique += 1;
        count += copies;
        value_cents += item_value_cents(item);
        weighted_cmc += item.card.cmc.unwrap_or(0.0) * copies as f64;
    }

    let avg_cmc = if count == 0 {
        0.0
    } else {
        round_hundredths(weighted_cmc / count as f64)
    };

    CollectionTotals {
        unique,
        count,
        value_cents,
        avg_cmc,
    }
}

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The most valuable rows, descending by row value. Ties keep insertion order
/// and rows with no owned copies never appear.
pub fn top_value_cards(items: &[CollectionItem], limit: usize) -> Vec<&CollectionItem> {
    let mut owned: Vec<&CollectionItem> = items.iter().filter(|item| item.copies() > 0).collect();
    owned.sort_by(|a, b| item_value_cents(b).cmp(&item_value_cents(a)));
    owned.truncate(limit);
    owned
}

/// Owned copies per color letter bucket. Multicolor cards count toward each of
/// their colors; cards with no colors land in "Colorless".
pub fn color_distribution(items: &[CollectionItem]) -> HashMap<String, u32> {
    let mut buckets: HashMap<String, u32> = HashMap::new();
    for item in items {
        let copies = item.copies();
        if copies == 0 {
            continue;
        }
        match &item.card.colors {
            Some(colors) if !colors.is_empty() => {
                for color in colors {
                    *buckets.entry(color.letter().to_string()).or_insert(0) += copies;
                }
            }
            _ => *buckets.entry("Colorless".to_string()).or_insert(0) += copies,
        }
    }
    buckets
}

/// Owned copies per primary type: the first word of the type line before any
/// separator. Missing type lines bucket under "Unknown".
pub fn type_distribution(items: &[CollectionItem]) -> HashMap<String, u32> {
    let mut buckets: HashMap<String, u32> = HashMap::new();
    for item in items {
        let copies = item.copies();
        if copies == 0 {
            continue;
        }
        let primary = item
            .card
            .type_line
            .as_deref()
            .map(primary_type)
            .unwrap_or("Unknown");
        *buckets.entry(primary.to_string()).or_insert(0) += copies;
    }
    buckets
}

fn primary_type(type_line: &str) -> &str {
    let head = type_line.split('—').next().unwrap_or("");
    let head = head.split("//").next().unwrap_or("");
    head.split_whitespace().next().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Prices;
    use crate::collection::Condition;
    use crate::color_identity::Color;
    use approx::assert_relative_eq;

    fn item(
        id: &str,
        quantity: u32,
        foil_quantity: u32,
        usd: Option<u32>,
        usd_foil: Option<u32>,
        cmc: f64,
    ) -> CollectionItem {
        CollectionItem {
            card: Card {
                id: id.to_string(),
                name: id.to_string(),
                cmc: Some(cmc),
                prices: Prices {
                    usd,
                    usd_foil,
                    ..Default::default()
                },
                ..Default::default()
            },
            quantity,
            foil_quantity,
            condition: Condition::NearMint,
            cached_price_cents: usd,
        }
    }

    #[test]
    fn foil_price_falls_back_to_regular() {
        let with_foil = item("a", 1, 0, Some(100), Some(400), 0.0);
        assert_eq!(price_cents(&with_foil.card, true), 400);
        assert_eq!(price_cents(&with_foil.card, false), 100);

        let no_foil = item("b", 1, 0, Some(100), None, 0.0);
        assert_eq!(price_cents(&no_foil.card, true), 100);

        let unpriced = item("c", 1, 0, None, None, 0.0);
        assert_eq!(price_cents(&unpriced.card, true), 0);
        assert_eq!(price_cents(&unpriced.card, false), 0);
    }

    #[test]
    fn regular_lookup_ignores_foil_price() {
        let foil_only = item("a", 1, 0, None, Some(999), 0.0);
        assert_eq!(price_cents(&foil_only.card, false), 0);
    }

    #[test]
    fn empty_collection_totals_are_all_zero() {
        let totals = collection_totals(&[]);
        assert_eq!(
            totals,
            CollectionTotals {
                unique: 0,
                count: 0,
                value_cents: 0,
                avg_cmc: 0.0,
            }
        );
    }

    #[test]
    fn totals_match_the_worked_example() {
        // 2 regular at $1.00 + 1 foil at $4.00, cmc 3.
        let items = vec![item("a", 2, 1, Some(100), Some(400), 3.0)];
        let totals = collection_totals(&items);
        assert_eq!(totals.unique, 1);
        assert_eq!(totals.count, 3);
        assert_eq!(totals.value_cents, 600);
        assert_relative_eq!(totals.avg_cmc, 3.0);
    }

    #[test]
    fn foil_copies_fall_back_to_regular_rate_in_totals() {
        let items = vec![item("a", 1, 2, Some(150), None, 2.0)];
        assert_eq!(collection_totals(&items).value_cents, 450);
    }

    #[test]
    fn zero_quantity_rows_do_not_count() {
        let items = vec![
            item("a", 0, 0, Some(10_000), None, 9.0),
            item("b", 1, 0, Some(100), None, 2.0),
        ];
        let totals = collection_totals(&items);
        assert_eq!(totals.unique, 1);
        assert_eq!(totals.count, 1);
        assert_eq!(totals.value_cents, 100);
        assert_relative_eq!(totals.avg_cmc, 2.0);
    }

    #[test]
    fn average_cmc_is_weighted_and_rounded() {
        // (1*1 + 2*4) / 3 = 3.0; (1*1 + 2*2) / 3 = 1.666... -> 1.67
        let items = vec![
            item("a", 1, 0, None, None, 1.0),
            item("b", 2, 0, None, None, 2.0),
        ];
        assert_relative_eq!(collection_totals(&items).avg_cmc, 1.67);
    }

    #[test]
    fn top_value_sorts_descending_and_respects_limit() {
        let items = vec![
            item("cheap", 1, 0, Some(50), None, 0.0),
            item("dear", 1, 0, Some(5000), None, 0.0),
            item("mid", 4, 0, Some(300), None, 0.0),
        ];
        let top = top_value_cards(&items, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].card.id, "dear");
        assert_eq!(top[1].card.id, "mid");
    }

    #[test]
    fn top_value_ties_keep_insertion_order() {
        let items = vec![
            item("first", 1, 0, Some(100), None, 0.0),
            item("second", 1, 0, Some(100), None, 0.0),
        ];
        let top = top_value_cards(&items, 5);
        assert_eq!(top[0].card.id, "first");
        assert_eq!(top[1].card.id, "second");
    }

    #[test]
    fn top_value_excludes_unowned_rows() {
        let items = vec![item("ghost", 0, 0, Some(9999), None, 0.0)];
        assert!(top_value_cards(&items, 10).is_empty());
    }

    #[test]
    fn color_distribution_counts_each_color_and_colorless() {
        let mut boros = item("boros", 2, 0, None, None, 2.0);
        boros.card.colors = Some(vec![Color::White, Color::Red]);
        let artifact = item("rock", 3, 0, None, None, 2.0);
        let skipped = item("none", 0, 0, None, None, 2.0);

        let dist = color_distribution(&[boros, artifact, skipped]);
        assert_eq!(dist.get("W"), Some(&2));
        assert_eq!(dist.get("R"), Some(&2));
        assert_eq!(dist.get("Colorless"), Some(&3));
        assert_eq!(dist.len(), 3);
    }

    #[test]
    fn type_distribution_buckets_by_first_word_before_separator() {
        let mut creature = item("elf", 2, 1, None, None, 1.0);
        creature.card.type_line = Some("Creature — Elf Druid".to_string());
        let mut legend = item("dragon", 1, 0, None, None, 5.0);
        legend.card.type_line = Some("Legendary Creature — Dragon".to_string());
        let untyped = item("blank", 1, 0, None, None, 0.0);

        let dist = type_distribution(&[creature, legend, untyped]);
        assert_eq!(dist.get("Creature"), Some(&3));
        assert_eq!(dist.get("Legendary"), Some(&1));
        assert_eq!(dist.get("Unknown"), Some(&1));
    }

    #[test]
    fn totals_are_idempotent() {
        let items = vec![item("a", 2, 1, Some(100), Some(400), 3.0)];
        assert_eq!(collection_totals(&items), collection_totals(&items));
    }
}
