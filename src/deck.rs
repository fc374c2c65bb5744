use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::color_identity::{self, Color};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeckCard {
    pub card: Card,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Deck {
    pub name: String,
    pub commander: Option<Card>,
    pub cards: Vec<DeckCard>,
}

impl Deck {
    pub fn new(name: &str) -> Deck {
        Deck {
            name: name.to_string(),
            commander: None,
            cards: Vec::new(),
        }
    }

    /// The reference identity for legality checks: the commander's identity
    /// when one is set, otherwise the identity derived from the card list.
    pub fn identity(&self) -> Vec<Color> {
        match &self.commander {
            Some(commander) => {
                let identity: BTreeSet<Color> =
                    color_identity::card_identity(commander).into_iter().collect();
                identity.into_iter().collect()
            }
            None => color_identity::deck_color_identity(&self.card_list()),
        }
    }

    pub fn card_list(&self) -> Vec<Card> {
        self.cards.iter().map(|entry| entry.card.clone()).collect()
    }

    pub fn add_card(&mut self, card: Card, quantity: u32) {
        if let Some(entry) = self.cards.iter_mut().find(|entry| entry.card.id == card.id) {
            entry.quantity += quantity;
            return;
        }
        self.cards.push(DeckCard { card, quantity });
    }

    pub fn copy_count(&self) -> u32 {
        let commander_copies = if self.commander.is_some() { 1 } else { 0 };
        self.cards.iter().map(|entry| entry.quantity).sum::<u32>() + commander_copies
    }

    /// Quantity-weighted mana curve over eight buckets (0..=6 and 7+).
    /// Lands sit outside the curve.
    pub fn mana_curve(&self) -> [u32; 8] {
        let mut curve = [0u32; 8];
        for entry in &self.cards {
            let is_land = entry
                .card
                .type_line
                .as_deref()
                .map(|t| t.contains("Land"))
                .unwrap_or(false);
            if is_land {
                continue;
            }
            let bucket = (entry.card.cmc.unwrap_or(0.0).floor() as usize).min(7);
            curve[bucket] += entry.quantity;
        }
        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, identity: &[Color], cmc: f64, type_line: &str) -> Card {
        Card {
            id: id.to_string(),
            name: id.to_string(),
            color_identity: Some(identity.to_vec()),
            cmc: Some(cmc),
            type_line: Some(type_line.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn commander_identity_wins_over_card_list() {
        let mut deck = Deck::new("Izzet");
        deck.commander = Some(card("cmdr", &[Color::Blue, Color::Red], 4.0, "Legendary Creature"));
        deck.add_card(card("elf", &[Color::Green], 1.0, "Creature"), 1);
        assert_eq!(deck.identity(), vec![Color::Blue, Color::Red]);
    }

    #[test]
    fn deck_without_commander_derives_identity_from_cards() {
        let mut deck = Deck::new("Brew");
        deck.add_card(card("bolt", &[Color::Red], 1.0, "Instant"), 4);
        deck.add_card(card("elf", &[Color::Green], 1.0, "Creature"), 4);
        assert_eq!(deck.identity(), vec![Color::Red, Color::Green]);
    }

    #[test]
    fn adding_a_card_twice_accumulates_quantity() {
        let mut deck = Deck::new("Brew");
        deck.add_card(card("bolt", &[Color::Red], 1.0, "Instant"), 2);
        deck.add_card(card("bolt", &[Color::Red], 1.0, "Instant"), 2);
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].quantity, 4);
        assert_eq!(deck.copy_count(), 4);
    }

    #[test]
    fn mana_curve_weights_by_quantity_and_skips_lands() {
        let mut deck = Deck::new("Brew");
        deck.add_card(card("bolt", &[Color::Red], 1.0, "Instant"), 4);
        deck.add_card(card("ball", &[Color::Red], 8.0, "Sorcery"), 2);
        deck.add_card(card("mountain", &[], 0.0, "Basic Land — Mountain"), 20);
        let curve = deck.mana_curve();
        assert_eq!(curve[1], 4);
        assert_eq!(curve[7], 2);
        assert_eq!(curve[0], 0);
    }
}
