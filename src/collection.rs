use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::Card;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    #[serde(rename = "NM")]
    NearMint,
    #[serde(rename = "LP")]
    LightlyPlayed,
    #[serde(rename = "MP")]
    ModeratelyPlayed,
    #[serde(rename = "HP")]
    HeavilyPlayed,
    #[serde(rename = "DMG")]
    Damaged,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::NearMint,
        Condition::LightlyPlayed,
        Condition::ModeratelyPlayed,
        Condition::HeavilyPlayed,
        Condition::Damaged,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Condition::NearMint => "NM",
            Condition::LightlyPlayed => "LP",
            Condition::ModeratelyPlayed => "MP",
            Condition::HeavilyPlayed => "HP",
            Condition::Damaged => "DMG",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One owned card: a card reference plus regular and foil counts. Rows with
/// zero combined quantity do not exist; removal happens on the last copy.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CollectionItem {
    pub card: Card,
    pub quantity: u32,
    pub foil_quantity: u32,
    pub condition: Condition,
    pub cached_price_cents: Option<u32>,
}

impl CollectionItem {
    pub fn copies(&self) -> u32 {
        self.quantity + self.foil_quantity
    }

    pub fn label(&self) -> String {
        format!(
            "{} x{} (+{} foil) [{}]",
            self.card.name, self.quantity, self.foil_quantity, self.condition
        )
    }
}

/// Merge a card into the collection, by card id. Existing rows accumulate
/// quantities and refresh their cached price when the incoming card has one.
pub fn add_card(
    items: &mut Vec<CollectionItem>,
    card: Card,
    quantity: u32,
    foil_quantity: u32,
    condition: Condition,
) {
    if let Some(existing) = items.iter_mut().find(|item| item.card.id == card.id) {
        existing.quantity += quantity;
        existing.foil_quantity += foil_quantity;
        if card.prices.usd.is_some() {
            existing.cached_price_cents = card.prices.usd;
        }
        return;
    }
    let cached_price_cents = card.prices.usd;
    items.push(CollectionItem {
        card,
        quantity,
        foil_quantity,
        condition,
        cached_price_cents,
    });
}

/// Overwrite a row's quantities. The row is deleted once both counts hit zero.
pub fn set_quantities(
    items: &mut Vec<CollectionItem>,
    card_id: &str,
    quantity: u32,
    foil_quantity: u32,
) {
    if let Some(pos) = items.iter().position(|item| item.card.id == card_id) {
        if quantity + foil_quantity == 0 {
            items.remove(pos);
        } else {
            items[pos].quantity = quantity;
            items[pos].foil_quantity = foil_quantity;
        }
    }
}
