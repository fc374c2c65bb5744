use std::collections::BTreeSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::card::Card;

/// The five colors of Magic. Variant order is the canonical WUBRG order, so
/// the derived `Ord` sorts identities deterministically.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        match letter {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

lazy_static! {
    static ref MANA_COLOR: Regex = Regex::new("[WUBRG]").unwrap();
}

/// Colors mentioned anywhere in a mana cost string. Plain letter scanning
/// covers hybrid and Phyrexian symbols ("{W/P}") for free.
pub fn mana_cost_colors(cost: &str) -> BTreeSet<Color> {
    MANA_COLOR
        .find_iter(cost)
        .filter_map(|m| m.as_str().chars().next().and_then(Color::from_letter))
        .collect()
}

fn card_colors_for_aggregation(card: &Card) -> BTreeSet<Color> {
    // An explicit color_identity is authoritative, even when empty (lands,
    // colorless artifacts). Only a missing field falls back to the mana cost
    // scan unioned with the colors field.
    if let Some(identity) = &card.color_identity {
        return identity.iter().copied().collect();
    }
    let mut colors = card
        .mana_cost
        .as_deref()
        .map(mana_cost_colors)
        .unwrap_or_default();
    if let Some(explicit) = &card.colors {
        colors.extend(explicit.iter().copied());
    }
    colors
}

/// Aggregate color identity of a deck: the union of every card's identity,
/// deduplicated and in canonical WUBRG order. Empty input yields an empty set.
pub fn deck_color_identity(cards: &[Card]) -> Vec<Color> {
    let mut identity = BTreeSet::new();
    for card in cards {
        identity.extend(card_colors_for_aggregation(card));
    }
    identity.into_iter().collect()
}

/// A single card's identity as used for legality checks: the color_identity
/// field, else the colors field, else empty.
pub fn card_identity(card: &Card) -> Vec<Color> {
    card.color_identity
        .clone()
        .or_else(|| card.colors.clone())
        .unwrap_or_default()
}

/// True when every color of the card's identity is already present in the
/// deck's identity. Cards with no color information are always addable.
pub fn can_add_card(card: &Card, deck_identity: &[Color]) -> bool {
    card_identity(card)
        .iter()
        .all(|color| deck_identity.contains(color))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityViolation {
    pub card_name: String,
    pub colors: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityReport {
    pub valid: bool,
    pub violations: Vec<IdentityViolation>,
}

/// Check every card against the commander's identity. Violations are reported
/// in input order and never auto-corrected.
pub fn validate_color_identity(cards: &[Card], commander_identity: &[Color]) -> IdentityReport {
    let mut violations = Vec::new();
    for card in cards {
        let colors = card_identity(card);
        if colors
            .iter()
            .any(|color| !commander_identity.contains(color))
        {
            violations.push(IdentityViolation {
                card_name: card.name.clone(),
                colors,
            });
        }
    }
    IdentityReport {
        valid: violations.is_empty(),
        violations,
    }
}

pub fn format_identity(identity: &[Color]) -> String {
    if identity.is_empty() {
        "Colorless".to_string()
    } else {
        identity.iter().map(|c| c.letter()).collect()
    }
}
