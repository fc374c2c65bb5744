use inquire::{InquireError, Select, Text};
use reqwest::{header::HeaderMap, Client};
use std::error::Error;

use crate::api;
use crate::cache::{cache_key, CardCache};
use crate::card::Card;
use crate::collection_controller;
use crate::color_identity::{self, format_identity};
use crate::wishlist_controller::{self, WishlistItem};

pub async fn search_and_select_cards(
    client: &Client,
    headers: &HeaderMap,
    cache: &dyn CardCache,
) -> Result<(), Box<dyn Error>> {
    let query = match Text::new("Search cards:").prompt() {
        Ok(query) => query,
        Err(_) => {
            println!("Failed to read the search query.");
            return Ok(());
        }
    };

    println!("Searching for cards, please wait...");
    let cards = api::search_cards(client, headers.clone(), &query).await?;
    if cards.is_empty() {
        println!("No cards found for '{}'.", query);
        return Ok(());
    }

    let labels: Vec<String> = cards.iter().map(|card| card.label()).collect();
    let select_ans: Result<String, InquireError> =
        Select::new("Select a printing:", labels).prompt();

    match select_ans {
        Ok(label) => {
            if let Some(card) = cards.iter().find(|card| card.label() == label) {
                cache.set(&cache_key(&card.name), card.clone());
                card_actions(card.clone())?;
            } else {
                println!("Card not found.");
            }
        }
        Err(_) => println!("Failed to select a card."),
    }

    Ok(())
}

fn card_actions(card: Card) -> Result<(), Box<dyn Error>> {
    let action_options: Vec<&str> = vec![
        "Show details",
        "Add to collection",
        "Add to wishlist",
        "Cancel",
    ];
    let action_ans: Result<&str, InquireError> =
        Select::new("What would you like to do with this card?", action_options).prompt();

    match action_ans {
        Ok("Show details") => show_card_details(&card),
        Ok("Add to collection") => collection_controller::prompt_and_add(card)?,
        Ok("Add to wishlist") => prompt_and_add_to_wishlist(card)?,
        Ok(_) => {}
        Err(_) => println!("Failed to select an action."),
    }

    Ok(())
}

fn show_card_details(card: &Card) {
    println!("Name: {}", card.name);
    println!(
        "Mana cost: {}",
        card.mana_cost.clone().unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Type: {}",
        card.type_line.clone().unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Color identity: {}",
        format_identity(&color_identity::card_identity(card))
    );
    println!(
        "Set: {} ({})",
        card.set_name.clone().unwrap_or_else(|| "Unknown".to_string()),
        card.set
            .clone()
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| "???".to_string())
    );
    match card.prices.usd {
        Some(cents) => println!("Price: $ {:.2}", cents as f64 / 100.0),
        None => println!("Price: unavailable"),
    }
    if let Some(cents) = card.prices.usd_foil {
        println!("Foil price: $ {:.2}", cents as f64 / 100.0);
    }
}

fn prompt_and_add_to_wishlist(card: Card) -> Result<(), Box<dyn Error>> {
    let default_price = format!("{:.2}", card.prices.usd.unwrap_or(0) as f64 / 100.0);
    let target_raw = Text::new("Alert when the price drops below (USD):")
        .with_default(&default_price)
        .prompt()?;
    let target: f64 = target_raw.trim().parse()?;
    if target < 0.0 {
        println!("Target price must not be negative.");
        return Ok(());
    }

    let item = WishlistItem {
        card_name: card.name.clone(),
        set_code: card.set.clone(),
        collector_number: card.collector_number.clone(),
        target_price_cents: (target * 100.0).round() as u32,
        last_price_cents: card.prices.usd,
    };
    wishlist_controller::add_to_wishlist(item)?;
    Ok(())
}
